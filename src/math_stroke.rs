//! Stroke math: cap, join and miter calculations.
//!
//! Computes the outline vertices around one vertex of a flattened figure.
//! Offsets are half the pen width on each side. Joins are computed for the
//! outer side of a corner with the pen's join style; the inner side goes
//! through the corner vertex when the rails overlap too far to meet.

use crate::basics::PI;
use crate::geometry::PointF;
use crate::math::{calc_distance, calc_intersection, cross_product};
use crate::vertex_sequence::VertexDist;

// ============================================================================
// Enums
// ============================================================================

/// Shape drawn at the open ends of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Flat,
    /// Extended by half the width.
    Square,
    Round,
    /// Point at half the width beyond the end.
    Triangle,
    /// Caller geometry from the pen's [`crate::pen::CustomLineCap`].
    Custom,
}

/// Shape drawn at the outer side of corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Rails extended to their intersection; beveled past the miter limit.
    #[default]
    Miter,
    Bevel,
    Round,
    /// Miter cut off at the miter limit.
    MiterClipped,
}

/// A cap resolved for one end, with custom geometry attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapShape<'a> {
    Flat,
    Square,
    Round,
    Triangle,
    /// Points in pen-width units; x across the stroke, y outward.
    Custom(&'a [PointF]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MiterFallback {
    Bevel,
    Clip,
}

// ============================================================================
// MathStroke
// ============================================================================

/// Stroke geometry calculator.
#[derive(Debug, Clone)]
pub struct MathStroke {
    width: f64,
    width_eps: f64,
    miter_limit: f64,
    inner_miter_limit: f64,
    approx_scale: f64,
    line_join: LineJoin,
}

impl MathStroke {
    pub fn new() -> Self {
        Self {
            width: 0.5,
            width_eps: 0.5 / 1024.0,
            miter_limit: 10.0,
            inner_miter_limit: 1.01,
            approx_scale: 1.0,
            line_join: LineJoin::Miter,
        }
    }

    pub fn set_line_join(&mut self, lj: LineJoin) {
        self.line_join = lj;
    }
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Full stroke width; stored as the half-width offset.
    pub fn set_width(&mut self, w: f64) {
        self.width = w.abs() * 0.5;
        self.width_eps = self.width / 1024.0;
    }

    pub fn width(&self) -> f64 {
        self.width * 2.0
    }

    pub fn set_miter_limit(&mut self, ml: f64) {
        self.miter_limit = ml;
    }
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    /// Round joins and caps stay within `0.125 / s` of the true arc.
    pub fn set_approximation_scale(&mut self, s: f64) {
        self.approx_scale = s;
    }
    pub fn approximation_scale(&self) -> f64 {
        self.approx_scale
    }

    fn round_step(&self) -> f64 {
        (self.width / (self.width + 0.125 / self.approx_scale)).acos() * 2.0
    }

    /// Cap vertices at the end `v0` of a segment toward `v1`, running from
    /// the left rail to the right rail.
    pub fn calc_cap(
        &self,
        vc: &mut Vec<PointF>,
        v0: &VertexDist,
        v1: &VertexDist,
        len: f64,
        cap: CapShape<'_>,
    ) {
        vc.clear();

        let ux = (v1.x - v0.x) / len;
        let uy = (v1.y - v0.y) / len;
        let dx1 = uy * self.width;
        let dy1 = ux * self.width;
        let left = PointF::new(v0.x - dx1, v0.y + dy1);
        let right = PointF::new(v0.x + dx1, v0.y - dy1);
        let tip = PointF::new(v0.x - ux * self.width, v0.y - uy * self.width);

        match cap {
            CapShape::Flat => {
                vc.push(left);
                vc.push(right);
            }
            CapShape::Square => {
                let (ex, ey) = (-ux * self.width, -uy * self.width);
                vc.push(PointF::new(left.x + ex, left.y + ey));
                vc.push(PointF::new(right.x + ex, right.y + ey));
            }
            CapShape::Triangle => {
                vc.push(left);
                vc.push(tip);
                vc.push(right);
            }
            CapShape::Round => {
                let mut n = (PI / self.round_step()) as i32;
                // An odd count puts one vertex on the tip.
                if n % 2 == 0 {
                    n += 1;
                }
                let da = PI / (n + 1) as f64;
                vc.push(left);
                let mut a1 = dy1.atan2(-dx1) + da;
                for k in 1..=n {
                    if 2 * k == n + 1 {
                        vc.push(tip);
                    } else {
                        vc.push(PointF::new(
                            v0.x + a1.cos() * self.width,
                            v0.y + a1.sin() * self.width,
                        ));
                    }
                    a1 += da;
                }
                vc.push(right);
            }
            CapShape::Custom(points) => {
                let w = self.width * 2.0;
                vc.push(left);
                for p in points {
                    vc.push(PointF::new(
                        v0.x + w * (p.x * uy - p.y * ux),
                        v0.y + w * (-p.x * ux - p.y * uy),
                    ));
                }
                vc.push(right);
            }
        }
    }

    /// Outline of a zero-length figure at `p`: a disc for round caps, an
    /// axis-aligned square for square caps, nothing otherwise.
    pub fn calc_dot(&self, vc: &mut Vec<PointF>, p: PointF, cap: CapShape<'_>) {
        vc.clear();
        match cap {
            CapShape::Round => {
                let n = ((2.0 * PI / self.round_step()).ceil() as usize).max(8);
                let da = 2.0 * PI / n as f64;
                for i in 0..n {
                    let a = da * i as f64;
                    vc.push(PointF::new(
                        p.x + a.cos() * self.width,
                        p.y + a.sin() * self.width,
                    ));
                }
            }
            CapShape::Square => {
                let w = self.width;
                vc.push(PointF::new(p.x - w, p.y - w));
                vc.push(PointF::new(p.x + w, p.y - w));
                vc.push(PointF::new(p.x + w, p.y + w));
                vc.push(PointF::new(p.x - w, p.y + w));
            }
            _ => {}
        }
    }

    /// Join vertices where `v0`→`v1` meets `v1`→`v2`.
    pub fn calc_join(
        &self,
        vc: &mut Vec<PointF>,
        v0: &VertexDist,
        v1: &VertexDist,
        v2: &VertexDist,
        len1: f64,
        len2: f64,
    ) {
        let dx1 = self.width * (v1.y - v0.y) / len1;
        let dy1 = self.width * (v1.x - v0.x) / len1;
        let dx2 = self.width * (v2.y - v1.y) / len2;
        let dy2 = self.width * (v2.x - v1.x) / len2;

        vc.clear();

        let cp = cross_product(v0.x, v0.y, v1.x, v1.y, v2.x, v2.y);
        if cp > 0.0 {
            // Inner join
            let limit = (len1.min(len2) / self.width).max(self.inner_miter_limit);
            let d = (dx1 - dx2) * (dx1 - dx2) + (dy1 - dy2) * (dy1 - dy2);
            if d < len1 * len1 && d < len2 * len2 {
                self.calc_miter(
                    vc,
                    v0,
                    v1,
                    v2,
                    [dx1, dy1, dx2, dy2],
                    MiterFallback::Bevel,
                    limit,
                    0.0,
                );
            } else {
                vc.push(PointF::new(v1.x + dx1, v1.y - dy1));
                vc.push(v1.point());
                vc.push(PointF::new(v1.x + dx2, v1.y - dy2));
            }
            return;
        }

        // Outer join
        let dx = (dx1 + dx2) / 2.0;
        let dy = (dy1 + dy2) / 2.0;
        let dbevel = (dx * dx + dy * dy).sqrt();

        if (self.line_join == LineJoin::Round || self.line_join == LineJoin::Bevel)
            && self.approx_scale * (self.width - dbevel) < self.width_eps
        {
            // Nearly straight: one vertex is enough.
            match calc_intersection(
                v0.x + dx1,
                v0.y - dy1,
                v1.x + dx1,
                v1.y - dy1,
                v1.x + dx2,
                v1.y - dy2,
                v2.x + dx2,
                v2.y - dy2,
            ) {
                Some((ix, iy)) => vc.push(PointF::new(ix, iy)),
                None => vc.push(PointF::new(v1.x + dx1, v1.y - dy1)),
            }
            return;
        }

        let bevel = |vc: &mut Vec<PointF>| {
            vc.push(PointF::new(v1.x + dx1, v1.y - dy1));
            vc.push(PointF::new(v1.x + dx2, v1.y - dy2));
        };

        match self.line_join {
            LineJoin::Miter | LineJoin::MiterClipped if self.miter_limit <= 1.0 => bevel(vc),
            LineJoin::Miter => self.calc_miter(
                vc,
                v0,
                v1,
                v2,
                [dx1, dy1, dx2, dy2],
                MiterFallback::Bevel,
                self.miter_limit,
                dbevel,
            ),
            LineJoin::MiterClipped => self.calc_miter(
                vc,
                v0,
                v1,
                v2,
                [dx1, dy1, dx2, dy2],
                MiterFallback::Clip,
                self.miter_limit,
                dbevel,
            ),
            LineJoin::Round => self.calc_arc(vc, v1.x, v1.y, dx1, -dy1, dx2, -dy2),
            LineJoin::Bevel => bevel(vc),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn calc_arc(
        &self,
        vc: &mut Vec<PointF>,
        x: f64,
        y: f64,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
    ) {
        let mut a1 = dy1.atan2(dx1);
        let mut a2 = dy2.atan2(dx2);
        let da = self.round_step();

        vc.push(PointF::new(x + dx1, y + dy1));
        if a1 > a2 {
            a2 += 2.0 * PI;
        }
        let n = ((a2 - a1) / da) as i32;
        let da = (a2 - a1) / (n + 1) as f64;
        a1 += da;
        for _ in 0..n {
            vc.push(PointF::new(x + a1.cos() * self.width, y + a1.sin() * self.width));
            a1 += da;
        }
        vc.push(PointF::new(x + dx2, y + dy2));
    }

    #[allow(clippy::too_many_arguments)]
    fn calc_miter(
        &self,
        vc: &mut Vec<PointF>,
        v0: &VertexDist,
        v1: &VertexDist,
        v2: &VertexDist,
        d: [f64; 4],
        fallback: MiterFallback,
        mlimit: f64,
        dbevel: f64,
    ) {
        let [dx1, dy1, dx2, dy2] = d;
        let mut xi = v1.x;
        let mut yi = v1.y;
        let mut di = 1.0;
        let lim = self.width * mlimit;
        let mut limit_exceeded = true;
        let mut intersection_failed = true;

        if let Some((ix, iy)) = calc_intersection(
            v0.x + dx1,
            v0.y - dy1,
            v1.x + dx1,
            v1.y - dy1,
            v1.x + dx2,
            v1.y - dy2,
            v2.x + dx2,
            v2.y - dy2,
        ) {
            xi = ix;
            yi = iy;
            di = calc_distance(v1.x, v1.y, xi, yi);
            if di <= lim {
                vc.push(PointF::new(xi, yi));
                limit_exceeded = false;
            }
            intersection_failed = false;
        } else {
            // Parallel rails: the segments are collinear.
            let x2 = v1.x + dx1;
            let y2 = v1.y - dy1;
            if (cross_product(v0.x, v0.y, v1.x, v1.y, x2, y2) < 0.0)
                == (cross_product(v1.x, v1.y, v2.x, v2.y, x2, y2) < 0.0)
            {
                vc.push(PointF::new(x2, y2));
                limit_exceeded = false;
            }
        }

        if !limit_exceeded {
            return;
        }
        match fallback {
            MiterFallback::Bevel => {
                vc.push(PointF::new(v1.x + dx1, v1.y - dy1));
                vc.push(PointF::new(v1.x + dx2, v1.y - dy2));
            }
            MiterFallback::Clip => {
                if intersection_failed {
                    vc.push(PointF::new(v1.x + dx1 + dy1 * mlimit, v1.y - dy1 + dx1 * mlimit));
                    vc.push(PointF::new(v1.x + dx2 - dy2 * mlimit, v1.y - dy2 - dx2 * mlimit));
                } else {
                    let x1 = v1.x + dx1;
                    let y1 = v1.y - dy1;
                    let x2 = v1.x + dx2;
                    let y2 = v1.y - dy2;
                    let t = (lim - dbevel) / (di - dbevel);
                    vc.push(PointF::new(x1 + (xi - x1) * t, y1 + (yi - y1) * t));
                    vc.push(PointF::new(x2 + (xi - x2) * t, y2 + (yi - y2) * t));
                }
            }
        }
    }
}

impl Default for MathStroke {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn vd(x: f64, y: f64, dist: f64) -> VertexDist {
        VertexDist { x, y, dist }
    }

    fn stroker(width: f64, join: LineJoin) -> MathStroke {
        let mut ms = MathStroke::new();
        ms.set_width(width);
        ms.set_line_join(join);
        ms
    }

    #[test]
    fn test_defaults() {
        let ms = MathStroke::new();
        assert!((ms.width() - 1.0).abs() < 1e-10);
        assert_eq!(ms.line_join(), LineJoin::Miter);
        assert!((ms.miter_limit() - 10.0).abs() < 1e-10);
        assert!((ms.approximation_scale() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_flat_cap() {
        let ms = stroker(1.0, LineJoin::Miter);
        let mut vc = Vec::new();
        ms.calc_cap(&mut vc, &vd(0.0, 0.0, 10.0), &vd(10.0, 0.0, 0.0), 10.0, CapShape::Flat);
        assert_eq!(vc.len(), 2);
        assert!((vc[0].y - 0.5).abs() < 1e-12);
        assert!((vc[1].y + 0.5).abs() < 1e-12);
        assert_eq!(vc[0].x, 0.0);
    }

    #[test]
    fn test_square_cap_extends_backward() {
        let ms = stroker(2.0, LineJoin::Miter);
        let mut vc = Vec::new();
        ms.calc_cap(&mut vc, &vd(0.0, 0.0, 10.0), &vd(10.0, 0.0, 0.0), 10.0, CapShape::Square);
        assert_eq!(vc.len(), 2);
        assert!((vc[0].x + 1.0).abs() < 1e-12);
        assert!((vc[1].x + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_cap_tip() {
        let ms = stroker(4.0, LineJoin::Miter);
        let mut vc = Vec::new();
        ms.calc_cap(&mut vc, &vd(0.0, 0.0, 10.0), &vd(10.0, 0.0, 0.0), 10.0, CapShape::Triangle);
        assert_eq!(vc.len(), 3);
        assert_eq!(vc[1], PointF::new(-2.0, 0.0));
    }

    #[test]
    fn test_round_cap_hits_tip_exactly() {
        let ms = stroker(4.0, LineJoin::Miter);
        let mut vc = Vec::new();
        ms.calc_cap(&mut vc, &vd(0.0, 0.0, 10.0), &vd(10.0, 0.0, 0.0), 10.0, CapShape::Round);
        assert!(vc.len() > 3);
        assert!(vc.contains(&PointF::new(-2.0, 0.0)));
        for p in &vc {
            assert!((p.x * p.x + p.y * p.y).sqrt() < 2.0 + 1e-9);
            assert!(p.x >= -2.0);
        }
    }

    #[test]
    fn test_custom_cap_frame() {
        let ms = stroker(2.0, LineJoin::Miter);
        let mut vc = Vec::new();
        let arrow = [PointF::new(0.0, 1.0)];
        ms.calc_cap(
            &mut vc,
            &vd(0.0, 0.0, 10.0),
            &vd(10.0, 0.0, 0.0),
            10.0,
            CapShape::Custom(&arrow),
        );
        // One pen width outward from the start, against the line direction.
        assert_eq!(vc.len(), 3);
        assert!((vc[1].x + 2.0).abs() < 1e-12);
        assert!(vc[1].y.abs() < 1e-12);
    }

    #[test]
    fn test_dots() {
        let ms = stroker(2.0, LineJoin::Miter);
        let mut vc = Vec::new();
        ms.calc_dot(&mut vc, PointF::new(5.0, 5.0), CapShape::Square);
        assert_eq!(vc.len(), 4);
        assert_eq!(vc[0], PointF::new(4.0, 4.0));
        ms.calc_dot(&mut vc, PointF::new(5.0, 5.0), CapShape::Round);
        assert!(vc.len() >= 8);
        ms.calc_dot(&mut vc, PointF::new(5.0, 5.0), CapShape::Flat);
        assert!(vc.is_empty());
    }

    #[test]
    fn test_right_angle_miter() {
        let ms = stroker(2.0, LineJoin::Miter);
        let mut vc = Vec::new();
        let v0 = vd(0.0, 0.0, 10.0);
        let v1 = vd(10.0, 0.0, 10.0);
        let v2 = vd(10.0, 10.0, 0.0);
        ms.calc_join(&mut vc, &v0, &v1, &v2, 10.0, 10.0);
        assert_eq!(vc.len(), 1);
        assert!((vc[0].x - 11.0).abs() < 1e-12);
        assert!((vc[0].y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sharp_miter_falls_back_to_bevel() {
        let a = 170.0_f64.to_radians();
        let v0 = vd(0.0, 0.0, 10.0);
        let v1 = vd(10.0, 0.0, 10.0);
        let v2 = vd(10.0 + 10.0 * a.cos(), 10.0 * a.sin(), 0.0);
        let mut vc = Vec::new();
        for limit in [1.0, 10.0] {
            let mut ms = stroker(2.0, LineJoin::Miter);
            ms.set_miter_limit(limit);
            ms.calc_join(&mut vc, &v0, &v1, &v2, 10.0, 10.0);
            assert_eq!(vc.len(), 2);
            for p in &vc {
                assert!((calc_distance(p.x, p.y, 10.0, 0.0) - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_limit_one_bevels_right_angle() {
        let mut ms = stroker(2.0, LineJoin::Miter);
        ms.set_miter_limit(1.0);
        let mut vc = Vec::new();
        ms.calc_join(&mut vc, &vd(0.0, 0.0, 10.0), &vd(10.0, 0.0, 10.0), &vd(10.0, 10.0, 0.0), 10.0, 10.0);
        assert_eq!(vc.len(), 2);
    }

    #[test]
    fn test_miter_clipped_stays_within_limit() {
        let a = 170.0_f64.to_radians();
        let mut ms = stroker(2.0, LineJoin::MiterClipped);
        ms.set_miter_limit(4.0);
        let mut vc = Vec::new();
        let v2 = vd(10.0 + 10.0 * a.cos(), 10.0 * a.sin(), 0.0);
        ms.calc_join(&mut vc, &vd(0.0, 0.0, 10.0), &vd(10.0, 0.0, 10.0), &v2, 10.0, 10.0);
        assert_eq!(vc.len(), 2);
        for p in &vc {
            let d = calc_distance(p.x, p.y, 10.0, 0.0);
            // Cut at four half-widths along the bisector.
            assert!(d > 4.0 && d < 5.0);
        }
    }

    #[test]
    fn test_round_join_on_circle() {
        let ms = stroker(4.0, LineJoin::Round);
        let mut vc = Vec::new();
        ms.calc_join(&mut vc, &vd(0.0, 0.0, 10.0), &vd(10.0, 0.0, 10.0), &vd(10.0, 10.0, 0.0), 10.0, 10.0);
        assert!(vc.len() > 2);
        for p in &vc {
            assert!((calc_distance(p.x, p.y, 10.0, 0.0) - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_inner_join_meets_rails() {
        let ms = stroker(2.0, LineJoin::Bevel);
        let mut vc = Vec::new();
        // Reverse traversal puts the corner on the inner side.
        ms.calc_join(&mut vc, &vd(10.0, 10.0, 10.0), &vd(10.0, 0.0, 10.0), &vd(0.0, 0.0, 0.0), 10.0, 10.0);
        assert_eq!(vc.len(), 1);
        assert!((vc[0].x - 9.0).abs() < 1e-12);
        assert!((vc[0].y - 1.0).abs() < 1e-12);
    }
}
