//! Elliptical arcs as cubic Bezier chains.
//!
//! Arc angles follow the GDI+ convention: degrees, measured clockwise on a
//! y-down screen, and *elliptical*, meaning the angle names the direction of
//! the ray from the center rather than the ellipse parameter. An arc is split
//! into at most four quarter pieces, each approximated by one cubic.

use crate::basics::{deg2rad, PI};
use crate::geometry::PointF;

/// Epsilon to prevent adding degenerate curves.
const BEZIER_ARC_ANGLE_EPSILON: f64 = 0.01;

/// Convert a parametric arc piece (radians, at most a quarter turn) to one
/// cubic Bezier: `[start, ctrl1, ctrl2, end]`.
pub fn arc_to_bezier(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start_angle: f64,
    sweep_angle: f64,
) -> [PointF; 4] {
    let x0 = (sweep_angle / 2.0).cos();
    let y0 = (sweep_angle / 2.0).sin();
    let tx = (1.0 - x0) * 4.0 / 3.0;
    let ty = y0 - tx * x0 / y0;

    let px = [x0, x0 + tx, x0 + tx, x0];
    let py = [-y0, -ty, ty, y0];

    let (sn, cs) = (start_angle + sweep_angle / 2.0).sin_cos();

    let mut curve = [PointF::EMPTY; 4];
    for i in 0..4 {
        curve[i] = PointF::new(
            cx + rx * (px[i] * cs - py[i] * sn),
            cy + ry * (px[i] * sn + py[i] * cs),
        );
    }
    curve
}

/// Ellipse parameter of the point hit by a ray at `angle` (radians).
pub fn elliptical_to_parametric(rx: f64, ry: f64, angle: f64) -> f64 {
    if rx == ry || rx == 0.0 || ry == 0.0 {
        return angle;
    }
    let (s, c) = angle.sin_cos();
    let t = (rx * s).atan2(ry * c);
    // Keep the same turn as `angle`.
    t + ((angle - t) / (2.0 * PI)).round() * 2.0 * PI
}

/// Point on the ellipse at elliptical angle `degrees`.
pub fn arc_point(center: PointF, rx: f64, ry: f64, degrees: f64) -> PointF {
    let t = elliptical_to_parametric(rx, ry, deg2rad(degrees));
    PointF::new(center.x + rx * t.cos(), center.y + ry * t.sin())
}

/// An arc converted to a chain of cubic Beziers.
#[derive(Debug, Clone)]
pub struct BezierArc {
    start: PointF,
    curves: Vec<[PointF; 3]>,
}

impl BezierArc {
    /// Build from center, radii and GDI+ angles in degrees. Sweeps beyond a
    /// full turn are clamped to one turn.
    pub fn new(center: PointF, rx: f64, ry: f64, start_angle: f64, sweep_angle: f64) -> Self {
        let sweep_angle = sweep_angle.clamp(-360.0, 360.0);
        let a0 = deg2rad(start_angle);
        let t0 = elliptical_to_parametric(rx, ry, a0);
        let sweep = if sweep_angle.abs() >= 360.0 {
            deg2rad(sweep_angle)
        } else {
            let t1 = elliptical_to_parametric(rx, ry, a0 + deg2rad(sweep_angle));
            // Parametric sweep lies within half a turn of the angular one.
            let raw = t1 - t0;
            let target = deg2rad(sweep_angle);
            raw + ((target - raw) / (2.0 * PI)).round() * 2.0 * PI
        };

        let start = PointF::new(center.x + rx * t0.cos(), center.y + ry * t0.sin());
        let mut curves = Vec::new();
        if sweep.abs() < 1e-10 {
            return Self { start, curves };
        }

        let mut start_angle = t0;
        let mut total_sweep = 0.0;
        loop {
            let prev_sweep = total_sweep;
            let mut local_sweep;
            let mut done = false;
            if sweep < 0.0 {
                local_sweep = -PI * 0.5;
                total_sweep -= PI * 0.5;
                if total_sweep <= sweep + BEZIER_ARC_ANGLE_EPSILON {
                    local_sweep = sweep - prev_sweep;
                    done = true;
                }
            } else {
                local_sweep = PI * 0.5;
                total_sweep += PI * 0.5;
                if total_sweep >= sweep - BEZIER_ARC_ANGLE_EPSILON {
                    local_sweep = sweep - prev_sweep;
                    done = true;
                }
            }

            let c = arc_to_bezier(center.x, center.y, rx, ry, start_angle, local_sweep);
            curves.push([c[1], c[2], c[3]]);
            start_angle += local_sweep;

            if done || curves.len() >= 4 {
                break;
            }
        }
        Self { start, curves }
    }

    pub fn start(&self) -> PointF {
        self.start
    }

    /// End point of the last piece, or the start for a zero sweep.
    pub fn end(&self) -> PointF {
        self.curves.last().map_or(self.start, |c| c[2])
    }

    /// Pieces as `[ctrl1, ctrl2, end]`, each starting where the previous
    /// one ended.
    pub fn curves(&self) -> &[[PointF; 3]] {
        &self.curves
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn near(a: PointF, x: f64, y: f64) -> bool {
        (a.x - x).abs() < EPS && (a.y - y).abs() < EPS
    }

    #[test]
    fn test_arc_to_bezier_endpoints() {
        let c = arc_to_bezier(0.0, 0.0, 10.0, 10.0, 0.0, PI / 2.0);
        assert!(near(c[0], 10.0, 0.0));
        assert!(near(c[3], 0.0, 10.0));
    }

    #[test]
    fn test_quarter_arc() {
        let arc = BezierArc::new(PointF::EMPTY, 10.0, 10.0, 0.0, 90.0);
        assert_eq!(arc.curves().len(), 1);
        assert!(near(arc.start(), 10.0, 0.0));
        // y-down: 90 degrees points down the screen
        assert!(near(arc.end(), 0.0, 10.0));
    }

    #[test]
    fn test_full_and_half_circle() {
        assert_eq!(BezierArc::new(PointF::EMPTY, 10.0, 10.0, 0.0, 360.0).curves().len(), 4);
        assert_eq!(BezierArc::new(PointF::EMPTY, 10.0, 10.0, 0.0, 180.0).curves().len(), 2);
        // Clamped to one turn
        assert_eq!(BezierArc::new(PointF::EMPTY, 10.0, 10.0, 0.0, 720.0).curves().len(), 4);
    }

    #[test]
    fn test_negative_sweep() {
        let arc = BezierArc::new(PointF::EMPTY, 10.0, 10.0, 0.0, -90.0);
        assert_eq!(arc.curves().len(), 1);
        assert!(near(arc.end(), 0.0, -10.0));
    }

    #[test]
    fn test_zero_sweep() {
        let arc = BezierArc::new(PointF::new(5.0, 5.0), 10.0, 10.0, 0.0, 0.0);
        assert!(arc.curves().is_empty());
        assert_eq!(arc.start(), arc.end());
    }

    #[test]
    fn test_elliptical_angle() {
        // A ray at 45 degrees hits a 20x10 ellipse where |x| == |y|.
        let p = arc_point(PointF::EMPTY, 20.0, 10.0, 45.0);
        assert!((p.x - p.y).abs() < 1e-9);
        assert!(p.x > 0.0);
        let q = arc_point(PointF::EMPTY, 20.0, 10.0, 225.0);
        assert!((q.x - q.y).abs() < 1e-9);
        assert!(q.x < 0.0);
        // Elliptical angle keeps the end point on the same ray.
        let arc = BezierArc::new(PointF::EMPTY, 20.0, 10.0, 0.0, 45.0);
        assert!((arc.end().x - arc.end().y).abs() < 1e-9);
    }
}
