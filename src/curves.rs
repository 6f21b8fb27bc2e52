//! Bezier curve flattening.
//!
//! Recursive de Casteljau subdivision for quadratic ([`Curve3Div`]) and
//! cubic ([`Curve4Div`]) curves. A piece is emitted once its control points
//! lie within the tolerance of the chord, so straight runs produce few points
//! and tight bends many.

use crate::geometry::PointF;
use crate::math::calc_sq_distance;

const CURVE_COLLINEARITY_EPSILON: f64 = 1e-30;
const CURVE_RECURSION_LIMIT: u32 = 32;

#[inline]
fn mid(a: PointF, b: PointF) -> PointF {
    PointF::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

#[inline]
fn sq_dist(a: PointF, b: PointF) -> f64 {
    calc_sq_distance(a.x, a.y, b.x, b.y)
}

/// Chord length squared and the unnormalized distance of `p` from the chord
/// line `a -> b`.
#[inline]
fn chord_offset(p: PointF, a: PointF, b: PointF) -> (f64, f64) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    (dx * dx + dy * dy, ((p.x - b.x) * dy - (p.y - b.y) * dx).abs())
}

/// Where `p` projects on the chord `a -> b` (0 at `a`, 1 at `b`) and its
/// squared distance to the nearest point of the chord.
fn chord_projection(p: PointF, a: PointF, b: PointF) -> (f64, f64) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return (0.0, sq_dist(p, a));
    }
    let u = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len2;
    (u, sq_dist(p, a.lerp(b, u.clamp(0.0, 1.0))))
}

#[inline]
fn strictly_inside(u: f64) -> bool {
    u > 0.0 && u < 1.0
}

// ============================================================================
// Curve3Div
// ============================================================================

/// Quadratic Bezier flattener.
pub struct Curve3Div {
    tolerance_sq: f64,
    points: Vec<PointF>,
}

impl Curve3Div {
    /// `tolerance` is the largest allowed distance between the curve and its
    /// polyline.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance_sq: tolerance * tolerance,
            points: Vec::new(),
        }
    }

    /// Flatten `p1 -> p2 -> p3`. Both end points are included.
    pub fn init(&mut self, p1: PointF, p2: PointF, p3: PointF) -> &[PointF] {
        self.points.clear();
        self.points.push(p1);
        self.subdivide(p1, p2, p3, 0);
        self.points.push(p3);
        &self.points
    }

    pub fn points(&self) -> &[PointF] {
        &self.points
    }

    fn subdivide(&mut self, p1: PointF, p2: PointF, p3: PointF, level: u32) {
        if level > CURVE_RECURSION_LIMIT {
            return;
        }
        let p12 = mid(p1, p2);
        let p23 = mid(p2, p3);
        let p123 = mid(p12, p23);

        let (chord_sq, d) = chord_offset(p2, p1, p3);
        if d > CURVE_COLLINEARITY_EPSILON {
            if d * d <= self.tolerance_sq * chord_sq {
                self.points.push(p123);
                return;
            }
        } else {
            let (u, excursion) = chord_projection(p2, p1, p3);
            if chord_sq != 0.0 && strictly_inside(u) {
                return;
            }
            if excursion < self.tolerance_sq {
                self.points.push(p2);
                return;
            }
        }

        self.subdivide(p1, p12, p123, level + 1);
        self.subdivide(p123, p23, p3, level + 1);
    }
}

// ============================================================================
// Curve4Div
// ============================================================================

/// Cubic Bezier flattener.
pub struct Curve4Div {
    tolerance_sq: f64,
    points: Vec<PointF>,
}

impl Curve4Div {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance_sq: tolerance * tolerance,
            points: Vec::new(),
        }
    }

    /// Flatten `p1 -> p2 -> p3 -> p4`. Both end points are included.
    pub fn init(&mut self, p1: PointF, p2: PointF, p3: PointF, p4: PointF) -> &[PointF] {
        self.points.clear();
        self.points.push(p1);
        self.subdivide([p1, p2, p3, p4], 0);
        self.points.push(p4);
        &self.points
    }

    pub fn points(&self) -> &[PointF] {
        &self.points
    }

    fn subdivide(&mut self, [p1, p2, p3, p4]: [PointF; 4], level: u32) {
        if level > CURVE_RECURSION_LIMIT {
            return;
        }
        let p12 = mid(p1, p2);
        let p23 = mid(p2, p3);
        let p34 = mid(p3, p4);
        let p123 = mid(p12, p23);
        let p234 = mid(p23, p34);
        let p1234 = mid(p123, p234);

        let (chord_sq, d2) = chord_offset(p2, p1, p4);
        let (_, d3) = chord_offset(p3, p1, p4);
        let bent2 = d2 > CURVE_COLLINEARITY_EPSILON;
        let bent3 = d3 > CURVE_COLLINEARITY_EPSILON;

        if bent2 || bent3 {
            // Only the off-chord control points count.
            let d = match (bent2, bent3) {
                (true, true) => d2 + d3,
                (true, false) => d2,
                _ => d3,
            };
            if d * d <= self.tolerance_sq * chord_sq {
                self.points.push(p23);
                return;
            }
        } else {
            // Everything on one line, or a closed loop when p1 == p4.
            let (u2, e2) = chord_projection(p2, p1, p4);
            let (u3, e3) = chord_projection(p3, p1, p4);
            if chord_sq != 0.0 && strictly_inside(u2) && strictly_inside(u3) {
                return;
            }
            let (excursion, control) = if e2 > e3 { (e2, p2) } else { (e3, p3) };
            if excursion < self.tolerance_sq {
                self.points.push(control);
                return;
            }
        }

        self.subdivide([p1, p12, p123, p1234], level + 1);
        self.subdivide([p1234, p234, p34, p4], level + 1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn max_deviation_from_quadratic(pts: &[PointF], p1: PointF, p2: PointF, p3: PointF) -> f64 {
        // Sample the true curve and measure distance to the polyline.
        let mut worst: f64 = 0.0;
        for i in 0..=200 {
            let t = i as f64 / 200.0;
            let mt = 1.0 - t;
            let x = mt * mt * p1.x + 2.0 * mt * t * p2.x + t * t * p3.x;
            let y = mt * mt * p1.y + 2.0 * mt * t * p2.y + t * t * p3.y;
            let best = pts
                .windows(2)
                .map(|w| chord_projection(PointF::new(x, y), w[0], w[1]).1)
                .fold(f64::MAX, f64::min);
            worst = worst.max(best.sqrt());
        }
        worst
    }

    #[test]
    fn test_curve3_div_endpoints() {
        let mut c = Curve3Div::new(0.25);
        let pts = c.init(
            PointF::new(0.0, 0.0),
            PointF::new(50.0, 100.0),
            PointF::new(100.0, 0.0),
        );
        assert!(pts.len() > 3);
        assert_eq!(pts[0], PointF::new(0.0, 0.0));
        assert_eq!(*pts.last().unwrap(), PointF::new(100.0, 0.0));
    }

    #[test]
    fn test_curve3_div_within_tolerance() {
        let (p1, p2, p3) = (
            PointF::new(0.0, 0.0),
            PointF::new(50.0, 100.0),
            PointF::new(100.0, 0.0),
        );
        let mut c = Curve3Div::new(0.25);
        let pts = c.init(p1, p2, p3).to_vec();
        assert!(max_deviation_from_quadratic(&pts, p1, p2, p3) < 0.3);
    }

    #[test]
    fn test_curve3_div_straight_line() {
        let mut c = Curve3Div::new(0.25);
        let pts = c.init(
            PointF::new(0.0, 0.0),
            PointF::new(50.0, 0.0),
            PointF::new(100.0, 0.0),
        );
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn test_coarser_tolerance_fewer_points() {
        let (p1, p2, p3, p4) = (
            PointF::new(0.0, 0.0),
            PointF::new(0.0, 100.0),
            PointF::new(100.0, 100.0),
            PointF::new(100.0, 0.0),
        );
        let fine = Curve4Div::new(0.05).init(p1, p2, p3, p4).len();
        let coarse = Curve4Div::new(2.0).init(p1, p2, p3, p4).len();
        assert!(fine > coarse);
    }

    #[test]
    fn test_curve4_div_endpoints() {
        let mut c = Curve4Div::new(0.25);
        c.init(
            PointF::new(0.0, 0.0),
            PointF::new(0.0, 100.0),
            PointF::new(100.0, 100.0),
            PointF::new(100.0, 0.0),
        );
        let pts = c.points();
        assert!(pts.len() > 4);
        assert_eq!(pts[0], PointF::new(0.0, 0.0));
        assert_eq!(*pts.last().unwrap(), PointF::new(100.0, 0.0));
        // The curve peaks at y = 75.
        let top = pts.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!((top - 75.0).abs() < 0.5);
    }

    #[test]
    fn test_curve4_div_straight_line() {
        let mut c = Curve4Div::new(0.25);
        let pts = c.init(
            PointF::new(0.0, 0.0),
            PointF::new(25.0, 0.0),
            PointF::new(75.0, 0.0),
            PointF::new(100.0, 0.0),
        );
        assert_eq!(pts.len(), 2);
    }
}
