//! Scalar geometry helpers shared by flattening, stroking and the boolean
//! engine: cross products, distances, line intersection, ring area and
//! winding numbers.

use crate::geometry::PointF;

/// Points closer than this are the same vertex.
pub const VERTEX_DIST_EPSILON: f64 = 1e-14;

/// Denominator below which two lines count as parallel.
pub const INTERSECTION_EPSILON: f64 = 1.0e-30;

/// Which side of the directed line `(x1, y1) -> (x2, y2)` the point
/// `(x, y)` lies on. Negative is left in a y-up frame.
#[inline]
pub fn cross_product(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    (x - x2) * (y2 - y1) - (y - y2) * (x2 - x1)
}

#[inline]
pub fn calc_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

#[inline]
pub fn calc_sq_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Where the line through `a`, `b` meets the line through `c`, `d`; `None`
/// for parallel lines.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn calc_intersection(
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    cx: f64,
    cy: f64,
    dx: f64,
    dy: f64,
) -> Option<(f64, f64)> {
    let num = (ay - cy) * (dx - cx) - (ax - cx) * (dy - cy);
    let den = (bx - ax) * (dy - cy) - (by - ay) * (dx - cx);
    if den.abs() < INTERSECTION_EPSILON {
        return None;
    }
    let r = num / den;
    Some((ax + r * (bx - ax), ay + r * (by - ay)))
}

// ============================================================================
// Rings
// ============================================================================

/// Signed shoelace area of a ring, closing edge included. Positive for rings
/// that run clockwise on a y-down screen.
pub fn calc_polygon_area(ring: &[PointF]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a.x * b.y - a.y * b.x
        })
        .sum::<f64>()
        * 0.5
}

/// Crossing contribution of edge `a`→`b` to the winding number at (x, y).
///
/// The ray runs from the point toward +x. Edges are half-open in y, so a
/// vertex on the ray is counted once. Upward edges passing right of the
/// point add one, downward edges subtract one.
#[inline]
pub fn edge_crossing(a: PointF, b: PointF, x: f64, y: f64) -> i32 {
    if a.y <= y {
        if b.y > y && cross_product(a.x, a.y, b.x, b.y, x, y) < 0.0 {
            return 1;
        }
    } else if b.y <= y && cross_product(a.x, a.y, b.x, b.y, x, y) > 0.0 {
        return -1;
    }
    0
}

/// Winding number of a closed ring around (x, y).
pub fn winding_number(ring: &[PointF], x: f64, y: f64) -> i32 {
    let n = ring.len();
    if n < 2 {
        return 0;
    }
    (0..n)
        .map(|i| edge_crossing(ring[i], ring[(i + 1) % n], x, y))
        .sum()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn square() -> [PointF; 4] {
        [
            PointF::new(0.0, 0.0),
            PointF::new(10.0, 0.0),
            PointF::new(10.0, 10.0),
            PointF::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_cross_product_sides() {
        assert!(cross_product(0.0, 0.0, 1.0, 0.0, 0.5, 1.0) < 0.0);
        assert!(cross_product(0.0, 0.0, 1.0, 0.0, 0.5, -1.0) > 0.0);
        assert!(cross_product(0.0, 0.0, 1.0, 0.0, 2.0, 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_distances() {
        assert!((calc_distance(1.0, 1.0, 4.0, 5.0) - 5.0).abs() < EPSILON);
        assert!((calc_sq_distance(1.0, 1.0, 4.0, 5.0) - 25.0).abs() < EPSILON);
    }

    #[test]
    fn test_calc_intersection() {
        let (x, y) = calc_intersection(0.0, 0.0, 4.0, 2.0, 0.0, 4.0, 4.0, 0.0).unwrap();
        assert!((x - 8.0 / 3.0).abs() < EPSILON);
        assert!((y - 4.0 / 3.0).abs() < EPSILON);
        assert!(calc_intersection(0.0, 0.0, 10.0, 0.0, 0.0, 1.0, 10.0, 1.0).is_none());
    }

    #[test]
    fn test_ring_area_sign() {
        let mut ring = square();
        assert!((calc_polygon_area(&ring) - 100.0).abs() < EPSILON);
        ring.reverse();
        assert!((calc_polygon_area(&ring) + 100.0).abs() < EPSILON);
        assert_eq!(calc_polygon_area(&[]), 0.0);
        assert_eq!(calc_polygon_area(&ring[..2]), 0.0);
    }

    #[test]
    fn test_winding_number() {
        let mut ring = square();
        assert_eq!(winding_number(&ring, 5.0, 5.0), 1);
        assert_eq!(winding_number(&ring, 15.0, 5.0), 0);
        ring.reverse();
        assert_eq!(winding_number(&ring, 5.0, 5.0), -1);

        // A vertex on the ray is counted once.
        let diamond = [
            PointF::new(5.0, 0.0),
            PointF::new(10.0, 5.0),
            PointF::new(5.0, 10.0),
            PointF::new(0.0, 5.0),
        ];
        assert_eq!(winding_number(&diamond, 2.0, 5.0).abs(), 1);
        assert_eq!(winding_number(&diamond, -2.0, 5.0), 0);
    }

    #[test]
    fn test_edge_crossing_half_open() {
        let a = PointF::new(0.0, 0.0);
        let b = PointF::new(0.0, 10.0);
        assert_eq!(edge_crossing(a, b, -1.0, 0.0), 1);
        assert_eq!(edge_crossing(a, b, -1.0, 10.0), 0);
        assert_eq!(edge_crossing(b, a, -1.0, 5.0), -1);
        assert_eq!(edge_crossing(a, b, 1.0, 5.0), 0);
    }
}
