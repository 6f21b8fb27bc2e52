//! Point, size and rectangle value types.
//!
//! Float variants (`PointF`, `SizeF`, `RectangleF`) carry all geometry.
//! Integer variants (`Point`, `Size`, `Rectangle`) exist for pixel-grid
//! callers and are produced from float values by checked `ceiling`, `round`
//! and `truncate` conversions.
//!
//! Equality on the float types is exact component comparison. Two rectangles
//! computed along different arithmetic paths may differ in the last bit and
//! compare unequal; compare with a tolerance when that matters.

use std::ops::{Add, Mul, Sub};

use crate::basics::{checked_i32, Rounding};
use crate::error::Result;

// ============================================================================
// PointF / Point
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const EMPTY: PointF = PointF { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn distance(&self, other: PointF) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Linear interpolation toward `other`.
    pub fn lerp(&self, other: PointF, t: f64) -> PointF {
        PointF::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const EMPTY: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn ceiling(p: PointF) -> Result<Point> {
        Self::convert(p, Rounding::Ceiling)
    }

    pub fn round(p: PointF) -> Result<Point> {
        Self::convert(p, Rounding::Round)
    }

    pub fn truncate(p: PointF) -> Result<Point> {
        Self::convert(p, Rounding::Truncate)
    }

    fn convert(p: PointF, mode: Rounding) -> Result<Point> {
        Ok(Point::new(checked_i32(p.x, mode)?, checked_i32(p.y, mode)?))
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        PointF::new(p.x as f64, p.y as f64)
    }
}

// ============================================================================
// SizeF / Size
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

impl SizeF {
    pub const EMPTY: SizeF = SizeF {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn to_point(self) -> PointF {
        PointF::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const EMPTY: Size = Size {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn ceiling(s: SizeF) -> Result<Size> {
        Self::convert(s, Rounding::Ceiling)
    }

    pub fn round(s: SizeF) -> Result<Size> {
        Self::convert(s, Rounding::Round)
    }

    pub fn truncate(s: SizeF) -> Result<Size> {
        Self::convert(s, Rounding::Truncate)
    }

    fn convert(s: SizeF, mode: Rounding) -> Result<Size> {
        Ok(Size::new(
            checked_i32(s.width, mode)?,
            checked_i32(s.height, mode)?,
        ))
    }
}

impl From<Size> for SizeF {
    fn from(s: Size) -> Self {
        SizeF::new(s.width as f64, s.height as f64)
    }
}

// ============================================================================
// Operators
// ============================================================================

impl Add<SizeF> for PointF {
    type Output = PointF;
    fn add(self, s: SizeF) -> PointF {
        PointF::new(self.x + s.width, self.y + s.height)
    }
}

impl Sub<SizeF> for PointF {
    type Output = PointF;
    fn sub(self, s: SizeF) -> PointF {
        PointF::new(self.x - s.width, self.y - s.height)
    }
}

impl Sub<PointF> for PointF {
    type Output = SizeF;
    fn sub(self, p: PointF) -> SizeF {
        SizeF::new(self.x - p.x, self.y - p.y)
    }
}

impl Add<Size> for Point {
    type Output = Point;
    fn add(self, s: Size) -> Point {
        Point::new(self.x + s.width, self.y + s.height)
    }
}

impl Sub<Size> for Point {
    type Output = Point;
    fn sub(self, s: Size) -> Point {
        Point::new(self.x - s.width, self.y - s.height)
    }
}

impl Add for SizeF {
    type Output = SizeF;
    fn add(self, s: SizeF) -> SizeF {
        SizeF::new(self.width + s.width, self.height + s.height)
    }
}

impl Sub for SizeF {
    type Output = SizeF;
    fn sub(self, s: SizeF) -> SizeF {
        SizeF::new(self.width - s.width, self.height - s.height)
    }
}

impl Mul<f64> for SizeF {
    type Output = SizeF;
    fn mul(self, k: f64) -> SizeF {
        SizeF::new(self.width * k, self.height * k)
    }
}

// ============================================================================
// RectangleF
// ============================================================================

/// Axis-aligned rectangle given by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectangleF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectangleF {
    pub const EMPTY: RectangleF = RectangleF {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn from_location_size(location: PointF, size: SizeF) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn location(&self) -> PointF {
        PointF::new(self.x, self.y)
    }

    pub fn size(&self) -> SizeF {
        SizeF::new(self.width, self.height)
    }

    /// True when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: PointF) -> bool {
        self.x <= p.x && p.x < self.right() && self.y <= p.y && p.y < self.bottom()
    }

    pub fn contains_rect(&self, r: &RectangleF) -> bool {
        self.x <= r.x && r.right() <= self.right() && self.y <= r.y && r.bottom() <= self.bottom()
    }

    pub fn intersects_with(&self, r: &RectangleF) -> bool {
        r.x < self.right() && self.x < r.right() && r.y < self.bottom() && self.y < r.bottom()
    }

    /// Overlap of `a` and `b`, or `EMPTY` when they are disjoint.
    pub fn intersect(a: &RectangleF, b: &RectangleF) -> RectangleF {
        let x1 = a.x.max(b.x);
        let x2 = a.right().min(b.right());
        let y1 = a.y.max(b.y);
        let y2 = a.bottom().min(b.bottom());
        if x2 >= x1 && y2 >= y1 {
            RectangleF::new(x1, y1, x2 - x1, y2 - y1)
        } else {
            RectangleF::EMPTY
        }
    }

    /// Smallest rectangle holding both `a` and `b`.
    pub fn union(a: &RectangleF, b: &RectangleF) -> RectangleF {
        RectangleF::from_ltrb(
            a.x.min(b.x),
            a.y.min(b.y),
            a.right().max(b.right()),
            a.bottom().max(b.bottom()),
        )
    }

    /// Grow by `dx` on the left and right, `dy` on the top and bottom.
    pub fn inflate(&mut self, dx: f64, dy: f64) {
        self.x -= dx;
        self.y -= dy;
        self.width += 2.0 * dx;
        self.height += 2.0 * dy;
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Corners in clockwise order starting at the top-left (y down).
    pub fn corners(&self) -> [PointF; 4] {
        [
            PointF::new(self.x, self.y),
            PointF::new(self.right(), self.y),
            PointF::new(self.right(), self.bottom()),
            PointF::new(self.x, self.bottom()),
        ]
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &RectangleF, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }
}

impl From<Rectangle> for RectangleF {
    fn from(r: Rectangle) -> Self {
        RectangleF::new(r.x as f64, r.y as f64, r.width as f64, r.height as f64)
    }
}

// ============================================================================
// Rectangle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub const EMPTY: Rectangle = Rectangle {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, p: Point) -> bool {
        self.x <= p.x && p.x < self.right() && self.y <= p.y && p.y < self.bottom()
    }

    pub fn ceiling(r: RectangleF) -> Result<Rectangle> {
        Self::convert(r, Rounding::Ceiling)
    }

    pub fn round(r: RectangleF) -> Result<Rectangle> {
        Self::convert(r, Rounding::Round)
    }

    pub fn truncate(r: RectangleF) -> Result<Rectangle> {
        Self::convert(r, Rounding::Truncate)
    }

    fn convert(r: RectangleF, mode: Rounding) -> Result<Rectangle> {
        Ok(Rectangle::new(
            checked_i32(r.x, mode)?,
            checked_i32(r.y, mode)?,
            checked_i32(r.width, mode)?,
            checked_i32(r.height, mode)?,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_point_size_operators() {
        let p = PointF::new(1.0, 2.0);
        let s = SizeF::new(3.0, 4.0);
        assert_eq!(p + s, PointF::new(4.0, 6.0));
        assert_eq!(p - s, PointF::new(-2.0, -2.0));
        assert_eq!(PointF::new(4.0, 6.0) - p, SizeF::new(3.0, 4.0));
        assert_eq!(s * 2.0, SizeF::new(6.0, 8.0));
        assert_eq!(s + s - s, s);
        assert_eq!(Point::new(1, 1) + Size::new(2, 3), Point::new(3, 4));
        assert_eq!(Point::new(1, 1) - Size::new(2, 3), Point::new(-1, -2));
    }

    #[test]
    fn test_integer_conversions() {
        let p = PointF::new(1.5, -1.5);
        assert_eq!(Point::round(p).unwrap(), Point::new(2, -2));
        assert_eq!(Point::ceiling(p).unwrap(), Point::new(2, -1));
        assert_eq!(Point::truncate(p).unwrap(), Point::new(1, -1));
        assert_eq!(
            Size::ceiling(SizeF::new(0.1, 2.0)).unwrap(),
            Size::new(1, 2)
        );
        let r = RectangleF::new(0.4, 0.6, 10.5, 9.49);
        assert_eq!(Rectangle::round(r).unwrap(), Rectangle::new(0, 1, 11, 9));
        assert_eq!(Rectangle::truncate(r).unwrap(), Rectangle::new(0, 0, 10, 9));
    }

    #[test]
    fn test_conversion_overflow() {
        let r = RectangleF::new(0.0, 0.0, 1e12, 1.0);
        assert!(matches!(
            Rectangle::ceiling(r),
            Err(Error::NumericOverflow { .. })
        ));
        assert!(Point::round(PointF::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_rect_edges() {
        let r = RectangleF::from_ltrb(1.0, 2.0, 11.0, 7.0);
        assert_eq!(r, RectangleF::new(1.0, 2.0, 10.0, 5.0));
        assert_eq!(r.right(), 11.0);
        assert_eq!(r.bottom(), 7.0);
        assert_eq!(r.location(), PointF::new(1.0, 2.0));
        assert_eq!(r.size(), SizeF::new(10.0, 5.0));
        assert!(!r.is_empty());
        assert!(RectangleF::new(0.0, 0.0, 0.0, 5.0).is_empty());
    }

    #[test]
    fn test_rect_contains_half_open() {
        let r = RectangleF::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(PointF::new(0.0, 0.0)));
        assert!(r.contains(PointF::new(9.99, 9.99)));
        assert!(!r.contains(PointF::new(10.0, 5.0)));
        assert!(!r.contains(PointF::new(5.0, 10.0)));
        assert!(r.contains_rect(&RectangleF::new(2.0, 2.0, 8.0, 8.0)));
        assert!(!r.contains_rect(&RectangleF::new(2.0, 2.0, 9.0, 8.0)));
    }

    #[test]
    fn test_rect_intersect_union() {
        let a = RectangleF::new(0.0, 0.0, 10.0, 10.0);
        let b = RectangleF::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(RectangleF::intersect(&a, &b), RectangleF::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(RectangleF::union(&a, &b), RectangleF::new(0.0, 0.0, 15.0, 15.0));
        assert!(a.intersects_with(&b));

        let c = RectangleF::new(20.0, 20.0, 1.0, 1.0);
        assert_eq!(RectangleF::intersect(&a, &c), RectangleF::EMPTY);
        assert!(!a.intersects_with(&c));
        // Touching edges do not intersect.
        assert!(!a.intersects_with(&RectangleF::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rect_inflate_offset() {
        let mut r = RectangleF::new(0.0, 0.0, 10.0, 10.0);
        r.inflate(2.0, 1.0);
        assert_eq!(r, RectangleF::new(-2.0, -1.0, 14.0, 12.0));
        r.offset(2.0, 1.0);
        assert_eq!(r, RectangleF::new(0.0, 0.0, 14.0, 12.0));
    }

    #[test]
    fn test_exact_equality() {
        let a = RectangleF::new(0.1 + 0.2, 0.0, 1.0, 1.0);
        let b = RectangleF::new(0.3, 0.0, 1.0, 1.0);
        assert_ne!(a, b);
        assert!(a.approx_eq(&b, 1e-12));
    }

    #[test]
    fn test_integer_rect() {
        let r = Rectangle::new(1, 1, 4, 4);
        assert!(r.contains(Point::new(1, 1)));
        assert!(!r.contains(Point::new(5, 1)));
        assert_eq!(RectangleF::from(r), RectangleF::new(1.0, 1.0, 4.0, 4.0));
        assert!(Rectangle::EMPTY.is_empty());
    }
}
