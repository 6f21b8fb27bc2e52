//! Affine transformation matrix.
//!
//! Row-vector convention: a point is transformed as `p' = p * M`, so
//!
//! ```text
//!   x' = x*m11 + y*m21 + dx
//!   y' = x*m12 + y*m22 + dy
//! ```
//!
//! Composition takes an explicit [`MatrixOrder`]. `Prepend` places the new
//! transform before the existing one (it is applied to points first),
//! `Append` places it after.

use crate::basics::deg2rad;
use crate::error::{ensure_finite, Error, Result};
use crate::geometry::{PointF, RectangleF};

/// Epsilon for affine matrix comparisons.
pub const AFFINE_EPSILON: f64 = 1e-14;

/// Relative determinant threshold below which a matrix is singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Where a composed transform goes relative to the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixOrder {
    /// New transform is applied first.
    #[default]
    Prepend,
    /// New transform is applied last.
    Append,
}

/// 2D affine transformation matrix.
///
/// Elements are stored as `[m11, m12, m21, m22, dx, dy]`:
///
/// ```text
///   | m11 m12 0 |
///   | m21 m22 0 |
///   | dx  dy  1 |
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matrix {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Matrix {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub const fn identity() -> Self {
        Self {
            m11: 1.0,
            m12: 0.0,
            m21: 0.0,
            m22: 1.0,
            dx: 0.0,
            dy: 0.0,
        }
    }

    /// Matrix from `[m11, m12, m21, m22, dx, dy]`. Elements must be finite.
    pub fn new(elements: [f64; 6]) -> Result<Self> {
        ensure_finite("matrix element", &elements)?;
        Ok(Self::from_elements(elements))
    }

    pub(crate) const fn from_elements(m: [f64; 6]) -> Self {
        Self {
            m11: m[0],
            m12: m[1],
            m21: m[2],
            m22: m[3],
            dx: m[4],
            dy: m[5],
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::from_elements([1.0, 0.0, 0.0, 1.0, dx, dy])
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::from_elements([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    /// Rotation by `degrees`; positive angles turn +x toward +y.
    pub fn rotation(degrees: f64) -> Self {
        let (sa, ca) = deg2rad(degrees).sin_cos();
        Self::from_elements([ca, sa, -sa, ca, 0.0, 0.0])
    }

    pub fn shearing(shear_x: f64, shear_y: f64) -> Self {
        Self::from_elements([1.0, shear_y, shear_x, 1.0, 0.0, 0.0])
    }

    /// Map `rect` onto the parallelogram whose upper-left, upper-right and
    /// lower-left corners are `plg[0]`, `plg[1]` and `plg[2]`.
    pub fn from_rect_to_parallelogram(rect: &RectangleF, plg: &[PointF; 3]) -> Result<Self> {
        ensure_finite("rectangle", &[rect.x, rect.y, rect.width, rect.height])?;
        ensure_finite(
            "parallelogram",
            &[plg[0].x, plg[0].y, plg[1].x, plg[1].y, plg[2].x, plg[2].y],
        )?;
        if rect.width == 0.0 || rect.height == 0.0 {
            return Err(Error::invalid("source rectangle has zero extent"));
        }
        let m11 = (plg[1].x - plg[0].x) / rect.width;
        let m12 = (plg[1].y - plg[0].y) / rect.width;
        let m21 = (plg[2].x - plg[0].x) / rect.height;
        let m22 = (plg[2].y - plg[0].y) / rect.height;
        let dx = plg[0].x - rect.x * m11 - rect.y * m21;
        let dy = plg[0].y - rect.x * m12 - rect.y * m22;
        Ok(Self::from_elements([m11, m12, m21, m22, dx, dy]))
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    pub fn elements(&self) -> [f64; 6] {
        [self.m11, self.m12, self.m21, self.m22, self.dx, self.dy]
    }

    pub fn offset_x(&self) -> f64 {
        self.dx
    }

    pub fn offset_y(&self) -> f64 {
        self.dy
    }

    // ====================================================================
    // Operations (mutate self)
    // ====================================================================

    /// Reset to identity.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::identity();
        self
    }

    /// Compose with `m` in the given order.
    pub fn multiply(&mut self, m: &Matrix, order: MatrixOrder) -> &mut Self {
        *self = match order {
            MatrixOrder::Prepend => Self::product(m, self),
            MatrixOrder::Append => Self::product(self, m),
        };
        self
    }

    pub fn translate(&mut self, dx: f64, dy: f64, order: MatrixOrder) -> &mut Self {
        self.multiply(&Self::translation(dx, dy), order)
    }

    pub fn scale(&mut self, sx: f64, sy: f64, order: MatrixOrder) -> &mut Self {
        self.multiply(&Self::scaling(sx, sy), order)
    }

    /// Rotate by `degrees` about the origin.
    pub fn rotate(&mut self, degrees: f64, order: MatrixOrder) -> &mut Self {
        self.multiply(&Self::rotation(degrees), order)
    }

    /// Rotate by `degrees` about `center`.
    pub fn rotate_at(&mut self, degrees: f64, center: PointF, order: MatrixOrder) -> &mut Self {
        let about = Self::translation(-center.x, -center.y)
            * Self::rotation(degrees)
            * Self::translation(center.x, center.y);
        self.multiply(&about, order)
    }

    pub fn shear(&mut self, shear_x: f64, shear_y: f64, order: MatrixOrder) -> &mut Self {
        self.multiply(&Self::shearing(shear_x, shear_y), order)
    }

    /// Invert in place. Fails with `InvalidArgument` when singular, leaving
    /// the matrix unchanged.
    pub fn invert(&mut self) -> Result<()> {
        if !self.is_invertible() {
            return Err(Error::invalid("matrix is not invertible"));
        }
        let d = 1.0 / self.determinant();
        let t0 = self.m22 * d;
        self.m22 = self.m11 * d;
        self.m12 = -self.m12 * d;
        self.m21 = -self.m21 * d;
        let t4 = -self.dx * t0 - self.dy * self.m21;
        self.dy = -self.dx * self.m12 - self.dy * self.m22;
        self.m11 = t0;
        self.dx = t4;
        Ok(())
    }

    /// Inverted copy.
    pub fn inverted(&self) -> Result<Matrix> {
        let mut m = *self;
        m.invert()?;
        Ok(m)
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    #[inline]
    pub fn transform_point(&self, p: PointF) -> PointF {
        PointF::new(
            p.x * self.m11 + p.y * self.m21 + self.dx,
            p.x * self.m12 + p.y * self.m22 + self.dy,
        )
    }

    pub fn transform_points(&self, pts: &mut [PointF]) {
        for p in pts.iter_mut() {
            *p = self.transform_point(*p);
        }
    }

    /// Transform ignoring the translation part.
    pub fn transform_vectors(&self, pts: &mut [PointF]) {
        for p in pts.iter_mut() {
            *p = PointF::new(p.x * self.m11 + p.y * self.m21, p.x * self.m12 + p.y * self.m22);
        }
    }

    /// Map a transformed point back to its source.
    pub fn inverse_transform_point(&self, p: PointF) -> Result<PointF> {
        if !self.is_invertible() {
            return Err(Error::invalid("matrix is not invertible"));
        }
        let d = 1.0 / self.determinant();
        let a = (p.x - self.dx) * d;
        let b = (p.y - self.dy) * d;
        Ok(PointF::new(a * self.m22 - b * self.m21, b * self.m11 - a * self.m12))
    }

    // ====================================================================
    // Auxiliary
    // ====================================================================

    /// Determinant of the 2x2 portion.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// False when the determinant is zero relative to the element magnitude
    /// or any element is not finite.
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        if !det.is_finite() || !self.dx.is_finite() || !self.dy.is_finite() {
            return false;
        }
        let mag = self
            .m11
            .abs()
            .max(self.m12.abs())
            .max(self.m21.abs())
            .max(self.m22.abs());
        mag > 0.0 && det.abs() > SINGULAR_EPSILON * mag * mag
    }

    pub fn is_identity(&self) -> bool {
        self.is_equal(&Self::identity(), AFFINE_EPSILON)
    }

    /// Element-wise comparison, relative to the element magnitude once it
    /// exceeds one.
    pub fn is_equal(&self, m: &Matrix, epsilon: f64) -> bool {
        self.elements()
            .iter()
            .zip(m.elements().iter())
            .all(|(a, b)| (a - b).abs() <= epsilon * a.abs().max(b.abs()).max(1.0))
    }

    /// Average scale factor, used to turn device tolerances into curve
    /// approximation tolerances.
    pub fn scale_factor(&self) -> f64 {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let x = s * self.m11 + s * self.m21;
        let y = s * self.m12 + s * self.m22;
        (x * x + y * y).sqrt()
    }

    /// `a` applied first, then `b`.
    fn product(a: &Matrix, b: &Matrix) -> Matrix {
        Matrix {
            m11: a.m11 * b.m11 + a.m12 * b.m21,
            m12: a.m11 * b.m12 + a.m12 * b.m22,
            m21: a.m21 * b.m11 + a.m22 * b.m21,
            m22: a.m21 * b.m12 + a.m22 * b.m22,
            dx: a.dx * b.m11 + a.dy * b.m21 + b.dx,
            dy: a.dx * b.m12 + a.dy * b.m22 + b.dy,
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, AFFINE_EPSILON)
    }
}

/// `a * b` applies `a` first, then `b`.
impl std::ops::Mul for Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Matrix) -> Matrix {
        Matrix::product(&self, &rhs)
    }
}

impl std::ops::MulAssign for Matrix {
    fn mul_assign(&mut self, rhs: Matrix) {
        self.multiply(&rhs, MatrixOrder::Append);
    }
}

// ============================================================================
// Tests
// ============================================================================
