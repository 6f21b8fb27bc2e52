//! Brushes: what color a filled point receives.
//!
//! [`Brush`] is a closed set of paint kinds plus a `Custom` escape hatch for
//! caller-provided [`ColorSource`]s. Every non-solid brush has a local
//! transform mapping brush space to user space. At paint time it is composed
//! with the canvas transform and inverted once by [`Brush::sampler`]; the
//! returned [`BrushSampler`] then maps each device point back into brush
//! space.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{PointF, RectangleF};
use crate::image::Bitmap;
use crate::math::{calc_intersection, winding_number};
use crate::matrix::Matrix;
use crate::wrap::WrapMode;

/// Color as a function of position. Gradients and custom paints implement
/// this.
pub trait ColorSource: Send + Sync + fmt::Debug {
    fn sample(&self, p: PointF) -> Color;
}

fn check_invertible(m: &Matrix) -> Result<()> {
    if m.is_invertible() {
        Ok(())
    } else {
        Err(Error::invalid("brush transform is not invertible"))
    }
}

// ============================================================================
// Hatch
// ============================================================================

/// 8x8 two-color patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatchStyle {
    Horizontal,
    Vertical,
    ForwardDiagonal,
    BackwardDiagonal,
    Cross,
    DiagonalCross,
    Percent05,
    Percent10,
    Percent20,
    Percent25,
    Percent50,
    Percent75,
    Percent90,
    LightHorizontal,
    LightVertical,
    DarkHorizontal,
    DarkVertical,
    SmallGrid,
    Checkerboard,
}

impl HatchStyle {
    /// Rows top to bottom; bit `0x80 >> x` set means foreground.
    fn rows(self) -> [u8; 8] {
        match self {
            HatchStyle::Horizontal => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff],
            HatchStyle::Vertical => [0x80; 8],
            HatchStyle::ForwardDiagonal => [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01],
            HatchStyle::BackwardDiagonal => [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80],
            HatchStyle::Cross => [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xff],
            HatchStyle::DiagonalCross => [0x81, 0x42, 0x24, 0x18, 0x18, 0x24, 0x42, 0x81],
            HatchStyle::Percent05 => [0x80, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00],
            HatchStyle::Percent10 => [0x80, 0x00, 0x08, 0x00, 0x80, 0x00, 0x08, 0x00],
            HatchStyle::Percent20 => [0x88, 0x00, 0x22, 0x00, 0x88, 0x00, 0x22, 0x00],
            HatchStyle::Percent25 => [0x88, 0x22, 0x88, 0x22, 0x88, 0x22, 0x88, 0x22],
            HatchStyle::Percent50 => [0xaa, 0x55, 0xaa, 0x55, 0xaa, 0x55, 0xaa, 0x55],
            HatchStyle::Percent75 => [0x77, 0xdd, 0x77, 0xdd, 0x77, 0xdd, 0x77, 0xdd],
            HatchStyle::Percent90 => [0x7f, 0xff, 0xf7, 0xff, 0x7f, 0xff, 0xf7, 0xff],
            HatchStyle::LightHorizontal => [0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0xff],
            HatchStyle::LightVertical => [0x88; 8],
            HatchStyle::DarkHorizontal => [0xff, 0xff, 0x00, 0x00, 0xff, 0xff, 0x00, 0x00],
            HatchStyle::DarkVertical => [0xcc; 8],
            HatchStyle::SmallGrid => [0x88, 0x88, 0x88, 0xff, 0x88, 0x88, 0x88, 0xff],
            HatchStyle::Checkerboard => [0xcc, 0xcc, 0x33, 0x33, 0xcc, 0xcc, 0x33, 0x33],
        }
    }

    pub fn is_foreground(self, x: i64, y: i64) -> bool {
        let row = self.rows()[y.rem_euclid(8) as usize];
        row & (0x80 >> x.rem_euclid(8)) != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HatchBrush {
    pub style: HatchStyle,
    pub fore_color: Color,
    pub back_color: Color,
    transform: Matrix,
}

impl HatchBrush {
    pub fn new(style: HatchStyle, fore_color: Color, back_color: Color) -> Self {
        Self {
            style,
            fore_color,
            back_color,
            transform: Matrix::identity(),
        }
    }

    fn sample_local(&self, p: PointF) -> Color {
        if self.style.is_foreground(p.x.floor() as i64, p.y.floor() as i64) {
            self.fore_color
        } else {
            self.back_color
        }
    }
}

// ============================================================================
// Texture
// ============================================================================

/// Image tiled over the plane.
#[derive(Debug, Clone)]
pub struct TextureBrush {
    image: Arc<Bitmap>,
    pub wrap_mode: WrapMode,
    transform: Matrix,
}

impl TextureBrush {
    pub fn new(image: Arc<Bitmap>, wrap_mode: WrapMode) -> Self {
        Self {
            image,
            wrap_mode,
            transform: Matrix::identity(),
        }
    }

    pub fn image(&self) -> &Arc<Bitmap> {
        &self.image
    }

    /// Nearest texel.
    fn sample_local(&self, p: PointF) -> Color {
        let x = p.x.floor().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
        let y = p.y.floor().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
        let (tx, ty) = self
            .wrap_mode
            .wrap_coords(x, y, self.image.width(), self.image.height());
        self.image.texel(tx, ty)
    }
}

// ============================================================================
// Linear gradient
// ============================================================================

/// Two-color gradient across a rectangle along an angle.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradientBrush {
    rect: RectangleF,
    pub color1: Color,
    pub color2: Color,
    angle: f64,
    pub wrap_mode: WrapMode,
    transform: Matrix,
}

impl LinearGradientBrush {
    /// `angle` in degrees, clockwise from the x axis.
    pub fn new(rect: RectangleF, color1: Color, color2: Color, angle: f64) -> Result<Self> {
        if rect.is_empty() {
            return Err(Error::invalid("gradient rectangle is empty"));
        }
        if !angle.is_finite() {
            return Err(Error::invalid("gradient angle must be finite"));
        }
        Ok(Self {
            rect,
            color1,
            color2,
            angle,
            wrap_mode: WrapMode::Tile,
            transform: Matrix::identity(),
        })
    }

    pub fn rectangle(&self) -> RectangleF {
        self.rect
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Position of `p` along the gradient: 0 at the first corner the
    /// gradient line reaches, 1 at the last.
    fn parameter(&self, p: PointF) -> f64 {
        let (dy, dx) = self.angle.to_radians().sin_cos();
        let proj = |q: PointF| q.x * dx + q.y * dy;
        let corners = self.rect.corners();
        let lo = corners.iter().map(|c| proj(*c)).fold(f64::INFINITY, f64::min);
        let hi = corners
            .iter()
            .map(|c| proj(*c))
            .fold(f64::NEG_INFINITY, f64::max);
        (proj(p) - lo) / (hi - lo)
    }

    fn sample_local(&self, p: PointF) -> Color {
        let t = self.wrap_mode.wrap_unit(self.parameter(p));
        self.color1.lerp(&self.color2, t)
    }
}

// ============================================================================
// Path gradient
// ============================================================================

/// Center color blended toward the boundary polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGradientBrush {
    boundary: Vec<PointF>,
    center: PointF,
    pub center_color: Color,
    pub surround_color: Color,
    transform: Matrix,
}

impl PathGradientBrush {
    /// The center defaults to the vertex average.
    pub fn new(boundary: &[PointF], center_color: Color, surround_color: Color) -> Result<Self> {
        if boundary.len() < 3 {
            return Err(Error::invalid("path gradient needs at least 3 points"));
        }
        if !boundary.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
            return Err(Error::invalid("path gradient points must be finite"));
        }
        let n = boundary.len() as f64;
        let center = PointF::new(
            boundary.iter().map(|p| p.x).sum::<f64>() / n,
            boundary.iter().map(|p| p.y).sum::<f64>() / n,
        );
        Ok(Self {
            boundary: boundary.to_vec(),
            center,
            center_color,
            surround_color,
            transform: Matrix::identity(),
        })
    }

    pub fn center(&self) -> PointF {
        self.center
    }

    pub fn set_center(&mut self, center: PointF) {
        self.center = center;
    }

    /// Fraction of the way from the center to the boundary along the ray
    /// through `p`.
    fn parameter(&self, p: PointF) -> f64 {
        let c = self.center;
        if p == c {
            return 0.0;
        }
        let n = self.boundary.len();
        let mut best = f64::INFINITY;
        for i in 0..n {
            let a = self.boundary[i];
            let b = self.boundary[(i + 1) % n];
            let Some((ix, iy)) = calc_intersection(c.x, c.y, p.x, p.y, a.x, a.y, b.x, b.y) else {
                continue;
            };
            // Hit must lie on the edge and ahead of the center.
            let (ex, ey) = (b.x - a.x, b.y - a.y);
            let len2 = ex * ex + ey * ey;
            let u = ((ix - a.x) * ex + (iy - a.y) * ey) / len2;
            if !(-1e-12..=1.0 + 1e-12).contains(&u) {
                continue;
            }
            let (rx, ry) = (p.x - c.x, p.y - c.y);
            let s = ((ix - c.x) * rx + (iy - c.y) * ry) / (rx * rx + ry * ry);
            if s > 0.0 && s < best {
                best = s;
            }
        }
        if best.is_finite() {
            (1.0 / best).min(1.0)
        } else {
            1.0
        }
    }

    fn sample_local(&self, p: PointF) -> Color {
        if winding_number(&self.boundary, p.x, p.y) == 0 {
            return Color::TRANSPARENT;
        }
        self.center_color
            .lerp(&self.surround_color, self.parameter(p))
    }
}

// ============================================================================
// Brush
// ============================================================================

#[derive(Debug, Clone)]
pub enum Brush {
    Solid(Color),
    Hatch(HatchBrush),
    Texture(TextureBrush),
    LinearGradient(LinearGradientBrush),
    PathGradient(PathGradientBrush),
    Custom(Arc<dyn ColorSource>),
}

impl Brush {
    pub fn solid(color: Color) -> Self {
        Brush::Solid(color)
    }

    /// Local transform; identity for solid and custom brushes.
    pub fn transform(&self) -> Matrix {
        match self {
            Brush::Solid(_) | Brush::Custom(_) => Matrix::identity(),
            Brush::Hatch(b) => b.transform,
            Brush::Texture(b) => b.transform,
            Brush::LinearGradient(b) => b.transform,
            Brush::PathGradient(b) => b.transform,
        }
    }

    fn transform_mut(&mut self) -> Result<&mut Matrix> {
        match self {
            Brush::Solid(_) | Brush::Custom(_) => {
                Err(Error::Unsupported("brush has no transform".into()))
            }
            Brush::Hatch(b) => Ok(&mut b.transform),
            Brush::Texture(b) => Ok(&mut b.transform),
            Brush::LinearGradient(b) => Ok(&mut b.transform),
            Brush::PathGradient(b) => Ok(&mut b.transform),
        }
    }

    /// Replace the local transform. Non-invertible matrices are rejected.
    pub fn set_transform(&mut self, m: Matrix) -> Result<()> {
        check_invertible(&m)?;
        *self.transform_mut()? = m;
        Ok(())
    }

    pub fn multiply_transform(&mut self, m: &Matrix, order: crate::matrix::MatrixOrder) -> Result<()> {
        let mut next = self.transform();
        next.multiply(m, order);
        self.set_transform(next)
    }

    pub fn reset_transform(&mut self) {
        if let Ok(t) = self.transform_mut() {
            *t = Matrix::identity();
        }
    }

    /// Sampler for painting under `canvas`.
    pub fn sampler(&self, canvas: &Matrix) -> BrushSampler<'_> {
        let inverse = match self {
            Brush::Solid(_) => None,
            _ => {
                let combined = self.transform() * *canvas;
                match combined.inverted() {
                    Ok(inv) => Some(inv),
                    Err(_) => {
                        warn!("non-invertible canvas transform, brush paints transparent");
                        None
                    }
                }
            }
        };
        BrushSampler {
            brush: self,
            inverse,
        }
    }

    /// Color at `p` under an identity canvas.
    pub fn sample(&self, p: PointF) -> Color {
        self.sampler(&Matrix::identity()).sample(p)
    }
}

impl From<Color> for Brush {
    fn from(c: Color) -> Self {
        Brush::Solid(c)
    }
}

/// A brush with its device-to-brush mapping resolved.
#[derive(Debug, Clone)]
pub struct BrushSampler<'a> {
    brush: &'a Brush,
    inverse: Option<Matrix>,
}

impl BrushSampler<'_> {
    pub fn sample(&self, device: PointF) -> Color {
        if let Brush::Solid(c) = self.brush {
            return *c;
        }
        let Some(inv) = &self.inverse else {
            return Color::TRANSPARENT;
        };
        let p = inv.transform_point(device);
        match self.brush {
            Brush::Solid(c) => *c,
            Brush::Hatch(b) => b.sample_local(p),
            Brush::Texture(b) => b.sample_local(p),
            Brush::LinearGradient(b) => b.sample_local(p),
            Brush::PathGradient(b) => b.sample_local(p),
            Brush::Custom(src) => src.sample(p),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
