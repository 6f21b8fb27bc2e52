//! Coordinate wrapping for tiled images and gradients.
//!
//! A [`WrapMode`] decides which texel answers a sample outside the source
//! image: tiling repeats the image, the flip variants mirror every other
//! tile along x, y or both, and `Clamp` extends the edge pixels. Each axis
//! is handled by an [`AxisWrap`] policy.

use serde::{Deserialize, Serialize};

// ============================================================================
// Axis policies
// ============================================================================

/// Maps an unbounded integer coordinate into `0..size`.
pub trait AxisWrap {
    fn new(size: u32) -> Self;
    fn func(&self, v: i32) -> u32;
}

/// Modulo wrapping.
#[derive(Debug, Clone, Copy)]
pub struct WrapRepeat {
    size: u32,
}

impl AxisWrap for WrapRepeat {
    fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    #[inline]
    fn func(&self, v: i32) -> u32 {
        (v as i64).rem_euclid(self.size as i64) as u32
    }
}

/// Mirrored wrapping: every other period runs backward.
#[derive(Debug, Clone, Copy)]
pub struct WrapReflect {
    size: u32,
    size2: u32,
}

impl AxisWrap for WrapReflect {
    fn new(size: u32) -> Self {
        let size = size.max(1);
        Self {
            size,
            size2: size * 2,
        }
    }

    #[inline]
    fn func(&self, v: i32) -> u32 {
        let value = (v as i64).rem_euclid(self.size2 as i64) as u32;
        if value >= self.size {
            self.size2 - value - 1
        } else {
            value
        }
    }
}

/// Edge extension.
#[derive(Debug, Clone, Copy)]
pub struct WrapClamp {
    size: u32,
}

impl AxisWrap for WrapClamp {
    fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    #[inline]
    fn func(&self, v: i32) -> u32 {
        v.clamp(0, self.size as i32 - 1) as u32
    }
}

fn wrap_xy<WX: AxisWrap, WY: AxisWrap>(x: i32, y: i32, width: u32, height: u32) -> (u32, u32) {
    (WX::new(width).func(x), WY::new(height).func(y))
}

// ============================================================================
// WrapMode
// ============================================================================

/// How textures and gradients continue past their bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Tile,
    TileFlipX,
    TileFlipY,
    TileFlipXY,
    Clamp,
}

impl WrapMode {
    /// Texel coordinates for a sample at integer position `(x, y)` of a
    /// `width` x `height` image.
    pub fn wrap_coords(self, x: i32, y: i32, width: u32, height: u32) -> (u32, u32) {
        match self {
            WrapMode::Tile => wrap_xy::<WrapRepeat, WrapRepeat>(x, y, width, height),
            WrapMode::TileFlipX => wrap_xy::<WrapReflect, WrapRepeat>(x, y, width, height),
            WrapMode::TileFlipY => wrap_xy::<WrapRepeat, WrapReflect>(x, y, width, height),
            WrapMode::TileFlipXY => wrap_xy::<WrapReflect, WrapReflect>(x, y, width, height),
            WrapMode::Clamp => wrap_xy::<WrapClamp, WrapClamp>(x, y, width, height),
        }
    }

    /// Fold a gradient parameter into `[0, 1]`. The gradient runs along x,
    /// so only the x flip mirrors it.
    pub fn wrap_unit(self, t: f64) -> f64 {
        match self {
            WrapMode::Tile | WrapMode::TileFlipY => t - t.floor(),
            WrapMode::TileFlipX | WrapMode::TileFlipXY => {
                let m = t.rem_euclid(2.0);
                if m > 1.0 {
                    2.0 - m
                } else {
                    m
                }
            }
            WrapMode::Clamp => t.clamp(0.0, 1.0),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
