//! Fill rules, integer conversion and the vertex source contract.

use crate::error::{Error, Result};

pub const PI: f64 = std::f64::consts::PI;

#[inline]
pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

// ============================================================================
// Integer conversion
// ============================================================================

/// How a float is brought to an integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Ceiling,
    /// Nearest, half away from zero.
    Round,
    Truncate,
}

/// Convert `v` to `i32` with an explicit range check.
///
/// Unlike a bare `as` cast this never saturates: NaN, infinities and values
/// outside `i32` after rounding fail with [`Error::NumericOverflow`].
pub fn checked_i32(v: f64, mode: Rounding) -> Result<i32> {
    let r = match mode {
        Rounding::Ceiling => v.ceil(),
        Rounding::Round => v.round(),
        Rounding::Truncate => v.trunc(),
    };
    if !r.is_finite() || r < i32::MIN as f64 || r > i32::MAX as f64 {
        return Err(Error::NumericOverflow {
            value: v,
            target: "i32",
        });
    }
    Ok(r as i32)
}

// ============================================================================
// Fill mode
// ============================================================================

/// Rule deciding whether a point is inside a possibly self-intersecting
/// outline, from the signed crossing count of a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Even-odd parity.
    #[default]
    Alternate,
    /// Nonzero winding.
    Winding,
}

impl FillMode {
    #[inline]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillMode::Alternate => winding & 1 != 0,
            FillMode::Winding => winding != 0,
        }
    }
}

// ============================================================================
// Vertex commands
// ============================================================================

pub const PATH_CMD_STOP: u32 = 0;
pub const PATH_CMD_MOVE_TO: u32 = 1;
pub const PATH_CMD_LINE_TO: u32 = 2;
pub const PATH_CMD_END_POLY: u32 = 0x0F;
pub const PATH_FLAGS_CLOSE: u32 = 0x40;

/// The command carries a coordinate.
#[inline]
pub fn is_vertex(c: u32) -> bool {
    c == PATH_CMD_MOVE_TO || c == PATH_CMD_LINE_TO
}

#[inline]
pub fn is_stop(c: u32) -> bool {
    c == PATH_CMD_STOP
}

/// End of a closed figure.
#[inline]
pub fn is_close(c: u32) -> bool {
    c == PATH_CMD_END_POLY | PATH_FLAGS_CLOSE
}

/// A rewindable stream of flattened vertices.
///
/// Paths and polygon sets expose their outlines through this interface so
/// bounds and other consumers can work on either. A figure is a `MOVE_TO`
/// followed by `LINE_TO`s and, when closed, an `END_POLY | CLOSE`; the stream
/// ends with `STOP`.
pub trait VertexSource {
    /// Restart at sub-path `path_id`.
    fn rewind(&mut self, path_id: u32);

    /// Write the next coordinate into `x`, `y` and return its command.
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32;
}

impl<T: VertexSource> VertexSource for &mut T {
    fn rewind(&mut self, path_id: u32) {
        (*self).rewind(path_id);
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        (*self).vertex(x, y)
    }
}
