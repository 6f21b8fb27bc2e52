//! # plusgeom
//!
//! A GDI+-shaped 2D geometry engine in pure Rust: matrices, graphics paths,
//! region boolean algebra, pen stroke and dash expansion, colors, brushes and
//! a simple binary-coverage raster fill.
//!
//! ## Architecture
//!
//! Work flows through three stages:
//!
//! 1. **Geometry**: [`Path`] figures built from lines, curves and arcs,
//!    transformed by a [`Matrix`] and flattened through the
//!    [`VertexSource`] interface.
//! 2. **Area**: a [`Region`] keeps a lazy tree of rectangles, paths and
//!    combine operations. The first query collapses it through the n-ary
//!    polygon boolean engine in [`boolean`] into a normalized polygon set.
//!    Pens turn paths into areas the same way ([`Engine::stroke`]).
//! 3. **Paint**: a [`Brush`] samples colors at points; [`raster`] fills
//!    region scans into a [`Bitmap`].
//!
//! An [`Engine`] bundles an explicit [`EngineConfig`] (backend, flatness,
//! hairline width) so no behavior depends on global state.

// Foundation
pub mod basics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod matrix;

// Curves and vertex plumbing
pub mod bezier_arc;
pub mod bounding_rect;
pub mod curves;
pub mod vertex_sequence;

// Paths and regions
pub mod boolean;
pub mod config;
pub mod path;
pub mod region;

// Stroking
pub mod dash;
pub mod math_stroke;
pub mod pen;
pub mod stroke;

// Paint
pub mod brush;
pub mod color;
pub mod image;
pub mod raster;
pub mod wrap;

// Text, timing and the facade
pub mod animation;
pub mod engine;
pub mod font;

pub use basics::{FillMode, VertexSource};
pub use brush::{
    Brush, BrushSampler, ColorSource, HatchBrush, HatchStyle, LinearGradientBrush,
    PathGradientBrush, TextureBrush,
};
pub use color::{Color, KnownColor};
pub use config::{Backend, EngineConfig};
pub use engine::Engine;
pub use error::{Error, Result};
pub use font::{FontCollection, FontFamily, FontMetricsProvider};
pub use geometry::{Point, PointF, Rectangle, RectangleF, Size, SizeF};
pub use image::{Bitmap, BmpCodec, ImageCodec};
pub use math_stroke::{LineCap, LineJoin};
pub use matrix::{Matrix, MatrixOrder};
pub use path::{Figure, Path, Polyline, Segment};
pub use pen::{CustomLineCap, DashCap, DashStyle, Pen};
pub use region::{CombineMode, Region, RegionOperand};
pub use wrap::WrapMode;

#[cfg(feature = "font")]
pub use font::TtfFont;
