//! Engine facade.
//!
//! An [`Engine`] carries one validated [`EngineConfig`] and applies its
//! tolerances to every path, region and stroke it creates. It holds no other
//! state; all work runs synchronously on the calling thread.

use tracing::debug;

use crate::brush::Brush;
use crate::color::Color;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::{PointF, RectangleF};
use crate::image::Bitmap;
use crate::matrix::Matrix;
use crate::path::Path;
use crate::pen::Pen;
use crate::raster;
use crate::region::{CombineMode, Region, RegionOperand};
use crate::stroke;

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            backend = ?config.backend,
            flatness = config.flatness,
            hairline_width = config.hairline_width,
            "engine created"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------------

    /// Empty path using the configured fill mode and flatness.
    pub fn new_path(&self) -> Result<Path> {
        let mut path = Path::with_fill_mode(self.config.default_fill_mode);
        path.set_flatness(self.config.flatness)?;
        Ok(path)
    }

    /// Infinite region using the configured flatness.
    pub fn new_region(&self) -> Result<Region> {
        let mut region = Region::new();
        region.set_flatness(self.config.flatness)?;
        Ok(region)
    }

    pub fn region_from_path(&self, path: &Path) -> Result<Region> {
        let mut region = Region::from_path(path);
        region.set_flatness(self.config.flatness)?;
        Ok(region)
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    pub fn combine(
        &self,
        region: &mut Region,
        operand: impl Into<RegionOperand>,
        mode: CombineMode,
    ) -> Result<()> {
        region.combine(operand, mode)
    }

    /// Area covered by stroking `path` with `pen`.
    pub fn stroke(&self, path: &Path, pen: &Pen) -> Result<Region> {
        stroke::stroke_region(path, pen, &self.config)
    }

    /// Stroke outline of `path` as a `Winding` path.
    pub fn widen(&self, path: &Path, pen: &Pen) -> Result<Path> {
        stroke::widen(path, pen, &self.config)
    }

    /// Scan rectangles of `region` after mapping it through `m`.
    pub fn region_scans(&self, region: &Region, m: &Matrix) -> Vec<RectangleF> {
        region.get_region_scans(m)
    }

    // ------------------------------------------------------------------------
    // Paint
    // ------------------------------------------------------------------------

    /// Brush color at a user-space point.
    pub fn sample(&self, brush: &Brush, point: PointF) -> Color {
        brush.sample(point)
    }

    /// Paint `region` into `bitmap`. Returns the number of pixels covered.
    pub fn fill_region(
        &self,
        bitmap: &mut Bitmap,
        region: &Region,
        brush: &Brush,
        canvas: &Matrix,
    ) -> Result<usize> {
        raster::fill_region(bitmap, region, brush, canvas)
    }

    /// Paint the interior of `path` under its fill mode.
    pub fn fill_path(
        &self,
        bitmap: &mut Bitmap,
        path: &Path,
        brush: &Brush,
        canvas: &Matrix,
    ) -> Result<usize> {
        let region = self.region_from_path(path)?;
        raster::fill_region(bitmap, &region, brush, canvas)
    }

    /// Paint the stroke of `path` with the pen's brush. The pen width is in
    /// user units and scales with `canvas`.
    pub fn draw_path(
        &self,
        bitmap: &mut Bitmap,
        path: &Path,
        pen: &Pen,
        canvas: &Matrix,
    ) -> Result<usize> {
        let region = self.stroke(path, pen)?;
        raster::fill_region(bitmap, &region, pen.brush(), canvas)
    }
}

// ============================================================================
// Tests
// ============================================================================
