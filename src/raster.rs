//! Region fill into bitmaps.
//!
//! A region is scan-converted at pixel centres, clipped to the bitmap, and
//! each covered span is painted pixel by pixel from a [`BrushSampler`],
//! blending source-over onto what the bitmap already holds. There is no
//! anti-aliasing: a pixel is either inside or outside.

use tracing::debug;

use crate::brush::{Brush, BrushSampler};
use crate::error::Result;
use crate::geometry::{PointF, RectangleF};
use crate::image::Bitmap;
use crate::matrix::Matrix;
use crate::region::Region;

// ============================================================================
// Clipped spans
// ============================================================================

/// A horizontal run of pixels `x1..x2` on row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: u32,
    pub x1: u32,
    pub x2: u32,
}

/// Scans of `region` for the pixel rows of a `width` x `height` device.
fn device_scans(region: &Region, canvas: &Matrix, width: u32, height: u32) -> Vec<RectangleF> {
    let device = RectangleF::new(0.0, 0.0, width as f64, height as f64);
    region.get_region_scans_within(canvas, device)
}

/// Clip region scan rectangles to a `width` x `height` device.
fn clip_spans(scans: &[RectangleF], width: u32, height: u32) -> Vec<Span> {
    let mut spans = Vec::new();
    for r in scans {
        let x1 = r.left().max(0.0);
        let x2 = r.right().min(width as f64);
        let y1 = r.top().max(0.0);
        let y2 = r.bottom().min(height as f64);
        if x1 >= x2 || y1 >= y2 {
            continue;
        }
        for y in y1 as u32..y2 as u32 {
            spans.push(Span {
                y,
                x1: x1 as u32,
                x2: x2 as u32,
            });
        }
    }
    spans
}

// ============================================================================
// CoverageMask
// ============================================================================

/// Per-pixel inside/outside flags of a region on a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    width: u32,
    height: u32,
    covered: Vec<bool>,
}

impl CoverageMask {
    /// Coverage of `region` mapped to the device by `canvas`.
    pub fn new(region: &Region, canvas: &Matrix, width: u32, height: u32) -> Self {
        let mut covered = vec![false; width as usize * height as usize];
        for span in clip_spans(&device_scans(region, canvas, width, height), width, height) {
            let row = span.y as usize * width as usize;
            covered[row + span.x1 as usize..row + span.x2 as usize].fill(true);
        }
        Self {
            width,
            height,
            covered,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_covered(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.covered[y as usize * self.width as usize + x as usize]
    }

    pub fn count(&self) -> usize {
        self.covered.iter().filter(|c| **c).count()
    }
}

/// Coverage of a device-space `region` on a `width` x `height` device.
pub fn coverage(region: &Region, width: u32, height: u32) -> CoverageMask {
    CoverageMask::new(region, &Matrix::identity(), width, height)
}

// ============================================================================
// Fill
// ============================================================================

/// Paint `region` into the active frame of `bitmap` with `brush`. The
/// region is in user space and `canvas` maps user space to pixels. Returns
/// the number of pixels painted.
pub fn fill_region(bitmap: &mut Bitmap, region: &Region, brush: &Brush, canvas: &Matrix) -> Result<usize> {
    let (width, height) = (bitmap.width(), bitmap.height());
    let spans = clip_spans(&device_scans(region, canvas, width, height), width, height);
    let sampler = brush.sampler(canvas);
    let mut painted = 0;
    for span in &spans {
        painted += blend_color_hspan(bitmap, span, &sampler)?;
    }
    debug!(spans = spans.len(), painted, "region filled");
    Ok(painted)
}

fn blend_color_hspan(bitmap: &mut Bitmap, span: &Span, sampler: &BrushSampler<'_>) -> Result<usize> {
    for x in span.x1..span.x2 {
        let src = sampler.sample(PointF::new(x as f64 + 0.5, span.y as f64 + 0.5));
        if src.a() == 0 {
            continue;
        }
        let dst = bitmap.get_pixel(x, span.y)?;
        bitmap.set_pixel(x, span.y, src.blend_over(&dst))?;
    }
    Ok((span.x2 - span.x1) as usize)
}

// ============================================================================
// Tests
// ============================================================================
