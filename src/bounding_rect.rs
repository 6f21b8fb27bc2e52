//! Bounding rectangle calculation.
//!
//! Computes the axis-aligned bounding box of any vertex source: paths,
//! stroke outlines and normalized polygon sets all report bounds through
//! this one routine.

use crate::basics::{is_stop, is_vertex, VertexSource};
use crate::geometry::RectangleF;

/// Bounding box of one path of a vertex source.
///
/// Rewinds the source to `path_id`, iterates all vertices, and returns the
/// box as an origin-and-extent rectangle. Returns `None` if the source emits
/// no vertices.
pub fn bounding_rect_single(vs: &mut dyn VertexSource, path_id: u32) -> Option<RectangleF> {
    let mut x = 0.0;
    let mut y = 0.0;
    let mut first = true;
    let mut x1 = 1.0_f64;
    let mut y1 = 1.0_f64;
    let mut x2 = 0.0_f64;
    let mut y2 = 0.0_f64;

    vs.rewind(path_id);
    loop {
        let cmd = vs.vertex(&mut x, &mut y);
        if is_stop(cmd) {
            break;
        }
        if is_vertex(cmd) {
            if first {
                x1 = x;
                y1 = y;
                x2 = x;
                y2 = y;
                first = false;
            } else {
                x1 = x1.min(x);
                y1 = y1.min(y);
                x2 = x2.max(x);
                y2 = y2.max(y);
            }
        }
    }

    if x1 <= x2 && y1 <= y2 {
        Some(RectangleF::from_ltrb(x1, y1, x2, y2))
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
