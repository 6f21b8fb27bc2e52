//! Stroke expansion.
//!
//! Turns the centre line of a path into the outline a pen covers. Every
//! flattened figure, or every dash cut from it, becomes one *piece*: a list
//! of rings whose nonzero interior is the area that piece covers.
//!
//! - Open figures give one ring: start cap, the joins along one side, end
//!   cap, then the joins back along the other side.
//! - Closed figures give two rings, one per side, running opposite ways.
//! - Zero-length figures give a dot shaped by the start cap.
//!
//! Pieces may self-overlap and overlap each other. [`stroke_region`] unions
//! them through the boolean engine; [`widen`] hands the raw rings back as a
//! `Winding` path.

use tracing::debug;

use crate::basics::FillMode;
use crate::boolean::{combine, PolygonSet};
use crate::config::EngineConfig;
use crate::dash::Dasher;
use crate::error::{Error, Result};
use crate::geometry::PointF;
use crate::math::calc_polygon_area;
use crate::math_stroke::{CapShape, LineCap, MathStroke};
use crate::path::{Path, Polyline};
use crate::pen::{CustomLineCap, Pen};
use crate::region::Region;
use crate::vertex_sequence::VertexSequence;

/// Rings of one stroked figure or dash.
pub type StrokePiece = Vec<Vec<PointF>>;

// ============================================================================
// Public entry points
// ============================================================================

/// Outline of `path` stroked with `pen`, as closed figures of a `Winding`
/// path. Overlaps between pieces are not resolved.
pub fn widen(path: &Path, pen: &Pen, config: &EngineConfig) -> Result<Path> {
    let pieces = Stroker::new(pen, config)?.stroke_path(path);
    let rings: Vec<Vec<PointF>> = pieces.into_iter().flatten().collect();
    let mut out = Path::from_rings(&rings, FillMode::Winding);
    out.set_flatness(config.flatness)?;
    Ok(out)
}

/// Area covered by stroking `path` with `pen`.
pub fn stroke_region(path: &Path, pen: &Pen, config: &EngineConfig) -> Result<Region> {
    let pieces = Stroker::new(pen, config)?.stroke_path(path);
    let sets: Vec<PolygonSet> = pieces.into_iter().map(PolygonSet::new).collect();
    let operands: Vec<(&PolygonSet, FillMode)> =
        sets.iter().map(|s| (s, FillMode::Winding)).collect();
    let union = combine(&operands, &|inside: &[bool]| inside.iter().any(|b| *b));
    debug!(
        pieces = sets.len(),
        contours = union.contours().len(),
        "stroke region built"
    );
    let mut region = Region::from_polygon_set(union);
    region.set_flatness(config.flatness)?;
    Ok(region)
}

// ============================================================================
// Stroker
// ============================================================================

/// Pen settings resolved for one stroke operation.
#[derive(Debug)]
pub struct Stroker<'a> {
    stroker: MathStroke,
    start_cap: CapShape<'a>,
    end_cap: CapShape<'a>,
    dash_cap: CapShape<'a>,
    dasher: Option<Dasher>,
    tolerance: f64,
    visible: bool,
}

fn resolve_cap<'a>(cap: LineCap, custom: Option<&'a CustomLineCap>) -> Result<CapShape<'a>> {
    Ok(match cap {
        LineCap::Flat => CapShape::Flat,
        LineCap::Square => CapShape::Square,
        LineCap::Round => CapShape::Round,
        LineCap::Triangle => CapShape::Triangle,
        LineCap::Custom => match custom {
            Some(c) => CapShape::Custom(c.points()),
            None => {
                return Err(Error::Unsupported(
                    "custom line cap without cap geometry".into(),
                ))
            }
        },
    })
}

impl<'a> Stroker<'a> {
    pub fn new(pen: &'a Pen, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let width = pen.effective_width(config.hairline_width);

        let mut stroker = MathStroke::new();
        stroker.set_width(width);
        stroker.set_line_join(pen.line_join());
        stroker.set_miter_limit(pen.miter_limit());
        stroker.set_approximation_scale(config.round_approximation_scale * 0.125 / config.flatness);

        let start_cap = resolve_cap(pen.start_cap(), pen.custom_start_cap())?;
        let end_cap = resolve_cap(pen.end_cap(), pen.custom_end_cap())?;
        let dash_cap = resolve_cap(pen.dash_cap().into(), None)?;

        let dasher = pen.effective_dashes().and_then(|pattern| {
            let scaled: Vec<f64> = pattern.iter().map(|d| d * width).collect();
            Dasher::new(&scaled, pen.dash_offset() * width)
        });

        Ok(Self {
            stroker,
            start_cap,
            end_cap,
            dash_cap,
            dasher,
            tolerance: config.flatness,
            visible: width > 0.0,
        })
    }

    /// Stroke every figure of `path`. Each piece is oriented so its largest
    /// ring has positive area.
    pub fn stroke_path(&self, path: &Path) -> Vec<StrokePiece> {
        let mut pieces = Vec::new();
        if !self.visible {
            return pieces;
        }
        let polylines = path.polylines(self.tolerance);
        for pl in &polylines {
            self.stroke_polyline(pl, &mut pieces);
        }
        for piece in &mut pieces {
            orient(piece);
        }
        debug!(
            figures = polylines.len(),
            pieces = pieces.len(),
            dashed = self.dasher.is_some(),
            "stroke expanded"
        );
        pieces
    }

    fn stroke_polyline(&self, pl: &Polyline, out: &mut Vec<StrokePiece>) {
        let seq = VertexSequence::from_points(&pl.points, pl.closed);
        if seq.len() < 2 {
            if let Some(p) = pl.points.first() {
                self.push_dot(*p, self.start_cap, out);
            }
            return;
        }
        // Two distinct vertices enclose nothing; stroke them as a line.
        let closed = pl.closed && seq.len() > 2;

        let Some(dasher) = &self.dasher else {
            if closed {
                out.push(self.stroke_closed(&seq));
            } else {
                out.push(vec![self.stroke_open(&seq, self.start_cap, self.end_cap)]);
            }
            return;
        };

        for dash in dasher.pieces(&seq, closed) {
            let dash_seq = VertexSequence::from_points(&dash.points, dash.closed);
            let cap1 = if dash.at_start { self.start_cap } else { self.dash_cap };
            let cap2 = if dash.at_end { self.end_cap } else { self.dash_cap };
            if dash_seq.len() < 2 {
                self.push_dot(dash.points[0], cap1, out);
            } else if dash.closed && dash_seq.len() > 2 {
                out.push(self.stroke_closed(&dash_seq));
            } else {
                out.push(vec![self.stroke_open(&dash_seq, cap1, cap2)]);
            }
        }
    }

    fn push_dot(&self, p: PointF, cap: CapShape<'_>, out: &mut Vec<StrokePiece>) {
        let mut ring = Vec::new();
        self.stroker.calc_dot(&mut ring, p, cap);
        if ring.len() > 2 {
            out.push(vec![ring]);
        }
    }

    /// One ring around an open polyline.
    fn stroke_open(&self, seq: &VertexSequence, cap1: CapShape<'_>, cap2: CapShape<'_>) -> Vec<PointF> {
        let n = seq.len();
        let mut ring = Vec::new();
        let mut vc = Vec::new();

        self.stroker.calc_cap(&mut vc, &seq[0], &seq[1], seq[0].dist, cap1);
        ring.extend_from_slice(&vc);
        for i in 1..n - 1 {
            self.stroker
                .calc_join(&mut vc, &seq[i - 1], &seq[i], &seq[i + 1], seq[i - 1].dist, seq[i].dist);
            ring.extend_from_slice(&vc);
        }

        self.stroker
            .calc_cap(&mut vc, &seq[n - 1], &seq[n - 2], seq[n - 2].dist, cap2);
        ring.extend_from_slice(&vc);
        for i in (1..n - 1).rev() {
            self.stroker
                .calc_join(&mut vc, &seq[i + 1], &seq[i], &seq[i - 1], seq[i].dist, seq[i - 1].dist);
            ring.extend_from_slice(&vc);
        }
        ring
    }

    /// Two rings around a closed polyline, one per side.
    fn stroke_closed(&self, seq: &VertexSequence) -> StrokePiece {
        let n = seq.len();
        let mut outline1 = Vec::new();
        let mut outline2 = Vec::new();
        let mut vc = Vec::new();

        for i in 0..n {
            let prev = seq.prev(i);
            let curr = seq.curr(i);
            let next = seq.next(i);
            self.stroker.calc_join(&mut vc, prev, curr, next, prev.dist, curr.dist);
            outline1.extend_from_slice(&vc);
        }
        for i in (0..n).rev() {
            let prev = seq.prev(i);
            let curr = seq.curr(i);
            let next = seq.next(i);
            self.stroker.calc_join(&mut vc, next, curr, prev, curr.dist, prev.dist);
            outline2.extend_from_slice(&vc);
        }
        vec![outline1, outline2]
    }
}

/// Reverse every ring of a piece when its dominant ring runs negative.
fn orient(piece: &mut StrokePiece) {
    let dominant = piece
        .iter()
        .map(|r| calc_polygon_area(r))
        .max_by(|a, b| a.abs().total_cmp(&b.abs()));
    if dominant.is_some_and(|a| a < 0.0) {
        for ring in piece.iter_mut() {
            ring.reverse();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
