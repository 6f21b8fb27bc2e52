//! Graphics paths.
//!
//! A [`Path`] is an ordered list of figures. Each figure starts at a point
//! and continues through line, quadratic, cubic and arc segments; a closed
//! figure always ends where it started. Curves are kept exact until a
//! consumer asks for a polyline through [`Path::flatten`] or the
//! [`VertexSource`] interface.
//!
//! Building follows GDI+: lines, curves and arcs continue the open figure
//! (joined by a straight line when they do not start at its end point),
//! while rectangles, ellipses, pies and polygons always form their own
//! closed figure.

use crate::basics::{
    FillMode, VertexSource, PATH_CMD_END_POLY, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP,
    PATH_FLAGS_CLOSE,
};
use crate::bezier_arc::{arc_point, BezierArc};
use crate::bounding_rect::bounding_rect_single;
use crate::config::{EngineConfig, DEFAULT_FLATNESS};
use crate::curves::{Curve3Div, Curve4Div};
use crate::error::{ensure_finite, Error, Result};
use crate::geometry::{PointF, RectangleF};
use crate::math::winding_number;
use crate::matrix::Matrix;
use crate::pen::Pen;

// ============================================================================
// Segments and figures
// ============================================================================

/// One piece of a figure, starting at the end of the previous piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(PointF),
    Quadratic {
        ctrl: PointF,
        to: PointF,
    },
    Cubic {
        ctrl1: PointF,
        ctrl2: PointF,
        to: PointF,
    },
    /// Elliptical arc; angles in degrees, y down, the current point is the
    /// arc's start.
    Arc {
        center: PointF,
        radius_x: f64,
        radius_y: f64,
        start_angle: f64,
        sweep_angle: f64,
    },
}

impl Segment {
    pub fn end_point(&self) -> PointF {
        match *self {
            Segment::Line(p) => p,
            Segment::Quadratic { to, .. } => to,
            Segment::Cubic { to, .. } => to,
            Segment::Arc {
                center,
                radius_x,
                radius_y,
                start_angle,
                sweep_angle,
            } => {
                if sweep_angle.abs() >= 360.0 {
                    arc_point(center, radius_x, radius_y, start_angle)
                } else {
                    arc_point(center, radius_x, radius_y, start_angle + sweep_angle)
                }
            }
        }
    }
}

/// A subpath.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    start: PointF,
    segments: Vec<Segment>,
    closed: bool,
}

/// Flattened figure. Closed polylines do not repeat their first point.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<PointF>,
    pub closed: bool,
}

fn coincident(a: PointF, b: PointF) -> bool {
    let scale = 1.0 + a.x.abs().max(a.y.abs());
    (a.x - b.x).abs() <= 1e-12 * scale && (a.y - b.y).abs() <= 1e-12 * scale
}

impl Figure {
    fn new(start: PointF) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    pub fn start(&self) -> PointF {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn end_point(&self) -> PointF {
        self.segments.last().map_or(self.start, |s| s.end_point())
    }

    fn close(&mut self) {
        if !coincident(self.end_point(), self.start) {
            self.segments.push(Segment::Line(self.start));
        }
        self.closed = true;
    }

    fn point_count(&self) -> usize {
        1 + self
            .segments
            .iter()
            .map(|s| match *s {
                Segment::Line(_) => 1,
                Segment::Quadratic { .. } => 2,
                Segment::Cubic { .. } => 3,
                Segment::Arc {
                    center,
                    radius_x,
                    radius_y,
                    start_angle,
                    sweep_angle,
                } => {
                    3 * BezierArc::new(center, radius_x, radius_y, start_angle, sweep_angle)
                        .curves()
                        .len()
                }
            })
            .sum::<usize>()
    }

    /// Polyline within `tolerance` of the exact figure.
    pub fn flatten(&self, tolerance: f64) -> Polyline {
        let mut points = vec![self.start];
        let mut current = self.start;
        for seg in &self.segments {
            match *seg {
                Segment::Line(p) => points.push(p),
                Segment::Quadratic { ctrl, to } => {
                    let mut c = Curve3Div::new(tolerance);
                    points.extend_from_slice(&c.init(current, ctrl, to)[1..]);
                }
                Segment::Cubic { ctrl1, ctrl2, to } => {
                    let mut c = Curve4Div::new(tolerance);
                    points.extend_from_slice(&c.init(current, ctrl1, ctrl2, to)[1..]);
                }
                Segment::Arc {
                    center,
                    radius_x,
                    radius_y,
                    start_angle,
                    sweep_angle,
                } => {
                    let arc = BezierArc::new(center, radius_x, radius_y, start_angle, sweep_angle);
                    let mut c = Curve4Div::new(tolerance);
                    let mut from = current;
                    for piece in arc.curves() {
                        points.extend_from_slice(&c.init(from, piece[0], piece[1], piece[2])[1..]);
                        from = piece[2];
                    }
                }
            }
            current = seg.end_point();
        }
        if self.closed && points.len() > 1 {
            if let Some(&last) = points.last() {
                if coincident(last, self.start) {
                    points.pop();
                }
            }
        }
        Polyline {
            points,
            closed: self.closed,
        }
    }

    fn transformed(&self, m: &Matrix) -> Figure {
        let mut segments = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            match *seg {
                Segment::Line(p) => segments.push(Segment::Line(m.transform_point(p))),
                Segment::Quadratic { ctrl, to } => segments.push(Segment::Quadratic {
                    ctrl: m.transform_point(ctrl),
                    to: m.transform_point(to),
                }),
                Segment::Cubic { ctrl1, ctrl2, to } => segments.push(Segment::Cubic {
                    ctrl1: m.transform_point(ctrl1),
                    ctrl2: m.transform_point(ctrl2),
                    to: m.transform_point(to),
                }),
                Segment::Arc {
                    center,
                    radius_x,
                    radius_y,
                    start_angle,
                    sweep_angle,
                } => {
                    // Affine images of ellipses are ellipses, but not axis
                    // aligned ones; carry them as cubics.
                    let arc = BezierArc::new(center, radius_x, radius_y, start_angle, sweep_angle);
                    for c in arc.curves() {
                        segments.push(Segment::Cubic {
                            ctrl1: m.transform_point(c[0]),
                            ctrl2: m.transform_point(c[1]),
                            to: m.transform_point(c[2]),
                        });
                    }
                }
            }
        }
        Figure {
            start: m.transform_point(self.start),
            segments,
            closed: self.closed,
        }
    }

    fn reversed(&self) -> Figure {
        let mut starts = Vec::with_capacity(self.segments.len());
        let mut p = self.start;
        for seg in &self.segments {
            starts.push(p);
            p = seg.end_point();
        }
        let mut segments = Vec::with_capacity(self.segments.len());
        for (seg, &from) in self.segments.iter().zip(starts.iter()).rev() {
            segments.push(match *seg {
                Segment::Line(_) => Segment::Line(from),
                Segment::Quadratic { ctrl, .. } => Segment::Quadratic { ctrl, to: from },
                Segment::Cubic { ctrl1, ctrl2, .. } => Segment::Cubic {
                    ctrl1: ctrl2,
                    ctrl2: ctrl1,
                    to: from,
                },
                Segment::Arc {
                    center,
                    radius_x,
                    radius_y,
                    start_angle,
                    sweep_angle,
                } => Segment::Arc {
                    center,
                    radius_x,
                    radius_y,
                    start_angle: start_angle + sweep_angle,
                    sweep_angle: -sweep_angle,
                },
            });
        }
        Figure {
            start: p,
            segments,
            closed: self.closed,
        }
    }
}

// ============================================================================
// FlattenedPath
// ============================================================================

/// Vertex source over a set of polylines.
#[derive(Debug, Clone, Default)]
pub struct FlattenedPath {
    cmds: Vec<(PointF, u32)>,
    pos: usize,
}

impl FlattenedPath {
    pub fn new(polylines: &[Polyline]) -> Self {
        let mut cmds = Vec::new();
        for pl in polylines {
            for (i, p) in pl.points.iter().enumerate() {
                cmds.push((*p, if i == 0 { PATH_CMD_MOVE_TO } else { PATH_CMD_LINE_TO }));
            }
            if pl.closed && !pl.points.is_empty() {
                cmds.push((PointF::EMPTY, PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
            }
        }
        Self { cmds, pos: 0 }
    }
}

impl VertexSource for FlattenedPath {
    fn rewind(&mut self, _path_id: u32) {
        self.pos = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        match self.cmds.get(self.pos) {
            Some(&(p, cmd)) => {
                self.pos += 1;
                *x = p.x;
                *y = p.y;
                cmd
            }
            None => PATH_CMD_STOP,
        }
    }
}

// ============================================================================
// Path
// ============================================================================

/// Ordered figures plus a fill mode.
#[derive(Debug, Clone)]
pub struct Path {
    figures: Vec<Figure>,
    fill_mode: FillMode,
    figure_open: bool,
    flatness: f64,
    cursor: FlattenedPath,
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl Path {
    pub fn new() -> Self {
        Self::with_fill_mode(FillMode::Alternate)
    }

    pub fn with_fill_mode(fill_mode: FillMode) -> Self {
        Self {
            figures: Vec::new(),
            fill_mode,
            figure_open: false,
            flatness: DEFAULT_FLATNESS,
            cursor: FlattenedPath::default(),
        }
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn set_fill_mode(&mut self, mode: FillMode) {
        self.fill_mode = mode;
    }

    /// Tolerance used by bounds, hit tests and the vertex source.
    pub fn flatness(&self) -> f64 {
        self.flatness
    }

    pub fn set_flatness(&mut self, flatness: f64) -> Result<()> {
        if !(flatness.is_finite() && flatness > 0.0) {
            return Err(Error::invalid("flatness must be positive"));
        }
        self.flatness = flatness;
        Ok(())
    }

    /// Remove all figures.
    pub fn reset(&mut self) {
        self.figures.clear();
        self.figure_open = false;
    }

    // ------------------------------------------------------------------------
    // Figures
    // ------------------------------------------------------------------------

    /// Make the next added line, curve or arc begin a new figure.
    pub fn start_figure(&mut self) {
        self.figure_open = false;
    }

    pub fn close_figure(&mut self) {
        if let Some(f) = self.figures.last_mut() {
            if !f.closed {
                f.close();
            }
        }
        self.figure_open = false;
    }

    pub fn close_all_figures(&mut self) {
        for f in &mut self.figures {
            if !f.closed {
                f.close();
            }
        }
        self.figure_open = false;
    }

    /// Move the pen to `p` inside the open figure, or begin a figure there.
    fn continue_figure(&mut self, p: PointF) {
        let extend = self.figure_open && !self.figures.is_empty();
        if extend {
            if let Some(f) = self.figures.last_mut() {
                if f.end_point() != p {
                    f.segments.push(Segment::Line(p));
                }
            }
        } else {
            self.figures.push(Figure::new(p));
            self.figure_open = true;
        }
    }

    fn push_segment(&mut self, seg: Segment) {
        if let Some(f) = self.figures.last_mut() {
            f.segments.push(seg);
        }
    }

    fn push_closed_figure(&mut self, start: PointF, segments: Vec<Segment>) {
        let mut f = Figure::new(start);
        f.segments = segments;
        f.close();
        self.figures.push(f);
        self.figure_open = false;
    }

    // ------------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------------

    pub fn add_line(&mut self, p1: PointF, p2: PointF) -> Result<()> {
        ensure_finite("line end point", &[p1.x, p1.y, p2.x, p2.y])?;
        self.continue_figure(p1);
        self.push_segment(Segment::Line(p2));
        Ok(())
    }

    /// Connected line run through `points`.
    pub fn add_lines(&mut self, points: &[PointF]) -> Result<()> {
        if points.is_empty() {
            return Err(Error::invalid("add_lines needs at least one point"));
        }
        ensure_points(points)?;
        self.continue_figure(points[0]);
        for p in &points[1..] {
            self.push_segment(Segment::Line(*p));
        }
        Ok(())
    }

    pub fn add_bezier(&mut self, p1: PointF, c1: PointF, c2: PointF, p2: PointF) -> Result<()> {
        ensure_points(&[p1, c1, c2, p2])?;
        self.continue_figure(p1);
        self.push_segment(Segment::Cubic {
            ctrl1: c1,
            ctrl2: c2,
            to: p2,
        });
        Ok(())
    }

    /// Chain of cubics: a start point followed by three points per curve.
    pub fn add_beziers(&mut self, points: &[PointF]) -> Result<()> {
        if points.len() < 4 || (points.len() - 1) % 3 != 0 {
            return Err(Error::invalid(format!(
                "add_beziers needs 3n+1 points, got {}",
                points.len()
            )));
        }
        ensure_points(points)?;
        self.continue_figure(points[0]);
        for c in points[1..].chunks(3) {
            self.push_segment(Segment::Cubic {
                ctrl1: c[0],
                ctrl2: c[1],
                to: c[2],
            });
        }
        Ok(())
    }

    pub fn add_quadratic(&mut self, p1: PointF, ctrl: PointF, p2: PointF) -> Result<()> {
        ensure_points(&[p1, ctrl, p2])?;
        self.continue_figure(p1);
        self.push_segment(Segment::Quadratic { ctrl, to: p2 });
        Ok(())
    }

    /// Arc of the ellipse inscribed in `rect`.
    pub fn add_arc(&mut self, rect: RectangleF, start_angle: f64, sweep_angle: f64) -> Result<()> {
        let (center, rx, ry) = ellipse_of(&rect, "arc")?;
        ensure_finite("arc angle", &[start_angle, sweep_angle])?;
        if rx == 0.0 || ry == 0.0 {
            return Err(Error::invalid("arc rectangle has zero extent"));
        }
        self.continue_figure(arc_point(center, rx, ry, start_angle));
        self.push_segment(Segment::Arc {
            center,
            radius_x: rx,
            radius_y: ry,
            start_angle,
            sweep_angle,
        });
        Ok(())
    }

    /// Closed rectangle, clockwise on screen from the top-left corner.
    /// Empty rectangles add nothing.
    pub fn add_rectangle(&mut self, rect: RectangleF) -> Result<()> {
        ensure_rect(&rect, "rectangle")?;
        if rect.is_empty() {
            return Ok(());
        }
        let c = rect.corners();
        self.push_closed_figure(
            c[0],
            vec![Segment::Line(c[1]), Segment::Line(c[2]), Segment::Line(c[3])],
        );
        Ok(())
    }

    pub fn add_rectangles(&mut self, rects: &[RectangleF]) -> Result<()> {
        for r in rects {
            ensure_rect(r, "rectangle")?;
        }
        for r in rects {
            self.add_rectangle(*r)?;
        }
        Ok(())
    }

    /// Closed ellipse inscribed in `rect`. Empty rectangles add nothing.
    pub fn add_ellipse(&mut self, rect: RectangleF) -> Result<()> {
        let (center, rx, ry) = ellipse_of(&rect, "ellipse")?;
        if rx == 0.0 || ry == 0.0 {
            return Ok(());
        }
        self.push_closed_figure(
            PointF::new(center.x + rx, center.y),
            vec![Segment::Arc {
                center,
                radius_x: rx,
                radius_y: ry,
                start_angle: 0.0,
                sweep_angle: 360.0,
            }],
        );
        Ok(())
    }

    /// Closed pie wedge: center, arc, back to center.
    pub fn add_pie(&mut self, rect: RectangleF, start_angle: f64, sweep_angle: f64) -> Result<()> {
        let (center, rx, ry) = ellipse_of(&rect, "pie")?;
        ensure_finite("pie angle", &[start_angle, sweep_angle])?;
        if rx == 0.0 || ry == 0.0 {
            return Err(Error::invalid("pie rectangle has zero extent"));
        }
        self.push_closed_figure(
            center,
            vec![
                Segment::Line(arc_point(center, rx, ry, start_angle)),
                Segment::Arc {
                    center,
                    radius_x: rx,
                    radius_y: ry,
                    start_angle,
                    sweep_angle,
                },
            ],
        );
        Ok(())
    }

    pub fn add_polygon(&mut self, points: &[PointF]) -> Result<()> {
        if points.len() < 3 {
            return Err(Error::invalid(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            )));
        }
        ensure_points(points)?;
        self.push_closed_figure(
            points[0],
            points[1..].iter().map(|p| Segment::Line(*p)).collect(),
        );
        Ok(())
    }

    /// Append the figures of `other`. With `connect`, its first figure
    /// continues the open figure of `self`.
    pub fn add_path(&mut self, other: &Path, connect: bool) {
        let mut figures = other.figures.iter();
        if connect && self.figure_open && !self.figures.is_empty() {
            if let Some(first) = figures.next() {
                self.continue_figure(first.start);
                for seg in &first.segments {
                    self.push_segment(*seg);
                }
                if first.closed {
                    self.close_figure();
                }
            }
        }
        for f in figures {
            self.figures.push(f.clone());
        }
        self.figure_open = other.figure_open && !other.figures.is_empty();
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Number of defining points, control points included.
    pub fn point_count(&self) -> usize {
        self.figures.iter().map(|f| f.point_count()).sum()
    }

    pub fn last_point(&self) -> Option<PointF> {
        self.figures.last().map(|f| f.end_point())
    }

    /// Flatten every figure within `tolerance`.
    pub fn flatten(&self, tolerance: f64) -> Result<Vec<Polyline>> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(Error::invalid("flatten tolerance must be positive"));
        }
        Ok(self.polylines(tolerance))
    }

    pub(crate) fn polylines(&self, tolerance: f64) -> Vec<Polyline> {
        self.figures.iter().map(|f| f.flatten(tolerance)).collect()
    }

    /// Bounds of the flattened outline, `EMPTY` for an empty path.
    pub fn get_bounds(&self) -> RectangleF {
        let mut src = FlattenedPath::new(&self.polylines(self.flatness));
        bounding_rect_single(&mut src, 0).unwrap_or(RectangleF::EMPTY)
    }

    /// Containment under the fill mode. Every figure counts as closed.
    pub fn is_visible(&self, p: PointF) -> bool {
        let winding: i32 = self
            .polylines(self.flatness)
            .iter()
            .map(|pl| winding_number(&pl.points, p.x, p.y))
            .sum();
        self.fill_mode.is_inside(winding)
    }

    /// True when `p` lies under the stroke of this path drawn with `pen`.
    pub fn is_outline_visible(&self, p: PointF, pen: &Pen) -> Result<bool> {
        let config = EngineConfig {
            flatness: self.flatness,
            ..Default::default()
        };
        Ok(crate::stroke::stroke_region(self, pen, &config)?.is_visible(p))
    }

    // ------------------------------------------------------------------------
    // Derived paths
    // ------------------------------------------------------------------------

    /// Transformed copy. Arcs become cubic Beziers.
    pub fn transform(&self, m: &Matrix) -> Path {
        Path {
            figures: self.figures.iter().map(|f| f.transformed(m)).collect(),
            fill_mode: self.fill_mode,
            figure_open: self.figure_open,
            flatness: self.flatness,
            cursor: FlattenedPath::default(),
        }
    }

    /// Reverse the order of figures and the direction of each figure.
    pub fn reverse(&mut self) {
        self.figures = self.figures.iter().rev().map(|f| f.reversed()).collect();
        self.figure_open = false;
    }

    /// Outline of the stroke as closed contours in a `Winding` path.
    pub fn widen(&self, pen: &Pen) -> Result<Path> {
        let config = EngineConfig {
            flatness: self.flatness,
            ..Default::default()
        };
        crate::stroke::widen(self, pen, &config)
    }

    /// Closed polygon figures built from rings.
    pub(crate) fn from_rings(rings: &[Vec<PointF>], fill_mode: FillMode) -> Path {
        let mut path = Path::with_fill_mode(fill_mode);
        for ring in rings {
            if ring.len() < 2 {
                continue;
            }
            path.push_closed_figure(
                ring[0],
                ring[1..].iter().map(|p| Segment::Line(*p)).collect(),
            );
        }
        path
    }
}

impl VertexSource for Path {
    fn rewind(&mut self, _path_id: u32) {
        self.cursor = FlattenedPath::new(&self.polylines(self.flatness));
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        self.cursor.vertex(x, y)
    }
}

fn ensure_points(points: &[PointF]) -> Result<()> {
    if points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        Ok(())
    } else {
        Err(Error::invalid("point coordinates must be finite"))
    }
}

fn ensure_rect(rect: &RectangleF, what: &str) -> Result<()> {
    ensure_finite(what, &[rect.x, rect.y, rect.width, rect.height])?;
    if rect.width < 0.0 || rect.height < 0.0 {
        return Err(Error::invalid(format!("{what} has negative size")));
    }
    Ok(())
}

fn ellipse_of(rect: &RectangleF, what: &str) -> Result<(PointF, f64, f64)> {
    ensure_rect(rect, what)?;
    let rx = rect.width / 2.0;
    let ry = rect.height / 2.0;
    Ok((PointF::new(rect.x + rx, rect.y + ry), rx, ry))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{is_close, is_stop, is_vertex};
    use crate::math::calc_polygon_area;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_lines_continue_open_figure() {
        let mut path = Path::new();
        path.add_line(PointF::new(0.0, 0.0), PointF::new(10.0, 0.0)).unwrap();
        path.add_line(PointF::new(10.0, 5.0), PointF::new(0.0, 5.0)).unwrap();
        assert_eq!(path.figures().len(), 1);
        // Joined by a line to (10,5)
        assert_eq!(path.figures()[0].segments().len(), 3);
        assert_eq!(path.last_point(), Some(PointF::new(0.0, 5.0)));

        path.start_figure();
        path.add_line(PointF::new(20.0, 0.0), PointF::new(30.0, 0.0)).unwrap();
        assert_eq!(path.figures().len(), 2);
    }

    #[test]
    fn test_close_figure_returns_to_start() {
        let mut path = Path::new();
        path.add_lines(&[
            PointF::new(0.0, 0.0),
            PointF::new(10.0, 0.0),
            PointF::new(10.0, 10.0),
        ])
        .unwrap();
        path.close_figure();
        let f = &path.figures()[0];
        assert!(f.is_closed());
        assert_eq!(f.end_point(), f.start());
        // A new line after closing begins a new figure.
        path.add_line(PointF::new(50.0, 50.0), PointF::new(60.0, 50.0)).unwrap();
        assert_eq!(path.figures().len(), 2);
        assert!(!path.figures()[1].is_closed());
    }

    #[test]
    fn test_close_all_figures() {
        let mut path = Path::new();
        path.add_line(PointF::new(0.0, 0.0), PointF::new(1.0, 1.0)).unwrap();
        path.start_figure();
        path.add_line(PointF::new(5.0, 0.0), PointF::new(6.0, 1.0)).unwrap();
        path.close_all_figures();
        assert!(path.figures().iter().all(|f| f.is_closed()));
    }

    #[test]
    fn test_argument_validation() {
        let mut path = Path::new();
        assert!(matches!(
            path.add_polygon(&[PointF::new(0.0, 0.0), PointF::new(1.0, 0.0)]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(path
            .add_rectangle(RectangleF::new(0.0, 0.0, -1.0, 5.0))
            .is_err());
        assert!(path
            .add_line(PointF::new(f64::NAN, 0.0), PointF::new(1.0, 0.0))
            .is_err());
        assert!(path.add_beziers(&[PointF::EMPTY; 5]).is_err());
        assert!(path.add_lines(&[]).is_err());
        assert!(path.flatten(0.0).is_err());
        assert!(path.is_empty());
    }

    #[test]
    fn test_rectangle_bounds_and_area() {
        let mut path = Path::new();
        path.add_rectangle(RectangleF::new(1.0, 2.0, 10.0, 5.0)).unwrap();
        assert_eq!(path.get_bounds(), RectangleF::new(1.0, 2.0, 10.0, 5.0));
        assert_eq!(path.point_count(), 5);
        let pl = path.flatten(0.25).unwrap();
        assert_eq!(pl.len(), 1);
        assert!(pl[0].closed);
        assert_eq!(pl[0].points.len(), 4);
        assert!((calc_polygon_area(&pl[0].points).abs() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_empty_rectangle_ignored() {
        let mut path = Path::new();
        path.add_rectangle(RectangleF::new(0.0, 0.0, 0.0, 5.0)).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.get_bounds(), RectangleF::EMPTY);
    }

    #[test]
    fn test_ellipse_bounds() {
        let mut path = Path::new();
        path.add_ellipse(RectangleF::new(0.0, 0.0, 20.0, 10.0)).unwrap();
        let b = path.get_bounds();
        assert!(b.approx_eq(&RectangleF::new(0.0, 0.0, 20.0, 10.0), 1e-6));
        assert!(path.is_visible(PointF::new(10.0, 5.0)));
        assert!(!path.is_visible(PointF::new(0.5, 0.5)));
    }

    #[test]
    fn test_ellipse_area_close_to_exact() {
        let mut path = Path::new();
        path.add_ellipse(RectangleF::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        let pl = path.flatten(0.01).unwrap();
        let area = calc_polygon_area(&pl[0].points).abs();
        let exact = std::f64::consts::PI * 50.0 * 50.0;
        assert!((area - exact).abs() / exact < 1e-3);
    }

    #[test]
    fn test_pie() {
        let mut path = Path::new();
        path.add_pie(RectangleF::new(-10.0, -10.0, 20.0, 20.0), 0.0, 90.0)
            .unwrap();
        let f = &path.figures()[0];
        assert!(f.is_closed());
        assert_eq!(f.start(), PointF::new(0.0, 0.0));
        assert!(path.is_visible(PointF::new(3.0, 3.0)));
        assert!(!path.is_visible(PointF::new(-3.0, 3.0)));
        assert!(path.add_pie(RectangleF::new(0.0, 0.0, 0.0, 5.0), 0.0, 90.0).is_err());
    }

    #[test]
    fn test_arc_continues_figure() {
        let mut path = Path::new();
        path.add_line(PointF::new(0.0, 0.0), PointF::new(10.0, 0.0)).unwrap();
        path.add_arc(RectangleF::new(0.0, -10.0, 20.0, 20.0), 0.0, 90.0)
            .unwrap();
        assert_eq!(path.figures().len(), 1);
        let end = path.last_point().unwrap();
        assert!((end.x - 10.0).abs() < EPS && (end.y - 10.0).abs() < EPS);
    }

    #[test]
    fn test_fill_modes() {
        // Two nested squares drawn the same direction.
        let mut path = Path::new();
        path.add_rectangle(RectangleF::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        path.add_rectangle(RectangleF::new(2.0, 2.0, 6.0, 6.0)).unwrap();
        let p = PointF::new(5.0, 5.0);
        assert!(!path.is_visible(p));
        path.set_fill_mode(FillMode::Winding);
        assert!(path.is_visible(p));
        assert!(path.is_visible(PointF::new(1.0, 1.0)));
        assert!(!path.is_visible(PointF::new(11.0, 1.0)));
    }

    #[test]
    fn test_transform_is_pure_and_converts_arcs() {
        let mut path = Path::new();
        path.add_ellipse(RectangleF::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let mut m = Matrix::identity();
        m.translate(5.0, 0.0, crate::matrix::MatrixOrder::Append);
        m.scale(2.0, 1.0, crate::matrix::MatrixOrder::Append);
        let t = path.transform(&m);
        assert!(matches!(path.figures()[0].segments()[0], Segment::Arc { .. }));
        assert!(t.figures()[0]
            .segments()
            .iter()
            .all(|s| matches!(s, Segment::Cubic { .. } | Segment::Line(_))));
        let b = t.get_bounds();
        assert!(b.approx_eq(&RectangleF::new(10.0, 0.0, 20.0, 10.0), 1e-6));
    }

    #[test]
    fn test_reverse() {
        let mut path = Path::new();
        path.add_lines(&[
            PointF::new(0.0, 0.0),
            PointF::new(10.0, 0.0),
            PointF::new(10.0, 10.0),
        ])
        .unwrap();
        path.reverse();
        let f = &path.figures()[0];
        assert_eq!(f.start(), PointF::new(10.0, 10.0));
        assert_eq!(f.end_point(), PointF::new(0.0, 0.0));
        assert_eq!(f.segments()[0], Segment::Line(PointF::new(10.0, 0.0)));
    }

    #[test]
    fn test_add_path_connect() {
        let mut a = Path::new();
        a.add_line(PointF::new(0.0, 0.0), PointF::new(5.0, 0.0)).unwrap();
        let mut b = Path::new();
        b.add_line(PointF::new(5.0, 5.0), PointF::new(0.0, 5.0)).unwrap();
        let mut joined = a.clone();
        joined.add_path(&b, true);
        assert_eq!(joined.figures().len(), 1);
        let mut separate = a.clone();
        separate.add_path(&b, false);
        assert_eq!(separate.figures().len(), 2);
    }

    #[test]
    fn test_vertex_source() {
        let mut path = Path::new();
        path.add_rectangle(RectangleF::new(0.0, 0.0, 4.0, 4.0)).unwrap();
        path.rewind(0);
        let (mut x, mut y) = (0.0, 0.0);
        let mut vertices = 0;
        let mut closes = 0;
        loop {
            let cmd = path.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            if is_vertex(cmd) {
                vertices += 1;
            }
            if is_close(cmd) {
                closes += 1;
            }
        }
        assert_eq!(vertices, 4);
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_quadratic_flatten() {
        let mut path = Path::new();
        path.add_quadratic(
            PointF::new(0.0, 0.0),
            PointF::new(5.0, 10.0),
            PointF::new(10.0, 0.0),
        )
        .unwrap();
        let b = path.get_bounds();
        assert!((b.height - 5.0).abs() < 0.3);
        assert_eq!(path.point_count(), 3);
    }
}
