//! Polygon boolean algebra.
//!
//! Exact-geometry union, intersection, difference and exclusive-or over
//! polygon sets. The engine works on any number of operands at once, each
//! read with its own fill mode, and keeps a boundary edge when a caller
//! predicate over "inside operand k" flags differs on its two sides.
//!
//! The pipeline:
//!
//! 1. Collect directed edges from every operand ring.
//! 2. Split edges at every crossing, touch and collinear overlap, snapping
//!    vertices closer than a tolerance relative to the coordinate range.
//! 3. For each distinct edge, compute per-operand winding numbers just
//!    left and just right of it and evaluate the predicate on both sides.
//! 4. Link the surviving edges into rings, taking the tightest turn at
//!    shared vertices so touching contours stay separate.
//!
//! Output rings keep the interior on their left: outer contours have
//! positive shoelace area and holes negative, so every result can be read
//! back with either fill mode.

use std::collections::HashMap;

use tracing::trace;

use crate::basics::{FillMode, PI};
use crate::bounding_rect::bounding_rect_single;
use crate::geometry::{PointF, RectangleF};
use crate::math::{calc_polygon_area, edge_crossing};
use crate::matrix::Matrix;
use crate::path::{FlattenedPath, Path, Polyline};

/// Vertices closer than this fraction of the coordinate range are merged.
const SNAP_EPSILON: f64 = 1e-10;

// ============================================================================
// BoolOp
// ============================================================================

/// Two-operand boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    Or,
    And,
    Xor,
    AMinusB,
    BMinusA,
}

impl BoolOp {
    #[inline]
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            BoolOp::Or => a || b,
            BoolOp::And => a && b,
            BoolOp::Xor => a != b,
            BoolOp::AMinusB => a && !b,
            BoolOp::BMinusA => b && !a,
        }
    }
}

// ============================================================================
// PolygonSet
// ============================================================================

/// A set of closed rings. Sets produced by [`combine`] are normalized:
/// rings do not cross, outer rings run positive and holes negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonSet {
    contours: Vec<Vec<PointF>>,
}

impl PolygonSet {
    /// Wrap rings as given. Rings with fewer than two points are dropped.
    pub fn new(contours: Vec<Vec<PointF>>) -> Self {
        Self {
            contours: contours.into_iter().filter(|c| c.len() > 1).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Positive ring around `rect`, or the empty set for an empty rectangle.
    pub fn from_rect(rect: &RectangleF) -> Self {
        if rect.is_empty() {
            return Self::empty();
        }
        Self {
            contours: vec![rect.corners().to_vec()],
        }
    }

    /// Rings from flattened figures; open figures count as closed.
    pub fn from_polylines(polylines: &[Polyline]) -> Self {
        Self::new(polylines.iter().map(|pl| pl.points.clone()).collect())
    }

    pub fn contours(&self) -> &[Vec<PointF>] {
        &self.contours
    }

    pub fn into_contours(self) -> Vec<Vec<PointF>> {
        self.contours
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Sum of signed ring areas; the covered area for normalized sets.
    pub fn area(&self) -> f64 {
        self.contours.iter().map(|c| calc_polygon_area(c)).sum()
    }

    /// Bounding box, `EMPTY` for the empty set.
    pub fn bounds(&self) -> RectangleF {
        let mut src = self.vertex_source();
        bounding_rect_single(&mut src, 0).unwrap_or(RectangleF::EMPTY)
    }

    /// Sum of ring winding numbers at `p`.
    pub fn winding(&self, p: PointF) -> i32 {
        self.contours
            .iter()
            .map(|c| crate::math::winding_number(c, p.x, p.y))
            .sum()
    }

    /// Containment for normalized sets.
    pub fn contains(&self, p: PointF) -> bool {
        self.winding(p) != 0
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in self.contours.iter_mut().flatten() {
            p.x += dx;
            p.y += dy;
        }
    }

    /// Transformed copy. Mirroring transforms reverse the rings so the
    /// orientation convention survives.
    pub fn transformed(&self, m: &Matrix) -> Self {
        let flip = m.determinant() < 0.0;
        let contours = self
            .contours
            .iter()
            .map(|c| {
                let mut ring = c.clone();
                m.transform_points(&mut ring);
                if flip {
                    ring.reverse();
                }
                ring
            })
            .collect();
        Self { contours }
    }

    /// Vertex source emitting every ring as a closed polygon.
    pub fn vertex_source(&self) -> FlattenedPath {
        let polylines: Vec<Polyline> = self
            .contours
            .iter()
            .map(|c| Polyline {
                points: c.clone(),
                closed: true,
            })
            .collect();
        FlattenedPath::new(&polylines)
    }

    /// The rings as closed figures of a `Winding` path.
    pub fn to_path(&self) -> Path {
        Path::from_rings(&self.contours, FillMode::Winding)
    }

    /// Resolve self-intersections under `fill_mode` into a normalized set.
    pub fn normalized(&self, fill_mode: FillMode) -> Self {
        combine(&[(self, fill_mode)], &|inside: &[bool]| inside[0])
    }
}

// ============================================================================
// Combination
// ============================================================================

/// Combine two normalized sets. Empty operands short-circuit.
pub fn combine_pair(a: &PolygonSet, b: &PolygonSet, op: BoolOp) -> PolygonSet {
    match op {
        BoolOp::Or | BoolOp::Xor => {
            if a.is_empty() {
                return b.clone();
            }
            if b.is_empty() {
                return a.clone();
            }
        }
        BoolOp::And => {
            if a.is_empty() || b.is_empty() {
                return PolygonSet::empty();
            }
            if !a.bounds().intersects_with(&b.bounds()) {
                return PolygonSet::empty();
            }
        }
        BoolOp::AMinusB => {
            if a.is_empty() {
                return PolygonSet::empty();
            }
            if b.is_empty() {
                return a.clone();
            }
        }
        BoolOp::BMinusA => {
            if b.is_empty() {
                return PolygonSet::empty();
            }
            if a.is_empty() {
                return b.clone();
            }
        }
    }
    combine(
        &[(a, FillMode::Winding), (b, FillMode::Winding)],
        &|inside: &[bool]| op.apply(inside[0], inside[1]),
    )
}

/// N-ary combination. `predicate` receives one "inside" flag per operand
/// and decides whether that side of an edge belongs to the result.
pub fn combine(
    operands: &[(&PolygonSet, FillMode)],
    predicate: &dyn Fn(&[bool]) -> bool,
) -> PolygonSet {
    let edges = collect_edges(operands);
    if edges.is_empty() {
        return PolygonSet::empty();
    }
    let eps = snap_tolerance(&edges);
    let graph = Arrangement::build(&edges, eps);
    let kept = graph.classify(operands, predicate);
    let contours = graph.link(&kept, eps);
    trace!(
        operands = operands.len(),
        input_edges = edges.len(),
        vertices = graph.points.len(),
        edges = graph.edges.len(),
        kept = kept.len(),
        contours = contours.len(),
        "boolean combine"
    );
    PolygonSet { contours }
}

// ----------------------------------------------------------------------------
// Edge collection
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct InputEdge {
    operand: usize,
    a: PointF,
    b: PointF,
}

impl InputEdge {
    fn min_x(&self) -> f64 {
        self.a.x.min(self.b.x)
    }
    fn max_x(&self) -> f64 {
        self.a.x.max(self.b.x)
    }
    fn min_y(&self) -> f64 {
        self.a.y.min(self.b.y)
    }
    fn max_y(&self) -> f64 {
        self.a.y.max(self.b.y)
    }
}

fn collect_edges(operands: &[(&PolygonSet, FillMode)]) -> Vec<InputEdge> {
    let mut edges = Vec::new();
    for (operand, (set, _)) in operands.iter().enumerate() {
        for ring in &set.contours {
            let n = ring.len();
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                if a != b {
                    edges.push(InputEdge { operand, a, b });
                }
            }
        }
    }
    edges
}

fn snap_tolerance(edges: &[InputEdge]) -> f64 {
    let scale = edges.iter().fold(1.0_f64, |m, e| {
        m.max(e.a.x.abs())
            .max(e.a.y.abs())
            .max(e.b.x.abs())
            .max(e.b.y.abs())
    });
    scale * SNAP_EPSILON
}

// ----------------------------------------------------------------------------
// Intersection
// ----------------------------------------------------------------------------

/// True when `p` lies strictly between the ends of segment `a0`→`a1`.
fn interior(a0: PointF, a1: PointF, p: PointF, eps: f64) -> bool {
    let dx = a1.x - a0.x;
    let dy = a1.y - a0.y;
    let t = ((p.x - a0.x) * dx + (p.y - a0.y) * dy) / (dx * dx + dy * dy);
    t > 0.0 && t < 1.0 && p.distance(a0) > eps && p.distance(a1) > eps
}

/// Points where segments `a` and `b` meet, pushed onto the split lists of
/// the segment whose interior they fall in.
fn crossings(
    a: &InputEdge,
    b: &InputEdge,
    eps: f64,
    on_a: &mut Vec<PointF>,
    on_b: &mut Vec<PointF>,
) {
    let (a0, a1, b0, b1) = (a.a, a.b, b.a, b.b);
    let (dx1, dy1) = (a1.x - a0.x, a1.y - a0.y);
    let (dx2, dy2) = (b1.x - b0.x, b1.y - b0.y);
    let len1 = (dx1 * dx1 + dy1 * dy1).sqrt();
    let len2 = (dx2 * dx2 + dy2 * dy2).sqrt();

    let side0 = (dx1 * (b0.y - a0.y) - dy1 * (b0.x - a0.x)) / len1;
    let side1 = (dx1 * (b1.y - a0.y) - dy1 * (b1.x - a0.x)) / len1;
    if side0.abs() <= eps && side1.abs() <= eps {
        // Collinear: each segment splits at the other's ends.
        for p in [b0, b1] {
            if interior(a0, a1, p, eps) {
                on_a.push(p);
            }
        }
        for p in [a0, a1] {
            if interior(b0, b1, p, eps) {
                on_b.push(p);
            }
        }
        return;
    }

    let den = dx1 * dy2 - dy1 * dx2;
    if den == 0.0 {
        return;
    }
    let (wx, wy) = (b0.x - a0.x, b0.y - a0.y);
    let t = (wx * dy2 - wy * dx2) / den;
    let u = (wx * dy1 - wy * dx1) / den;
    let ta = eps / len1;
    let tb = eps / len2;
    if t < -ta || t > 1.0 + ta || u < -tb || u > 1.0 + tb {
        return;
    }
    let p = if t <= ta {
        a0
    } else if t >= 1.0 - ta {
        a1
    } else if u <= tb {
        b0
    } else if u >= 1.0 - tb {
        b1
    } else {
        PointF::new(a0.x + t * dx1, a0.y + t * dy1)
    };
    if interior(a0, a1, p, eps) {
        on_a.push(p);
    }
    if interior(b0, b1, p, eps) {
        on_b.push(p);
    }
}

// ----------------------------------------------------------------------------
// Vertex pool
// ----------------------------------------------------------------------------

/// Merges points within `eps` of each other through a hash grid.
struct VertexPool {
    eps: f64,
    cell: f64,
    points: Vec<PointF>,
    grid: HashMap<(i64, i64), Vec<usize>>,
}

impl VertexPool {
    fn new(eps: f64) -> Self {
        Self {
            eps,
            cell: eps * 2.0,
            points: Vec::new(),
            grid: HashMap::new(),
        }
    }

    fn id(&mut self, p: PointF) -> usize {
        let cx = (p.x / self.cell).floor() as i64;
        let cy = (p.y / self.cell).floor() as i64;
        for gx in cx - 1..=cx + 1 {
            for gy in cy - 1..=cy + 1 {
                if let Some(ids) = self.grid.get(&(gx, gy)) {
                    for &id in ids {
                        if self.points[id].distance(p) <= self.eps {
                            return id;
                        }
                    }
                }
            }
        }
        let id = self.points.len();
        self.points.push(p);
        self.grid.entry((cx, cy)).or_default().push(id);
        id
    }
}

// ----------------------------------------------------------------------------
// Arrangement
// ----------------------------------------------------------------------------

/// An operand edge after splitting.
#[derive(Debug, Clone, Copy)]
struct DirectedEdge {
    operand: usize,
    from: usize,
    to: usize,
    edge: usize,
}

/// A distinct undirected edge, referenced from `u` to `v` with `u < v`.
#[derive(Debug, Clone)]
struct GraphEdge {
    u: usize,
    v: usize,
    /// Net direction per operand: +1 for each copy running `u`→`v`.
    counts: Vec<(usize, i32)>,
}

struct Arrangement {
    points: Vec<PointF>,
    directed: Vec<DirectedEdge>,
    edges: Vec<GraphEdge>,
}

impl Arrangement {
    fn build(input: &[InputEdge], eps: f64) -> Self {
        let mut splits: Vec<Vec<PointF>> = vec![Vec::new(); input.len()];

        let mut order: Vec<usize> = (0..input.len()).collect();
        order.sort_by(|&i, &j| input[i].min_x().total_cmp(&input[j].min_x()));
        let mut on_a = Vec::new();
        let mut on_b = Vec::new();
        for (oi, &i) in order.iter().enumerate() {
            let ei = &input[i];
            let max_x = ei.max_x() + eps;
            for &j in &order[oi + 1..] {
                let ej = &input[j];
                if ej.min_x() > max_x {
                    break;
                }
                if ej.min_y() > ei.max_y() + eps || ej.max_y() < ei.min_y() - eps {
                    continue;
                }
                crossings(ei, ej, eps, &mut on_a, &mut on_b);
                splits[i].append(&mut on_a);
                splits[j].append(&mut on_b);
            }
        }

        let mut pool = VertexPool::new(eps);
        let mut directed = Vec::new();
        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut edge_ids: HashMap<(usize, usize), usize> = HashMap::new();

        for (i, e) in input.iter().enumerate() {
            let (dx, dy) = (e.b.x - e.a.x, e.b.y - e.a.y);
            let param = |p: &PointF| ((p.x - e.a.x) * dx + (p.y - e.a.y) * dy) / (dx * dx + dy * dy);
            let mut pts = std::mem::take(&mut splits[i]);
            pts.sort_by(|p, q| param(p).total_cmp(&param(q)));

            let mut prev = pool.id(e.a);
            let ids: Vec<usize> = pts.iter().map(|p| pool.id(*p)).collect();
            for id in ids.into_iter().chain(std::iter::once(pool.id(e.b))) {
                if id == prev {
                    continue;
                }
                let key = (prev.min(id), prev.max(id));
                let edge = *edge_ids.entry(key).or_insert_with(|| {
                    edges.push(GraphEdge {
                        u: key.0,
                        v: key.1,
                        counts: Vec::new(),
                    });
                    edges.len() - 1
                });
                let sign = if prev == key.0 { 1 } else { -1 };
                let counts = &mut edges[edge].counts;
                match counts.iter_mut().find(|(k, _)| *k == e.operand) {
                    Some((_, c)) => *c += sign,
                    None => counts.push((e.operand, sign)),
                }
                directed.push(DirectedEdge {
                    operand: e.operand,
                    from: prev,
                    to: id,
                    edge,
                });
                prev = id;
            }
        }

        Self {
            points: pool.points,
            directed,
            edges,
        }
    }

    /// Directed boundary edges of the result, interior on the left.
    fn classify(
        &self,
        operands: &[(&PolygonSet, FillMode)],
        predicate: &dyn Fn(&[bool]) -> bool,
    ) -> Vec<(usize, usize)> {
        let index = BandIndex::new(&self.points, &self.directed);
        let k = operands.len();
        let mut base = vec![0i32; k];
        let mut inside_left = vec![false; k];
        let mut inside_right = vec![false; k];
        let mut kept = Vec::new();

        for (ei, e) in self.edges.iter().enumerate() {
            let a = self.points[e.u];
            let b = self.points[e.v];
            let m = PointF::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);

            base.iter_mut().for_each(|w| *w = 0);
            for &di in index.query(m.y) {
                let de = &self.directed[di];
                if de.edge != ei {
                    base[de.operand] +=
                        edge_crossing(self.points[de.from], self.points[de.to], m.x, m.y);
                }
            }

            // The ray count lands on the +x side of a non-horizontal edge
            // and on the +y side of a horizontal one.
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let base_is_right = dy > 0.0 || (dy == 0.0 && dx < 0.0);
            for (op, (_, fill)) in operands.iter().enumerate() {
                let s = e
                    .counts
                    .iter()
                    .find(|(o, _)| *o == op)
                    .map_or(0, |(_, c)| *c);
                let (left, right) = if base_is_right {
                    (base[op] + s, base[op])
                } else {
                    (base[op], base[op] - s)
                };
                inside_left[op] = fill.is_inside(left);
                inside_right[op] = fill.is_inside(right);
            }

            let l = predicate(&inside_left);
            let r = predicate(&inside_right);
            if l && !r {
                kept.push((e.u, e.v));
            } else if r && !l {
                kept.push((e.v, e.u));
            }
        }
        kept
    }

    /// Chain boundary edges into rings.
    fn link(&self, kept: &[(usize, usize)], eps: f64) -> Vec<Vec<PointF>> {
        let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, &(from, _)) in kept.iter().enumerate() {
            outgoing.entry(from).or_default().push(i);
        }
        let mut used = vec![false; kept.len()];
        let mut contours = Vec::new();

        for start in 0..kept.len() {
            if used[start] {
                continue;
            }
            used[start] = true;
            let origin = kept[start].0;
            let mut ring = vec![self.points[origin]];
            let mut cur = start;
            loop {
                let (from, to) = kept[cur];
                let back = self.points[from];
                let here = self.points[to];
                let back_angle = (back.y - here.y).atan2(back.x - here.x);

                let mut best: Option<(usize, f64)> = None;
                if let Some(cands) = outgoing.get(&to) {
                    for &c in cands {
                        if used[c] && c != start {
                            continue;
                        }
                        let next = self.points[kept[c].1];
                        let angle = (next.y - here.y).atan2(next.x - here.x);
                        let mut turn = (back_angle - angle).rem_euclid(2.0 * PI);
                        if turn <= 1e-12 {
                            turn = 2.0 * PI;
                        }
                        if best.map_or(true, |(_, t)| turn < t) {
                            best = Some((c, turn));
                        }
                    }
                }
                match best {
                    Some((next, _)) if next != start => {
                        ring.push(here);
                        used[next] = true;
                        cur = next;
                    }
                    _ => break,
                }
            }
            let ring = simplify(ring, eps);
            if ring.len() >= 3 && calc_polygon_area(&ring).abs() > eps * eps {
                contours.push(ring);
            }
        }
        contours
    }
}

fn collinear(a: PointF, b: PointF, c: PointF, eps: f64) -> bool {
    let (ux, uy) = (b.x - a.x, b.y - a.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);
    let cross = ux * vy - uy * vx;
    cross.abs() <= eps * a.distance(c) && ux * vx + uy * vy >= 0.0
}

/// Drop vertices in the middle of straight runs.
fn simplify(points: Vec<PointF>, eps: f64) -> Vec<PointF> {
    let mut out: Vec<PointF> = Vec::with_capacity(points.len());
    for p in points {
        while out.len() >= 2 && collinear(out[out.len() - 2], out[out.len() - 1], p, eps) {
            out.pop();
        }
        out.push(p);
    }
    loop {
        let n = out.len();
        if n < 3 {
            break;
        }
        if collinear(out[n - 2], out[n - 1], out[0], eps) {
            out.pop();
        } else if collinear(out[n - 1], out[0], out[1], eps) {
            out.remove(0);
        } else {
            break;
        }
    }
    out
}

// ----------------------------------------------------------------------------
// Band index
// ----------------------------------------------------------------------------

/// Horizontal bands listing the edges whose y-range overlaps them.
struct BandIndex {
    y0: f64,
    band_h: f64,
    bands: Vec<Vec<usize>>,
}

impl BandIndex {
    fn new(points: &[PointF], directed: &[DirectedEdge]) -> Self {
        let (y0, y1) = points
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let wanted = ((directed.len() as f64).sqrt() as usize).clamp(1, 1024);
        let span = y1 - y0;
        let count = if span > 0.0 { wanted } else { 1 };
        let band_h = if span > 0.0 { span / count as f64 } else { 1.0 };
        let mut index = Self {
            y0,
            band_h,
            bands: vec![Vec::new(); count],
        };
        for (i, e) in directed.iter().enumerate() {
            let ya = points[e.from].y;
            let yb = points[e.to].y;
            let lo = index.band(ya.min(yb));
            let hi = index.band(ya.max(yb));
            for band in &mut index.bands[lo..=hi] {
                band.push(i);
            }
        }
        index
    }

    fn band(&self, y: f64) -> usize {
        let b = ((y - self.y0) / self.band_h).floor();
        if b <= 0.0 {
            0
        } else {
            (b as usize).min(self.bands.len() - 1)
        }
    }

    fn query(&self, y: f64) -> &[usize] {
        &self.bands[self.band(y)]
    }
}

// ============================================================================
// Tests
// ============================================================================
