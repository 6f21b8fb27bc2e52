//! Regions: areas built from rectangles and paths with boolean algebra.
//!
//! A [`Region`] records its construction as a tree of leaves (empty,
//! infinite, rectangle, path, polygon set) joined by [`CombineMode`]s and
//! evaluates it through the boolean engine the first time a query needs
//! geometry. The evaluated polygon set is cached until the region changes.
//!
//! The infinite region is the rectangle [`INFINITE_RECT`]; boolean
//! operations treat it as that finite rectangle, except that intersecting
//! with it returns the other operand unchanged and uniting with it gives
//! the infinite region.

use std::cell::OnceCell;

use tracing::debug;

use crate::boolean::{combine_pair, BoolOp, PolygonSet};
use crate::config::DEFAULT_FLATNESS;
use crate::error::{ensure_finite, Error, Result};
use crate::geometry::{PointF, RectangleF};
use crate::math::calc_polygon_area;
use crate::matrix::Matrix;
use crate::path::Path;

/// Bounds of the infinite region.
pub const INFINITE_RECT: RectangleF = RectangleF::new(-4194304.0, -4194304.0, 8388608.0, 8388608.0);

/// Relative area below which an exclusive-or counts as empty in
/// [`Region::equals`].
const EQUALS_TOLERANCE: f64 = 1e-9;

// ============================================================================
// CombineMode / RegionOperand
// ============================================================================

/// How an operand is merged into a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineMode {
    /// The operand replaces the region.
    #[default]
    Replace,
    Intersect,
    Union,
    Xor,
    /// Region minus operand.
    Exclude,
    /// Operand minus region.
    Complement,
}

/// Anything a region can be combined with.
#[derive(Debug, Clone)]
pub enum RegionOperand {
    Rect(RectangleF),
    Path(Path),
    Region(Region),
}

impl From<RectangleF> for RegionOperand {
    fn from(r: RectangleF) -> Self {
        RegionOperand::Rect(r)
    }
}

impl From<Path> for RegionOperand {
    fn from(p: Path) -> Self {
        RegionOperand::Path(p)
    }
}

impl From<&Path> for RegionOperand {
    fn from(p: &Path) -> Self {
        RegionOperand::Path(p.clone())
    }
}

impl From<Region> for RegionOperand {
    fn from(r: Region) -> Self {
        RegionOperand::Region(r)
    }
}

impl From<&Region> for RegionOperand {
    fn from(r: &Region) -> Self {
        RegionOperand::Region(r.clone())
    }
}

// ============================================================================
// Construction tree
// ============================================================================

#[derive(Debug, Clone)]
enum RegionNode {
    Empty,
    Infinite,
    Rect(RectangleF),
    Path(Box<Path>),
    Polygons(PolygonSet),
    Combine {
        mode: CombineMode,
        left: Box<RegionNode>,
        right: Box<RegionNode>,
    },
}

impl RegionNode {
    fn evaluate(&self, flatness: f64) -> PolygonSet {
        match self {
            RegionNode::Empty => PolygonSet::empty(),
            RegionNode::Infinite => PolygonSet::from_rect(&INFINITE_RECT),
            RegionNode::Rect(r) => PolygonSet::from_rect(r),
            RegionNode::Path(p) => {
                PolygonSet::from_polylines(&p.polylines(flatness)).normalized(p.fill_mode())
            }
            RegionNode::Polygons(s) => s.clone(),
            RegionNode::Combine { mode, left, right } => {
                let infinite_left = matches!(**left, RegionNode::Infinite);
                let infinite_right = matches!(**right, RegionNode::Infinite);
                let op = match mode {
                    CombineMode::Replace => return right.evaluate(flatness),
                    CombineMode::Intersect if infinite_left => return right.evaluate(flatness),
                    CombineMode::Intersect if infinite_right => return left.evaluate(flatness),
                    CombineMode::Union if infinite_left || infinite_right => {
                        return PolygonSet::from_rect(&INFINITE_RECT)
                    }
                    CombineMode::Exclude if infinite_right => return PolygonSet::empty(),
                    CombineMode::Complement if infinite_left => return PolygonSet::empty(),
                    CombineMode::Intersect => BoolOp::And,
                    CombineMode::Union => BoolOp::Or,
                    CombineMode::Xor => BoolOp::Xor,
                    CombineMode::Exclude => BoolOp::AMinusB,
                    CombineMode::Complement => BoolOp::BMinusA,
                };
                combine_pair(&left.evaluate(flatness), &right.evaluate(flatness), op)
            }
        }
    }

    fn translated(self, dx: f64, dy: f64) -> RegionNode {
        match self {
            RegionNode::Rect(mut r) => {
                r.offset(dx, dy);
                RegionNode::Rect(r)
            }
            RegionNode::Path(p) => {
                RegionNode::Path(Box::new(p.transform(&Matrix::translation(dx, dy))))
            }
            RegionNode::Polygons(mut s) => {
                s.translate(dx, dy);
                RegionNode::Polygons(s)
            }
            RegionNode::Combine { mode, left, right } => RegionNode::Combine {
                mode,
                left: Box::new(left.translated(dx, dy)),
                right: Box::new(right.translated(dx, dy)),
            },
            other => other,
        }
    }

    fn transformed(self, m: &Matrix) -> RegionNode {
        match self {
            RegionNode::Rect(r) if m.m12 == 0.0 && m.m21 == 0.0 => {
                let p1 = m.transform_point(PointF::new(r.left(), r.top()));
                let p2 = m.transform_point(PointF::new(r.right(), r.bottom()));
                RegionNode::Rect(RectangleF::from_ltrb(
                    p1.x.min(p2.x),
                    p1.y.min(p2.y),
                    p1.x.max(p2.x),
                    p1.y.max(p2.y),
                ))
            }
            RegionNode::Rect(r) => RegionNode::Polygons(PolygonSet::from_rect(&r).transformed(m)),
            RegionNode::Path(p) => RegionNode::Path(Box::new(p.transform(m))),
            RegionNode::Polygons(s) => RegionNode::Polygons(s.transformed(m)),
            RegionNode::Combine { mode, left, right } => RegionNode::Combine {
                mode,
                left: Box::new(left.transformed(m)),
                right: Box::new(right.transformed(m)),
            },
            other => other,
        }
    }
}

// ============================================================================
// Region
// ============================================================================

/// An area of the plane.
#[derive(Debug, Clone)]
pub struct Region {
    node: RegionNode,
    flatness: f64,
    cache: OnceCell<PolygonSet>,
}

impl Default for Region {
    fn default() -> Self {
        Self::new()
    }
}

impl Region {
    /// The infinite region.
    pub fn new() -> Self {
        Self::with_node(RegionNode::Infinite)
    }

    pub fn empty() -> Self {
        Self::with_node(RegionNode::Empty)
    }

    /// Region covering `rect`; empty when the rectangle has no area.
    pub fn from_rect(rect: RectangleF) -> Result<Self> {
        check_rect(&rect)?;
        Ok(Self::with_node(RegionNode::Rect(rect)))
    }

    /// Interior of `path` under its fill mode. Open figures count as closed.
    pub fn from_path(path: &Path) -> Self {
        Self {
            flatness: path.flatness(),
            ..Self::with_node(RegionNode::Path(Box::new(path.clone())))
        }
    }

    /// Region over an already normalized polygon set.
    pub fn from_polygon_set(set: PolygonSet) -> Self {
        Self::with_node(RegionNode::Polygons(set))
    }

    fn with_node(node: RegionNode) -> Self {
        Self {
            node,
            flatness: DEFAULT_FLATNESS,
            cache: OnceCell::new(),
        }
    }

    fn replace_node(&mut self, node: RegionNode) {
        self.node = node;
        self.cache = OnceCell::new();
    }

    pub fn flatness(&self) -> f64 {
        self.flatness
    }

    /// Tolerance for flattening path leaves.
    pub fn set_flatness(&mut self, flatness: f64) -> Result<()> {
        if !(flatness.is_finite() && flatness > 0.0) {
            return Err(Error::invalid(format!(
                "flatness must be positive, got {flatness}"
            )));
        }
        self.flatness = flatness;
        self.cache = OnceCell::new();
        Ok(())
    }

    pub fn make_empty(&mut self) {
        self.replace_node(RegionNode::Empty);
    }

    pub fn make_infinite(&mut self) {
        self.replace_node(RegionNode::Infinite);
    }

    // ------------------------------------------------------------------------
    // Combination
    // ------------------------------------------------------------------------

    /// Merge `operand` into this region with `mode`.
    ///
    /// Path operands are flattened with this region's flatness, not the
    /// path's own; [`from_path`](Self::from_path) seeds the region's
    /// flatness from its path.
    pub fn combine(&mut self, operand: impl Into<RegionOperand>, mode: CombineMode) -> Result<()> {
        let right = match operand.into() {
            RegionOperand::Rect(r) => {
                check_rect(&r)?;
                RegionNode::Rect(r)
            }
            RegionOperand::Path(p) => RegionNode::Path(Box::new(p)),
            RegionOperand::Region(r) => match r.node {
                node @ (RegionNode::Empty | RegionNode::Infinite) => node,
                node => match r.cache.into_inner() {
                    Some(set) => RegionNode::Polygons(set),
                    None => node,
                },
            },
        };
        let left = std::mem::replace(&mut self.node, RegionNode::Empty);
        self.replace_node(RegionNode::Combine {
            mode,
            left: Box::new(left),
            right: Box::new(right),
        });
        Ok(())
    }

    pub fn intersect(&mut self, operand: impl Into<RegionOperand>) -> Result<()> {
        self.combine(operand, CombineMode::Intersect)
    }

    pub fn union(&mut self, operand: impl Into<RegionOperand>) -> Result<()> {
        self.combine(operand, CombineMode::Union)
    }

    pub fn xor(&mut self, operand: impl Into<RegionOperand>) -> Result<()> {
        self.combine(operand, CombineMode::Xor)
    }

    /// This region minus the operand.
    pub fn exclude(&mut self, operand: impl Into<RegionOperand>) -> Result<()> {
        self.combine(operand, CombineMode::Exclude)
    }

    /// The operand minus this region.
    pub fn complement(&mut self, operand: impl Into<RegionOperand>) -> Result<()> {
        self.combine(operand, CombineMode::Complement)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// The evaluated geometry.
    pub fn polygons(&self) -> &PolygonSet {
        self.cache.get_or_init(|| {
            let set = self.node.evaluate(self.flatness);
            debug!(contours = set.contours().len(), "region evaluated");
            set
        })
    }

    /// Outline rings: outer rings positive, holes negative.
    pub fn contours(&self) -> Vec<Vec<PointF>> {
        self.polygons().contours().to_vec()
    }

    pub fn get_bounds(&self) -> RectangleF {
        self.polygons().bounds()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons().is_empty()
    }

    pub fn is_infinite(&self) -> bool {
        if matches!(self.node, RegionNode::Infinite) {
            return true;
        }
        let set = self.polygons();
        set.contours().len() == 1
            && set.bounds() == INFINITE_RECT
            && set.area() == INFINITE_RECT.width * INFINITE_RECT.height
    }

    pub fn area(&self) -> f64 {
        self.polygons().area()
    }

    pub fn is_visible(&self, p: PointF) -> bool {
        self.polygons().contains(p)
    }

    /// True when any part of `rect` lies in the region.
    pub fn is_visible_rect(&self, rect: RectangleF) -> bool {
        let set = self.polygons();
        if rect.is_empty() || !set.bounds().intersects_with(&rect) {
            return false;
        }
        !combine_pair(set, &PolygonSet::from_rect(&rect), BoolOp::And).is_empty()
    }

    /// Same area as `other`, up to rounding slivers.
    pub fn equals(&self, other: &Region) -> bool {
        let a = self.polygons();
        let b = other.polygons();
        let diff = combine_pair(a, b, BoolOp::Xor);
        if diff.is_empty() {
            return true;
        }
        let sliver: f64 = diff
            .contours()
            .iter()
            .map(|c| calc_polygon_area(c).abs())
            .sum();
        sliver <= EQUALS_TOLERANCE * (1.0 + a.area().abs() + b.area().abs())
    }

    /// Pixel rectangles covering the region after transforming it by `m`.
    /// A pixel belongs to the region when its centre does. Rows with equal
    /// spans are merged.
    pub fn get_region_scans(&self, m: &Matrix) -> Vec<RectangleF> {
        if self.is_infinite() {
            return vec![INFINITE_RECT];
        }
        scans(&self.polygons().transformed(m), None)
    }

    /// Like [`get_region_scans`](Self::get_region_scans) but only for pixel
    /// rows that meet `device`. Spans are not clipped horizontally.
    pub(crate) fn get_region_scans_within(&self, m: &Matrix, device: RectangleF) -> Vec<RectangleF> {
        if self.is_infinite() {
            return vec![INFINITE_RECT];
        }
        scans(&self.polygons().transformed(m), Some(device))
    }

    // ------------------------------------------------------------------------
    // Transformation
    // ------------------------------------------------------------------------

    pub fn translate(&mut self, dx: f64, dy: f64) -> Result<()> {
        ensure_finite("region offset", &[dx, dy])?;
        let node = std::mem::replace(&mut self.node, RegionNode::Empty);
        self.replace_node(node.translated(dx, dy));
        Ok(())
    }

    /// Apply `m` to every leaf. The infinite region stays infinite.
    pub fn transform(&mut self, m: &Matrix) {
        let node = std::mem::replace(&mut self.node, RegionNode::Empty);
        self.replace_node(node.transformed(m));
    }
}

fn check_rect(rect: &RectangleF) -> Result<()> {
    ensure_finite("region rectangle", &[rect.x, rect.y, rect.width, rect.height])
}

// ============================================================================
// Scan conversion
// ============================================================================

/// Pixel-centre scan conversion of a normalized set into merged rows of
/// rectangles, limited to the rows of `rows_in` when given.
fn scans(set: &PolygonSet, rows_in: Option<RectangleF>) -> Vec<RectangleF> {
    if set.is_empty() {
        return Vec::new();
    }
    let bounds = set.bounds();
    let mut row_start = (bounds.top() - 0.5).ceil() as i64;
    let mut row_end = (bounds.bottom() - 0.5).ceil() as i64;
    if let Some(device) = rows_in {
        row_start = row_start.max((device.top() - 0.5).ceil() as i64);
        row_end = row_end.min((device.bottom() - 0.5).ceil() as i64);
    }
    if row_start >= row_end {
        return Vec::new();
    }

    let mut edges: Vec<(PointF, PointF)> = Vec::new();
    for ring in set.contours() {
        let n = ring.len();
        for i in 0..n {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            if a.y != b.y {
                edges.push((a, b));
            }
        }
    }
    edges.sort_by(|e, f| e.0.y.min(e.1.y).total_cmp(&f.0.y.min(f.1.y)));

    let mut out = Vec::new();
    let mut next_edge = 0;
    let mut active: Vec<usize> = Vec::new();
    let mut run: Vec<(i64, i64)> = Vec::new();
    let mut run_start = row_start;
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for row in row_start..row_end {
        let yc = row as f64 + 0.5;
        while next_edge < edges.len() && edges[next_edge].0.y.min(edges[next_edge].1.y) <= yc {
            active.push(next_edge);
            next_edge += 1;
        }
        active.retain(|&i| edges[i].0.y.max(edges[i].1.y) > yc);

        crossings.clear();
        for &i in &active {
            let (a, b) = edges[i];
            let (lo, hi, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
            if lo.y <= yc && yc < hi.y {
                let x = lo.x + (yc - lo.y) * (hi.x - lo.x) / (hi.y - lo.y);
                crossings.push((x, dir));
            }
        }
        crossings.sort_by(|p, q| p.0.total_cmp(&q.0));

        let mut spans: Vec<(i64, i64)> = Vec::new();
        let mut winding = 0;
        let mut span_from = 0.0;
        for &(x, dir) in &crossings {
            let before = winding;
            winding += dir;
            if before == 0 && winding != 0 {
                span_from = x;
            } else if before != 0 && winding == 0 {
                let c0 = (span_from - 0.5).ceil() as i64;
                let c1 = (x - 0.5).ceil() as i64;
                if c1 > c0 {
                    match spans.last_mut() {
                        Some(last) if last.1 >= c0 => last.1 = last.1.max(c1),
                        _ => spans.push((c0, c1)),
                    }
                }
            }
        }

        if spans != run {
            flush_run(&run, run_start, row, &mut out);
            run = spans;
            run_start = row;
        }
    }
    flush_run(&run, run_start, row_end, &mut out);
    out
}

fn flush_run(spans: &[(i64, i64)], from: i64, to: i64, out: &mut Vec<RectangleF>) {
    if to <= from {
        return;
    }
    for &(c0, c1) in spans {
        out.push(RectangleF::new(
            c0 as f64,
            from as f64,
            (c1 - c0) as f64,
            (to - from) as f64,
        ));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::FillMode;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> RectangleF {
        RectangleF::new(x, y, w, h)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_infinite_and_empty() {
        let r = Region::new();
        assert!(r.is_infinite());
        assert!(!r.is_empty());
        assert_eq!(r.get_bounds(), INFINITE_RECT);

        let mut r = Region::new();
        r.make_empty();
        assert!(r.is_empty());
        assert!(!r.is_infinite());
        assert_eq!(r.get_bounds(), RectangleF::EMPTY);
        r.make_infinite();
        assert!(r.is_infinite());
    }

    #[test]
    fn test_intersect_with_infinite_is_operand() {
        let mut r = Region::new();
        r.intersect(rect(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert!(r.get_bounds().approx_eq(&rect(1.0, 2.0, 3.0, 4.0), 1e-12));
        assert!(approx(r.area(), 12.0));
    }

    #[test]
    fn test_union_with_infinite_is_infinite() {
        let mut r = Region::from_rect(rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        r.union(Region::new()).unwrap();
        assert!(r.is_infinite());
    }

    #[test]
    fn test_combine_modes() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.0, 1.0, 2.0, 2.0);
        let area = |mode: CombineMode| {
            let mut r = Region::from_rect(a).unwrap();
            r.combine(b, mode).unwrap();
            r.area()
        };
        assert!(approx(area(CombineMode::Replace), 4.0));
        assert!(approx(area(CombineMode::Intersect), 1.0));
        assert!(approx(area(CombineMode::Union), 7.0));
        assert!(approx(area(CombineMode::Xor), 6.0));
        assert!(approx(area(CombineMode::Exclude), 3.0));
        assert!(approx(area(CombineMode::Complement), 3.0));
    }

    #[test]
    fn test_complement_is_operand_minus_region() {
        let mut r = Region::from_rect(rect(0.0, 0.0, 2.0, 2.0)).unwrap();
        r.complement(rect(1.0, 0.0, 2.0, 2.0)).unwrap();
        assert!(r.is_visible(PointF::new(2.5, 1.0)));
        assert!(!r.is_visible(PointF::new(0.5, 1.0)));
        assert!(!r.is_visible(PointF::new(1.5, 1.0)));
    }

    #[test]
    fn test_exclude_infinite_is_empty() {
        let mut r = Region::from_rect(rect(0.0, 0.0, 5.0, 5.0)).unwrap();
        r.exclude(Region::new()).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn test_path_region_uses_fill_mode() {
        let mut path = Path::with_fill_mode(FillMode::Alternate);
        path.add_rectangle(rect(0.0, 0.0, 10.0, 10.0)).unwrap();
        path.add_rectangle(rect(2.0, 2.0, 6.0, 6.0)).unwrap();
        let alternate = Region::from_path(&path);
        assert!(approx(alternate.area(), 64.0));
        assert!(!alternate.is_visible(PointF::new(5.0, 5.0)));

        path.set_fill_mode(FillMode::Winding);
        let winding = Region::from_path(&path);
        assert!(approx(winding.area(), 100.0));
        assert!(winding.is_visible(PointF::new(5.0, 5.0)));
    }

    #[test]
    fn test_is_visible_rect() {
        let r = Region::from_rect(rect(0.0, 0.0, 4.0, 4.0)).unwrap();
        assert!(r.is_visible_rect(rect(3.0, 3.0, 2.0, 2.0)));
        assert!(!r.is_visible_rect(rect(5.0, 5.0, 1.0, 1.0)));
        assert!(!r.is_visible_rect(rect(4.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_equals() {
        let mut a = Region::from_rect(rect(0.0, 0.0, 2.0, 1.0)).unwrap();
        a.union(rect(2.0, 0.0, 2.0, 1.0)).unwrap();
        let b = Region::from_rect(rect(0.0, 0.0, 4.0, 1.0)).unwrap();
        assert!(a.equals(&b));
        let c = Region::from_rect(rect(0.0, 0.0, 4.0, 1.5)).unwrap();
        assert!(!a.equals(&c));
        assert!(Region::empty().equals(&Region::empty()));
    }

    #[test]
    fn test_scans_merge_rows() {
        let mut r = Region::from_rect(rect(0.0, 0.0, 4.0, 2.0)).unwrap();
        r.union(rect(0.0, 2.0, 2.0, 2.0)).unwrap();
        let scans = r.get_region_scans(&Matrix::identity());
        assert_eq!(
            scans,
            vec![rect(0.0, 0.0, 4.0, 2.0), rect(0.0, 2.0, 2.0, 2.0)]
        );

        let moved = r.get_region_scans(&Matrix::translation(10.0, 0.0));
        assert_eq!(moved[0], rect(10.0, 0.0, 4.0, 2.0));
        assert!(Region::empty().get_region_scans(&Matrix::identity()).is_empty());
    }

    #[test]
    fn test_scans_split_around_hole() {
        let mut r = Region::from_rect(rect(0.0, 0.0, 3.0, 3.0)).unwrap();
        r.exclude(rect(1.0, 1.0, 1.0, 1.0)).unwrap();
        let scans = r.get_region_scans(&Matrix::identity());
        assert_eq!(
            scans,
            vec![
                rect(0.0, 0.0, 3.0, 1.0),
                rect(0.0, 1.0, 1.0, 1.0),
                rect(2.0, 1.0, 1.0, 1.0),
                rect(0.0, 2.0, 3.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_translate_and_transform() {
        let mut r = Region::from_rect(rect(0.0, 0.0, 2.0, 1.0)).unwrap();
        r.translate(3.0, 4.0).unwrap();
        assert!(r.get_bounds().approx_eq(&rect(3.0, 4.0, 2.0, 1.0), 1e-12));

        let mut r = Region::from_rect(rect(0.0, 0.0, 2.0, 1.0)).unwrap();
        r.transform(&Matrix::rotation(90.0));
        assert!(approx(r.area(), 2.0));
        assert!(r.get_bounds().approx_eq(&rect(-1.0, 0.0, 1.0, 2.0), 1e-9));

        let mut inf = Region::new();
        inf.transform(&Matrix::scaling(2.0, 2.0));
        assert!(inf.is_infinite());
    }

    #[test]
    fn test_region_operand_uses_cache() {
        let mut a = Region::from_rect(rect(0.0, 0.0, 2.0, 2.0)).unwrap();
        a.union(rect(1.0, 0.0, 2.0, 2.0)).unwrap();
        assert!(approx(a.area(), 6.0));
        let mut b = Region::from_rect(rect(0.0, 0.0, 1.0, 2.0)).unwrap();
        b.complement(&a).unwrap();
        assert!(approx(b.area(), 4.0));
    }

    #[test]
    fn test_queried_infinite_operand_stays_infinite() {
        let inf = Region::new();
        assert!(inf.get_bounds() == INFINITE_RECT);
        let mut r = Region::empty();
        r.union(&inf).unwrap();
        r.translate(100.0, 0.0).unwrap();
        assert!(r.is_infinite());
        r.transform(&Matrix::scaling(0.5, 0.5));
        assert!(r.is_infinite());

        let mut a = Region::from_rect(rect(1.0, 2.0, 3.0, 4.0)).unwrap();
        a.intersect(&inf).unwrap();
        a.translate(1.0, 1.0).unwrap();
        assert!(a.get_bounds().approx_eq(&rect(2.0, 3.0, 3.0, 4.0), 1e-12));

        let empty = Region::empty();
        assert!(empty.is_empty());
        let mut b = Region::from_rect(rect(0.0, 0.0, 2.0, 2.0)).unwrap();
        b.union(&empty).unwrap();
        assert!(approx(b.area(), 4.0));
    }

    #[test]
    fn test_path_operand_uses_region_flatness() {
        let mut circle = Path::new();
        circle.add_ellipse(rect(0.0, 0.0, 100.0, 100.0)).unwrap();
        circle.set_flatness(0.01).unwrap();

        let mut coarse = Region::empty();
        coarse.set_flatness(5.0).unwrap();
        coarse.union(&circle).unwrap();
        let mut fine = Region::empty();
        fine.set_flatness(0.01).unwrap();
        fine.union(&circle).unwrap();
        assert!(coarse.area() < fine.area());

        let seeded = Region::from_path(&circle);
        assert_eq!(seeded.flatness(), 0.01);
        assert!(approx(seeded.area(), fine.area()));
    }

    #[test]
    fn test_rejects_non_finite_rect() {
        assert!(Region::from_rect(rect(f64::NAN, 0.0, 1.0, 1.0)).is_err());
        let mut r = Region::new();
        assert!(r.intersect(rect(0.0, 0.0, f64::INFINITY, 1.0)).is_err());
    }
}
