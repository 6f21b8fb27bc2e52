//! Vertex sequences with segment lengths.
//!
//! Stroke and dash expansion both walk a flattened figure segment by
//! segment and need each segment's length. `VertexSequence` stores the
//! vertices with their distance to the next vertex and drops coincident
//! points as they arrive, so no zero-length segment ever reaches the join
//! math.

use crate::geometry::PointF;
use crate::math::{calc_distance, VERTEX_DIST_EPSILON};

// ============================================================================
// VertexDist
// ============================================================================

/// A vertex with coordinates and the distance to the next vertex.
#[derive(Debug, Clone, Copy)]
pub struct VertexDist {
    pub x: f64,
    pub y: f64,
    pub dist: f64,
}

impl VertexDist {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, dist: 0.0 }
    }

    pub fn point(&self) -> PointF {
        PointF::new(self.x, self.y)
    }

    /// Calculate distance to `val` and store it. Returns `true` if the
    /// points are not coincident. Coincident points get a huge distance so
    /// any accidental division stays finite.
    pub fn calc_dist(&mut self, val: &VertexDist) -> bool {
        self.dist = calc_distance(self.x, self.y, val.x, val.y);
        let ret = self.dist > VERTEX_DIST_EPSILON;
        if !ret {
            self.dist = 1.0 / VERTEX_DIST_EPSILON;
        }
        ret
    }
}

impl From<PointF> for VertexDist {
    fn from(p: PointF) -> Self {
        VertexDist::new(p.x, p.y)
    }
}

// ============================================================================
// VertexSequence
// ============================================================================

/// A sequence of vertices that filters coincident points.
///
/// When a vertex is added, the previous pair is checked and the later of two
/// coincident vertices is dropped. `close` finishes the sequence: it runs
/// the final check, fills in every `dist`, and for closed figures removes a
/// trailing vertex that repeats the first.
#[derive(Debug, Clone, Default)]
pub struct VertexSequence {
    vertices: Vec<VertexDist>,
}

impl VertexSequence {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    pub fn from_points(points: &[PointF], closed: bool) -> Self {
        let mut seq = Self::new();
        for p in points {
            seq.add(VertexDist::from(*p));
        }
        seq.close(closed);
        seq
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Add a vertex, removing the previous vertex if it coincides with the
    /// one before it.
    pub fn add(&mut self, val: VertexDist) {
        if self.vertices.len() > 1 {
            let len = self.vertices.len();
            let last = self.vertices[len - 1];
            let keep = self.vertices[len - 2].calc_dist(&last);
            if !keep {
                self.vertices.pop();
            }
        }
        self.vertices.push(val);
    }

    /// Replace the last vertex.
    pub fn modify_last(&mut self, val: VertexDist) {
        self.vertices.pop();
        self.add(val);
    }

    /// Finish the sequence. Every vertex gets its distance to the next one;
    /// for closed sequences the last vertex measures to the first.
    pub fn close(&mut self, closed: bool) {
        while self.vertices.len() > 1 {
            let len = self.vertices.len();
            let last = self.vertices[len - 1];
            if self.vertices[len - 2].calc_dist(&last) {
                break;
            }
            let t = self.vertices[len - 1];
            self.vertices.pop();
            self.modify_last(t);
        }

        if closed {
            while self.vertices.len() > 1 {
                let len = self.vertices.len();
                let first = self.vertices[0];
                if self.vertices[len - 1].calc_dist(&first) {
                    break;
                }
                self.vertices.pop();
            }
        }

        // `add` leaves earlier distances stale after a pop.
        let n = self.vertices.len();
        for i in 0..n.saturating_sub(1) {
            let next = self.vertices[i + 1];
            self.vertices[i].calc_dist(&next);
        }
        if n > 1 {
            if closed {
                let first = self.vertices[0];
                self.vertices[n - 1].calc_dist(&first);
            } else {
                self.vertices[n - 1].dist = 0.0;
            }
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn as_slice(&self) -> &[VertexDist] {
        &self.vertices
    }

    /// Vertex before `idx`, wrapping around.
    pub fn prev(&self, idx: usize) -> &VertexDist {
        let n = self.vertices.len();
        &self.vertices[(idx + n - 1) % n]
    }

    pub fn curr(&self, idx: usize) -> &VertexDist {
        &self.vertices[idx]
    }

    /// Vertex after `idx`, wrapping around.
    pub fn next(&self, idx: usize) -> &VertexDist {
        &self.vertices[(idx + 1) % self.vertices.len()]
    }

    /// Sum of segment lengths; includes the closing segment when `closed`.
    pub fn total_length(&self, closed: bool) -> f64 {
        let n = self.vertices.len();
        if n < 2 {
            return 0.0;
        }
        let open: f64 = self.vertices[..n - 1].iter().map(|v| v.dist).sum();
        if closed {
            open + self.vertices[n - 1].dist
        } else {
            open
        }
    }
}

impl core::ops::Index<usize> for VertexSequence {
    type Output = VertexDist;

    fn index(&self, i: usize) -> &VertexDist {
        &self.vertices[i]
    }
}

// ============================================================================
// Tests
// ============================================================================
