//! Dash expansion.
//!
//! Cuts a flattened figure into the "on" pieces of a dash pattern. The
//! pattern alternates dash and gap lengths in device units and starts
//! `offset` units into the pattern. Each piece remembers whether its ends
//! coincide with the ends of the source figure, so the stroker can choose
//! between the pen's line caps and its dash cap.

use crate::geometry::PointF;
use crate::vertex_sequence::VertexSequence;

// ============================================================================
// DashPiece
// ============================================================================

/// One "on" stretch of a dashed figure.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPiece {
    pub points: Vec<PointF>,
    /// Starts at the start of an open figure.
    pub at_start: bool,
    /// Ends at the end of an open figure.
    pub at_end: bool,
    /// The dash covers a whole closed figure without a gap.
    pub closed: bool,
}

// ============================================================================
// Dasher
// ============================================================================

/// Dash pattern walker.
#[derive(Debug, Clone)]
pub struct Dasher {
    dashes: Vec<f64>,
    total_dash_len: f64,
    dash_start: f64,
}

impl Dasher {
    /// Pattern in device units. Returns `None` when the pattern has no
    /// length to walk, which strokes as solid.
    pub fn new(dashes: &[f64], offset: f64) -> Option<Self> {
        let mut dashes = dashes.to_vec();
        if dashes.len() % 2 == 1 {
            dashes.extend_from_within(..);
        }
        let total_dash_len: f64 = dashes.iter().sum();
        if dashes.is_empty() || !(total_dash_len.is_finite() && total_dash_len > 0.0) {
            return None;
        }
        let dash_start = if offset.is_finite() {
            offset.rem_euclid(total_dash_len)
        } else {
            0.0
        };
        Some(Self {
            dashes,
            total_dash_len,
            dash_start,
        })
    }

    pub fn total_dash_len(&self) -> f64 {
        self.total_dash_len
    }

    /// Dash index and distance already consumed inside it for a walk that
    /// begins `ds` units into the pattern.
    fn calc_dash_start(&self, mut ds: f64) -> (usize, f64) {
        let mut curr_dash = 0;
        while ds > 0.0 {
            if ds >= self.dashes[curr_dash] {
                ds -= self.dashes[curr_dash];
                curr_dash += 1;
                if curr_dash >= self.dashes.len() {
                    curr_dash = 0;
                }
            } else {
                return (curr_dash, ds);
            }
        }
        (curr_dash, 0.0)
    }

    /// Walk `seq` and return the pieces that fall on dashes. Closed
    /// sequences walk the closing segment too, and a dash running across
    /// the start vertex is joined into one piece.
    pub fn pieces(&self, seq: &VertexSequence, closed: bool) -> Vec<DashPiece> {
        let n = seq.len();
        if n < 2 {
            return Vec::new();
        }
        let seg_count = if closed { n } else { n - 1 };
        let (mut curr_dash, mut curr_dash_start) = self.calc_dash_start(self.dash_start);

        let mut out = Vec::new();
        let mut current: Option<(Vec<PointF>, bool)> = if curr_dash % 2 == 0 {
            Some((vec![seq[0].point()], true))
        } else {
            None
        };

        for i in 0..seg_count {
            let v1 = seq[i];
            let v2 = seq[(i + 1) % n];
            let len = v1.dist;
            let mut pos = 0.0;
            loop {
                let dash_rest = self.dashes[curr_dash] - curr_dash_start;
                let seg_rest = len - pos;
                if seg_rest > dash_rest {
                    pos += dash_rest;
                    let p = v1.point().lerp(v2.point(), pos / len);
                    match current.take() {
                        Some((mut points, at_start)) => {
                            points.push(p);
                            out.push(DashPiece {
                                points,
                                at_start,
                                at_end: false,
                                closed: false,
                            });
                        }
                        None => current = Some((vec![p], false)),
                    }
                    curr_dash += 1;
                    if curr_dash >= self.dashes.len() {
                        curr_dash = 0;
                    }
                    curr_dash_start = 0.0;
                } else {
                    curr_dash_start += seg_rest;
                    if let Some((points, _)) = current.as_mut() {
                        points.push(v2.point());
                    }
                    break;
                }
            }
        }

        if let Some((points, at_start)) = current {
            out.push(DashPiece {
                points,
                at_start,
                at_end: true,
                closed: false,
            });
        }

        if closed {
            Self::join_across_start(&mut out);
        }
        out
    }

    /// Closed figures have no ends: merge a dash that wraps through the
    /// start vertex and clear the end flags.
    fn join_across_start(out: &mut Vec<DashPiece>) {
        let wraps = out.len() >= 2
            && out.first().is_some_and(|p| p.at_start)
            && out.last().is_some_and(|p| p.at_end);
        if wraps {
            if let Some(last) = out.pop() {
                let first = &mut out[0];
                let mut points = last.points;
                points.extend_from_slice(&first.points[1..]);
                first.points = points;
            }
        } else if out.len() == 1 && out[0].at_start && out[0].at_end {
            out[0].closed = true;
            out[0].points.pop();
        }
        for piece in out.iter_mut() {
            piece.at_start = false;
            piece.at_end = false;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(len: f64) -> VertexSequence {
        VertexSequence::from_points(&[PointF::new(0.0, 0.0), PointF::new(len, 0.0)], false)
    }

    fn spans(pieces: &[DashPiece]) -> Vec<(f64, f64)> {
        pieces
            .iter()
            .map(|p| (p.points[0].x, p.points[p.points.len() - 1].x))
            .collect()
    }

    #[test]
    fn test_rejects_zero_length_pattern() {
        assert!(Dasher::new(&[], 0.0).is_none());
        assert!(Dasher::new(&[0.0, 0.0], 0.0).is_none());
        assert!(Dasher::new(&[3.0, 1.0], 0.0).is_some());
    }

    #[test]
    fn test_odd_pattern_is_doubled() {
        let d = Dasher::new(&[2.0], 0.0).unwrap();
        assert_eq!(d.total_dash_len(), 4.0);
        let got = spans(&d.pieces(&line(10.0), false));
        assert_eq!(got, vec![(0.0, 2.0), (4.0, 6.0), (8.0, 10.0)]);
    }

    #[test]
    fn test_simple_dashes() {
        let d = Dasher::new(&[3.0, 1.0], 0.0).unwrap();
        let pieces = d.pieces(&line(10.0), false);
        assert_eq!(spans(&pieces), vec![(0.0, 3.0), (4.0, 7.0), (8.0, 10.0)]);
        assert!(pieces[0].at_start && !pieces[0].at_end);
        assert!(!pieces[1].at_start && !pieces[1].at_end);
        assert!(!pieces[2].at_start && pieces[2].at_end);
    }

    #[test]
    fn test_offset_shifts_pattern() {
        let d = Dasher::new(&[3.0, 1.0], 2.0).unwrap();
        let got = spans(&d.pieces(&line(10.0), false));
        assert_eq!(got, vec![(0.0, 1.0), (2.0, 5.0), (6.0, 9.0)]);

        // Negative offsets wrap into the pattern.
        let d = Dasher::new(&[3.0, 1.0], -1.0).unwrap();
        let got = spans(&d.pieces(&line(6.0), false));
        assert_eq!(got, vec![(1.0, 4.0), (5.0, 6.0)]);
    }

    #[test]
    fn test_dash_follows_corner() {
        let seq = VertexSequence::from_points(
            &[PointF::new(0.0, 0.0), PointF::new(2.0, 0.0), PointF::new(2.0, 5.0)],
            false,
        );
        let d = Dasher::new(&[4.0, 10.0], 0.0).unwrap();
        let pieces = d.pieces(&seq, false);
        assert_eq!(pieces.len(), 1);
        assert_eq!(
            pieces[0].points,
            vec![PointF::new(0.0, 0.0), PointF::new(2.0, 0.0), PointF::new(2.0, 2.0)]
        );
    }

    #[test]
    fn test_zero_length_dash_gives_dot_piece() {
        let d = Dasher::new(&[0.0, 2.0], 0.0).unwrap();
        let pieces = d.pieces(&line(5.0), false);
        assert_eq!(pieces.len(), 3);
        for p in &pieces {
            assert_eq!(p.points.len(), 2);
            assert_eq!(p.points[0], p.points[1]);
        }
    }

    #[test]
    fn test_closed_figure_wraps_through_start() {
        let square = VertexSequence::from_points(
            &[
                PointF::new(0.0, 0.0),
                PointF::new(4.0, 0.0),
                PointF::new(4.0, 4.0),
                PointF::new(0.0, 4.0),
            ],
            true,
        );
        // Perimeter 16: on 0..3, 5..8, 10..13, 15..16 wraps into 0..3.
        let d = Dasher::new(&[3.0, 2.0], 0.0).unwrap();
        let pieces = d.pieces(&square, true);
        assert_eq!(pieces.len(), 3);
        let first = &pieces[0];
        assert_eq!(first.points[0], PointF::new(0.0, 1.0));
        assert_eq!(first.points[1], PointF::new(0.0, 0.0));
        assert_eq!(first.points[2], PointF::new(3.0, 0.0));
        assert!(pieces.iter().all(|p| !p.at_start && !p.at_end && !p.closed));
    }

    #[test]
    fn test_long_dash_covers_closed_figure() {
        let tri = VertexSequence::from_points(
            &[PointF::new(0.0, 0.0), PointF::new(3.0, 0.0), PointF::new(0.0, 4.0)],
            true,
        );
        let d = Dasher::new(&[100.0, 1.0], 0.0).unwrap();
        let pieces = d.pieces(&tri, true);
        assert_eq!(pieces.len(), 1);
        assert!(pieces[0].closed);
        assert_eq!(pieces[0].points.len(), 3);
    }
}
