//! Pairing of left-edge and right-edge lines into post outlines.
//!
//! Older strategy: instead of fitting post centre lines, lines are fitted
//! separately to the start and end points of the horizontal segments and each
//! start line is matched with the closest compatible end line.

use crate::GoalDetectError;
use fieldvision_core::{LsFittedLine, Quad};
use log::trace;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Outline built from one start line and one end line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadMatch {
    pub quad: Quad,
    /// Index into the start lines.
    pub start: usize,
    /// Index into the end lines.
    pub end: usize,
}

/// Closest end line to `start` not yet marked in `tried`, by average line
/// distance; marks it tried.
///
/// Ties go to the lower index. Lines at infinite distance are never picked.
pub fn closest_untried_line(
    start: &LsFittedLine,
    end_lines: &[LsFittedLine],
    tried: &mut [bool],
) -> Result<Option<usize>, GoalDetectError> {
    if tried.len() != end_lines.len() {
        return Err(GoalDetectError::InvalidState(format!(
            "tried has {} entries for {} end lines",
            tried.len(),
            end_lines.len()
        )));
    }
    let mut best = None;
    let mut d_best = f32::INFINITY;
    for (i, line) in end_lines.iter().enumerate() {
        if tried[i] {
            continue;
        }
        let d = start.average_distance_between(line);
        if d < d_best {
            best = Some(i);
            d_best = d;
        }
    }
    if let Some(i) = best {
        tried[i] = true;
    }
    Ok(best)
}

/// Pair each start line, in input order, with its closest compatible unused end line.
///
/// `tolerance` in [0, 1] loosens every check: 0 only pairs lines of equal
/// orientation, length and point count; 1 accepts any pair with the start
/// line left of the end line.
pub fn match_lines(
    start_lines: &[LsFittedLine],
    end_lines: &[LsFittedLine],
    tolerance: f32,
) -> Result<Vec<QuadMatch>, GoalDetectError> {
    if !(0.0..=1.0).contains(&tolerance) {
        return Err(GoalDetectError::InvalidArgument(format!(
            "tolerance must be in [0, 1], got {tolerance}"
        )));
    }

    let mut matches = Vec::new();
    let mut used = vec![false; end_lines.len()];
    for (si, start) in start_lines.iter().enumerate() {
        let mut tried = used.clone();
        while let Some(ei) = closest_untried_line(start, end_lines, &mut tried)? {
            if let Some(quad) = check_pair(start, &end_lines[ei], tolerance) {
                trace!("start line {si} paired with end line {ei}");
                used[ei] = true;
                matches.push(QuadMatch {
                    quad,
                    start: si,
                    end: ei,
                });
                break;
            }
        }
    }
    Ok(matches)
}

/// [`match_lines`] keeping only the outlines.
pub fn build_quads_from_lines(
    start_lines: &[LsFittedLine],
    end_lines: &[LsFittedLine],
    tolerance: f32,
) -> Result<Vec<Quad>, GoalDetectError> {
    Ok(match_lines(start_lines, end_lines, tolerance)?
        .into_iter()
        .map(|m| m.quad)
        .collect())
}

fn check_pair(start: &LsFittedLine, end: &LsFittedLine, tolerance: f32) -> Option<Quad> {
    let (Some(sp), Some(ep), Some(sm), Some(em)) = (
        start.end_points(),
        end.end_points(),
        start.midpoint(),
        end.midpoint(),
    ) else {
        trace!("invalid line in pair");
        return None;
    };

    let angle = start.angle_between(end);
    let max_angle = tolerance * FRAC_PI_2;
    if angle > max_angle {
        trace!("angle fail: {angle:.4} > {max_angle:.4}");
        return None;
    }
    let (l1, l2) = (start.length(), end.length());
    if similarity(l1, l2) < 1.0 - tolerance {
        trace!("length fail: {l1:.2} {l2:.2}");
        return None;
    }
    let (n1, n2) = (start.num_points() as f32, end.num_points() as f32);
    if similarity(n1, n2) < 1.0 - tolerance {
        trace!("num points fail: {n1} {n2}");
        return None;
    }
    let (sx, ex) = (sm.x, em.x);
    if sx >= ex {
        trace!("line ordering fail: {sx:.2} {ex:.2}");
        return None;
    }

    let (s_top, s_bottom) = top_first(sp);
    let (e_top, e_bottom) = top_first(ep);
    Some(Quad::new(s_top, e_top, e_bottom, s_bottom))
}

fn top_first([a, b]: [Point2<f32>; 2]) -> (Point2<f32>, Point2<f32>) {
    if a.y <= b.y {
        (a, b)
    } else {
        (b, a)
    }
}

/// min/max ratio of two non-negative magnitudes; equal zeros are identical.
fn similarity(a: f32, b: f32) -> f32 {
    let hi = a.max(b);
    if hi <= 0.0 {
        1.0
    } else {
        a.min(b) / hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn vertical(x: f32, y0: f32, y1: f32, n: usize) -> LsFittedLine {
        let step = (y1 - y0) / (n - 1) as f32;
        LsFittedLine::from_points((0..n).map(|i| Point2::new(x, y0 + step * i as f32)))
    }

    fn leaning(x: f32, y0: f32, y1: f32, n: usize, slope: f32) -> LsFittedLine {
        let step = (y1 - y0) / (n - 1) as f32;
        LsFittedLine::from_points((0..n).map(|i| {
            let y = y0 + step * i as f32;
            Point2::new(x + slope * (y - y0), y)
        }))
    }

    #[test]
    fn full_tolerance_accepts_compatible_pair() {
        let starts = [vertical(100.0, 20.0, 120.0, 21)];
        let ends = [leaning(110.0, 30.0, 100.0, 9, 0.1)];
        let quads = build_quads_from_lines(&starts, &ends, 1.0).unwrap();
        assert_eq!(quads.len(), 1);
        let q = quads[0];
        assert!(q.signed_area() > 0.0);
        assert!(q.top_left().y < q.bottom_left().y);
        assert!(q.top_left().x < q.top_right().x);
    }

    #[test]
    fn zero_tolerance_only_pairs_translated_duplicates() {
        let starts = [vertical(100.0, 20.0, 120.0, 21)];
        let same = [vertical(108.0, 20.0, 120.0, 21)];
        let shorter = [vertical(108.0, 20.0, 110.0, 21)];
        let fewer = [vertical(108.0, 20.0, 120.0, 20)];
        let tilted = [leaning(108.0, 20.0, 120.0, 21, 0.05)];

        let m = match_lines(&starts, &same, 0.0).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!((m[0].start, m[0].end), (0, 0));
        let expected = [(100.0, 20.0), (108.0, 20.0), (108.0, 120.0), (100.0, 120.0)];
        for (c, (x, y)) in m[0].quad.corners().iter().zip(expected) {
            assert_abs_diff_eq!(c.x, x, epsilon = 1e-3);
            assert_abs_diff_eq!(c.y, y, epsilon = 1e-3);
        }

        for ends in [&shorter, &fewer, &tilted] {
            assert!(build_quads_from_lines(&starts, ends, 0.0).unwrap().is_empty());
        }
    }

    #[test]
    fn start_must_be_left_of_end() {
        let starts = [vertical(200.0, 20.0, 120.0, 21)];
        let ends = [vertical(100.0, 20.0, 120.0, 21)];
        assert!(build_quads_from_lines(&starts, &ends, 1.0).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_tolerance_is_rejected() {
        let starts = [vertical(100.0, 20.0, 120.0, 21)];
        for t in [1.5, -0.1, f32::NAN] {
            assert!(matches!(
                build_quads_from_lines(&starts, &starts, t),
                Err(GoalDetectError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn mismatched_tried_is_invalid_state() {
        let start = vertical(100.0, 20.0, 120.0, 21);
        let ends = [vertical(110.0, 20.0, 120.0, 21)];
        let mut tried = vec![false; 2];
        assert!(matches!(
            closest_untried_line(&start, &ends, &mut tried),
            Err(GoalDetectError::InvalidState(_))
        ));
    }

    #[test]
    fn closest_untried_walks_by_distance() {
        let start = vertical(100.0, 20.0, 120.0, 21);
        let ends = [
            vertical(140.0, 20.0, 120.0, 21),
            vertical(108.0, 20.0, 120.0, 21),
            vertical(120.0, 20.0, 120.0, 21),
        ];
        let mut tried = vec![false; 3];
        let order: Vec<usize> = std::iter::from_fn(|| {
            closest_untried_line(&start, &ends, &mut tried).unwrap()
        })
        .collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!(tried.iter().all(|&t| t));
    }

    #[test]
    fn each_end_line_is_used_once() {
        let starts = [
            vertical(100.0, 20.0, 120.0, 21),
            vertical(101.0, 20.0, 120.0, 21),
        ];
        let ends = [vertical(110.0, 20.0, 120.0, 21)];
        let m = match_lines(&starts, &ends, 0.5).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].start, 0);
    }
}
