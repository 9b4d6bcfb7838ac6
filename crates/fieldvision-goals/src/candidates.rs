use crate::GoalLine;
use fieldvision_core::{Quad, VectorExt};
use log::warn;
use serde::{Deserialize, Serialize};

/// Post outline hypothesis plus the consensus size backing it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostCandidate {
    pub quad: Quad,
    /// Inlier count of the model that produced the outline.
    pub support: usize,
}

/// Indices `(i, k)`, `i < k`, of the two lines with the smallest angle between them.
///
/// Ties keep the first pair in iteration order. `None` for fewer than two lines.
pub fn select_most_parallel_pair(lines: &[GoalLine]) -> Option<(usize, usize)> {
    let mut best: Option<((usize, usize), f32)> = None;
    for i in 0..lines.len() {
        for k in (i + 1)..lines.len() {
            let a = lines[i].angle_between(&lines[k]);
            if best.is_none_or(|(_, min)| a < min) {
                best = Some(((i, k), a));
            }
        }
    }
    best.map(|(pair, _)| pair)
}

/// Keep only the most parallel pair when more than two lines were found.
///
/// Two posts of one goal project to near-parallel lines; a third line is
/// clutter. Up to two lines are returned unchanged.
pub fn retain_most_parallel_pair(mut lines: Vec<GoalLine>) -> Vec<GoalLine> {
    if lines.len() <= 2 {
        return lines;
    }
    let Some((i, k)) = select_most_parallel_pair(&lines) else {
        return lines;
    };
    // k > i, so removing k first keeps i in place
    let second = lines.swap_remove(k);
    let first = lines.swap_remove(i);
    vec![first, second]
}

/// Outline of a post around its centre line.
///
/// [`GoalLine::width`] is the full post thickness, so the corners sit half
/// of it to either side of the line.
///
/// The end points are ordered top (smaller y) first, so the corner order is
/// `[top_left, top_right, bottom_right, bottom_left]` whichever way the line
/// was fitted.
pub fn quad_from_goal_line(line: &GoalLine) -> Option<Quad> {
    let [p0, p1] = line.end_points();
    let (top, bottom) = if p0.y <= p1.y { (p0, p1) } else { (p1, p0) };
    // half-thickness, pointing right of the downward direction
    let w = (bottom - top).with_length(0.5 * line.width())?.perpendicular();
    Some(Quad::new(top - w, top + w, bottom + w, bottom - w))
}

/// One candidate per line, in line order.
pub fn build_candidates(lines: &[GoalLine]) -> Vec<PostCandidate> {
    lines
        .iter()
        .filter_map(|line| match quad_from_goal_line(line) {
            Some(quad) => Some(PostCandidate {
                quad,
                support: line.support(),
            }),
            None => {
                warn!("goal line of zero length skipped");
                None
            }
        })
        .collect()
}
