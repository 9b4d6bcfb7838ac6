use crate::PostCandidate;
use fieldvision_core::{ColorSegment, Quad};
use log::{debug, trace};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Posts reported per frame.
pub const MAX_GOALS: usize = 2;

/// Which post of the goal, seen from the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Left,
    Right,
    /// A lone post whose side cannot be told.
    Unknown,
}

/// Detected goal post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub kind: GoalKind,
    pub quad: Quad,
    /// Bottom centre of the outline.
    pub location: Point2<f32>,
    /// Ground contact estimate; starts at `location` and only moves down.
    pub base: Point2<f32>,
    pub support: usize,
}

/// Turn surviving outlines into goals, left to right.
///
/// With more than [`MAX_GOALS`] outlines the best supported ones are kept
/// (earlier wins ties).
pub fn assign_goals(candidates: &[PostCandidate]) -> Vec<Goal> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    // stable sort keeps input order among equal support
    order.sort_by(|&a, &b| candidates[b].support.cmp(&candidates[a].support));
    order.truncate(MAX_GOALS);
    if candidates.len() > MAX_GOALS {
        debug!(
            "{} post outlines, keeping the {MAX_GOALS} best supported",
            candidates.len()
        );
    }

    let mut goals: Vec<Goal> = order
        .into_iter()
        .map(|i| {
            let c = &candidates[i];
            let location = c.quad.bottom_centre();
            Goal {
                kind: GoalKind::Unknown,
                quad: c.quad,
                location,
                base: location,
                support: c.support,
            }
        })
        .collect();
    goals.sort_by(|a, b| a.location.x.total_cmp(&b.location.x));

    if let [left, right] = goals.as_mut_slice() {
        left.kind = GoalKind::Left;
        right.kind = GoalKind::Right;
    }
    goals
}

/// How vertical segments below a goal update its base point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseRule {
    /// Every segment ending below the location overwrites the base; the last
    /// one in scan order wins.
    #[default]
    LastBelowLocation,
    /// The base moves to a segment end only if it lies below the current
    /// base, so the lowest end wins.
    Lowest,
}

/// Move each goal's base to vertical segment ends below its location.
///
/// With `column_margin` set, only segments ending within the outline's
/// x-range widened by that margin are considered. The base never rises
/// above the location.
pub fn refine_bases(
    goals: &mut [Goal],
    vertical: &[ColorSegment],
    column_margin: Option<f32>,
    rule: BaseRule,
) {
    for goal in goals.iter_mut() {
        let (lo, hi) = goal.quad.x_span();
        for seg in vertical {
            if let Some(margin) = column_margin {
                if seg.end.x < lo - margin || seg.end.x > hi + margin {
                    continue;
                }
            }
            let reference = match rule {
                BaseRule::LastBelowLocation => goal.location.y,
                BaseRule::Lowest => goal.base.y,
            };
            if seg.end.y > reference {
                goal.base = seg.end;
            }
        }
        trace!(
            "goal {:?}: location ({:.1}, {:.1}) base ({:.1}, {:.1})",
            goal.kind,
            goal.location.x,
            goal.location.y,
            goal.base.x,
            goal.base.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(x: f32, support: usize) -> PostCandidate {
        PostCandidate {
            quad: Quad::new(
                Point2::new(x - 3.0, 20.0),
                Point2::new(x + 3.0, 20.0),
                Point2::new(x + 3.0, 100.0),
                Point2::new(x - 3.0, 100.0),
            ),
            support,
        }
    }

    #[test]
    fn two_posts_are_left_and_right() {
        let goals = assign_goals(&[post(300.0, 10), post(80.0, 12)]);
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].kind, GoalKind::Left);
        assert_eq!(goals[0].location, Point2::new(80.0, 100.0));
        assert_eq!(goals[1].kind, GoalKind::Right);
        assert_eq!(goals[1].base, goals[1].location);
    }

    #[test]
    fn single_post_is_unknown() {
        let goals = assign_goals(&[post(120.0, 10)]);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].kind, GoalKind::Unknown);
        assert!(assign_goals(&[]).is_empty());
    }

    #[test]
    fn keeps_best_supported_when_crowded() {
        let goals = assign_goals(&[post(50.0, 5), post(150.0, 20), post(250.0, 15)]);
        let xs: Vec<f32> = goals.iter().map(|g| g.location.x).collect();
        assert_eq!(xs, vec![150.0, 250.0]);
    }

    #[test]
    fn last_segment_below_location_wins() {
        let mut goals = assign_goals(&[post(80.0, 10)]);
        let vertical = [
            ColorSegment::new(Point2::new(80.0, 60.0), Point2::new(80.0, 130.0)),
            ColorSegment::new(Point2::new(80.0, 60.0), Point2::new(80.0, 110.0)),
            // ends above the location: ignored
            ColorSegment::new(Point2::new(80.0, 40.0), Point2::new(80.0, 90.0)),
        ];
        refine_bases(&mut goals, &vertical, None, BaseRule::LastBelowLocation);
        assert_eq!(goals[0].base, Point2::new(80.0, 110.0));
        assert_eq!(goals[0].location, Point2::new(80.0, 100.0));

        // nothing below: base stays at the location
        let mut goals = assign_goals(&[post(80.0, 10)]);
        refine_bases(&mut goals, &vertical[2..], None, BaseRule::default());
        assert_eq!(goals[0].base, goals[0].location);
    }

    #[test]
    fn lowest_rule_only_moves_down() {
        let mut goals = assign_goals(&[post(80.0, 10)]);
        let vertical = [
            ColorSegment::new(Point2::new(80.0, 40.0), Point2::new(80.0, 90.0)),
            ColorSegment::new(Point2::new(81.0, 60.0), Point2::new(81.0, 130.0)),
            ColorSegment::new(Point2::new(79.0, 60.0), Point2::new(79.0, 110.0)),
        ];
        refine_bases(&mut goals, &vertical, None, BaseRule::Lowest);
        assert_eq!(goals[0].base, Point2::new(81.0, 130.0));
    }

    #[test]
    fn column_margin_ignores_far_segments() {
        let vertical = [ColorSegment::new(
            Point2::new(300.0, 60.0),
            Point2::new(300.0, 150.0),
        )];
        let mut goals = assign_goals(&[post(80.0, 10)]);
        refine_bases(&mut goals, &vertical, Some(10.0), BaseRule::default());
        assert_eq!(goals[0].base, goals[0].location);
        refine_bases(&mut goals, &vertical, None, BaseRule::default());
        assert_eq!(goals[0].base, Point2::new(300.0, 150.0));
    }
}
