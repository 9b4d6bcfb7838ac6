//! Goal-post detection from goal-colored scan segments.
//!
//! Per frame:
//! - multi-model RANSAC over horizontal segments finds post centre lines,
//! - the most parallel pair of lines becomes two post outlines,
//! - degenerate and overlapping outlines are dropped,
//! - survivors become left/right posts whose base is pushed down using the
//!   vertical segments.
//!
//! An older strategy that pairs left-edge and right-edge lines
//! ([`build_quads_from_lines`]) is kept behind [`GoalStrategy::EdgeLines`].

mod assign;
mod candidates;
mod detector;
mod error;
mod goal_line;
mod io;
mod legacy;
mod params;
mod validation;

pub use assign::{assign_goals, refine_bases, BaseRule, Goal, GoalKind, MAX_GOALS};
pub use candidates::{
    build_candidates, quad_from_goal_line, retain_most_parallel_pair, select_most_parallel_pair,
    PostCandidate,
};
pub use detector::{GoalDetection, GoalDetector};
pub use error::GoalDetectError;
pub use goal_line::GoalLine;
pub use io::{load_frame_json, write_frame_json, GoalDetectConfig, GoalIoError};
pub use legacy::{build_quads_from_lines, closest_untried_line, match_lines, QuadMatch};
pub use params::{GoalDetectorParams, GoalStrategy};
pub use validation::{is_valid_post, remove_invalid_posts, resolve_overlaps, ValidationParams};

pub use fieldvision_core::{ColorSegment, FrameSegments, Quad};
