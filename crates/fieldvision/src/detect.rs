use crate::{goals, lines, ColorSegment, FrameSegments, LsFittedLine};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Build a [`goals::GoalDetector`] and run it on one frame.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
pub fn detect_goals(
    frame: &FrameSegments,
    params: goals::GoalDetectorParams,
) -> Result<Vec<goals::Goal>, goals::GoalDetectError> {
    goals::GoalDetector::new(params)?.detect(frame)
}

/// Merged straight edges through the start and end points of `segments`.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
pub fn detect_lines_from_segments(
    segments: &[ColorSegment],
    params: lines::LineDetectorParams,
) -> Result<Vec<LsFittedLine>, lines::LineDetectError> {
    let points = lines::edge_points_from_segments(segments);
    lines::LineDetector::new(params)?.detect_from_points(&points)
}
