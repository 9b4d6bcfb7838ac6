use crate::{
    assign_goals, build_candidates, match_lines, refine_bases, remove_invalid_posts,
    resolve_overlaps, retain_most_parallel_pair, Goal, GoalDetectError, GoalDetectorParams,
    GoalLine, GoalStrategy, PostCandidate,
};
use fieldvision_core::{find_multiple_models, ColorSegment, FrameSegments, LsFittedLine, RansacFit};
use fieldvision_lines::LineDetector;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Intermediate results of one frame, for debug dumps.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GoalDetection {
    /// Post centre lines kept for outline building ([`GoalStrategy::CentreLines`]).
    pub goal_lines: Vec<GoalLine>,
    /// Lines through segment start points ([`GoalStrategy::EdgeLines`]).
    pub start_lines: Vec<LsFittedLine>,
    /// Lines through segment end points ([`GoalStrategy::EdgeLines`]).
    pub end_lines: Vec<LsFittedLine>,
    /// Outlines before validation.
    pub candidates: Vec<PostCandidate>,
    /// Outlines that passed validation and overlap resolution.
    pub accepted: Vec<PostCandidate>,
    pub goals: Vec<Goal>,
}

/// Per-frame goal post detector.
///
/// Holds validated configuration only; every call works on the segments it is
/// given and keeps nothing between frames.
#[derive(Clone, Debug)]
pub struct GoalDetector {
    params: GoalDetectorParams,
    edge_detector: LineDetector,
}

impl GoalDetector {
    pub fn new(params: GoalDetectorParams) -> Result<Self, GoalDetectError> {
        params.validate()?;
        let edge_detector = LineDetector::new(params.edge_lines.clone())?;
        Ok(Self {
            params,
            edge_detector,
        })
    }

    #[inline]
    pub fn params(&self) -> &GoalDetectorParams {
        &self.params
    }

    /// Goal posts visible in the frame, left to right. At most two.
    pub fn detect(&self, frame: &FrameSegments) -> Result<Vec<Goal>, GoalDetectError> {
        Ok(self.detect_with_diagnostics(frame)?.goals)
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip_all,
            fields(horizontal = frame.horizontal.len(), vertical = frame.vertical.len())
        )
    )]
    pub fn detect_with_diagnostics(
        &self,
        frame: &FrameSegments,
    ) -> Result<GoalDetection, GoalDetectError> {
        let mut out = GoalDetection::default();
        if frame.horizontal.is_empty() {
            debug!("no horizontal segments");
            return Ok(out);
        }

        match self.params.strategy {
            GoalStrategy::CentreLines => {
                out.goal_lines = self.goal_lines(&frame.horizontal)?;
                out.candidates = build_candidates(&out.goal_lines);
            }
            GoalStrategy::EdgeLines => {
                let (start_lines, end_lines) = self.edge_lines(&frame.horizontal)?;
                out.candidates = match_lines(
                    &start_lines,
                    &end_lines,
                    self.params.matching_tolerance,
                )?
                .into_iter()
                .map(|m| PostCandidate {
                    quad: m.quad,
                    support: start_lines[m.start].num_points() + end_lines[m.end].num_points(),
                })
                .collect();
                out.start_lines = start_lines;
                out.end_lines = end_lines;
            }
        }
        debug!("{} post candidates", out.candidates.len());

        let mut accepted = out.candidates.clone();
        remove_invalid_posts(&mut accepted, &self.params.validation);
        resolve_overlaps(&mut accepted, self.params.validation.max_overlap);
        debug!("{} post candidates accepted", accepted.len());

        let mut goals = assign_goals(&accepted);
        refine_bases(
            &mut goals,
            &frame.vertical,
            self.params.base_column_margin_px,
            self.params.base_rule,
        );
        debug!("{} goals", goals.len());

        out.accepted = accepted;
        out.goals = goals;
        Ok(out)
    }

    /// RANSAC goal lines, refitted on their inliers, reduced to the most parallel pair.
    fn goal_lines(&self, horizontal: &[ColorSegment]) -> Result<Vec<GoalLine>, GoalDetectError> {
        let fits: Vec<RansacFit<GoalLine, ColorSegment>> =
            find_multiple_models(horizontal, &self.params.ransac)?;
        let lines: Vec<GoalLine> = fits
            .into_iter()
            .filter_map(|fit| GoalLine::fit(&fit.inliers))
            .collect();
        debug!(
            "{} horizontal segments -> {} goal lines",
            horizontal.len(),
            lines.len()
        );
        Ok(retain_most_parallel_pair(lines))
    }

    fn edge_lines(
        &self,
        horizontal: &[ColorSegment],
    ) -> Result<(Vec<LsFittedLine>, Vec<LsFittedLine>), GoalDetectError> {
        let starts: Vec<Point2<f32>> = horizontal.iter().map(|s| s.start).collect();
        let ends: Vec<Point2<f32>> = horizontal.iter().map(|s| s.end).collect();
        let fit = |points: &[Point2<f32>]| {
            if self.params.merge_edge_lines {
                self.edge_detector.detect_from_points(points)
            } else {
                self.edge_detector.fit_lines(points)
            }
        };
        let start_lines = fit(&starts[..])?;
        let end_lines = fit(&ends[..])?;
        debug!(
            "{} start lines, {} end lines",
            start_lines.len(),
            end_lines.len()
        );
        Ok((start_lines, end_lines))
    }
}
