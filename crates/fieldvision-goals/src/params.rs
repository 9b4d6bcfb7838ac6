use crate::{BaseRule, GoalDetectError, ValidationParams};
use fieldvision_core::RansacParams;
use fieldvision_lines::LineDetectorParams;
use serde::{Deserialize, Serialize};

/// How post outlines are hypothesised from the horizontal segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStrategy {
    /// RANSAC goal lines through segment centres, best parallel pair kept.
    #[default]
    CentreLines,
    /// Separate lines through segment start and end points, paired by
    /// [`crate::build_quads_from_lines`].
    EdgeLines,
}

/// Configuration for the [`crate::GoalDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalDetectorParams {
    pub strategy: GoalStrategy,
    /// Goal-line RANSAC; `consensus_margin` is a segment-centre-to-line distance.
    pub ransac: RansacParams,
    /// Edge line extraction used by [`GoalStrategy::EdgeLines`].
    pub edge_lines: LineDetectorParams,
    /// Merge colinear edge lines before pairing them.
    pub merge_edge_lines: bool,
    /// Edge line pairing tolerance in [0, 1].
    pub matching_tolerance: f32,
    pub validation: ValidationParams,
    /// Restrict base refinement to vertical segments ending within the post's
    /// x-range widened by this many pixels. `None` considers every segment.
    pub base_column_margin_px: Option<f32>,
    pub base_rule: BaseRule,
}

impl Default for GoalDetectorParams {
    fn default() -> Self {
        Self {
            strategy: GoalStrategy::default(),
            ransac: RansacParams::default(),
            edge_lines: LineDetectorParams {
                ransac: RansacParams::default(),
                ..LineDetectorParams::default()
            },
            merge_edge_lines: false,
            matching_tolerance: 0.5,
            validation: ValidationParams::default(),
            base_column_margin_px: None,
            base_rule: BaseRule::default(),
        }
    }
}

impl GoalDetectorParams {
    /// Check every value range; edge line settings are checked by the line detector.
    pub fn validate(&self) -> Result<(), GoalDetectError> {
        self.ransac.validate()?;
        self.validation.validate()?;
        if !(0.0..=1.0).contains(&self.matching_tolerance) {
            return Err(GoalDetectError::InvalidArgument(format!(
                "matching_tolerance must be in [0, 1], got {}",
                self.matching_tolerance
            )));
        }
        if let Some(m) = self.base_column_margin_px {
            if !(m.is_finite() && m >= 0.0) {
                return Err(GoalDetectError::InvalidArgument(format!(
                    "base_column_margin_px must be finite and >= 0, got {m}"
                )));
            }
        }
        Ok(())
    }
}
