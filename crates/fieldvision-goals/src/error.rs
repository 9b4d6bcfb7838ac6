use fieldvision_core::RansacError;
use fieldvision_lines::LineDetectError;

/// Errors returned by the goal detector.
///
/// Only misconfiguration and contract violations end up here; a frame without
/// a visible goal is an empty result, not an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GoalDetectError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Ransac(#[from] RansacError),
    #[error(transparent)]
    Lines(#[from] LineDetectError),
}
