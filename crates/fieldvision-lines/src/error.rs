use fieldvision_core::RansacError;

/// Errors returned by the line detector and the colinear merger.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LineDetectError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Ransac(#[from] RansacError),
}
