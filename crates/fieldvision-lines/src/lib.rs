//! General line detection on edge points.
//!
//! - [`LineDetector`] fits least-squares lines to point sets with the
//!   multi-model RANSAC from `fieldvision-core`,
//! - [`merge_colinear`] collapses fitted lines that belong to the same edge.

mod detector;
mod error;
mod merge;

pub use detector::{edge_points_from_segments, LineDetector, LineDetectorParams};
pub use error::LineDetectError;
pub use merge::merge_colinear;

pub use fieldvision_core::LsFittedLine;
