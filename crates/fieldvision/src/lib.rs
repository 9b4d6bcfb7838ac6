//! Facade crate for the `fieldvision-*` workspace.
//!
//! - re-exports of the geometry core, the line detector and the goal detector
//! - [`detect`]: one-call helpers for callers that do not keep a detector around
//!
//! ## Quickstart
//!
//! ```
//! use fieldvision::detect::detect_goals;
//! use fieldvision::goals::GoalDetectorParams;
//! use fieldvision::FrameSegments;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = FrameSegments::default();
//! let goals = detect_goals(&frame, GoalDetectorParams::default())?;
//! assert!(goals.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `fieldvision::core`: points, segments, quads, least-squares lines, multi-model RANSAC, logger.
//! - `fieldvision::lines`: RANSAC line extraction and colinear merging.
//! - `fieldvision::goals`: goal-post detection per frame.

pub use fieldvision_core as core;
pub use fieldvision_goals as goals;
pub use fieldvision_lines as lines;

pub use fieldvision_core::{ColorSegment, FrameSegments, LsFittedLine, Quad};
pub use fieldvision_goals::{Goal, GoalDetector, GoalKind};

pub mod detect;
