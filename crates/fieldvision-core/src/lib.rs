//! Core types and utilities for goal and line detection on color-segment data.
//!
//! This crate is purely geometric. It does *not* depend on any concrete
//! segmentation front end or image type: observations arrive as
//! [`ColorSegment`]s or plain points and leave as fitted models.

mod angle;
mod line;
mod logger;
mod point;
mod quad;
mod ransac;
mod segment;

pub use angle::{angular_dist_pi, wrap_angle_pi};
pub use line::LsFittedLine;
pub use point::VectorExt;
pub use quad::Quad;
pub use ransac::{
    find_multiple_models, find_multiple_models_with_rng, RansacError, RansacFit, RansacModel,
    RansacParams,
};
pub use segment::{ColorSegment, FrameSegments};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, TracingFormat};

pub use logger::{init_from_env, init_with_level, LOG_LEVEL_ENV};
