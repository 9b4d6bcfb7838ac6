//! JSON configuration and frame dump helpers.

use crate::{GoalDetectError, GoalDetector, GoalDetectorParams};
use fieldvision_core::FrameSegments;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum GoalIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Detector configuration as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalDetectConfig {
    #[serde(default)]
    pub params: GoalDetectorParams,
}

impl GoalDetectConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, GoalIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), GoalIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Validate the parameters and build a detector.
    pub fn build_detector(&self) -> Result<GoalDetector, GoalDetectError> {
        GoalDetector::new(self.params.clone())
    }
}

/// Load the segments of one recorded frame.
pub fn load_frame_json(path: impl AsRef<Path>) -> Result<FrameSegments, GoalIoError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Record the segments of one frame as pretty JSON.
pub fn write_frame_json(frame: &FrameSegments, path: impl AsRef<Path>) -> Result<(), GoalIoError> {
    let json = serde_json::to_string_pretty(frame)?;
    fs::write(path, json)?;
    Ok(())
}
