use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A run of the target color along one scan line.
///
/// `start` precedes `end` in scan direction (left to right for horizontal
/// scans, top to bottom for vertical scans).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSegment {
    pub start: Point2<f32>,
    pub end: Point2<f32>,
}

impl ColorSegment {
    pub fn new(start: Point2<f32>, end: Point2<f32>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn center(&self) -> Point2<f32> {
        nalgebra::center(&self.start, &self.end)
    }

    #[inline]
    pub fn direction(&self) -> Vector2<f32> {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().norm()
    }
}

/// Goal-colored segments of one video frame, as produced by the scanner.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameSegments {
    #[serde(default)]
    pub horizontal: Vec<ColorSegment>,
    #[serde(default)]
    pub vertical: Vec<ColorSegment>,
}

impl FrameSegments {
    pub fn new(horizontal: Vec<ColorSegment>, vertical: Vec<ColorSegment>) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}
