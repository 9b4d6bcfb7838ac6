use crate::merge::{merge_colinear, validate_merge_thresholds};
use crate::LineDetectError;
use fieldvision_core::{find_multiple_models, ColorSegment, LsFittedLine, RansacFit, RansacParams};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Configuration for the [`LineDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDetectorParams {
    /// Multi-model RANSAC settings; `consensus_margin` is a point-to-line distance.
    pub ransac: RansacParams,
    /// Maximal angle (radians) between two lines that may be merged.
    pub merge_angle_threshold: f32,
    /// Maximal average end-point distance (pixels) between two lines that may be merged.
    pub merge_distance_threshold: f32,
}

impl Default for LineDetectorParams {
    fn default() -> Self {
        Self {
            ransac: RansacParams {
                consensus_margin: 4.0,
                min_inliers: 10,
                iterations_per_attempt: 40,
                max_attempts: 5,
                seed: 0,
            },
            merge_angle_threshold: 5f32.to_radians(),
            merge_distance_threshold: 10.0,
        }
    }
}

/// Finds straight edges in a point set.
#[derive(Clone, Debug)]
pub struct LineDetector {
    params: LineDetectorParams,
}

impl LineDetector {
    /// Validate `params` and build a detector.
    pub fn new(params: LineDetectorParams) -> Result<Self, LineDetectError> {
        params.ransac.validate()?;
        validate_merge_thresholds(params.merge_angle_threshold, params.merge_distance_threshold)?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &LineDetectorParams {
        &self.params
    }

    /// RANSAC line extraction, each consensus set refitted by least squares.
    ///
    /// No merging; lines are returned in extraction order (largest support first
    /// within one run of attempts).
    pub fn fit_lines(&self, points: &[Point2<f32>]) -> Result<Vec<LsFittedLine>, LineDetectError> {
        let fits: Vec<RansacFit<LsFittedLine, Point2<f32>>> =
            find_multiple_models(points, &self.params.ransac)?;
        let lines: Vec<LsFittedLine> = fits
            .into_iter()
            .map(|fit| LsFittedLine::from_points(fit.inliers))
            .filter(LsFittedLine::is_valid)
            .collect();
        debug!("fit_lines: {} points -> {} lines", points.len(), lines.len());
        Ok(lines)
    }

    /// [`LineDetector::fit_lines`] followed by [`merge_colinear`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(points = points.len()))
    )]
    pub fn detect_from_points(
        &self,
        points: &[Point2<f32>],
    ) -> Result<Vec<LsFittedLine>, LineDetectError> {
        let lines = self.fit_lines(points)?;
        merge_colinear(
            lines,
            self.params.merge_angle_threshold,
            self.params.merge_distance_threshold,
        )
    }
}

/// Start and end point of every segment, in segment order.
pub fn edge_points_from_segments(segments: &[ColorSegment]) -> Vec<Point2<f32>> {
    segments.iter().flat_map(|s| [s.start, s.end]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn finds_two_vertical_edges() {
        let mut pts = Vec::new();
        for i in 0..20 {
            let y = 5.0 * i as f32;
            pts.push(Point2::new(40.0, y));
            pts.push(Point2::new(48.0, y));
        }
        let det = LineDetector::new(LineDetectorParams {
            ransac: RansacParams {
                consensus_margin: 1.0,
                ..LineDetectorParams::default().ransac
            },
            merge_distance_threshold: 4.0,
            ..LineDetectorParams::default()
        })
        .unwrap();

        let lines = det.detect_from_points(&pts).unwrap();
        assert_eq!(lines.len(), 2);
        for l in &lines {
            assert_eq!(l.num_points(), 20);
            assert_abs_diff_eq!(l.angle().unwrap(), FRAC_PI_2, epsilon = 1e-4);
        }
    }

    #[test]
    fn no_points_no_lines() {
        let det = LineDetector::new(LineDetectorParams::default()).unwrap();
        assert!(det.detect_from_points(&[]).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_merge_threshold() {
        let params = LineDetectorParams {
            merge_angle_threshold: -0.1,
            ..LineDetectorParams::default()
        };
        assert!(matches!(
            LineDetector::new(params),
            Err(LineDetectError::InvalidArgument(_))
        ));
    }

    #[test]
    fn edge_points_keep_segment_order() {
        let segs = [
            ColorSegment::new(Point2::new(1.0, 2.0), Point2::new(5.0, 2.0)),
            ColorSegment::new(Point2::new(2.0, 3.0), Point2::new(6.0, 3.0)),
        ];
        let pts = edge_points_from_segments(&segs);
        assert_eq!(
            pts,
            vec![
                Point2::new(1.0, 2.0),
                Point2::new(5.0, 2.0),
                Point2::new(2.0, 3.0),
                Point2::new(6.0, 3.0)
            ]
        );
    }
}
