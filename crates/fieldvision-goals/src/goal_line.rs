use fieldvision_core::{ColorSegment, LsFittedLine, RansacModel};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Centre line of a goal post, fitted to the horizontal segments crossing it.
///
/// Only obtainable through [`GoalLine::fit`], so end points always exist.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalLine {
    axis: LsFittedLine,
    end_points: [Point2<f32>; 2],
    width: f32,
    support: usize,
}

impl GoalLine {
    /// Fit the centre line through the segment centres.
    ///
    /// The width is the mean segment length. Returns `None` when fewer than
    /// two distinct centres are given.
    pub fn fit(segments: &[ColorSegment]) -> Option<Self> {
        if segments.len() < 2 {
            return None;
        }
        let axis = LsFittedLine::from_points(segments.iter().map(ColorSegment::center));
        let end_points = axis.end_points()?;
        let width =
            segments.iter().map(ColorSegment::length).sum::<f32>() / segments.len() as f32;
        Some(Self {
            axis,
            end_points,
            width,
            support: segments.len(),
        })
    }

    /// Extreme segment centres projected onto the line.
    #[inline]
    pub fn end_points(&self) -> [Point2<f32>; 2] {
        self.end_points
    }

    /// Estimated post thickness in pixels.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Number of segments the line was fitted to.
    #[inline]
    pub fn support(&self) -> usize {
        self.support
    }

    /// Orientation in [0, π).
    pub fn angle(&self) -> f32 {
        // a fitted axis always has an angle
        self.axis.angle().unwrap_or_default()
    }

    pub fn length(&self) -> f32 {
        (self.end_points[1] - self.end_points[0]).norm()
    }

    /// Undirected angle to `other` in [0, π/2]; symmetric.
    pub fn angle_between(&self, other: &GoalLine) -> f32 {
        self.axis.angle_between(&other.axis)
    }

    /// Distance from the segment's centre to the line.
    pub fn distance_to_segment(&self, segment: &ColorSegment) -> f32 {
        self.axis.distance_to_point(&segment.center())
    }
}

impl RansacModel<ColorSegment> for GoalLine {
    const MIN_SAMPLES: usize = 2;

    fn fit(sample: &[ColorSegment]) -> Option<Self> {
        GoalLine::fit(sample)
    }

    fn distance_to(&self, observation: &ColorSegment) -> f32 {
        self.distance_to_segment(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector2;
    use std::f32::consts::FRAC_PI_2;

    fn post_segments(x: f32, y0: f32, y1: f32, width: f32) -> Vec<ColorSegment> {
        let mut out = Vec::new();
        let mut y = y0;
        while y <= y1 {
            out.push(ColorSegment::new(
                Point2::new(x - 0.5 * width, y),
                Point2::new(x + 0.5 * width, y),
            ));
            y += 4.0;
        }
        out
    }

    #[test]
    fn fits_vertical_post() {
        let segs = post_segments(50.0, 10.0, 90.0, 6.0);
        let line = GoalLine::fit(&segs).expect("fit");
        assert_eq!(line.support(), segs.len());
        assert_abs_diff_eq!(line.width(), 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(line.angle(), FRAC_PI_2, epsilon = 1e-5);
        assert_abs_diff_eq!(line.length(), 80.0, epsilon = 1e-3);
        let off = ColorSegment::new(Point2::new(55.0, 30.0), Point2::new(59.0, 30.0));
        assert_abs_diff_eq!(line.distance_to_segment(&off), 7.0, epsilon = 1e-4);
    }

    #[test]
    fn too_few_segments_do_not_fit() {
        assert!(GoalLine::fit(&[]).is_none());
        let segs = post_segments(50.0, 10.0, 10.0, 6.0);
        assert_eq!(segs.len(), 1);
        assert!(GoalLine::fit(&segs).is_none());
        let same = [segs[0], segs[0]];
        assert!(GoalLine::fit(&same).is_none());
    }

    #[test]
    fn angle_between_is_symmetric() {
        let a = GoalLine::fit(&post_segments(50.0, 10.0, 90.0, 6.0)).unwrap();
        let tilted: Vec<ColorSegment> = post_segments(150.0, 10.0, 90.0, 6.0)
            .into_iter()
            .map(|s| {
                let shift = Vector2::new(0.2 * s.start.y, 0.0);
                ColorSegment::new(s.start + shift, s.end + shift)
            })
            .collect();
        let b = GoalLine::fit(&tilted).unwrap();
        assert_abs_diff_eq!(a.angle_between(&b), b.angle_between(&a), epsilon = 1e-6);
        assert_abs_diff_eq!(a.angle_between(&b), 0.2f32.atan(), epsilon = 1e-4);
    }
}
