use crate::{angular_dist_pi, wrap_angle_pi, RansacModel};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Total-least-squares line backed by every point it was fitted from.
///
/// The line keeps its point buffer so it can be refitted after absorbing
/// another line ([`LsFittedLine::join_line`]). A line needs at least two
/// distinct points to be valid; queries on an invalid line return the
/// "no match" value documented on each method.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LsFittedLine {
    points: Vec<Point2<f32>>,
    fit: Option<LineFit>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct LineFit {
    centroid: Point2<f32>,
    /// Unit direction.
    direction: Vector2<f32>,
    /// Unit normal, `direction` rotated by +90°.
    normal: Vector2<f32>,
    /// Orientation in [0, π).
    angle: f32,
}

impl LsFittedLine {
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point2<f32>>,
    {
        let mut line = Self {
            points: points.into_iter().collect(),
            fit: None,
        };
        line.refit();
        line
    }

    /// Absorb all points of `other` and refit. `other` is consumed.
    pub fn join_line(&mut self, other: LsFittedLine) {
        self.points.extend(other.points);
        self.refit();
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.fit.is_some()
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Orientation in [0, π).
    pub fn angle(&self) -> Option<f32> {
        self.fit.map(|f| f.angle)
    }

    /// Perpendicular distance from `p` to the line; infinite if the line is invalid.
    pub fn distance_to_point(&self, p: &Point2<f32>) -> f32 {
        match &self.fit {
            Some(f) => (p - f.centroid).dot(&f.normal).abs(),
            None => f32::INFINITY,
        }
    }

    /// Undirected angle between two lines in [0, π/2].
    ///
    /// Returns π/2 when either line is invalid.
    pub fn angle_between(&self, other: &LsFittedLine) -> f32 {
        match (self.angle(), other.angle()) {
            (Some(a), Some(b)) => angular_dist_pi(a, b),
            _ => FRAC_PI_2,
        }
    }

    /// Extreme inlier positions projected onto the line, ordered along its direction.
    pub fn end_points(&self) -> Option<[Point2<f32>; 2]> {
        let f = self.fit?;
        let (lo, hi) = self
            .points
            .iter()
            .map(|p| (p - f.centroid).dot(&f.direction))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(t), hi.max(t))
            });
        Some([
            f.centroid + f.direction * lo,
            f.centroid + f.direction * hi,
        ])
    }

    /// Distance between the end points; zero for an invalid line.
    pub fn length(&self) -> f32 {
        self.end_points().map_or(0.0, |[a, b]| (b - a).norm())
    }

    pub fn midpoint(&self) -> Option<Point2<f32>> {
        self.end_points().map(|[a, b]| nalgebra::center(&a, &b))
    }

    /// Mean distance of each line's end points to the other line.
    ///
    /// Symmetric; infinite when either line is invalid.
    pub fn average_distance_between(&self, other: &LsFittedLine) -> f32 {
        match (self.end_points(), other.end_points()) {
            (Some(a), Some(b)) => {
                let sum = other.distance_to_point(&a[0])
                    + other.distance_to_point(&a[1])
                    + self.distance_to_point(&b[0])
                    + self.distance_to_point(&b[1]);
                0.25 * sum
            }
            _ => f32::INFINITY,
        }
    }

    fn refit(&mut self) {
        self.fit = fit_line(&self.points);
    }
}

fn fit_line(points: &[Point2<f32>]) -> Option<LineFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0f64, 0.0f64), |(sx, sy), p| {
        (sx + p.x as f64, sy + p.y as f64)
    });
    let (mx, my) = (sx / n, sy / n);

    let mut sxx = 0.0f64;
    let mut syy = 0.0f64;
    let mut sxy = 0.0f64;
    for p in points {
        let dx = p.x as f64 - mx;
        let dy = p.y as f64 - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx + syy <= 1e-12 {
        return None;
    }

    // principal axis of the scatter matrix
    let theta = 0.5 * (2.0 * sxy).atan2(sxx - syy);
    let direction = Vector2::new(theta.cos() as f32, theta.sin() as f32);
    Some(LineFit {
        centroid: Point2::new(mx as f32, my as f32),
        direction,
        normal: Vector2::new(-direction.y, direction.x),
        angle: wrap_angle_pi(theta as f32),
    })
}

impl RansacModel<Point2<f32>> for LsFittedLine {
    const MIN_SAMPLES: usize = 2;

    fn fit(sample: &[Point2<f32>]) -> Option<Self> {
        let line = LsFittedLine::from_points(sample.iter().copied());
        line.is_valid().then_some(line)
    }

    fn distance_to(&self, observation: &Point2<f32>) -> f32 {
        self.distance_to_point(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line_through(p0: (f32, f32), p1: (f32, f32), n: usize) -> LsFittedLine {
        LsFittedLine::from_points((0..n).map(|i| {
            let t = i as f32 / (n - 1) as f32;
            Point2::new(p0.0 + t * (p1.0 - p0.0), p0.1 + t * (p1.1 - p0.1))
        }))
    }

    #[test]
    fn fits_vertical_line_exactly() {
        let l = line_through((10.0, 0.0), (10.0, 50.0), 11);
        assert!(l.is_valid());
        assert_abs_diff_eq!(l.angle().unwrap(), FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(l.length(), 50.0, epsilon = 1e-3);
        assert_abs_diff_eq!(l.distance_to_point(&Point2::new(13.0, 7.0)), 3.0, epsilon = 1e-4);
        let mid = l.midpoint().unwrap();
        assert_abs_diff_eq!(mid.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(mid.y, 25.0, epsilon = 1e-3);
    }

    #[test]
    fn single_or_repeated_points_are_invalid() {
        assert!(!LsFittedLine::from_points([Point2::new(1.0, 1.0)]).is_valid());
        assert!(!LsFittedLine::from_points([Point2::new(1.0, 1.0); 4]).is_valid());
        let empty = LsFittedLine::default();
        assert!(empty.end_points().is_none());
        assert_eq!(empty.length(), 0.0);
    }

    #[test]
    fn angle_between_is_symmetric() {
        let a = line_through((0.0, 0.0), (100.0, 5.0), 20);
        let b = line_through((0.0, 10.0), (10.0, 100.0), 20);
        assert_abs_diff_eq!(a.angle_between(&b), b.angle_between(&a), epsilon = 1e-6);
        assert!(a.angle_between(&b) <= FRAC_PI_2);
        assert_eq!(a.angle_between(&LsFittedLine::default()), FRAC_PI_2);
    }

    #[test]
    fn average_distance_of_parallel_lines() {
        let a = line_through((0.0, 0.0), (0.0, 40.0), 9);
        let b = line_through((6.0, 0.0), (6.0, 40.0), 9);
        assert_abs_diff_eq!(a.average_distance_between(&b), 6.0, epsilon = 1e-4);
        assert_abs_diff_eq!(b.average_distance_between(&a), 6.0, epsilon = 1e-4);
    }

    #[test]
    fn join_line_absorbs_points() {
        let mut a = line_through((0.0, 0.0), (50.0, 0.0), 6);
        let b = line_through((60.0, 0.0), (100.0, 0.0), 5);
        a.join_line(b);
        assert_eq!(a.num_points(), 11);
        assert_abs_diff_eq!(a.length(), 100.0, epsilon = 1e-3);
    }
}
