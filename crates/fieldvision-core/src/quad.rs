use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Four-corner region in image coordinates (y grows downwards).
///
/// Corners are stored as `[top_left, top_right, bottom_right, bottom_left]`.
/// A well-formed quad has a positive [`Quad::signed_area`] under this order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    corners: [Point2<f32>; 4],
}

impl Quad {
    pub fn new(
        top_left: Point2<f32>,
        top_right: Point2<f32>,
        bottom_right: Point2<f32>,
        bottom_left: Point2<f32>,
    ) -> Self {
        Self {
            corners: [top_left, top_right, bottom_right, bottom_left],
        }
    }

    #[inline]
    pub fn corners(&self) -> &[Point2<f32>; 4] {
        &self.corners
    }

    #[inline]
    pub fn top_left(&self) -> Point2<f32> {
        self.corners[0]
    }

    #[inline]
    pub fn top_right(&self) -> Point2<f32> {
        self.corners[1]
    }

    #[inline]
    pub fn bottom_right(&self) -> Point2<f32> {
        self.corners[2]
    }

    #[inline]
    pub fn bottom_left(&self) -> Point2<f32> {
        self.corners[3]
    }

    pub fn bottom_centre(&self) -> Point2<f32> {
        nalgebra::center(&self.bottom_left(), &self.bottom_right())
    }

    /// Mean length of the top and bottom edges.
    pub fn width(&self) -> f32 {
        0.5 * ((self.top_right() - self.top_left()).norm()
            + (self.bottom_right() - self.bottom_left()).norm())
    }

    /// Mean length of the left and right edges.
    pub fn height(&self) -> f32 {
        0.5 * ((self.bottom_left() - self.top_left()).norm()
            + (self.bottom_right() - self.top_right()).norm())
    }

    /// Height over width; infinite for a zero-width quad.
    pub fn aspect_ratio(&self) -> f32 {
        let w = self.width();
        if w <= f32::EPSILON {
            return f32::INFINITY;
        }
        self.height() / w
    }

    /// Shoelace area; positive for the canonical corner order.
    pub fn signed_area(&self) -> f32 {
        polygon_signed_area(&self.corners)
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Horizontal extent `(min_x, max_x)`.
    pub fn x_span(&self) -> (f32, f32) {
        self.corners
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            })
    }

    /// Area shared by two convex quads.
    ///
    /// Quads with non-positive signed area do not intersect anything.
    pub fn intersection_area(&self, other: &Quad) -> f32 {
        if self.signed_area() <= 0.0 || other.signed_area() <= 0.0 {
            return 0.0;
        }
        let mut poly: Vec<Point2<f32>> = self.corners.to_vec();
        for k in 0..4 {
            if poly.is_empty() {
                return 0.0;
            }
            let a = other.corners[k];
            let b = other.corners[(k + 1) % 4];
            poly = clip_by_edge(&poly, a, b);
        }
        if poly.len() < 3 {
            return 0.0;
        }
        polygon_signed_area(&poly).max(0.0)
    }

    /// Intersection area relative to the smaller of the two quads, in [0, 1].
    pub fn overlap_fraction(&self, other: &Quad) -> f32 {
        let smaller = self.area().min(other.area());
        if smaller <= f32::EPSILON {
            return 0.0;
        }
        (self.intersection_area(other) / smaller).clamp(0.0, 1.0)
    }
}

fn cross(o: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let u = a - o;
    let v = b - o;
    u.x * v.y - u.y * v.x
}

/// Keep the part of `poly` on the inner side of the directed edge `a -> b`.
fn clip_by_edge(poly: &[Point2<f32>], a: Point2<f32>, b: Point2<f32>) -> Vec<Point2<f32>> {
    let mut out = Vec::with_capacity(poly.len() + 1);
    for i in 0..poly.len() {
        let p = poly[i];
        let q = poly[(i + 1) % poly.len()];
        let dp = cross(a, b, p);
        let dq = cross(a, b, q);
        if dp >= 0.0 {
            out.push(p);
        }
        if (dp >= 0.0) != (dq >= 0.0) {
            let t = dp / (dp - dq);
            out.push(p + (q - p) * t);
        }
    }
    out
}

fn polygon_signed_area(points: &[Point2<f32>]) -> f32 {
    let n = points.len();
    let mut acc = 0.0f32;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc += p.x * q.y - q.x * p.y;
    }
    0.5 * acc
}
