use nalgebra::Vector2;

/// Small vector helpers used when building post outlines.
pub trait VectorExt {
    /// Rescale to `length`, keeping the direction. Returns `None` for a
    /// (near) zero vector.
    fn with_length(&self, length: f32) -> Option<Vector2<f32>>;

    /// Rotate by 90°: `(x, y) -> (y, -x)`.
    ///
    /// In y-down image coordinates a direction pointing down the image turns
    /// to point right.
    fn perpendicular(&self) -> Vector2<f32>;
}

impl VectorExt for Vector2<f32> {
    fn with_length(&self, length: f32) -> Option<Vector2<f32>> {
        let n = self.norm();
        if n <= f32::EPSILON {
            return None;
        }
        Some(self * (length / n))
    }

    #[inline]
    fn perpendicular(&self) -> Vector2<f32> {
        Vector2::new(self.y, -self.x)
    }
}
