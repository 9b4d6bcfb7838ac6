use std::f32::consts::{FRAC_PI_2, PI};

/// Wrap an angle to [0, π).
pub fn wrap_angle_pi(theta: f32) -> f32 {
    let mut t = theta % PI;
    if t < 0.0 {
        t += PI;
    }
    t
}

/// Smallest angular distance between two undirected orientations (period π).
///
/// The result lies in [0, π/2] and is symmetric in its arguments.
pub fn angular_dist_pi(a: f32, b: f32) -> f32 {
    let mut d = wrap_angle_pi(a) - wrap_angle_pi(b);
    // wrap to [-π/2, π/2]
    while d > FRAC_PI_2 {
        d -= PI;
    }
    while d < -FRAC_PI_2 {
        d += PI;
    }
    d.abs()
}
