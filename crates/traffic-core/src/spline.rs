//! Cubic Hermite interpolation between two waypoints.

use crate::polynomial::Polynomial;
use crate::waypoint::{Position, Time, Velocity, Waypoint};

/// The curve of one trajectory segment.
///
/// Each pose dimension (x, y, yaw) is an independent cubic in the local
/// parameter `s = (t - start) / duration`, matching position and velocity
/// at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    start_time: Time,
    finish_time: Time,
    coeffs: [[f64; 4]; 3],
}

impl Spline {
    /// Callers guarantee `start.time() < finish.time()`.
    pub fn new(start: &Waypoint, finish: &Waypoint) -> Self {
        let dt = finish.time().abs_diff(start.time()) as f64;
        let (p0, v0) = (start.position(), start.velocity());
        let (p1, v1) = (finish.position(), finish.velocity());

        let coeffs = std::array::from_fn(|dim| {
            let (p0, p1) = (p0[dim], p1[dim]);
            let (m0, m1) = (dt * v0[dim], dt * v1[dim]);
            [
                p0,
                m0,
                3.0 * (p1 - p0) - 2.0 * m0 - m1,
                2.0 * (p0 - p1) + m0 + m1,
            ]
        });

        Self {
            start_time: start.time(),
            finish_time: finish.time(),
            coeffs,
        }
    }

    pub fn start_time(&self) -> Time {
        self.start_time
    }

    pub fn finish_time(&self) -> Time {
        self.finish_time
    }

    fn duration(&self) -> f64 {
        self.finish_time.abs_diff(self.start_time) as f64
    }

    fn param(&self, time: f64) -> f64 {
        (time - self.start_time as f64) / self.duration()
    }

    pub fn position_at(&self, time: f64) -> Position {
        let s = self.param(time);
        self.coeffs.map(|[c0, c1, c2, c3]| c0 + s * (c1 + s * (c2 + s * c3)))
    }

    pub fn velocity_at(&self, time: f64) -> Velocity {
        let s = self.param(time);
        let dt = self.duration();
        self.coeffs
            .map(|[_, c1, c2, c3]| (c1 + s * (2.0 * c2 + s * 3.0 * c3)) / dt)
    }

    pub fn acceleration_at(&self, time: f64) -> [f64; 3] {
        let s = self.param(time);
        let dt = self.duration();
        self.coeffs
            .map(|[_, _, c2, c3]| (2.0 * c2 + 6.0 * c3 * s) / (dt * dt))
    }

    /// One dimension of the curve as a polynomial in `u`, where
    /// `t = window_start + u * window_span`.
    pub fn polynomial_over(&self, dim: usize, window_start: f64, window_span: f64) -> Polynomial {
        let dt = self.duration();
        Polynomial::new(self.coeffs[dim].to_vec()).compose_affine(
            window_span / dt,
            (window_start - self.start_time as f64) / dt,
        )
    }
}
