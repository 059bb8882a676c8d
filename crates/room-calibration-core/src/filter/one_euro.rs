//! One-euro adaptive low-pass filter.
//!
//! The filter smooths a signal with a cutoff frequency that rises with the
//! signal's estimated speed: slow motion is heavily smoothed (low jitter),
//! fast motion follows closely (low lag). Each update also refreshes a
//! low-passed derivative estimate, exposed as [`OneEuroFilter::derivative_magnitude`].
//!
//! Reference: Casiez, Roussel, Vogel, "1 € Filter: A Simple Speed-based
//! Low-pass Filter for Noisy Input in Interactive Systems", CHI 2012.
//!
//! # Example
//!
//! ```
//! use room_calibration_core::{OneEuroFilter, OneEuroParams, Vec3};
//!
//! let mut filter = OneEuroFilter::<Vec3>::new(OneEuroParams::default());
//! for _ in 0..10 {
//!     filter.filter(0.016, Vec3::new(0.0, 0.0, 0.5));
//! }
//! assert!(filter.derivative_magnitude() < 1e-12);
//! assert!((filter.state().z - 0.5).abs() < 1e-12);
//! ```

use crate::{Quat, Real, Vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tuning parameters of a one-euro filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneEuroParams {
    /// Cutoff frequency (Hz) applied when the signal is at rest.
    pub min_cutoff: Real,
    /// How strongly the cutoff grows with signal speed.
    pub beta: Real,
    /// Cutoff frequency (Hz) for smoothing the derivative estimate.
    pub derivative_cutoff: Real,
}

impl Default for OneEuroParams {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 0.5,
            derivative_cutoff: 1.0,
        }
    }
}

/// Exponential smoothing factor for a first-order low-pass at `cutoff` Hz.
pub fn smoothing_alpha(dt: Real, cutoff: Real) -> Real {
    let tau = 1.0 / (2.0 * PI * cutoff);
    1.0 / (1.0 + tau / dt)
}

/// A signal type the one-euro filter can smooth.
///
/// Derivatives are expressed as 3-vectors for every signal: linear velocity
/// for positions, angular velocity (rotation vector per second) for
/// orientations.
pub trait OneEuroSignal: Copy {
    /// Value reported before any sample has been filtered.
    fn initial() -> Self;

    /// Rate of change from `previous` to `self` over `dt` seconds.
    fn derivative(&self, previous: &Self, dt: Real) -> Vec3;

    /// Move `previous` towards `self` by the fraction `alpha`.
    fn blend(&self, previous: &Self, alpha: Real) -> Self;
}

impl OneEuroSignal for Vec3 {
    fn initial() -> Self {
        Vec3::zeros()
    }

    fn derivative(&self, previous: &Self, dt: Real) -> Vec3 {
        (self - previous) / dt
    }

    fn blend(&self, previous: &Self, alpha: Real) -> Self {
        previous.lerp(self, alpha)
    }
}

impl OneEuroSignal for Quat {
    fn initial() -> Self {
        Quat::identity()
    }

    fn derivative(&self, previous: &Self, dt: Real) -> Vec3 {
        (self * previous.inverse()).scaled_axis() / dt
    }

    fn blend(&self, previous: &Self, alpha: Real) -> Self {
        // try_slerp declines (near-)identical inputs; those need no blending.
        previous
            .try_slerp(self, alpha, Real::EPSILON)
            .unwrap_or(*self)
    }
}

/// One-euro filter over a [`OneEuroSignal`].
#[derive(Debug, Clone)]
pub struct OneEuroFilter<S> {
    params: OneEuroParams,
    state: Option<S>,
    derivative: Vec3,
}

impl<S: OneEuroSignal> OneEuroFilter<S> {
    pub fn new(params: OneEuroParams) -> Self {
        Self {
            params,
            state: None,
            derivative: Vec3::zeros(),
        }
    }

    pub fn params(&self) -> &OneEuroParams {
        &self.params
    }

    /// Feed a new sample taken `dt` seconds after the previous one.
    ///
    /// `dt` must be positive. The first sample initializes the state
    /// directly and contributes a zero derivative.
    pub fn filter(&mut self, dt: Real, sample: S) -> S {
        let raw_derivative = match &self.state {
            Some(previous) => sample.derivative(previous, dt),
            None => Vec3::zeros(),
        };
        self.derivative = raw_derivative.blend(
            &self.derivative,
            smoothing_alpha(dt, self.params.derivative_cutoff),
        );

        let cutoff = self.params.min_cutoff + self.params.beta * self.derivative_magnitude();
        let filtered = match &self.state {
            Some(previous) => sample.blend(previous, smoothing_alpha(dt, cutoff)),
            None => sample,
        };
        self.state = Some(filtered);
        filtered
    }

    /// Current filtered value ([`OneEuroSignal::initial`] before any sample).
    pub fn state(&self) -> S {
        self.state.unwrap_or_else(S::initial)
    }

    /// Magnitude of the smoothed derivative estimate.
    pub fn derivative_magnitude(&self) -> Real {
        self.derivative.norm()
    }

    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    /// Forget all history, keeping the parameters.
    pub fn reset(&mut self) {
        self.state = None;
        self.derivative = Vec3::zeros();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_grows_with_dt_and_cutoff() {
        let a = smoothing_alpha(0.016, 1.0);
        assert!(a > 0.0 && a < 1.0);
        assert!(smoothing_alpha(0.032, 1.0) > a);
        assert!(smoothing_alpha(0.016, 5.0) > a);
        // tau = 1/(2*pi) at 1 Hz
        let expected = 1.0 / (1.0 + 1.0 / (2.0 * PI * 0.016));
        assert!((a - expected).abs() < 1e-15);
    }

    #[test]
    fn first_sample_passes_through() {
        let mut filter = OneEuroFilter::<Vec3>::new(OneEuroParams::default());
        assert!(!filter.has_state());
        assert_eq!(filter.state(), Vec3::zeros());

        let out = filter.filter(1.0, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(out, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(filter.derivative_magnitude(), 0.0);
    }

    #[test]
    fn step_raises_derivative_then_settles() {
        let mut filter = OneEuroFilter::<Vec3>::new(OneEuroParams::default());
        let dt = 0.016;
        filter.filter(dt, Vec3::zeros());
        filter.filter(dt, Vec3::new(0.0, 0.0, 1.0));
        let after_jump = filter.derivative_magnitude();
        assert!(after_jump > 0.2, "derivative {after_jump}");

        for _ in 0..2000 {
            filter.filter(dt, Vec3::new(0.0, 0.0, 1.0));
        }
        assert!(filter.derivative_magnitude() < 1e-6);
        assert!((filter.state().z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn quaternion_constant_input_has_no_angular_speed() {
        let q = Quat::from_euler_angles(0.3, -0.2, 1.1);
        let mut filter = OneEuroFilter::<Quat>::new(OneEuroParams::default());
        for _ in 0..20 {
            filter.filter(0.016, q);
        }
        assert!(filter.derivative_magnitude() < 1e-4);
        assert!(filter.state().angle_to(&q) < 1e-6);
    }

    #[test]
    fn quaternion_rotation_is_detected() {
        let dt = 0.01;
        let omega = 0.5;
        let mut filter = OneEuroFilter::<Quat>::new(OneEuroParams::default());
        for k in 0..200 {
            let q = Quat::from_axis_angle(&Vec3::z_axis(), omega * dt * k as Real);
            filter.filter(dt, q);
        }
        assert!(filter.derivative_magnitude() > 0.1);
    }

    #[test]
    fn reset_forgets_state() {
        let mut filter = OneEuroFilter::<Vec3>::new(OneEuroParams::default());
        filter.filter(0.016, Vec3::x());
        filter.filter(0.016, Vec3::y());
        filter.reset();
        assert!(!filter.has_state());
        assert_eq!(filter.derivative_magnitude(), 0.0);
    }

    #[test]
    fn params_json_fills_defaults() {
        let params: OneEuroParams = serde_json::from_str(r#"{"beta": 2.0}"#).unwrap();
        assert_eq!(params.beta, 2.0);
        assert_eq!(params.min_cutoff, 1.0);
        assert_eq!(params.derivative_cutoff, 1.0);
    }
}
