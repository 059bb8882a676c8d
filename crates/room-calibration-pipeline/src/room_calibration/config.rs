//! Configuration for room calibration.

use anyhow::{Result, ensure};
use room_calibration_core::{BodyId, OneEuroParams, Real};
use serde::{Deserialize, Serialize};

/// Thresholds and filter tuning for a room calibration run.
///
/// Defaults reproduce the tracker's standard behavior: ten consecutive
/// samples below 0.2 units/s linear and 1e-4 rad/s angular speed, with
/// guidance to move closer than 0.3 units to the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomCalibrationConfig {
    /// Linear speed (units/s) of the room-to-camera estimate that a still
    /// sample must stay below.
    pub linear_velocity_cutoff: Real,
    /// Angular speed (rad/s) of the room-to-camera estimate that a still
    /// sample must stay below.
    pub angular_velocity_cutoff: Real,
    /// Consecutive still samples needed to finish.
    pub required_samples: usize,
    /// Distance from the camera users are guided to move within.
    pub near_message_cutoff: Real,
    /// Fraction of `near_message_cutoff` the target must get below before
    /// the distance is confirmed as good.
    pub near_confirm_ratio: Real,
    /// Time step (seconds) substituted when a video timestamp does not
    /// advance. Filters then see an artificially slow signal.
    pub fallback_dt: Real,
    /// Body whose IMU provides the room reference. When `None`, the first
    /// body to report IMU data is used.
    pub imu_body: Option<BodyId>,
    /// One-euro tuning for the translation of the estimate.
    pub position_filter: OneEuroParams,
    /// One-euro tuning for the rotation of the estimate.
    pub orientation_filter: OneEuroParams,
}

impl Default for RoomCalibrationConfig {
    fn default() -> Self {
        Self {
            linear_velocity_cutoff: 0.2,
            angular_velocity_cutoff: 1.0e-4,
            required_samples: 10,
            near_message_cutoff: 0.3,
            near_confirm_ratio: 0.9,
            fallback_dt: 1.0,
            imu_body: None,
            position_filter: OneEuroParams::default(),
            orientation_filter: OneEuroParams::default(),
        }
    }
}

impl RoomCalibrationConfig {
    /// Depth below which a previously told-to-move-closer user is
    /// confirmed to be at a good distance.
    pub fn near_confirm_cutoff(&self) -> Real {
        self.near_confirm_ratio * self.near_message_cutoff
    }

    /// Check that all thresholds and filter parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.linear_velocity_cutoff > 0.0,
            "linear_velocity_cutoff must be positive, got {}",
            self.linear_velocity_cutoff
        );
        ensure!(
            self.angular_velocity_cutoff > 0.0,
            "angular_velocity_cutoff must be positive, got {}",
            self.angular_velocity_cutoff
        );
        ensure!(self.required_samples > 0, "required_samples must be at least 1");
        ensure!(
            self.near_message_cutoff > 0.0,
            "near_message_cutoff must be positive, got {}",
            self.near_message_cutoff
        );
        ensure!(
            self.near_confirm_ratio > 0.0 && self.near_confirm_ratio <= 1.0,
            "near_confirm_ratio must be in (0, 1], got {}",
            self.near_confirm_ratio
        );
        ensure!(
            self.fallback_dt > 0.0,
            "fallback_dt must be positive, got {}",
            self.fallback_dt
        );
        validate_filter("position_filter", &self.position_filter)?;
        validate_filter("orientation_filter", &self.orientation_filter)?;
        Ok(())
    }
}

fn validate_filter(name: &str, params: &OneEuroParams) -> Result<()> {
    ensure!(
        params.min_cutoff > 0.0,
        "{name}.min_cutoff must be positive, got {}",
        params.min_cutoff
    );
    ensure!(
        params.derivative_cutoff > 0.0,
        "{name}.derivative_cutoff must be positive, got {}",
        params.derivative_cutoff
    );
    ensure!(
        params.beta >= 0.0,
        "{name}.beta must be non-negative, got {}",
        params.beta
    );
    Ok(())
}
