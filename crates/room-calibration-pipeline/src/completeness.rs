//! Whether a tracking system has everything it needs in room space.
//!
//! Room calibration is complete when the camera has a pose and every
//! IMU-bearing body knows its yaw relative to the room.

use room_calibration_core::{BodyId, Iso3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from [`is_room_calibration_complete`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompletenessError {
    /// More than one IMU is tracked while the host declared there is one.
    #[error(
        "found {imu_count} IMUs system-wide, but the single IMU assumption is still enabled"
    )]
    SingleImuAssumptionViolated { imu_count: usize },
}

/// An IMU-bearing tracked body, as seen by the completeness check.
pub trait TrackedImu {
    fn body(&self) -> BodyId;

    /// Whether this IMU's yaw relative to the room has been established.
    fn calibration_yaw_known(&self) -> bool;
}

/// Read-only view of a tracking system.
pub trait TrackingSystemView {
    type Imu: TrackedImu;

    /// Whether the camera pose in room space has been established.
    fn has_camera_pose(&self) -> bool;

    /// Every IMU-bearing body currently tracked.
    fn imus(&self) -> impl Iterator<Item = &Self::Imu>;
}

/// Options for [`is_room_calibration_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessOptions {
    /// Treat more than one IMU in the system as a configuration error.
    pub assume_single_imu: bool,
}

/// Check whether room calibration is complete for `system`.
///
/// Returns `Ok(false)` as soon as the camera pose is missing. Otherwise
/// requires every IMU to know its yaw; a system without IMUs counts as
/// complete.
///
/// # Errors
///
/// Returns [`CompletenessError::SingleImuAssumptionViolated`] when
/// `options.assume_single_imu` is set and several IMUs are tracked.
pub fn is_room_calibration_complete<S: TrackingSystemView>(
    system: &S,
    options: &CompletenessOptions,
) -> Result<bool, CompletenessError> {
    if !system.has_camera_pose() {
        return Ok(false);
    }

    let mut imu_count = 0usize;
    let mut complete = true;
    for imu in system.imus() {
        complete = complete && imu.calibration_yaw_known();
        imu_count += 1;
    }

    if options.assume_single_imu && imu_count > 1 {
        return Err(CompletenessError::SingleImuAssumptionViolated { imu_count });
    }
    Ok(complete)
}

/// Calibration status of one IMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImuStatus {
    pub body: BodyId,
    pub yaw_known: bool,
}

impl TrackedImu for ImuStatus {
    fn body(&self) -> BodyId {
        self.body
    }

    fn calibration_yaw_known(&self) -> bool {
        self.yaw_known
    }
}

/// Owned snapshot of the parts of a tracking system the check looks at.
#[derive(Debug, Clone, Default)]
pub struct TrackingSystemSnapshot {
    /// `room_se3_camera`, once calibrated.
    pub camera_pose: Option<Iso3>,
    pub imus: Vec<ImuStatus>,
}

impl TrackingSystemSnapshot {
    /// Mark the IMU of `body` as yaw-calibrated. Returns false if unknown.
    pub fn set_yaw_known(&mut self, body: BodyId) -> bool {
        match self.imus.iter_mut().find(|imu| imu.body == body) {
            Some(imu) => {
                imu.yaw_known = true;
                true
            }
            None => false,
        }
    }
}

impl TrackingSystemView for TrackingSystemSnapshot {
    type Imu = ImuStatus;

    fn has_camera_pose(&self) -> bool {
        self.camera_pose.is_some()
    }

    fn imus(&self) -> impl Iterator<Item = &ImuStatus> {
        self.imus.iter()
    }
}
