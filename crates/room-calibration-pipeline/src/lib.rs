//! Room-to-camera extrinsic calibration for video + inertial trackers.
//!
//! This crate provides:
//!
//! - [`room_calibration`]: the online engine that fuses IMU orientation with
//!   video target poses and guides the user into holding still,
//! - [`completeness`]: a check of whether a tracking system has a camera
//!   pose and yaw-calibrated IMUs.
//!
//! ```no_run
//! use room_calibration_pipeline::{RoomCalibration, RoomCalibrationConfig};
//! # fn main() -> anyhow::Result<()> {
//! # let (body, target, timestamp, translation, orientation, imu) = unimplemented!();
//!
//! let mut calibration = RoomCalibration::new(RoomCalibrationConfig::default())?;
//!
//! // Inside the tracking loop:
//! calibration.process_imu_data(body, &timestamp, &imu);
//! if calibration.want_video_data(&target) {
//!     for event in calibration.process_video_data(&target, &timestamp, &translation, &orientation) {
//!         println!("{event}");
//!     }
//! }
//!
//! if calibration.finished() {
//!     let room_se3_camera = calibration.room_to_camera();
//!     # let _ = room_se3_camera;
//! }
//! # Ok(())
//! # }
//! ```

pub mod completeness;
pub mod room_calibration;

pub use crate::completeness::{
    CompletenessError, CompletenessOptions, ImuStatus, TrackedImu, TrackingSystemSnapshot,
    TrackingSystemView, is_room_calibration_complete,
};
pub use crate::room_calibration::{
    GuidanceEvent, InstructionState, RoomCalibration, RoomCalibrationConfig,
};

// Re-export from room-calibration-core for convenience
pub use room_calibration_core::{
    BodyId, BodyTargetId, Iso3, OneEuroParams, Quat, Real, TargetId, TimeValue, Vec3,
};
