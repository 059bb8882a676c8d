//! Room-to-camera calibration from a held-still tracked body.
//!
//! The tracking loop pushes IMU orientations and video target poses into a
//! [`RoomCalibration`] as they arrive. The engine pairs the IMU's room-space
//! orientation with the camera-space pose of a target on the same body,
//! smooths the resulting camera-in-room estimate and waits for the user to
//! hold still long enough.
//!
//! # Example
//!
//! ```
//! use room_calibration_core::{BodyId, BodyTargetId, Quat, TargetId, TimeValue, Vec3};
//! use room_calibration_pipeline::room_calibration::{RoomCalibration, RoomCalibrationConfig};
//! # fn main() -> anyhow::Result<()> {
//!
//! let start = TimeValue::new(100, 0);
//! let mut calibration = RoomCalibration::with_start_time(RoomCalibrationConfig::default(), start)?;
//!
//! let hmd = BodyId(0);
//! calibration.process_imu_data(hmd, &start, &Quat::identity());
//!
//! let target = BodyTargetId::new(hmd, TargetId(0));
//! for frame in 1..=10 {
//!     let timestamp = TimeValue::new(100, frame * 16_000);
//!     for event in calibration.process_video_data(
//!         &target,
//!         &timestamp,
//!         &Vec3::new(0.0, 0.0, 0.25),
//!         &Quat::identity(),
//!     ) {
//!         println!("{event}");
//!     }
//! }
//!
//! assert!(calibration.finished());
//! let room_se3_camera = calibration.room_to_camera();
//! # let _ = room_se3_camera;
//! # Ok(())
//! # }
//! ```
//!
//! # Conventions
//!
//! - **Video pose**: `camera_se3_target` (T_C_T) - target in camera frame
//! - **IMU orientation**: rotation of `room_se3_target` (T_R_T)
//! - **Result**: `room_se3_camera` (T_R_C) - camera in room frame

mod config;
mod engine;
mod guidance;

pub use config::RoomCalibrationConfig;
pub use engine::RoomCalibration;
pub use guidance::{GuidanceEvent, InstructionState};
