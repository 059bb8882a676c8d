//! Core primitives for room-to-camera calibration.
//!
//! This crate provides the foundational building blocks used by the
//! calibration engine in `room-calibration-pipeline`:
//!
//! - linear algebra type aliases (`Real`, `Vec3`, `Quat`, `Iso3`),
//! - identifiers for tracked bodies and their visual targets,
//! - a seconds + microseconds [`TimeValue`] with signed durations,
//! - a one-euro adaptive smoothing filter for positions and orientations.
//!
//! # Example
//!
//! ```
//! use room_calibration_core::{TimeValue, duration};
//!
//! let a = TimeValue::new(10, 0);
//! let b = TimeValue::new(10, 16_000);
//! assert!((duration(&b, &a) - 0.016).abs() < 1e-12);
//! ```

/// Smoothing filters.
pub mod filter;
/// Body and target identifiers.
mod ids;
/// Linear algebra type aliases and helpers.
mod math;
/// Timestamps and time arithmetic.
mod time;

pub use filter::{OneEuroFilter, OneEuroParams, OneEuroSignal};
pub use ids::*;
pub use math::*;
pub use time::*;
