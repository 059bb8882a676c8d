//! Smoothing filters for tracked signals.

pub mod one_euro;

pub use one_euro::{OneEuroFilter, OneEuroParams, OneEuroSignal, smoothing_alpha};
