//! Seconds + microseconds timestamps.
//!
//! [`TimeValue`] mirrors the classic `timeval` layout used by tracking
//! back-ends. Values are kept normalized: `|microseconds| < 1_000_000` and,
//! when both fields are non-zero, they share the same sign.

use crate::Real;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::{Duration, SystemTime};

const USEC_PER_SEC: i64 = 1_000_000;

/// A timestamp (or signed time span) with microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TimeValue {
    pub seconds: i64,
    pub microseconds: i32,
}

impl TimeValue {
    /// Create a normalized time value.
    pub fn new(seconds: i64, microseconds: i64) -> Self {
        Self::normalized(seconds, microseconds)
    }

    /// Create a time value from fractional seconds, rounded to the microsecond.
    pub fn from_seconds_f64(seconds: Real) -> Self {
        let whole = seconds.trunc();
        let micros = ((seconds - whole) * USEC_PER_SEC as Real).round();
        Self::normalized(whole as i64, micros as i64)
    }

    /// Convert an unsigned [`Duration`] (e.g. time since the Unix epoch).
    pub fn from_duration(d: Duration) -> Self {
        let seconds = i64::try_from(d.as_secs()).unwrap_or(i64::MAX);
        Self::normalized(seconds, i64::from(d.subsec_micros()))
    }

    /// Current wall-clock time relative to the Unix epoch.
    pub fn now() -> Self {
        match SystemTime::now().duration_since(SystemTime::UNIX_EPOCH) {
            Ok(since_epoch) => Self::from_duration(since_epoch),
            // Clock set before 1970: represent it as a negative offset.
            Err(err) => Self::default() - Self::from_duration(err.duration()),
        }
    }

    /// Total value in fractional seconds.
    pub fn as_seconds_f64(&self) -> Real {
        self.seconds as Real + Real::from(self.microseconds) / USEC_PER_SEC as Real
    }

    /// Bring `microseconds` into range and make both fields agree in sign.
    pub fn normalize(&mut self) {
        *self = Self::normalized(self.seconds, i64::from(self.microseconds));
    }

    fn normalized(mut seconds: i64, mut microseconds: i64) -> Self {
        let carry = microseconds / USEC_PER_SEC;
        seconds += carry;
        microseconds -= carry * USEC_PER_SEC;
        if seconds > 0 && microseconds < 0 {
            seconds -= 1;
            microseconds += USEC_PER_SEC;
        } else if seconds < 0 && microseconds > 0 {
            seconds += 1;
            microseconds -= USEC_PER_SEC;
        }
        Self {
            seconds,
            // |microseconds| < USEC_PER_SEC here, so the cast is lossless.
            microseconds: microseconds as i32,
        }
    }
}

impl Add for TimeValue {
    type Output = TimeValue;

    fn add(self, rhs: TimeValue) -> TimeValue {
        Self::normalized(
            self.seconds + rhs.seconds,
            i64::from(self.microseconds) + i64::from(rhs.microseconds),
        )
    }
}

impl Sub for TimeValue {
    type Output = TimeValue;

    fn sub(self, rhs: TimeValue) -> TimeValue {
        Self::normalized(
            self.seconds - rhs.seconds,
            i64::from(self.microseconds) - i64::from(rhs.microseconds),
        )
    }
}

/// Signed elapsed seconds from `earlier` to `later`.
///
/// Negative when `later` actually precedes `earlier`.
pub fn duration(later: &TimeValue, earlier: &TimeValue) -> Real {
    (*later - *earlier).as_seconds_f64()
}
