//! User guidance emitted while calibrating.
//!
//! The engine never writes to a console. Instead every call that changes
//! what the user should see returns [`GuidanceEvent`]s; hosts render them
//! (their `Display` text is ready for a terminal) or ignore them.

use room_calibration_core::Real;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far the user has been instructed about positioning.
///
/// Only ever advances `Uninstructed -> ToldToMoveCloser -> ToldDistanceIsGood`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum InstructionState {
    #[default]
    Uninstructed,
    ToldToMoveCloser,
    ToldDistanceIsGood,
}

impl InstructionState {
    /// Update on a sample that was moving too fast, observed at `depth`
    /// (distance along the camera's optical axis).
    ///
    /// Returns the instruction to show when the state advances.
    pub fn advance(
        &mut self,
        depth: Real,
        near_cutoff: Real,
        confirm_cutoff: Real,
    ) -> Option<GuidanceEvent> {
        match self {
            InstructionState::Uninstructed if depth > near_cutoff => {
                *self = InstructionState::ToldToMoveCloser;
                Some(GuidanceEvent::MoveCloser {
                    cutoff: near_cutoff,
                })
            }
            InstructionState::ToldToMoveCloser if depth < confirm_cutoff => {
                *self = InstructionState::ToldDistanceIsGood;
                Some(GuidanceEvent::DistanceIsGood)
            }
            _ => None,
        }
    }

    /// True once no further instruction can be emitted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstructionState::ToldDistanceIsGood)
    }
}

/// Something the user should be told about calibration progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GuidanceEvent {
    /// First still sample of a streak.
    CalibrationStarted,
    /// One more consecutive still sample was collected.
    Progress { reports: usize, required: usize },
    /// The streak reached the required length.
    Finished,
    /// Motion broke a streak of `reports` still samples.
    Interrupted { reports: usize },
    /// Target is too far; ask the user to come within `cutoff`.
    MoveCloser { cutoff: Real },
    /// Target came close enough after being told to move closer.
    DistanceIsGood,
}

impl GuidanceEvent {
    /// Positioning instructions, as opposed to progress reporting.
    pub fn is_instruction(&self) -> bool {
        matches!(
            self,
            GuidanceEvent::MoveCloser { .. } | GuidanceEvent::DistanceIsGood
        )
    }
}

impl fmt::Display for GuidanceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuidanceEvent::CalibrationStarted => {
                write!(f, "Hold still, performing room calibration")
            }
            GuidanceEvent::Progress { .. } => write!(f, "."),
            GuidanceEvent::Finished => write!(f, "Room calibration complete"),
            GuidanceEvent::Interrupted { reports } => write!(
                f,
                "Movement detected after {reports} still samples, room calibration restarted"
            ),
            GuidanceEvent::MoveCloser { cutoff } => write!(
                f,
                "NOTE: For best results, during tracker/server startup, hold your head/HMD \
                 still closer than {cutoff} meters from the tracking camera for a few \
                 seconds, then rotate slowly in all directions."
            ),
            GuidanceEvent::DistanceIsGood => {
                write!(f, "That distance looks good, hold it right there.")
            }
        }
    }
}
