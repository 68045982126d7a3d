//! Validity and pruning rules for candidate states.
//!
//! A candidate becomes live only if it passes every check, in this order:
//! move pattern, flashlight consistency, occupied flashlight side, time
//! budget, and finally domination against the visited registry. A failed
//! check discards the candidate for good; nothing is repaired.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::VisitedRegistry;
use crate::state::{MoveKind, SearchState, Side};

/// Category of a pruned candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    InvalidMovePattern,
    FlashlightLocationInconsistent,
    FlashlightViolation,
    TimeLimitExceeded,
    DuplicateState,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 5] = [
        ViolationKind::InvalidMovePattern,
        ViolationKind::FlashlightLocationInconsistent,
        ViolationKind::FlashlightViolation,
        ViolationKind::TimeLimitExceeded,
        ViolationKind::DuplicateState,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::InvalidMovePattern => "INVALID_MOVE_PATTERN",
            ViolationKind::FlashlightLocationInconsistent => "FLASHLIGHT_LOCATION_INCONSISTENT",
            ViolationKind::FlashlightViolation => "FLASHLIGHT_VIOLATION",
            ViolationKind::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            ViolationKind::DuplicateState => "DUPLICATE_STATE",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a candidate was discarded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("invalid move: {kind} with {count} people")]
    InvalidMovePattern { kind: MoveKind, count: usize },

    #[error("flashlight at {device} side after {kind} move")]
    FlashlightLocationInconsistent { kind: MoveKind, device: Side },

    #[error("flashlight on {side} side with no people present")]
    FlashlightViolation { side: Side },

    #[error("state time {elapsed} exceeds limit of {max_time} minutes")]
    TimeLimitExceeded { elapsed: f64, max_time: f64 },

    #[error("duplicate state found - keeping better time {best} over {elapsed}")]
    DuplicateState { best: f64, elapsed: f64 },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::InvalidMovePattern { .. } => ViolationKind::InvalidMovePattern,
            Violation::FlashlightLocationInconsistent { .. } => {
                ViolationKind::FlashlightLocationInconsistent
            }
            Violation::FlashlightViolation { .. } => ViolationKind::FlashlightViolation,
            Violation::TimeLimitExceeded { .. } => ViolationKind::TimeLimitExceeded,
            Violation::DuplicateState { .. } => ViolationKind::DuplicateState,
        }
    }
}

/// How a candidate got past the domination check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First or strictly cheapest arrival at its configuration
    Improved,
    /// Matches the best known time; kept but not expanded
    Tied,
}

/// Cross moves carry two people, or one when the last person leaves the
/// near side. Return moves carry exactly one.
pub fn check_move_pattern(state: &SearchState) -> Result<(), Violation> {
    let Some(mv) = state.last_move() else {
        return Ok(());
    };
    let count = mv.actors.len();
    let valid = match mv.kind {
        MoveKind::Cross => count == 2 || (count == 1 && state.near.is_empty()),
        MoveKind::Return => count == 1,
    };
    if valid {
        Ok(())
    } else {
        Err(Violation::InvalidMovePattern {
            kind: mv.kind,
            count,
        })
    }
}

/// The flashlight must end on the side the last move went to
pub fn check_flashlight_consistency(state: &SearchState) -> Result<(), Violation> {
    let expected = state
        .last_move()
        .map_or(Side::Near, |mv| mv.kind.destination());
    if state.device == expected {
        return Ok(());
    }
    match state.last_move() {
        Some(mv) => Err(Violation::FlashlightLocationInconsistent {
            kind: mv.kind,
            device: state.device,
        }),
        // The initial state has no move to be consistent with
        None => Err(Violation::FlashlightViolation { side: state.device }),
    }
}

/// The flashlight can only be where somebody is holding it
pub fn check_flashlight_occupied(state: &SearchState) -> Result<(), Violation> {
    if state.occupants(state.device).is_empty() {
        Err(Violation::FlashlightViolation { side: state.device })
    } else {
        Ok(())
    }
}

pub fn check_time_limit(state: &SearchState, max_time: f64) -> Result<(), Violation> {
    if state.elapsed_time > max_time {
        Err(Violation::TimeLimitExceeded {
            elapsed: state.elapsed_time,
            max_time,
        })
    } else {
        Ok(())
    }
}

/// Checks that need nothing but the candidate itself
pub fn check_structure(state: &SearchState, max_time: f64) -> Result<(), Violation> {
    check_move_pattern(state)?;
    check_flashlight_consistency(state)?;
    check_flashlight_occupied(state)?;
    check_time_limit(state, max_time)
}

/// Fails if the registry already holds a strictly better time
pub fn check_superseded(state: &SearchState, registry: &VisitedRegistry) -> Result<(), Violation> {
    match registry.lookup(&state.key()) {
        Some(best) if best < state.elapsed_time => Err(Violation::DuplicateState {
            best,
            elapsed: state.elapsed_time,
        }),
        _ => Ok(()),
    }
}

/// Run every check and, on success, record the candidate's time.
pub fn admit(
    state: &SearchState,
    registry: &mut VisitedRegistry,
    max_time: f64,
) -> Result<Admission, Violation> {
    check_structure(state, max_time)?;
    check_superseded(state, registry)?;

    if registry.update(state.key(), state.elapsed_time) {
        Ok(Admission::Improved)
    } else {
        Ok(Admission::Tied)
    }
}
