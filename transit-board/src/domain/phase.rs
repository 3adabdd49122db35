//! Lifecycle phase of a departure.

use serde::Serialize;

/// Where a departure is in its lifecycle relative to "now".
///
/// Two orders matter and neither is the derive order, so `Phase` is not
/// `Ord`:
/// - temporal: `Waiting -> Approaching -> InTransit -> Finished`
/// - display: `Approaching, InTransit, Waiting, Finished`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Approach window has not opened yet.
    Waiting,
    /// Inside the approach window, before the scheduled departure.
    Approaching,
    /// Departed, not yet arrived.
    InTransit,
    /// Arrival time has passed.
    Finished,
}

impl Phase {
    /// Rank used to order a departure board (lower shows first).
    pub fn display_rank(self) -> u8 {
        match self {
            Phase::Approaching => 1,
            Phase::InTransit => 2,
            Phase::Waiting => 3,
            Phase::Finished => 4,
        }
    }

    /// Position in the lifecycle (0 = waiting, 3 = finished).
    pub fn temporal_index(self) -> u8 {
        match self {
            Phase::Waiting => 0,
            Phase::Approaching => 1,
            Phase::InTransit => 2,
            Phase::Finished => 3,
        }
    }
}
