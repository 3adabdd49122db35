//! Departure ranking for the board.
//!
//! Orders departures so the most relevant ones (about to leave, on the
//! road) show first.

use crate::domain::Departure;

/// Rank departures for display.
///
/// Departures are ranked by:
/// 1. Phase display rank (approaching, in transit, waiting, finished)
/// 2. Scheduled departure (earlier is better)
///
/// The sort is stable: departures tying on both keys keep their input
/// order, so rows do not swap places between refreshes.
pub fn rank_departures(mut departures: Vec<Departure>) -> Vec<Departure> {
    departures.sort_by_key(|d| (d.phase.display_rank(), d.window.scheduled));
    departures
}
