//! Classification of departure instants into lifecycle phases.

use std::sync::Arc;

use chrono::NaiveDateTime;

use super::config::EngineConfig;
use crate::domain::{Departure, DepartureWindow, LineSchedule};

/// Build the window around one scheduled instant using configured durations.
pub fn window_for(scheduled: NaiveDateTime, config: &EngineConfig) -> DepartureWindow {
    DepartureWindow::new(scheduled, config.travel(), config.approach())
}

/// Classify every instant of one line against `now`.
///
/// Pure: the same inputs always give the same departures, in the order of
/// `instants`. Windows of consecutive runs may overlap when the approach
/// window is longer than the headway; each run is classified on its own.
pub fn classify(
    line: &Arc<LineSchedule>,
    instants: &[NaiveDateTime],
    now: NaiveDateTime,
    config: &EngineConfig,
) -> Vec<Departure> {
    instants
        .iter()
        .map(|&scheduled| {
            let window = window_for(scheduled, config);
            Departure {
                line: Arc::clone(line),
                window,
                phase: window.phase_at(now),
            }
        })
        .collect()
}
