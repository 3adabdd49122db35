//! Concrete departures derived from a schedule.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};

use super::{LineId, LineSchedule, Phase};

/// The three instants bounding one run of a line.
///
/// `approach_start <= scheduled <= arrival` always holds for windows built
/// with [`DepartureWindow::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepartureWindow {
    pub approach_start: NaiveDateTime,
    pub scheduled: NaiveDateTime,
    pub arrival: NaiveDateTime,
}

impl DepartureWindow {
    /// Derive the window around a scheduled departure.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_board::domain::DepartureWindow;
    /// use chrono::{Duration, NaiveDate};
    ///
    /// let dep = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap().and_hms_opt(7, 30, 0).unwrap();
    /// let w = DepartureWindow::new(dep, Duration::minutes(45), Duration::minutes(60));
    ///
    /// assert_eq!(w.approach_start.format("%H:%M").to_string(), "06:30");
    /// assert_eq!(w.arrival.format("%H:%M").to_string(), "08:15");
    /// ```
    ///
    /// Negative durations count as zero. Instants beyond the calendar range
    /// saturate at its ends instead of overflowing.
    pub fn new(scheduled: NaiveDateTime, travel: Duration, approach: Duration) -> Self {
        let travel = travel.max(Duration::zero());
        let approach = approach.max(Duration::zero());

        Self {
            approach_start: scheduled
                .checked_sub_signed(approach)
                .unwrap_or(NaiveDateTime::MIN),
            scheduled,
            arrival: scheduled
                .checked_add_signed(travel)
                .unwrap_or(NaiveDateTime::MAX),
        }
    }

    /// Classify this window against "now".
    pub fn phase_at(&self, now: NaiveDateTime) -> Phase {
        if now >= self.arrival {
            Phase::Finished
        } else if now >= self.scheduled {
            Phase::InTransit
        } else if now >= self.approach_start {
            Phase::Approaching
        } else {
            Phase::Waiting
        }
    }
}

/// Stable identity of a departure across recomputations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepartureKey {
    pub line_id: LineId,
    pub scheduled: NaiveDateTime,
}

/// One classified run of a line for today.
///
/// Departures are rebuilt wholesale on every tick and never mutated.
#[derive(Debug, Clone)]
pub struct Departure {
    pub line: Arc<LineSchedule>,
    pub window: DepartureWindow,
    pub phase: Phase,
}

impl Departure {
    pub fn key(&self) -> DepartureKey {
        DepartureKey {
            line_id: self.line.id.clone(),
            scheduled: self.window.scheduled,
        }
    }

    pub fn scheduled(&self) -> NaiveDateTime {
        self.window.scheduled
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.window.arrival
    }
}
