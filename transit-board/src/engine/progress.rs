//! Position interpolation for the vehicle marker.
//!
//! The marker travels two legs: an approach leg before point A, counted
//! from -100 up to 0, and a transit leg from point A to point B, counted
//! from 0 up to 100. Values outside that range mean the vehicle is not
//! shown yet (-101) or has arrived (101). Pixel placement is left to the
//! client; this value is the only source of truth for position.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::DepartureWindow;

/// Normalized marker position in `[-101, 101]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Progress(f64);

impl Progress {
    /// Approach window has not opened.
    pub const NOT_STARTED: Progress = Progress(-101.0);

    /// Vehicle has reached point B.
    pub const ARRIVED: Progress = Progress(101.0);

    /// Start of the approach leg.
    pub const APPROACH_START: Progress = Progress(-100.0);

    /// Vehicle is at point A.
    pub const AT_ORIGIN: Progress = Progress(0.0);

    /// Wrap a raw value, clamping it into `[-101, 101]`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::NOT_STARTED;
        }
        Progress(value.clamp(Self::NOT_STARTED.0, Self::ARRIVED.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the marker should be drawn at all.
    pub fn is_visible(self) -> bool {
        self.0 > Self::NOT_STARTED.0 && self.0 < Self::ARRIVED.0
    }
}

/// Compute the marker position of a departure at `now`.
///
/// # Examples
///
/// ```
/// use transit_board::domain::DepartureWindow;
/// use transit_board::engine::progress_at;
/// use chrono::{Duration, NaiveDate};
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
/// let w = DepartureWindow::new(
///     day.and_hms_opt(6, 0, 0).unwrap(),
///     Duration::minutes(45),
///     Duration::minutes(60),
/// );
///
/// assert_eq!(progress_at(&w, day.and_hms_opt(4, 0, 0).unwrap()).value(), -101.0);
/// assert_eq!(progress_at(&w, day.and_hms_opt(5, 30, 0).unwrap()).value(), -50.0);
/// assert_eq!(progress_at(&w, day.and_hms_opt(6, 0, 0).unwrap()).value(), 0.0);
/// assert_eq!(progress_at(&w, day.and_hms_opt(7, 0, 0).unwrap()).value(), 101.0);
/// ```
pub fn progress_at(window: &DepartureWindow, now: NaiveDateTime) -> Progress {
    if now < window.approach_start {
        return Progress::NOT_STARTED;
    }
    if now >= window.arrival {
        return Progress::ARRIVED;
    }

    if now < window.scheduled {
        match leg_fraction(window.approach_start, window.scheduled, now) {
            Some(f) => Progress::new(f * 100.0 - 100.0),
            None => Progress::APPROACH_START,
        }
    } else {
        match leg_fraction(window.scheduled, window.arrival, now) {
            Some(f) => Progress::new(f * 100.0),
            None => Progress::AT_ORIGIN,
        }
    }
}

/// Fraction of `[start, end)` elapsed at `now`, or `None` for an empty leg.
fn leg_fraction(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> Option<f64> {
    let span = (end - start).num_milliseconds();
    if span <= 0 {
        return None;
    }
    let elapsed = (now - start).num_milliseconds();
    Some(elapsed as f64 / span as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn window(h: u32, m: u32) -> DepartureWindow {
        DepartureWindow::new(at(h, m), Duration::minutes(45), Duration::minutes(60))
    }

    fn assert_close(actual: Progress, expected: f64) {
        assert!(
            (actual.value() - expected).abs() < 1e-9,
            "expected {expected}, got {}",
            actual.value()
        );
    }

    #[test]
    fn before_approach_is_not_started() {
        let w = window(7, 30);
        assert_eq!(progress_at(&w, at(6, 29)), Progress::NOT_STARTED);
        assert!(!progress_at(&w, at(6, 29)).is_visible());
    }

    #[test]
    fn approach_leg_counts_up_to_zero() {
        let w = window(7, 30);
        assert_close(progress_at(&w, at(6, 30)), -100.0);
        assert_close(progress_at(&w, at(7, 0)), -50.0);
        assert_close(progress_at(&w, at(7, 15)), -25.0);
    }

    #[test]
    fn transit_leg_counts_up_to_hundred() {
        let w = window(6, 0);
        assert_close(progress_at(&w, at(6, 0)), 0.0);
        assert_close(progress_at(&w, at(6, 15)), 100.0 / 3.0);
        assert_close(progress_at(&w, at(6, 30)), 200.0 / 3.0);
    }

    #[test]
    fn at_or_after_arrival_is_arrived() {
        let w = window(6, 0);
        assert_eq!(progress_at(&w, at(6, 45)), Progress::ARRIVED);
        assert_eq!(progress_at(&w, at(12, 0)), Progress::ARRIVED);
    }

    #[test]
    fn sub_minute_resolution() {
        let w = window(6, 0);
        let now = at(6, 0) + Duration::seconds(27);
        assert_close(progress_at(&w, now), 1.0);
    }

    #[test]
    fn zero_approach_window_does_not_divide_by_zero() {
        let w = DepartureWindow::new(at(6, 0), Duration::minutes(45), Duration::zero());
        assert_eq!(progress_at(&w, at(5, 59)), Progress::NOT_STARTED);
        assert_close(progress_at(&w, at(6, 0)), 0.0);
    }

    #[test]
    fn zero_travel_does_not_divide_by_zero() {
        let w = DepartureWindow::new(at(6, 0), Duration::zero(), Duration::minutes(60));
        assert_close(progress_at(&w, at(5, 30)), -50.0);
        assert_eq!(progress_at(&w, at(6, 0)), Progress::ARRIVED);
    }

    #[test]
    fn hand_built_windows_stay_bounded() {
        // Hand-built windows bypassing the constructor
        let empty_approach = DepartureWindow {
            approach_start: at(6, 0),
            scheduled: at(6, 0),
            arrival: at(6, 45),
        };
        assert_close(progress_at(&empty_approach, at(6, 10)), 100.0 * 10.0 / 45.0);

        let degenerate = DepartureWindow {
            approach_start: at(5, 0),
            scheduled: at(7, 0),
            arrival: at(6, 0),
        };
        // now >= arrival wins before any leg arithmetic
        assert_eq!(progress_at(&degenerate, at(6, 30)), Progress::ARRIVED);
        assert_close(progress_at(&degenerate, at(5, 30)), -75.0);
    }

    #[test]
    fn new_clamps_and_rejects_nan() {
        assert_eq!(Progress::new(500.0), Progress::ARRIVED);
        assert_eq!(Progress::new(-500.0), Progress::NOT_STARTED);
        assert_eq!(Progress::new(f64::NAN), Progress::NOT_STARTED);
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Progress::new(12.5)).unwrap(), "12.5");
    }
}
