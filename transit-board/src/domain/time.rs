//! Time-of-day handling for bus timetables.
//!
//! Timetables list departures as "HH:MM" strings, but the source data is
//! loosely formatted: an entry may hold several times, trailing notes, or
//! a sentinel such as "não operacional". This module validates single
//! times strictly and extracts every valid time from free text.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A validated 24-hour time of day with minute resolution.
///
/// # Examples
///
/// ```
/// use transit_board::domain::ClockTime;
///
/// let t = ClockTime::parse_hhmm("07:30").unwrap();
/// assert_eq!(t.hour(), 7);
/// assert_eq!(t.minute(), 30);
/// assert_eq!(t.to_string(), "07:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Build a time from hour and minute, if both are in range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse a time from strict "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_board::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("6:0").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// assert!(ClockTime::parse_hhmm("12:60").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Self::from_hm(hour, minute).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Anchor this time of day on a calendar date.
    ///
    /// Seconds and sub-seconds are always zero.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Extract every valid time of day from a free-text timetable entry.
///
/// The entry is scanned left to right for `DD:DD` runs. Each run is
/// consumed whole, whether or not it is in range, so matches never overlap:
/// `"06:0007:00"` yields both times and `"106:00"` yields `06:00`. Runs out
/// of range are dropped. The result keeps the order of appearance.
///
/// # Examples
///
/// ```
/// use transit_board::domain::extract_clock_times;
///
/// let times = extract_clock_times("06:00 / 06:40 (via centro)");
/// assert_eq!(times.len(), 2);
///
/// assert!(extract_clock_times("não operacional").is_empty());
/// assert!(extract_clock_times("6:0").is_empty());
/// ```
pub fn extract_clock_times(entry: &str) -> Vec<ClockTime> {
    let bytes = entry.as_bytes();
    let mut found = Vec::new();
    if bytes.len() < 5 {
        return found;
    }

    let mut i = 0;
    while i + 5 <= bytes.len() {
        let window = &bytes[i..i + 5];
        let digits = parse_two_digits(&window[0..2]).zip(parse_two_digits(&window[3..5]));

        match digits {
            Some((hour, minute)) if window[2] == b':' => {
                if let Some(time) = ClockTime::from_hm(hour, minute) {
                    found.push(time);
                }
                i += 5;
            }
            _ => i += 1,
        }
    }

    found
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
