//! Data transfer objects for web responses.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{Departure, Phase};
use crate::engine::{Progress, progress_at};

/// Format used for full timestamps in responses.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A departure row on the board.
#[derive(Debug, Serialize)]
pub struct DepartureResult {
    /// Line identifier
    pub line_id: String,

    /// Line display name
    pub line_name: String,

    /// Line code shown on the vehicle
    pub line_code: String,

    /// Origin endpoint label
    pub point_a: String,

    /// Destination endpoint label
    pub point_b: String,

    /// Operator contact phone
    pub phone: Option<String>,

    /// Scheduled departure (HH:MM)
    pub scheduled: String,

    /// Expected arrival at point B (HH:MM)
    pub arrival: String,

    /// Lifecycle phase
    pub phase: Phase,

    /// Marker progress at the time of evaluation
    pub progress: Progress,
}

impl DepartureResult {
    /// Convert a departure, evaluating phase and progress at `at`.
    pub fn at(departure: &Departure, at: NaiveDateTime) -> Self {
        let line = &departure.line;
        Self {
            line_id: line.id.to_string(),
            line_name: line.line_name.clone(),
            line_code: line.line_code.clone(),
            point_a: line.point_a.clone(),
            point_b: line.point_b.clone(),
            phone: line.phone.clone(),
            scheduled: departure.scheduled().format("%H:%M").to_string(),
            arrival: departure.arrival().format("%H:%M").to_string(),
            phase: departure.window.phase_at(at),
            progress: progress_at(&departure.window, at),
        }
    }
}

/// Response for the departure board.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// Instant the board was computed for
    pub generated_at: String,

    /// Ranked departures
    pub departures: Vec<DepartureResult>,
}

/// Response for a single polled progress sample.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    /// Instant the sample was taken
    pub sampled_at: String,

    /// Whether the marker should be drawn
    pub visible: bool,

    /// The sampled departure
    #[serde(flatten)]
    pub departure: DepartureResult,
}

/// Response for a schedule reload.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// Number of lines in the new snapshot
    pub lines: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Format a timestamp for responses.
pub fn timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
