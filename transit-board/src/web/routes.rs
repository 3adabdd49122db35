//! HTTP route handlers.

use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures::stream::{self, Stream};
use tracing::{debug, warn};

use crate::domain::{ClockTime, DepartureKey, LineId};
use crate::source::SourceError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/departures", get(list_departures))
        .route(
            "/lines/:line_id/departures/:time/progress",
            get(departure_progress),
        )
        .route(
            "/lines/:line_id/departures/:time/marker",
            get(marker_stream),
        )
        .route("/schedules/reload", post(reload_schedules))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Current ranked departure board.
async fn list_departures(State(state): State<AppState>) -> Json<BoardResponse> {
    let board = state.sampler.board();
    let departures = board
        .departures
        .iter()
        .map(|d| DepartureResult::at(d, board.generated_at))
        .collect();

    Json(BoardResponse {
        generated_at: timestamp(board.generated_at),
        departures,
    })
}

/// Resolve a path's line id and "HH:MM" against the current board date.
fn departure_key(state: &AppState, line_id: String, time: &str) -> Result<DepartureKey, AppError> {
    let time = ClockTime::parse_hhmm(time).map_err(|e| AppError::BadRequest {
        message: format!("Invalid departure time {time:?}: {e}"),
    })?;
    let date = state.sampler.board().generated_at.date();

    Ok(DepartureKey {
        line_id: LineId::new(line_id),
        scheduled: time.on(date),
    })
}

/// One progress sample for a departure, evaluated now.
async fn departure_progress(
    State(state): State<AppState>,
    Path((line_id, time)): Path<(String, String)>,
) -> Result<Json<ProgressResponse>, AppError> {
    let key = departure_key(&state, line_id, &time)?;
    let board = state.sampler.board();

    let departure = board.find(&key).ok_or_else(|| AppError::NotFound {
        message: format!("No departure of line {} at {time} today", key.line_id),
    })?;

    let now = state.sampler.now();
    let result = DepartureResult::at(departure, now);

    Ok(Json(ProgressResponse {
        sampled_at: timestamp(now),
        visible: result.progress.is_visible(),
        departure: result,
    }))
}

/// Server-sent stream of smoothed marker frames.
///
/// The follower lives inside the stream; when the client disconnects the
/// stream is dropped and the follower's timers stop with it.
async fn marker_stream(
    State(state): State<AppState>,
    Path((line_id, time)): Path<(String, String)>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let key = departure_key(&state, line_id, &time)?;
    let follower = state.sampler.follow(key);
    debug!(
        line = %follower.key().line_id,
        scheduled = %follower.key().scheduled,
        "marker stream opened"
    );

    let frames = stream::unfold(follower, |mut follower| async move {
        let frame = follower.next_frame().await?;
        let event = Event::default()
            .event("marker")
            .json_data(&frame)
            .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
        Some((Ok(event), follower))
    });

    Ok(Sse::new(frames).keep_alive(KeepAlive::default()))
}

/// Re-read the schedule file.
async fn reload_schedules(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let lines = state.store.reload().await?;
    Ok(Json(ReloadResponse { lines }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SourceError> for AppError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::NoBackingFile => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
