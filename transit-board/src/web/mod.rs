//! Web layer for the departure board.
//!
//! Provides HTTP endpoints for the ranked board, per-departure progress
//! and a live marker stream.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
