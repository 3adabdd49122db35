//! Departure engine.
//!
//! Turns recurring timetables and an explicit "now" into a ranked board of
//! classified departures, and computes marker progress for one of them.
//! Every function here is pure; reading the wall clock is the sampler's job.

mod board;
mod classify;
mod config;
mod expand;
mod progress;
mod rank;

pub use board::{Board, build_board};
pub use classify::{classify, window_for};
pub use config::{ConfigError, EngineConfig};
pub use expand::expand_schedule;
pub use progress::{Progress, progress_at};
pub use rank::rank_departures;
