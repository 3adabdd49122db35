//! Real-time transit departure board.
//!
//! Expands per-line timetables into today's departures, classifies each
//! one against the clock, ranks them for display, and tracks a selected
//! vehicle's position between its two endpoints.

pub mod cache;
pub mod domain;
pub mod engine;
pub mod sampler;
pub mod source;
pub mod web;
