//! Domain types for the departure board.
//!
//! Validated value types shared by the engine, the sampler and the web
//! layer. Schedules come from the data layer as-is; everything derived
//! from them (times, windows, phases) is checked at construction.

mod departure;
mod phase;
mod schedule;
mod time;

pub use departure::{Departure, DepartureKey, DepartureWindow};
pub use phase::Phase;
pub use schedule::{BucketScheme, DayBucket, LineId, LineSchedule};
pub use time::{ClockTime, TimeError, extract_clock_times};
