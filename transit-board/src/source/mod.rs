//! Schedule snapshots supplied by the data layer.
//!
//! The data layer is external; here it is represented by a JSON file of
//! line records that can be re-read while the service runs.

mod error;
mod store;

pub use error::SourceError;
pub use store::{ScheduleStore, Snapshot};
