//! Application state for the web layer.

use std::sync::Arc;

use crate::sampler::SamplerHandle;
use crate::source::ScheduleStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Running departure sampler
    pub sampler: Arc<SamplerHandle>,

    /// Schedule snapshot, for on-demand reloads
    pub store: ScheduleStore,
}

impl AppState {
    /// Create a new app state.
    pub fn new(sampler: SamplerHandle, store: ScheduleStore) -> Self {
        Self {
            sampler: Arc::new(sampler),
            store,
        }
    }
}
