use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_board::cache::{CacheConfig, CachedSchedules};
use transit_board::engine::EngineConfig;
use transit_board::sampler::{LiveSampler, SystemClock};
use transit_board::source::ScheduleStore;
use transit_board::web::{AppState, create_router};

/// How often to re-read the schedule file (5 minutes).
const SCHEDULE_RELOAD_INTERVAL: Duration = Duration::from_secs(5 * 60);

const DEFAULT_SCHEDULES: &str = "schedules.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transit_board=info")),
        )
        .init();

    let config = EngineConfig::from_env()?;

    // Load schedules (fail fast if unreadable)
    let path = std::env::var("TRANSIT_SCHEDULES").unwrap_or_else(|_| DEFAULT_SCHEDULES.to_string());
    let store = ScheduleStore::load(&path)?;

    // Start the refresh loop
    let schedules = CachedSchedules::new(store.clone(), &CacheConfig::default());
    let sampler = LiveSampler::new(schedules, Arc::new(SystemClock), config)
        .spawn()
        .await;

    // Spawn background task to re-read the schedule file
    let store_refresh = store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SCHEDULE_RELOAD_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match store_refresh.reload().await {
                Ok(count) => info!(lines = count, "reloaded schedules"),
                Err(e) => warn!(error = %e, "failed to reload schedules, keeping previous"),
            }
        }
    });

    let state = AppState::new(sampler, store);
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = match std::env::var("TRANSIT_ADDR") {
        Ok(addr) => addr.parse()?,
        Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
    };
    info!(%addr, "departure board listening");
    info!("  GET  /health");
    info!("  GET  /departures");
    info!("  GET  /lines/:line_id/departures/:time/progress");
    info!("  GET  /lines/:line_id/departures/:time/marker");
    info!("  POST /schedules/reload");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
