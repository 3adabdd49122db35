//! Live sampling of the departure board.
//!
//! Two timers drive the engine against the wall clock:
//! - a coarse refresh that rebuilds the whole board from the latest
//!   schedule snapshot and publishes it;
//! - for a followed departure only, a progress sampler on the same cadence
//!   plus a fast frame timer that eases the displayed marker between
//!   samples.
//!
//! Both are plain recomputations from the latest "now", so a late or
//! skipped tick only leaves a slightly stale value until the next one.
//! Timers live in tokio tasks that are aborted when their owner drops.

mod clock;
mod tween;

pub use clock::{Clock, ManualClock, SystemClock};
pub use tween::{Easing, Tween};

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::cache::CachedSchedules;
use crate::domain::{DepartureKey, Phase};
use crate::engine::{Board, EngineConfig, Progress, progress_at};

/// Builds and starts the refresh loop.
pub struct LiveSampler {
    schedules: CachedSchedules,
    clock: Arc<dyn Clock>,
    config: Arc<EngineConfig>,
}

impl LiveSampler {
    pub fn new(schedules: CachedSchedules, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self {
            schedules,
            clock,
            config: Arc::new(config),
        }
    }

    /// Compute one board at the clock's current time.
    pub async fn sample(&self) -> Board {
        let now = self.clock.now();
        self.schedules.board_at(now, &self.config).await
    }

    /// Publish an initial board and start refreshing it periodically.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn spawn(self) -> SamplerHandle {
        let initial = self.sample().await;
        info!(
            departures = initial.len(),
            every = ?self.config.refresh_interval(),
            "starting departure sampler"
        );

        let (board_tx, board_rx) = watch::channel(Arc::new(initial));
        let clock = Arc::clone(&self.clock);
        let config = Arc::clone(&self.config);

        let task = tokio::spawn(async move {
            let mut ticks = interval(self.config.refresh_interval());
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticks.tick().await; // First tick is immediate, initial board covers it

            loop {
                ticks.tick().await;
                let board = self.sample().await;
                debug!(
                    departures = board.len(),
                    at = %board.generated_at,
                    "departure board refreshed"
                );
                if board_tx.send(Arc::new(board)).is_err() {
                    break;
                }
            }
        });

        SamplerHandle {
            boards: board_rx,
            clock,
            config,
            task,
        }
    }
}

/// Owner of a running refresh loop.
///
/// Dropping the handle stops the loop.
pub struct SamplerHandle {
    boards: watch::Receiver<Arc<Board>>,
    clock: Arc<dyn Clock>,
    config: Arc<EngineConfig>,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Latest published board.
    pub fn board(&self) -> Arc<Board> {
        Arc::clone(&self.boards.borrow())
    }

    /// Receiver notified on every refresh.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Board>> {
        self.boards.clone()
    }

    /// Current time according to the sampler's clock.
    pub fn now(&self) -> chrono::NaiveDateTime {
        self.clock.now()
    }

    /// Start smoothing the marker of one departure.
    ///
    /// Dropping the returned follower stops its timers.
    pub fn follow(&self, key: DepartureKey) -> MarkerFollower {
        let (frame_tx, frame_rx) = watch::channel(MarkerFrame::Pending);
        let task = tokio::spawn(run_follower(
            key.clone(),
            self.boards.clone(),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
            frame_tx,
        ));

        MarkerFollower {
            key,
            frames: frame_rx,
            task,
        }
    }

    /// Stop the refresh loop.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// One published state of a followed marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MarkerFrame {
    /// No sample taken yet.
    Pending,
    /// Departure is on the board.
    Tracking {
        /// Smoothed value to draw now.
        displayed: f64,
        /// Exact progress at the last sample.
        target: Progress,
        phase: Phase,
    },
    /// Departure is not on the latest board.
    Gone,
}

/// Smoothed marker stream for one selected departure.
pub struct MarkerFollower {
    key: DepartureKey,
    frames: watch::Receiver<MarkerFrame>,
    task: JoinHandle<()>,
}

impl MarkerFollower {
    pub fn key(&self) -> &DepartureKey {
        &self.key
    }

    /// Latest frame.
    pub fn frame(&self) -> MarkerFrame {
        self.frames.borrow().clone()
    }

    /// Wait for the next frame and return it.
    ///
    /// Returns `None` once the follower task has stopped.
    pub async fn next_frame(&mut self) -> Option<MarkerFrame> {
        self.frames.changed().await.ok()?;
        Some(self.frames.borrow_and_update().clone())
    }

    /// Receiver for the frame stream.
    pub fn subscribe(&self) -> watch::Receiver<MarkerFrame> {
        self.frames.clone()
    }
}

impl Drop for MarkerFollower {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Sample progress on the refresh cadence and ease frames in between.
async fn run_follower(
    key: DepartureKey,
    mut boards: watch::Receiver<Arc<Board>>,
    clock: Arc<dyn Clock>,
    config: Arc<EngineConfig>,
    frames: watch::Sender<MarkerFrame>,
) {
    let sample_period = config.refresh_interval();
    let mut samples = interval(sample_period);
    samples.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame_ticks = interval(config.frame_interval());
    frame_ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut tracked: Option<(Tween, Progress, Phase)> = None;

    loop {
        let frame = tokio::select! {
            _ = samples.tick() => {
                let board = Arc::clone(&boards.borrow_and_update());
                let now = clock.now();

                match board.find(&key) {
                    None => {
                        if tracked.take().is_some() {
                            debug!(line = %key.line_id, scheduled = %key.scheduled, "followed departure left the board");
                        }
                        MarkerFrame::Gone
                    }
                    Some(departure) => {
                        let target = progress_at(&departure.window, now);
                        let phase = departure.window.phase_at(now);
                        let at = Instant::now();
                        let tween = match tracked {
                            Some((previous, _, _)) => Tween::new(
                                previous.sample(at),
                                target.value(),
                                at,
                                sample_period,
                                config.easing,
                            ),
                            // First sighting jumps straight to the target
                            None => Tween::settled(target.value(), at),
                        };
                        tracked = Some((tween, target, phase));
                        MarkerFrame::Tracking { displayed: tween.sample(at), target, phase }
                    }
                }
            }
            _ = frame_ticks.tick() => {
                match tracked {
                    Some((tween, target, phase)) => MarkerFrame::Tracking {
                        displayed: tween.sample(Instant::now()),
                        target,
                        phase,
                    },
                    None => continue,
                }
            }
        };

        frames.send_if_modified(|current| {
            if *current == frame {
                false
            } else {
                *current = frame;
                true
            }
        });
        if frames.is_closed() {
            break;
        }
    }
}
