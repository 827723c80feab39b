//! Observation poller: one fetch-and-render cycle per interval

use crate::display::{Renderer, Status};
use crate::sensors::observation::{fetch_latest, HttpClient, ObservationProperties};
use crate::sensors::wind;
use crate::shared::{format_duration, PollError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// What to poll and how often
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub station: String,
    pub api_base: String,
    pub user_agent: String,
    pub interval: Duration,
}

/// Renderer plus the sequence number of the newest cycle that wrote to it
struct Surfaces<R> {
    renderer: R,
    last_applied: u64,
}

pub struct Poller<R: Renderer> {
    client: Arc<dyn HttpClient>,
    settings: PollSettings,
    surfaces: Mutex<Surfaces<R>>,
    next_seq: AtomicU64,
    /// Bumped by every `start`; a schedule exits once it is no longer current
    generation: watch::Sender<u64>,
}

/// A running schedule. Dropping the handle also stops the schedule, and a
/// later `start` on the same poller replaces it.
pub struct PollerHandle {
    shutdown: watch::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop scheduling new cycles. A cycle already in flight still completes.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::warn!("Poll schedule ended abnormally: {}", e);
        }
    }
}

/// Write one observation onto the display surfaces.
///
/// Each field is handled on its own; a missing value shows the placeholder
/// and leaves the needle where it was.
pub fn update_ui(renderer: &mut dyn Renderer, properties: Option<&ObservationProperties>) {
    let speed = properties.and_then(|p| p.wind_speed_mps());
    let direction = properties.and_then(|p| p.wind_direction_deg());
    let timestamp = properties.and_then(|p| p.timestamp());

    renderer.set_speed(&wind::format_speed(speed));

    renderer.set_direction(&wind::format_direction(direction));
    if let Some(d) = direction {
        renderer.set_needle_rotation(wind::normalize_degrees(d));
    }

    renderer.set_time(&wind::format_timestamp(timestamp));
}

impl<R: Renderer + 'static> Poller<R> {
    pub fn new(client: Arc<dyn HttpClient>, renderer: R, mut settings: PollSettings) -> Self {
        if settings.interval.is_zero() {
            settings.interval = Duration::from_millis(1);
        }
        Self {
            client,
            settings,
            surfaces: Mutex::new(Surfaces {
                renderer,
                last_applied: 0,
            }),
            next_seq: AtomicU64::new(0),
            generation: watch::channel(0).0,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Run `f` against the renderer
    pub async fn inspect<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        let surfaces = self.surfaces.lock().await;
        f(&surfaces.renderer)
    }

    /// One complete cycle. Never fails; returns the status this cycle
    /// produced, whether or not it reached the display.
    ///
    /// Cycles may overlap. The newest cycle to start owns the display: once
    /// it has written, results from older cycles are dropped.
    pub async fn tick(&self) -> Status {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Cycle {} started for {}", seq, self.settings.station);

        {
            let mut surfaces = self.surfaces.lock().await;
            if seq >= surfaces.last_applied {
                surfaces.last_applied = seq;
                surfaces.renderer.set_status(&Status::Fetching);
            }
        }

        let result = fetch_latest(
            self.client.as_ref(),
            &self.settings.api_base,
            &self.settings.station,
            &self.settings.user_agent,
        )
        .await;

        let mut surfaces = self.surfaces.lock().await;
        if seq < surfaces.last_applied {
            tracing::debug!(
                "Discarding cycle {}, cycle {} is newer",
                seq,
                surfaces.last_applied
            );
            return match result {
                Ok(_) => Status::Ok(self.settings.station.clone()),
                Err(e) => {
                    tracing::error!("Cycle {} failed: {}", seq, e);
                    Status::Error(e.to_string())
                }
            };
        }
        surfaces.last_applied = seq;

        let renderer = &mut surfaces.renderer;
        let mut status = match result {
            Ok(observation) => {
                update_ui(&mut *renderer, observation.properties.as_ref());
                Status::Ok(self.settings.station.clone())
            }
            Err(e) => {
                tracing::error!("Cycle {} failed: {}", seq, e);
                Status::Error(e.to_string())
            }
        };
        renderer.set_status(&status);

        if let Err(e) = present(&mut *renderer) {
            tracing::error!("Cycle {} could not be displayed: {}", seq, e);
            status = Status::Error(e.to_string());
            renderer.set_status(&status);
        }

        status
    }

    /// Cancel any schedule this poller is already running, then run one
    /// cycle now and one every interval until stopped or replaced.
    pub fn start(self: &Arc<Self>) -> PollerHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(());
        let poller = Arc::clone(self);
        let period = self.settings.interval;

        // Subscribe before bumping so a concurrent start is always observed
        let mut superseded = self.generation.subscribe();
        let mut generation = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            generation = *g;
        });

        tracing::info!(
            "Polling station {} every {}",
            self.settings.station,
            format_duration(period.as_secs())
        );

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    _ = shutdown_rx.changed() => {
                        tracing::debug!("Poll schedule stopping");
                        break;
                    }

                    changed = superseded.changed() => {
                        if changed.is_err() || *superseded.borrow_and_update() != generation {
                            tracing::debug!("Poll schedule {} replaced", generation);
                            break;
                        }
                    }

                    _ = interval.tick() => {
                        let poller = Arc::clone(&poller);
                        tokio::spawn(async move {
                            poller.tick().await;
                        });
                    }
                }
            }
        });

        PollerHandle { shutdown, task }
    }

    /// Stop `handle`, waiting for its task, and start a fresh schedule.
    pub async fn restart(self: &Arc<Self>, handle: PollerHandle) -> PollerHandle {
        handle.stop().await;
        self.start()
    }
}

/// File and terminal renderers block; keep that off the async workers when
/// the runtime has spare threads.
fn present<R: Renderer>(renderer: &mut R) -> Result<(), PollError> {
    match Handle::try_current().map(|h| h.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(|| renderer.present()),
        _ => renderer.present(),
    }
}
