//! The two self-rescheduling polling loops driving the map.
//!
//! Each loop is split into a pure per-cycle step and a thin outer loop
//! that sleeps between steps, so the cycle logic is testable without real
//! time. A failed fetch yields exactly one pending reschedule at the
//! retry delay and a successful cycle exactly one at the normal cadence;
//! the loop shape makes a double reschedule unrepresentable.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::SnapshotSource;
use crate::errors::FetchError;
use crate::reconcile::reconcile;
use crate::registry::MarkerRegistry;
use crate::surface::{MarkerIcon, MarkerStyle, RenderingSurface};

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Cadence between successful train cycles.
    pub poll_interval: Duration,
    /// Backoff after a failed fetch, for both loops.
    pub retry_delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(30),
        }
    }
}

/// Renders the static station markers once.
///
/// Stations never move and are never removed, so this loop terminates
/// after the first successful fetch. It does not touch the train
/// [`MarkerRegistry`].
pub struct StationLoader<C, S: ?Sized> {
    source: C,
    surface: Arc<Mutex<S>>,
    retry_delay: Duration,
}

impl<C, S> StationLoader<C, S>
where
    C: SnapshotSource,
    S: RenderingSurface + Send + ?Sized,
{
    pub fn new(source: C, surface: Arc<Mutex<S>>, retry_delay: Duration) -> Self {
        Self {
            source,
            surface,
            retry_delay,
        }
    }

    /// One fetch-and-render attempt. Returns how many markers it created.
    /// Nothing is rendered on the failure path.
    pub async fn load_once(&self) -> Result<usize, FetchError> {
        let waypoints = self.source.fetch_waypoints().await?;

        let mut surface = self.surface.lock().unwrap();
        let mut rendered = 0;
        for waypoint in waypoints.iter().filter(|w| w.kind.is_stop()) {
            surface.create_marker(
                waypoint.position,
                MarkerIcon::Station,
                &waypoint.name,
                MarkerStyle::STATION,
            );
            rendered += 1;
        }
        Ok(rendered)
    }

    pub async fn run(self) {
        loop {
            match self.load_once().await {
                Ok(rendered) => {
                    info!("Rendered {rendered} station markers");
                    return;
                }
                Err(e) => {
                    warn!(
                        "Station snapshot fetch failed: {e}; retrying in {}s",
                        self.retry_delay.as_secs()
                    );
                    sleep(self.retry_delay).await;
                }
            }
        }
    }
}

/// Keeps the train markers in step with the live snapshot, forever.
pub struct TrainTracker<C, S: ?Sized> {
    source: C,
    surface: Arc<Mutex<S>>,
    registry: MarkerRegistry,
    config: PollConfig,
}

impl<C, S> TrainTracker<C, S>
where
    C: SnapshotSource,
    S: RenderingSurface + Send + ?Sized,
{
    pub fn new(source: C, surface: Arc<Mutex<S>>, config: PollConfig) -> Self {
        Self {
            source,
            surface,
            registry: MarkerRegistry::new(),
            config,
        }
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    /// One poll cycle: fetch, reconcile, and report when to run again.
    ///
    /// A failed fetch leaves registry and surface untouched; the stale
    /// markers stay up until connectivity returns.
    pub async fn cycle(&mut self) -> Duration {
        let snapshot = match self.source.fetch_trains().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    "Train snapshot fetch failed: {e}; retrying in {}s",
                    self.config.retry_delay.as_secs()
                );
                return self.config.retry_delay;
            }
        };

        let stats = {
            let mut surface = self.surface.lock().unwrap();
            reconcile(&mut self.registry, &mut *surface, &snapshot)
        };

        if stats.is_steady() {
            debug!("Tracking {} trains", self.registry.len());
        } else {
            info!(
                "Reconciled train markers: {} created, {} moved, {} removed",
                stats.created, stats.moved, stats.removed
            );
        }

        self.config.poll_interval
    }

    pub async fn run(mut self) {
        loop {
            let delay = self.cycle().await;
            sleep(delay).await;
        }
    }
}
