pub mod client;
pub mod errors;
pub mod models;
pub mod poller;
pub mod reconcile;
pub mod registry;
pub mod surface;

use crate::client::TrackDataClient;
use crate::poller::{PollConfig, StationLoader, TrainTracker};
use crate::surface::SharedSurface;

/// Spawns the station loader and train tracker against one surface and
/// waits on them. The tracker never finishes, so this returns only if a
/// task panics.
pub async fn run_map(
    base_url: &str,
    config: PollConfig,
    surface: SharedSurface,
) -> anyhow::Result<()> {
    let stations = StationLoader::new(
        TrackDataClient::new(base_url),
        surface.clone(),
        config.retry_delay,
    );
    let trains = TrainTracker::new(TrackDataClient::new(base_url), surface, config);

    let station_task = tokio::spawn(stations.run());
    let train_task = tokio::spawn(trains.run());

    tokio::try_join!(station_task, train_task)?;

    Ok(())
}
