use std::env;
use std::time::Duration;

use tocmap::poller::PollConfig;
use tocmap::surface::{self, LoggingSurface};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn env_secs(name: &str, default: u64) -> Duration {
    let secs = env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .unwrap_or(default);
    Duration::from_secs(secs)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let base_url =
        env::var("TOCMAP_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

    let config = PollConfig {
        poll_interval: env_secs("TOCMAP_POLL_SECS", 5),
        retry_delay: env_secs("TOCMAP_RETRY_SECS", 30),
    };

    tracing::info!("Polling track data at {}", base_url);

    tocmap::run_map(&base_url, config, surface::shared(LoggingSurface::default())).await
}
