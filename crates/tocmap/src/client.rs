//! Fetching the two snapshot documents over HTTP.

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::FetchError;
use crate::models::{self, TrainSnapshot, Waypoint};

/// Where the pollers get their snapshots from. Abstracted so tests can
/// feed scripted snapshots instead of a live endpoint.
#[async_trait]
pub trait SnapshotSource {
    async fn fetch_waypoints(&self) -> Result<Vec<Waypoint>, FetchError>;
    async fn fetch_trains(&self) -> Result<TrainSnapshot, FetchError>;
}

/// HTTP client for the track data endpoints.
///
/// Expects `tracks.json` and `trains.json` next to each other under one
/// base URL, as published by the track-side reporter.
pub struct TrackDataClient {
    client: Client,
    base_url: String,
}

impl TrackDataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url_for(&self, document: &str) -> String {
        format!("{}/{}", self.base_url, document)
    }

    async fn fetch_document(&self, document: &str) -> Result<String, FetchError> {
        let resp = self.client.get(self.url_for(document)).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl SnapshotSource for TrackDataClient {
    async fn fetch_waypoints(&self) -> Result<Vec<Waypoint>, FetchError> {
        let body = self.fetch_document("tracks.json").await?;
        Ok(models::decode_waypoint_snapshot(&body)?)
    }

    async fn fetch_trains(&self) -> Result<TrainSnapshot, FetchError> {
        let body = self.fetch_document("trains.json").await?;
        Ok(models::decode_train_snapshot(&body)?)
    }
}
