use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// A geographic coordinate in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Kind of a fixed point along the line, as tagged in the track feed.
///
/// The tags follow German railway convention: `Bf` (Bahnhof) is a full
/// station, `Hp` (Haltepunkt) a stop without turnouts, `Bü` a level
/// crossing, `W` a turnout. Unrecognized tags decode as `Unknown` rather
/// than failing the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointKind {
    Station,
    Stop,
    LevelCrossing,
    Turnout,
    Plain,
    Unknown,
}

impl WaypointKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "Bf" => Self::Station,
            "Hp" => Self::Stop,
            "Bü" => Self::LevelCrossing,
            "W" => Self::Turnout,
            "wp" => Self::Plain,
            _ => Self::Unknown,
        }
    }

    /// Whether trains halt here. Only these waypoints get a map marker.
    pub fn is_stop(self) -> bool {
        matches!(self, Self::Station | Self::Stop)
    }
}

impl<'de> Deserialize<'de> for WaypointKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// A fixed point of interest on the line. Immutable once fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct Waypoint {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WaypointKind,
    #[serde(flatten)]
    pub position: GeoPoint,
    /// Position along the line in metres (mile marker).
    #[serde(default)]
    pub trackmarker: f64,
    /// Short station code, present for stations and stops.
    #[serde(default)]
    pub ds100: Option<String>,
}

/// The stop a train is currently heading towards.
#[derive(Debug, Clone, Deserialize)]
pub struct NextStop {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WaypointKind,
    #[serde(default)]
    pub trackmarker: f64,
    #[serde(default)]
    pub eta: Option<String>,
}

/// One train's entry in the live snapshot. Only `position` drives
/// reconciliation; the remaining fields are published by the position
/// reporter and carried through for labels and diagnostics.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainPosition {
    #[serde(flatten)]
    pub position: GeoPoint,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default, rename = "dir")]
    pub direction: Option<i32>,
    #[serde(default)]
    pub trackmarker: Option<f64>,
    #[serde(default)]
    pub trackname: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub next_stop: Option<NextStop>,
}

/// One fetched train snapshot: train name → latest reported position.
/// A name appearing twice in the document collapses to the last entry.
pub type TrainSnapshot = BTreeMap<String, TrainPosition>;

#[derive(Deserialize)]
struct TracksDocument {
    waypoints: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct TrainsDocument {
    trains: BTreeMap<String, Value>,
}

/// Decodes the waypoint snapshot document (`tracks.json`).
///
/// The top-level shape must be present; a malformed individual entry is
/// skipped with a diagnostic instead of poisoning the whole snapshot.
pub fn decode_waypoint_snapshot(body: &str) -> Result<Vec<Waypoint>, serde_json::Error> {
    let doc: TracksDocument = serde_json::from_str(body)?;
    let mut waypoints = Vec::with_capacity(doc.waypoints.len());
    for (name, raw) in doc.waypoints {
        match serde_json::from_value::<Waypoint>(raw) {
            Ok(waypoint) => waypoints.push(waypoint),
            Err(e) => warn!("Skipping malformed waypoint {name}: {e}"),
        }
    }
    Ok(waypoints)
}

/// Decodes the train snapshot document (`trains.json`), skipping malformed
/// entries the same way as [`decode_waypoint_snapshot`].
pub fn decode_train_snapshot(body: &str) -> Result<TrainSnapshot, serde_json::Error> {
    let doc: TrainsDocument = serde_json::from_str(body)?;
    let mut trains = TrainSnapshot::new();
    for (name, raw) in doc.trains {
        match serde_json::from_value::<TrainPosition>(raw) {
            Ok(position) => {
                trains.insert(name, position);
            }
            Err(e) => warn!("Skipping malformed train entry {name}: {e}"),
        }
    }
    Ok(trains)
}
