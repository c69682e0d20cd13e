//! End-to-end flow over the public API: decode raw snapshot documents,
//! drive the train tracker through several cycles against a fake surface,
//! and load stations next to it on the same surface.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tocmap::client::SnapshotSource;
use tocmap::errors::FetchError;
use tocmap::models::{self, GeoPoint, TrainSnapshot, Waypoint};
use tocmap::poller::{PollConfig, StationLoader, TrainTracker};
use tocmap::surface::{MarkerIcon, MarkerId, MarkerStyle, RenderingSurface};

#[derive(Debug, Default)]
struct FakeSurface {
    next_id: u64,
    live: BTreeMap<MarkerId, (String, GeoPoint, MarkerIcon)>,
}

impl FakeSurface {
    fn position_of(&self, label: &str) -> Option<GeoPoint> {
        self.live
            .values()
            .find(|(l, _, _)| l == label)
            .map(|(_, p, _)| *p)
    }

    fn labels(&self, icon: MarkerIcon) -> Vec<String> {
        self.live
            .values()
            .filter(|(_, _, i)| *i == icon)
            .map(|(l, _, _)| l.clone())
            .collect()
    }
}

impl RenderingSurface for FakeSurface {
    fn create_marker(
        &mut self,
        position: GeoPoint,
        icon: MarkerIcon,
        label: &str,
        _style: MarkerStyle,
    ) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        self.live.insert(id, (label.to_string(), position, icon));
        id
    }

    fn set_position(&mut self, marker: MarkerId, position: GeoPoint) {
        if let Some(entry) = self.live.get_mut(&marker) {
            entry.1 = position;
        }
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.live.remove(&marker);
    }
}

/// Serves pre-decoded snapshots from in-memory queues.
#[derive(Default)]
struct QueueSource {
    waypoints: Mutex<Vec<Result<Vec<Waypoint>, FetchError>>>,
    trains: Mutex<Vec<Result<TrainSnapshot, FetchError>>>,
}

#[async_trait]
impl SnapshotSource for QueueSource {
    async fn fetch_waypoints(&self) -> Result<Vec<Waypoint>, FetchError> {
        self.waypoints.lock().unwrap().remove(0)
    }

    async fn fetch_trains(&self) -> Result<TrainSnapshot, FetchError> {
        self.trains.lock().unwrap().remove(0)
    }
}

fn trains_doc(body: &str) -> TrainSnapshot {
    models::decode_train_snapshot(body).unwrap()
}

#[tokio::test]
async fn stations_and_trains_share_one_surface() {
    let surface = Arc::new(Mutex::new(FakeSurface::default()));

    let tracks_body = r#"{
        "waypoints": {
            "240": {"type": "Bf", "name": "Hauptbahnhof", "ds100": "XHB", "lat": 53.0310, "lon": 13.3050, "trackmarker": 240},
            "812": {"type": "Bü", "name": "Querweg", "lat": 53.0330, "lon": 13.3080, "trackmarker": 812},
            "1390": {"type": "Hp", "name": "Waldrand", "ds100": "XWR", "lat": 53.0355, "lon": 13.3120, "trackmarker": 1390}
        }
    }"#;

    let source = QueueSource {
        waypoints: Mutex::new(vec![Ok(models::decode_waypoint_snapshot(tracks_body).unwrap())]),
        ..QueueSource::default()
    };
    let loader = StationLoader::new(source, surface.clone(), Duration::from_secs(30));
    let rendered = loader.load_once().await.unwrap();

    assert_eq!(rendered, 2);

    let source = QueueSource {
        trains: Mutex::new(vec![Ok(trains_doc(
            r#"{"trains": {"Emma": {"lat": 53.0317, "lon": 13.3059, "speed": 12.0}}}"#,
        ))]),
        ..QueueSource::default()
    };
    let mut tracker = TrainTracker::new(source, surface.clone(), PollConfig::default());
    tracker.cycle().await;

    let surface = surface.lock().unwrap();
    let mut stations = surface.labels(MarkerIcon::Station);
    stations.sort();
    assert_eq!(stations, ["Hauptbahnhof", "Waldrand"]);
    assert_eq!(surface.labels(MarkerIcon::Train), ["Emma"]);
    assert_eq!(
        surface.position_of("Emma"),
        Some(GeoPoint::new(53.0317, 13.3059))
    );
}

#[tokio::test]
async fn tracker_keeps_marker_identity_across_cycles() {
    let surface = Arc::new(Mutex::new(FakeSurface::default()));
    let source = QueueSource {
        trains: Mutex::new(vec![
            Ok(trains_doc(
                r#"{"trains": {"Emma": {"lat": 10.0, "lon": 20.0}}}"#,
            )),
            Ok(trains_doc(
                r#"{"trains": {"Emma": {"lat": 11.0, "lon": 21.0}, "Koef II": {"lat": 5.0, "lon": 5.0}}}"#,
            )),
            Ok(trains_doc(r#"{"trains": {"Koef II": {"lat": 5.0, "lon": 5.0}}}"#)),
        ]),
        ..QueueSource::default()
    };
    let mut tracker = TrainTracker::new(source, surface.clone(), PollConfig::default());

    tracker.cycle().await;
    let emma = tracker.registry().get("Emma").unwrap();
    assert_eq!(
        surface.lock().unwrap().position_of("Emma"),
        Some(GeoPoint::new(10.0, 20.0))
    );

    tracker.cycle().await;
    assert_eq!(tracker.registry().get("Emma"), Some(emma));
    assert_eq!(tracker.registry().len(), 2);
    assert_eq!(
        surface.lock().unwrap().position_of("Emma"),
        Some(GeoPoint::new(11.0, 21.0))
    );

    tracker.cycle().await;
    assert_eq!(tracker.registry().len(), 1);
    assert!(tracker.registry().get("Emma").is_none());
    let surface = surface.lock().unwrap();
    assert!(surface.position_of("Emma").is_none());
    assert!(surface.position_of("Koef II").is_some());
}

#[tokio::test]
async fn empty_snapshot_clears_trains_but_not_stations() {
    let surface = Arc::new(Mutex::new(FakeSurface::default()));

    {
        let mut s = surface.lock().unwrap();
        s.create_marker(
            GeoPoint::new(53.0, 13.3),
            MarkerIcon::Station,
            "Hauptbahnhof",
            MarkerStyle::STATION,
        );
    }

    let source = QueueSource {
        trains: Mutex::new(vec![
            Ok(trains_doc(
                r#"{"trains": {"Emma": {"lat": 1.0, "lon": 1.0}, "Koef II": {"lat": 2.0, "lon": 2.0}}}"#,
            )),
            Ok(TrainSnapshot::new()),
        ]),
        ..QueueSource::default()
    };
    let mut tracker = TrainTracker::new(source, surface.clone(), PollConfig::default());

    tracker.cycle().await;
    assert_eq!(tracker.registry().len(), 2);

    tracker.cycle().await;
    assert!(tracker.registry().is_empty());

    let surface = surface.lock().unwrap();
    assert!(surface.labels(MarkerIcon::Train).is_empty());
    assert_eq!(surface.labels(MarkerIcon::Station), ["Hauptbahnhof"]);
}
