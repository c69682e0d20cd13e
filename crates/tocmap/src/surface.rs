//! Capability contract towards the map-rendering surface.
//!
//! The actual surface (tile layer, marker drawing) lives outside this
//! crate; the pollers only need the three marker operations below. The
//! bundled [`LoggingSurface`] satisfies the contract for headless runs.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::models::GeoPoint;

/// Opaque handle to one live marker, issued by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    Train,
    Station,
}

/// How a marker and its label are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Label always visible (trains) vs. shown on hover only (stations).
    pub label_permanent: bool,
    /// Rendered above all other markers.
    pub raised: bool,
}

impl MarkerStyle {
    pub const TRAIN: Self = Self {
        label_permanent: true,
        raised: true,
    };

    pub const STATION: Self = Self {
        label_permanent: false,
        raised: false,
    };
}

pub trait RenderingSurface {
    fn create_marker(
        &mut self,
        position: GeoPoint,
        icon: MarkerIcon,
        label: &str,
        style: MarkerStyle,
    ) -> MarkerId;

    fn set_position(&mut self, marker: MarkerId, position: GeoPoint);

    fn remove_marker(&mut self, marker: MarkerId);
}

/// Surface shared between the station and train loops.
pub type SharedSurface = Arc<Mutex<dyn RenderingSurface + Send>>;

pub fn shared<S: RenderingSurface + Send + 'static>(surface: S) -> SharedSurface {
    Arc::new(Mutex::new(surface))
}

/// Surface that only logs marker operations. Stands in for a real map
/// when running the service without a frontend attached.
#[derive(Debug, Default)]
pub struct LoggingSurface {
    next_id: u64,
}

impl RenderingSurface for LoggingSurface {
    fn create_marker(
        &mut self,
        position: GeoPoint,
        icon: MarkerIcon,
        label: &str,
        _style: MarkerStyle,
    ) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        debug!(
            "Created {icon:?} marker {id:?} for {label} at ({}, {})",
            position.lat, position.lon
        );
        id
    }

    fn set_position(&mut self, marker: MarkerId, position: GeoPoint) {
        debug!(
            "Moved marker {marker:?} to ({}, {})",
            position.lat, position.lon
        );
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        debug!("Removed marker {marker:?}");
    }
}
