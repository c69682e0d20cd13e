use std::collections::BTreeMap;

use crate::surface::MarkerId;

/// Tracks which marker currently represents which train.
///
/// Invariant: at most one live marker per train name. Entries are created
/// on first sighting, repositioned in place on re-sighting, and deleted
/// exactly when the name is absent from the latest snapshot.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: BTreeMap<String, MarkerId>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<MarkerId> {
        self.markers.get(name).copied()
    }

    pub fn put(&mut self, name: String, marker: MarkerId) {
        self.markers.insert(name, marker);
    }

    pub fn delete(&mut self, name: &str) -> Option<MarkerId> {
        self.markers.remove(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.markers.keys()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
