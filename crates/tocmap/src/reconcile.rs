//! Diffing one train snapshot against the previously rendered marker set.
//!
//! Pure with respect to I/O and timing: the caller decides when to fetch
//! and when to run the next cycle, this module only computes and applies
//! creates, moves and removals.

use std::collections::BTreeSet;

use crate::models::TrainSnapshot;
use crate::registry::MarkerRegistry;
use crate::surface::{MarkerIcon, MarkerStyle, RenderingSurface};

/// What one reconciliation pass did, for the tracker's logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub moved: usize,
    pub removed: usize,
}

impl ReconcileStats {
    /// True when the pass changed nothing but positions of existing markers.
    pub fn is_steady(&self) -> bool {
        self.created == 0 && self.removed == 0
    }
}

/// Applies `snapshot` to the registry and surface.
///
/// Every name in the snapshot ends up with exactly one marker at the
/// snapshot position; markers of names no longer reported are removed.
/// Markers of re-sighted names are repositioned in place, never destroyed
/// and recreated. Positions are applied verbatim, so a marker may visibly
/// jump between cycles.
pub fn reconcile<S>(
    registry: &mut MarkerRegistry,
    surface: &mut S,
    snapshot: &TrainSnapshot,
) -> ReconcileStats
where
    S: RenderingSurface + ?Sized,
{
    let mut stats = ReconcileStats::default();

    // Everything currently registered is a removal candidate until the
    // snapshot vouches for it.
    let mut stale: BTreeSet<String> = registry.keys().cloned().collect();

    for (name, train) in snapshot {
        stale.remove(name);

        let marker = match registry.get(name) {
            Some(marker) => {
                stats.moved += 1;
                marker
            }
            None => {
                let marker =
                    surface.create_marker(train.position, MarkerIcon::Train, name, MarkerStyle::TRAIN);
                registry.put(name.clone(), marker);
                stats.created += 1;
                marker
            }
        };

        // Unconditional: fresh markers take the position too.
        surface.set_position(marker, train.position);
    }

    for name in stale {
        if let Some(marker) = registry.delete(&name) {
            surface.remove_marker(marker);
            stats.removed += 1;
        }
    }

    stats
}
