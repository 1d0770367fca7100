//! R*-tree backed location index.
//!
//! Holds every stored location twice: in an R*-tree keyed on
//! `(longitude, latitude)` for radius and viewport predicates, and in a
//! name-ordered map for deterministic listing. Both views share the same
//! `Arc<ClimbingLocation>` so readers get immutable snapshots without copying.
//!
//! Radius queries prune with envelopes from
//! [`search_envelopes`](super::algorithms::search_envelopes) before computing
//! exact great-circle distance, giving O(log n + k) lookups.

use super::algorithms::{DistanceMetric, distance_between, search_envelopes};
use cragmap_types::location::ClimbingLocation;
use cragmap_types::viewport::Viewport;
use geo::Point;
use rstar::{AABB, RTree, RTreeObject};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Location entry stored in the R*-tree.
#[derive(Debug, Clone)]
pub struct IndexedLocation {
    position: [f64; 2],
    pub location: Arc<ClimbingLocation>,
}

impl IndexedLocation {
    pub fn new(location: Arc<ClimbingLocation>) -> Self {
        Self {
            position: [location.longitude, location.latitude],
            location,
        }
    }

    #[inline]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.position[0], self.position[1])
    }
}

impl PartialEq for IndexedLocation {
    fn eq(&self, other: &Self) -> bool {
        self.location.id == other.location.id && self.position == other.position
    }
}

impl RTreeObject for IndexedLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// Spatial and name-ordered index over stored locations.
pub struct LocationIndex {
    tree: RTree<IndexedLocation>,
    by_name: BTreeMap<String, Arc<ClimbingLocation>>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            by_name: BTreeMap::new(),
        }
    }

    /// Build an index in one pass (used when restoring a snapshot).
    pub fn bulk_load(locations: Vec<Arc<ClimbingLocation>>) -> Self {
        let by_name = locations
            .iter()
            .map(|loc| (loc.name.clone(), Arc::clone(loc)))
            .collect();
        let entries = locations.into_iter().map(IndexedLocation::new).collect();

        Self {
            tree: RTree::bulk_load(entries),
            by_name,
        }
    }

    pub fn insert(&mut self, location: Arc<ClimbingLocation>) {
        self.by_name
            .insert(location.name.clone(), Arc::clone(&location));
        self.tree.insert(IndexedLocation::new(location));
    }

    /// Swap the indexed entry for `previous` with `next` (same name).
    pub fn replace(&mut self, previous: &Arc<ClimbingLocation>, next: Arc<ClimbingLocation>) {
        let stale = IndexedLocation::new(Arc::clone(previous));
        if self.tree.remove(&stale).is_none() {
            log::warn!(
                "Index entry for '{}' was missing during replace",
                previous.name
            );
        }
        self.insert(next);
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ClimbingLocation>> {
        self.by_name.get(name)
    }

    /// All locations ordered by name ascending.
    pub fn iter_by_name(&self) -> impl Iterator<Item = &Arc<ClimbingLocation>> {
        self.by_name.values()
    }

    /// Locations within `radius_m` meters of `center`, with their distance.
    ///
    /// Order is unspecified. Non-finite distances are skipped.
    pub fn within_radius(
        &self,
        center: &Point<f64>,
        radius_m: f64,
        metric: DistanceMetric,
    ) -> Vec<(&Arc<ClimbingLocation>, f64)> {
        let mut hits = Vec::new();

        for envelope in search_envelopes(center, radius_m) {
            for entry in self.tree.locate_in_envelope(&envelope) {
                let distance = distance_between(center, &entry.point(), metric);
                if distance.is_finite() && distance <= radius_m {
                    hits.push((&entry.location, distance));
                }
            }
        }

        hits
    }

    /// Locations inside the viewport, edges inclusive.
    pub fn within_viewport(&self, viewport: &Viewport) -> Vec<&Arc<ClimbingLocation>> {
        let envelope = AABB::from_corners(viewport.min_corner(), viewport.max_corner());
        self.tree
            .locate_in_envelope(&envelope)
            .map(|entry| &entry.location)
            .collect()
    }
}

impl Default for LocationIndex {
    fn default() -> Self {
        Self::new()
    }
}
