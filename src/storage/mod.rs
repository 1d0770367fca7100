//! Location storage abstraction.
//!
//! [`LocationStore`] is the seam between the catalog and its backing
//! collection. Every method takes `&self`: implementations provide their own
//! interior synchronization so a store can be shared across threads.

use crate::compute::filter::{LocationFilter, SearchTerm};
use crate::error::Result;
use cragmap_types::location::{ClimbingLocation, LocationWithDistance, NewLocation};
use cragmap_types::viewport::Viewport;
use geo::Point;
use std::sync::Arc;

mod memory;
#[cfg(feature = "snapshot")]
pub mod snapshot;

pub use memory::MemoryStore;
#[cfg(feature = "snapshot")]
pub use snapshot::SnapshotFile;

/// Result of an upsert, carrying the record as stored.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Inserted(ClimbingLocation),
    Updated(ClimbingLocation),
}

impl UpsertOutcome {
    pub fn location(&self) -> &ClimbingLocation {
        match self {
            Self::Inserted(loc) | Self::Updated(loc) => loc,
        }
    }

    pub fn into_location(self) -> ClimbingLocation {
        match self {
            Self::Inserted(loc) | Self::Updated(loc) => loc,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Backing collection of climbing locations, keyed by name.
pub trait LocationStore: Send + Sync {
    /// Insert or update by name. Atomic per name: concurrent upserts of the
    /// same name leave exactly one record.
    fn upsert(&self, input: NewLocation) -> Result<UpsertOutcome>;

    fn get(&self, name: &str) -> Result<Option<ClimbingLocation>>;

    /// Number of records matching `filter`.
    fn count(&self, filter: &LocationFilter) -> Result<usize>;

    /// Matching records ordered by name ascending.
    fn list(
        &self,
        filter: &LocationFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ClimbingLocation>>;

    /// Like [`list`](Self::list), restricted to records matching `term`.
    fn search(
        &self,
        filter: &LocationFilter,
        term: &SearchTerm,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ClimbingLocation>>;

    fn count_search(&self, filter: &LocationFilter, term: &SearchTerm) -> Result<usize>;

    /// Matching records within `radius_m` meters, nearest first.
    fn query_within_radius(
        &self,
        center: &Point<f64>,
        radius_m: f64,
        filter: &LocationFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<LocationWithDistance>>;

    fn count_within_radius(
        &self,
        center: &Point<f64>,
        radius_m: f64,
        filter: &LocationFilter,
    ) -> Result<usize>;

    /// Matching records inside the viewport (edges inclusive), unordered.
    fn query_within_bounds(
        &self,
        viewport: &Viewport,
        filter: &LocationFilter,
    ) -> Result<Vec<Arc<ClimbingLocation>>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every record, ordered by name.
    fn all(&self) -> Result<Vec<ClimbingLocation>>;

    /// Replace the contents with `records` as-is, timestamps included.
    fn restore(&self, records: Vec<ClimbingLocation>) -> Result<()>;
}
