//! Geospatial catalog of climbing locations with proximity search and
//! zoom-aware viewport clustering.
//!
//! ```rust
//! use cragmap::prelude::*;
//!
//! let catalog = Catalog::memory()?;
//! catalog.upsert(NewLocation::new("A", ClimbingType::Boulder, 40.0, -105.0))?;
//! catalog.upsert(NewLocation::new("B", ClimbingType::Boulder, 40.0001, -105.0001))?;
//! catalog.upsert(NewLocation::new("C", ClimbingType::Boulder, 41.0, -106.0))?;
//!
//! let nearby = catalog.find_nearby(&NearbyQuery::new(40.0, -105.0).with_radius_km(1.0))?;
//! assert_eq!(nearby.len(), 2);
//!
//! let viewport = Viewport::new(41.0, 39.0, -104.0, -106.0);
//! let clustered = catalog.clusters(&ClusterQuery::new(viewport).with_zoom(5))?;
//! assert_eq!(clustered.clusters[0].point_count, 2);
//! # Ok::<(), cragmap::CragmapError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod storage;

pub use builder::CatalogBuilder;
pub use config::{Config, SnapshotConfig};
pub use db::{Catalog, ClusterQuery, ListQuery, LocationPage, NearbyPage, NearbyQuery};
pub use error::{CragmapError, ErrorKind, Result};

pub use compute::filter::{LocationFilter, SearchTerm};
pub use compute::spatial::{DistanceMetric, cluster_radius_meters, distance_between};

pub use storage::{LocationStore, MemoryStore, UpsertOutcome};

#[cfg(feature = "snapshot")]
pub use storage::SnapshotFile;

pub use ingest::{IngestReport, IngestService, JsonSeedScraper, Scraper};

pub use cragmap_types::cluster::{ClusteredLocations, LocationCluster};
pub use cragmap_types::location::{
    ClimbingLocation, ClimbingType, LocationSummary, LocationWithDistance, NewLocation,
};
pub use cragmap_types::page::{PageRequest, Pagination};
pub use cragmap_types::stats::CatalogStats;
pub use cragmap_types::viewport::Viewport;

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Catalog, CatalogBuilder, CragmapError, Result};

    pub use crate::{ClusterQuery, ListQuery, NearbyQuery};

    pub use crate::{LocationFilter, PageRequest, Viewport};

    pub use crate::{ClimbingLocation, ClimbingType, NewLocation};

    pub use crate::{Config, DistanceMetric};

    pub use geo::Point;
}
