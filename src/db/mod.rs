//! The catalog handle.
//!
//! [`Catalog`] composes the location store, the query engines and optional
//! snapshot persistence behind one explicitly created handle. It is cheap to
//! clone; clones share the same store.

use crate::compute::filter::{LocationFilter, SearchTerm};
use crate::compute::spatial::algorithms::MAX_SEARCH_RADIUS_M;
use crate::compute::spatial::clustering::{cluster_locations, cluster_radius_meters};
use crate::compute::validation::{
    validate_coordinates, validate_page, validate_radius_km, validate_viewport,
};
use crate::config::Config;
use crate::error::{CragmapError, Result};
use crate::storage::{LocationStore, MemoryStore, UpsertOutcome};
use cragmap_types::cluster::ClusteredLocations;
use cragmap_types::location::{ClimbingLocation, LocationWithDistance, NewLocation};
use cragmap_types::page::{PageRequest, Pagination};
use cragmap_types::stats::CatalogStats;
use geo::Point;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[cfg(feature = "snapshot")]
use crate::storage::SnapshotFile;
#[cfg(feature = "snapshot")]
use parking_lot::Mutex;
#[cfg(feature = "snapshot")]
use std::path::Path;

mod query;

pub use query::{ClusterQuery, ListQuery, LocationPage, NearbyPage, NearbyQuery};

#[derive(Debug, Default)]
struct Counters {
    inserts: AtomicU64,
    updates: AtomicU64,
    queries: AtomicU64,
}

/// Radius query after defaults and validation.
struct ResolvedNearby {
    center: Point<f64>,
    radius_m: f64,
    filter: LocationFilter,
}

/// Climbing-location catalog.
///
/// Thread-safe: queries run concurrently; upserts serialize per location
/// name.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn LocationStore>,
    #[cfg(feature = "snapshot")]
    snapshot: Option<Arc<Mutex<SnapshotFile>>>,
    closed: Arc<AtomicBool>,
    /// Held shared by upserts and exclusively by `close`, so the final
    /// snapshot sees every write that was accepted.
    lifecycle: Arc<RwLock<()>>,
    counters: Arc<Counters>,
    config: Config,
}

impl Catalog {
    /// Open a catalog persisted at `path`, loading the snapshot if present.
    #[cfg(feature = "snapshot")]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, Config::default())
    }

    #[cfg(feature = "snapshot")]
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        config.validate().map_err(CragmapError::InvalidArgument)?;

        let snapshot = SnapshotFile::new(path.as_ref(), config.snapshot.clone());
        let records = snapshot.load()?;

        let store = MemoryStore::with_metric(config.distance_metric);
        store.restore(records)?;

        log::info!(
            "Opened catalog at {} with {} locations",
            path.as_ref().display(),
            store.len()
        );

        Ok(Self {
            store: Arc::new(store),
            snapshot: Some(Arc::new(Mutex::new(snapshot))),
            closed: Arc::new(AtomicBool::new(false)),
            lifecycle: Arc::new(RwLock::new(())),
            counters: Arc::new(Counters::default()),
            config,
        })
    }

    /// In-memory catalog with default configuration. Never touches disk.
    pub fn memory() -> Result<Self> {
        Self::memory_with_config(Config::default())
    }

    pub fn memory_with_config(config: Config) -> Result<Self> {
        let store = MemoryStore::with_metric(config.distance_metric);
        Self::with_store(Arc::new(store), config)
    }

    /// Catalog over a caller-supplied store, without persistence.
    pub fn with_store(store: Arc<dyn LocationStore>, config: Config) -> Result<Self> {
        config.validate().map_err(CragmapError::InvalidArgument)?;

        Ok(Self {
            store,
            #[cfg(feature = "snapshot")]
            snapshot: None,
            closed: Arc::new(AtomicBool::new(false)),
            lifecycle: Arc::new(RwLock::new(())),
            counters: Arc::new(Counters::default()),
            config,
        })
    }

    pub fn builder() -> crate::builder::CatalogBuilder {
        crate::builder::CatalogBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CragmapError::StoreClosed);
        }
        Ok(())
    }

    /// Insert or update a location by name.
    ///
    /// Re-submitting the same input is idempotent apart from `updated_at`.
    /// A failed auto-snapshot is logged and does not fail the upsert; the
    /// next checkpoint or close reports persistence errors.
    pub fn upsert(&self, input: NewLocation) -> Result<UpsertOutcome> {
        let _open = self.lifecycle.read();
        self.ensure_open()?;

        let outcome = self.store.upsert(input)?;
        match outcome {
            UpsertOutcome::Inserted(_) => self.counters.inserts.fetch_add(1, Ordering::Relaxed),
            UpsertOutcome::Updated(_) => self.counters.updates.fetch_add(1, Ordering::Relaxed),
        };

        #[cfg(feature = "snapshot")]
        self.maybe_auto_snapshot();

        Ok(outcome)
    }

    pub fn get(&self, name: &str) -> Result<Option<ClimbingLocation>> {
        self.ensure_open()?;
        self.store.get(name)
    }

    /// Paged listing ordered by name, optionally narrowed by a search term.
    pub fn list(&self, query: &ListQuery) -> Result<LocationPage> {
        self.ensure_open()?;
        self.counters.queries.fetch_add(1, Ordering::Relaxed);

        let page_size = query.page.page_size.unwrap_or(self.config.default_page_size);
        validate_page(query.page.page, page_size)?;
        let offset = query.page.offset(page_size);
        let filter = query.filter.clone().normalize();

        let term = query.search_term.as_deref().and_then(SearchTerm::parse);
        let (locations, total) = match &term {
            Some(term) => (
                self.store.search(&filter, term, offset, page_size)?,
                self.store.count_search(&filter, term)?,
            ),
            None => (
                self.store.list(&filter, offset, page_size)?,
                self.store.count(&filter)?,
            ),
        };

        log::debug!(
            "list page={} size={} search={:?} -> {}/{}",
            query.page.page,
            page_size,
            term.as_ref().map(SearchTerm::as_str),
            locations.len(),
            total
        );

        Ok(LocationPage {
            locations,
            pagination: Pagination::new(query.page.page, page_size, total),
        })
    }

    fn resolve_nearby(&self, query: &NearbyQuery) -> Result<ResolvedNearby> {
        validate_coordinates(query.latitude, query.longitude)?;
        let radius_km = query.radius_km.unwrap_or(self.config.default_radius_km);
        validate_radius_km(radius_km)?;

        Ok(ResolvedNearby {
            center: Point::new(query.longitude, query.latitude),
            radius_m: (radius_km * 1000.0).min(MAX_SEARCH_RADIUS_M),
            filter: query.filter.clone().normalize(),
        })
    }

    fn nearby_slice(
        &self,
        resolved: &ResolvedNearby,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<LocationWithDistance>> {
        let results = self.store.query_within_radius(
            &resolved.center,
            resolved.radius_m,
            &resolved.filter,
            offset,
            limit,
        )?;

        log::debug!(
            "nearby ({:.5}, {:.5}) r={:.0}m offset={} limit={} -> {}",
            resolved.center.y(),
            resolved.center.x(),
            resolved.radius_m,
            offset,
            limit,
            results.len()
        );
        Ok(results)
    }

    /// Locations within the radius, nearest first.
    ///
    /// Radius defaults to `Config::default_radius_km`, limit to
    /// `Config::default_nearby_limit`, offset to 0.
    pub fn find_nearby(&self, query: &NearbyQuery) -> Result<Vec<LocationWithDistance>> {
        self.ensure_open()?;
        self.counters.queries.fetch_add(1, Ordering::Relaxed);

        let resolved = self.resolve_nearby(query)?;
        let limit = query.limit.unwrap_or(self.config.default_nearby_limit);
        self.nearby_slice(&resolved, query.offset.unwrap_or(0), limit)
    }

    /// Number of locations [`find_nearby`](Self::find_nearby) would return
    /// without a limit.
    pub fn count_nearby(&self, query: &NearbyQuery) -> Result<usize> {
        self.ensure_open()?;
        self.counters.queries.fetch_add(1, Ordering::Relaxed);

        let resolved = self.resolve_nearby(query)?;
        self.store
            .count_within_radius(&resolved.center, resolved.radius_m, &resolved.filter)
    }

    /// A page of nearby results with totals. `limit`/`offset` on the query
    /// are ignored in favor of `page`.
    pub fn nearby_page(&self, query: &NearbyQuery, page: PageRequest) -> Result<NearbyPage> {
        self.ensure_open()?;
        self.counters.queries.fetch_add(1, Ordering::Relaxed);

        let page_size = page.page_size.unwrap_or(self.config.default_page_size);
        validate_page(page.page, page_size)?;

        let resolved = self.resolve_nearby(query)?;
        let locations = self.nearby_slice(&resolved, page.offset(page_size), page_size)?;
        let total = self.store.count_within_radius(
            &resolved.center,
            resolved.radius_m,
            &resolved.filter,
        )?;

        Ok(NearbyPage {
            locations,
            pagination: Pagination::new(page.page, page_size, total),
        })
    }

    /// Cluster the locations inside a viewport for the given zoom.
    pub fn clusters(&self, query: &ClusterQuery) -> Result<ClusteredLocations> {
        self.ensure_open()?;
        self.counters.queries.fetch_add(1, Ordering::Relaxed);

        validate_viewport(&query.viewport)?;
        let zoom = query.zoom.unwrap_or(self.config.default_zoom);
        let eps_m = cluster_radius_meters(zoom);
        let filter = query.filter.clone().normalize();

        let members = self.store.query_within_bounds(&query.viewport, &filter)?;
        let clusters = cluster_locations(
            &members,
            eps_m,
            self.config.distance_metric,
            self.config.max_cluster_members,
        );

        log::debug!(
            "clusters zoom={} eps={:.0}m -> {} locations in {} clusters",
            zoom,
            eps_m,
            members.len(),
            clusters.len()
        );

        Ok(ClusteredLocations::new(clusters))
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            location_count: self.store.len(),
            inserts: self.counters.inserts.load(Ordering::Relaxed),
            updates: self.counters.updates.load(Ordering::Relaxed),
            queries: self.counters.queries.load(Ordering::Relaxed),
        }
    }

    #[cfg(feature = "snapshot")]
    fn maybe_auto_snapshot(&self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };

        let mut file = snapshot.lock();
        file.record_operation();
        if !file.should_snapshot() {
            return;
        }

        let saved = self.store.all().and_then(|records| {
            file.save(&records)?;
            Ok(records.len())
        });
        match saved {
            Ok(count) => log::debug!("Auto-snapshot wrote {} locations", count),
            Err(e) => {
                // Retry after another full interval instead of on every upsert
                file.reset_operations();
                log::warn!("Auto-snapshot to {} failed: {}", file.path().display(), e);
            }
        }
    }

    /// Write a snapshot now. No-op for in-memory catalogs.
    pub fn checkpoint(&self) -> Result<()> {
        self.ensure_open()?;
        self.write_snapshot()
    }

    #[cfg(feature = "snapshot")]
    fn write_snapshot(&self) -> Result<()> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };

        let mut file = snapshot.lock();
        let records = self.store.all()?;
        file.save(&records)?;
        log::info!(
            "Checkpointed {} locations to {}",
            records.len(),
            file.path().display()
        );
        Ok(())
    }

    #[cfg(not(feature = "snapshot"))]
    fn write_snapshot(&self) -> Result<()> {
        Ok(())
    }

    /// Flush a final snapshot and reject further calls with `StoreClosed`.
    /// Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let _exclusive = self.lifecycle.write();
        if self.closed.load(Ordering::Acquire) {
            return Ok(());
        }
        self.write_snapshot()?;
        self.closed.store(true, Ordering::Release);
        log::info!("Catalog closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("locations", &self.store.len())
            .field("closed", &self.is_closed())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cragmap_types::location::ClimbingType;
    use cragmap_types::viewport::Viewport;

    fn seeded() -> Catalog {
        let catalog = Catalog::memory().unwrap();
        catalog
            .upsert(NewLocation::new("A", ClimbingType::Boulder, 40.0, -105.0).with_difficulty("V3"))
            .unwrap();
        catalog
            .upsert(NewLocation::new("B", ClimbingType::Gym, 40.0001, -105.0001))
            .unwrap();
        catalog
            .upsert(NewLocation::new("C", ClimbingType::Boulder, 41.0, -106.0).with_difficulty("V3"))
            .unwrap();
        catalog
    }

    #[test]
    fn test_find_nearby_defaults_radius_and_limit() {
        let catalog = seeded();
        let results = catalog.find_nearby(&NearbyQuery::new(40.0, -105.0)).unwrap();
        // Default 50 km reaches A and B but not C (~140 km away)
        let names: Vec<_> = results.iter().map(|r| r.location.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(catalog.count_nearby(&NearbyQuery::new(40.0, -105.0)).unwrap(), 2);
    }

    #[test]
    fn test_find_nearby_rejects_bad_input() {
        let catalog = seeded();
        let err = catalog.find_nearby(&NearbyQuery::new(91.0, -105.0)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
        let err = catalog
            .count_nearby(&NearbyQuery::new(40.0, -105.0).with_radius_km(0.0))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_nearby_page_uses_same_radius_for_total() {
        let catalog = seeded();
        let page = catalog
            .nearby_page(&NearbyQuery::new(40.0, -105.0), PageRequest::new(1, 1))
            .unwrap();
        assert_eq!(page.locations.len(), 1);
        assert_eq!(page.pagination.total_items, 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_next);
        assert_eq!(page.locations[0].location.name, "A");

        let second = catalog
            .nearby_page(&NearbyQuery::new(40.0, -105.0), PageRequest::new(2, 1))
            .unwrap();
        assert_eq!(second.locations.len(), 1);
        assert_eq!(second.locations[0].location.name, "B");
        assert_eq!(second.pagination.total_items, 2);
        assert!(!second.pagination.has_next);
        assert!(second.pagination.has_previous);

        let past_end = catalog
            .nearby_page(&NearbyQuery::new(40.0, -105.0), PageRequest::new(3, 1))
            .unwrap();
        assert!(past_end.locations.is_empty());
        assert_eq!(past_end.pagination.total_items, 2);
    }

    #[test]
    fn test_radius_beyond_half_circumference_covers_globe() {
        let catalog = seeded();
        catalog
            .upsert(NewLocation::new("Antipode", ClimbingType::Gym, -40.0, 75.0))
            .unwrap();

        let query = NearbyQuery::new(-40.0, 75.0)
            .with_radius_km(50_000.0)
            .with_limit(10);
        let results = catalog.find_nearby(&query).unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].location.name, "Antipode");
        assert_eq!(catalog.count_nearby(&query).unwrap(), 4);
    }

    #[test]
    fn test_clusters_apply_difficulty_filter() {
        let catalog = seeded();
        let query = ClusterQuery::new(Viewport::new(41.0, 39.0, -104.0, -106.0))
            .with_zoom(5)
            .with_filter(LocationFilter::any().with_difficulty("V3"));
        let clustered = catalog.clusters(&query).unwrap();
        assert_eq!(clustered.total_locations, 2);
        assert_eq!(clustered.clusters.len(), 2);
    }

    #[test]
    fn test_list_with_search_term() {
        let catalog = seeded();
        catalog
            .upsert(
                NewLocation::new("Zebra Wall", ClimbingType::Boulder, 39.0, -105.0)
                    .with_description("striped granite"),
            )
            .unwrap();

        let page = catalog
            .list(&ListQuery::new().with_search_term("GRANITE"))
            .unwrap();
        assert_eq!(page.locations.len(), 1);
        assert_eq!(page.pagination.total_items, 1);

        let err = catalog
            .list(&ListQuery::new().with_page(PageRequest::new(0, 10)))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_closed_catalog_rejects_calls() {
        let catalog = seeded();
        let clone = catalog.clone();
        catalog.close().unwrap();
        assert!(matches!(
            clone.find_nearby(&NearbyQuery::new(40.0, -105.0)),
            Err(CragmapError::StoreClosed)
        ));
        assert!(matches!(
            clone.upsert(NewLocation::new("D", ClimbingType::Gym, 0.0, 0.0)),
            Err(CragmapError::StoreClosed)
        ));
        assert!(catalog.close().is_ok());
    }

    #[test]
    fn test_stats_track_upserts_and_queries() {
        let catalog = seeded();
        catalog
            .upsert(NewLocation::new("A", ClimbingType::Boulder, 40.0, -105.0))
            .unwrap();
        catalog.find_nearby(&NearbyQuery::new(40.0, -105.0)).unwrap();

        let stats = catalog.stats();
        assert_eq!(stats.location_count, 3);
        assert_eq!(stats.inserts, 3);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.queries, 1);
        assert_eq!(stats.upserts(), 4);
    }
}
