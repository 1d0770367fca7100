//! In-memory location store.
//!
//! Records live in a `DashMap` keyed by name, which serializes writers per
//! name through its entry guard. The spatial and name-ordered views live in
//! a [`LocationIndex`] behind a `parking_lot::RwLock`. Writers take the entry
//! guard first and the index write lock second; readers only ever take the
//! index read lock, so the two locks never form a cycle.

use super::{LocationStore, UpsertOutcome};
use crate::compute::filter::{LocationFilter, SearchTerm};
use crate::compute::spatial::algorithms::DistanceMetric;
use crate::compute::spatial::proximity::{RadiusQuery, count_within, nearest_within};
use crate::compute::spatial::rtree::LocationIndex;
use crate::compute::validation::validate_new_location;
use crate::error::Result;
use cragmap_types::location::{ClimbingLocation, LocationWithDistance, NewLocation};
use cragmap_types::viewport::Viewport;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use geo::Point;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::SystemTime;

pub struct MemoryStore {
    records: DashMap<String, Arc<ClimbingLocation>>,
    index: RwLock<LocationIndex>,
    metric: DistanceMetric,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_metric(DistanceMetric::default())
    }

    pub fn with_metric(metric: DistanceMetric) -> Self {
        Self {
            records: DashMap::new(),
            index: RwLock::new(LocationIndex::new()),
            metric,
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationStore for MemoryStore {
    fn upsert(&self, input: NewLocation) -> Result<UpsertOutcome> {
        validate_new_location(&input)?;
        let now = SystemTime::now();

        match self.records.entry(input.name.clone()) {
            Entry::Occupied(mut entry) => {
                let previous = Arc::clone(entry.get());
                let next = Arc::new(previous.updated_with(input, now));
                entry.insert(Arc::clone(&next));
                self.index.write().replace(&previous, Arc::clone(&next));

                log::debug!("Updated location '{}'", next.name);
                Ok(UpsertOutcome::Updated((*next).clone()))
            }
            Entry::Vacant(entry) => {
                let record = Arc::new(ClimbingLocation::create(input, now));
                // Index first: inserting consumes the entry and releases its guard
                self.index.write().insert(Arc::clone(&record));
                entry.insert(Arc::clone(&record));

                log::debug!("Inserted location '{}' ({})", record.name, record.id);
                Ok(UpsertOutcome::Inserted((*record).clone()))
            }
        }
    }

    fn get(&self, name: &str) -> Result<Option<ClimbingLocation>> {
        Ok(self.records.get(name).map(|entry| (**entry.value()).clone()))
    }

    fn count(&self, filter: &LocationFilter) -> Result<usize> {
        let index = self.index.read();
        if filter.is_unrestricted() {
            return Ok(index.len());
        }
        Ok(index.iter_by_name().filter(|loc| filter.matches(loc)).count())
    }

    fn list(
        &self,
        filter: &LocationFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ClimbingLocation>> {
        let index = self.index.read();
        Ok(index
            .iter_by_name()
            .filter(|loc| filter.matches(loc))
            .skip(offset)
            .take(limit)
            .map(|loc| (**loc).clone())
            .collect())
    }

    fn search(
        &self,
        filter: &LocationFilter,
        term: &SearchTerm,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ClimbingLocation>> {
        let index = self.index.read();
        Ok(index
            .iter_by_name()
            .filter(|loc| filter.matches(loc) && term.matches(loc))
            .skip(offset)
            .take(limit)
            .map(|loc| (**loc).clone())
            .collect())
    }

    fn count_search(&self, filter: &LocationFilter, term: &SearchTerm) -> Result<usize> {
        let index = self.index.read();
        Ok(index
            .iter_by_name()
            .filter(|loc| filter.matches(loc) && term.matches(loc))
            .count())
    }

    fn query_within_radius(
        &self,
        center: &Point<f64>,
        radius_m: f64,
        filter: &LocationFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<LocationWithDistance>> {
        let query = RadiusQuery {
            center: *center,
            radius_m,
            metric: self.metric,
            filter,
        };
        let index = self.index.read();
        Ok(nearest_within(&index, query, offset, limit))
    }

    fn count_within_radius(
        &self,
        center: &Point<f64>,
        radius_m: f64,
        filter: &LocationFilter,
    ) -> Result<usize> {
        let query = RadiusQuery {
            center: *center,
            radius_m,
            metric: self.metric,
            filter,
        };
        let index = self.index.read();
        Ok(count_within(&index, query))
    }

    fn query_within_bounds(
        &self,
        viewport: &Viewport,
        filter: &LocationFilter,
    ) -> Result<Vec<Arc<ClimbingLocation>>> {
        let index = self.index.read();
        Ok(index
            .within_viewport(viewport)
            .into_iter()
            .filter(|loc| filter.matches(loc))
            .cloned()
            .collect())
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn all(&self) -> Result<Vec<ClimbingLocation>> {
        let index = self.index.read();
        Ok(index.iter_by_name().map(|loc| (**loc).clone()).collect())
    }

    /// Meant for loading a snapshot before the store is shared. Records with
    /// a duplicate name keep the last occurrence.
    fn restore(&self, records: Vec<ClimbingLocation>) -> Result<()> {
        self.records.clear();
        for record in records {
            self.records.insert(record.name.clone(), Arc::new(record));
        }

        let snapshot: Vec<Arc<ClimbingLocation>> =
            self.records.iter().map(|e| Arc::clone(e.value())).collect();
        let loaded = LocationIndex::bulk_load(snapshot);

        let count = loaded.len();
        *self.index.write() = loaded;
        log::debug!("Restored {} locations into memory store", count);
        Ok(())
    }
}
