//! Nearest-first radius queries.
//!
//! Both the listing and the count run the same predicate: great-circle
//! distance `<= radius` AND [`LocationFilter::matches`]. Keeping a single
//! predicate is what makes `count_within` usable for page totals.

use super::algorithms::DistanceMetric;
use super::rtree::LocationIndex;
use crate::compute::filter::LocationFilter;
use cragmap_types::location::{ClimbingLocation, LocationWithDistance};
use geo::Point;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Radius query parameters, radius already in meters.
#[derive(Debug, Clone, Copy)]
pub struct RadiusQuery<'a> {
    pub center: Point<f64>,
    pub radius_m: f64,
    pub metric: DistanceMetric,
    pub filter: &'a LocationFilter,
}

/// Heap entry ordered by (distance, name); the heap pops the worst first.
struct Candidate<'a> {
    location: &'a Arc<ClimbingLocation>,
    distance: f64,
}

impl Candidate<'_> {
    fn rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.location.name.cmp(&other.location.name))
    }
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Equal
    }
}
impl Eq for Candidate<'_> {}
impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank(other)
    }
}

/// Matching locations ordered nearest-first, then paged.
///
/// Ties in distance are broken by name so pages are stable. Only the best
/// `offset + limit` candidates are kept in memory.
pub fn nearest_within(
    index: &LocationIndex,
    query: RadiusQuery<'_>,
    offset: usize,
    limit: usize,
) -> Vec<LocationWithDistance> {
    if limit == 0 {
        return Vec::new();
    }

    let keep = offset.saturating_add(limit);
    let mut heap: BinaryHeap<Candidate<'_>> = BinaryHeap::new();

    for (location, distance) in index.within_radius(&query.center, query.radius_m, query.metric) {
        if !query.filter.matches(location) {
            continue;
        }

        let candidate = Candidate { location, distance };
        if heap.len() < keep {
            heap.push(candidate);
        } else if let Some(worst) = heap.peek()
            && candidate < *worst
        {
            heap.pop();
            heap.push(candidate);
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .skip(offset)
        .map(|c| LocationWithDistance {
            location: (**c.location).clone(),
            distance: c.distance,
        })
        .collect()
}

/// Number of matching locations within the radius.
pub fn count_within(index: &LocationIndex, query: RadiusQuery<'_>) -> usize {
    index
        .within_radius(&query.center, query.radius_m, query.metric)
        .into_iter()
        .filter(|(location, _)| query.filter.matches(location))
        .count()
}
