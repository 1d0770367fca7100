//! Zoom-scaled density clustering for map viewports.
//!
//! Clustering is DBSCAN with `min_points = 1`. With that setting every point
//! is a core point, so clusters are exactly the connected components of the
//! "within `eps` meters" graph and isolated points become singletons. The
//! components are found by flood fill over a per-call R*-tree.

use super::algorithms::{DistanceMetric, centroid, distance_between, search_envelopes};
use cragmap_types::cluster::LocationCluster;
use cragmap_types::location::ClimbingLocation;
use geo::Point;
use rstar::RTree;
use rstar::primitives::GeomWithData;
use std::collections::VecDeque;

/// Cluster radius at [`REFERENCE_ZOOM`].
pub const BASE_RADIUS_METERS: f64 = 5_000.0;
/// Radius shrinks by this factor per zoom level.
pub const ZOOM_DECAY: f64 = 1.5;
pub const REFERENCE_ZOOM: i32 = 3;
/// Floor so that street-level zooms still merge co-located entries.
pub const MIN_RADIUS_METERS: f64 = 100.0;

/// Neighbor distance for a map zoom level: `max(5000 / 1.5^(zoom - 3), 100)`.
///
/// Non-increasing in `zoom`.
///
/// # Examples
///
/// ```
/// use cragmap::compute::spatial::cluster_radius_meters;
///
/// assert_eq!(cluster_radius_meters(3), 5_000.0);
/// assert!((cluster_radius_meters(5) - 2_222.22).abs() < 0.01);
/// assert_eq!(cluster_radius_meters(20), 100.0);
/// ```
pub fn cluster_radius_meters(zoom: u8) -> f64 {
    let exponent = i32::from(zoom) - REFERENCE_ZOOM;
    (BASE_RADIUS_METERS / ZOOM_DECAY.powi(exponent)).max(MIN_RADIUS_METERS)
}

type ClusterPoint = GeomWithData<[f64; 2], usize>;

/// Group `locations` into clusters whose members are chained by hops of at
/// most `eps_m` meters.
///
/// Members are visited in name order, so cluster ids and member order are
/// deterministic for a given input. The result is sorted by `point_count`
/// descending; equal sizes keep discovery order. `max_members` caps the
/// summaries attached to each cluster, never `point_count`.
pub fn cluster_locations<L>(
    locations: &[L],
    eps_m: f64,
    metric: DistanceMetric,
    max_members: Option<usize>,
) -> Vec<LocationCluster>
where
    L: AsRef<ClimbingLocation>,
{
    if locations.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&ClimbingLocation> = locations.iter().map(AsRef::as_ref).collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let points: Vec<Point<f64>> = ordered.iter().map(|loc| loc.point()).collect();
    let tree: RTree<ClusterPoint> = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x(), p.y()], i))
            .collect(),
    );

    let mut assigned = vec![false; ordered.len()];
    let mut clusters = Vec::new();

    for seed in 0..ordered.len() {
        if assigned[seed] {
            continue;
        }

        let members = expand_component(seed, &points, &tree, &mut assigned, eps_m, metric);
        let member_points: Vec<Point<f64>> = members.iter().map(|&i| points[i]).collect();
        let Some(center) = centroid(&member_points) else {
            continue;
        };

        let take = max_members.unwrap_or(usize::MAX);
        clusters.push(LocationCluster {
            cluster_id: clusters.len(),
            point_count: members.len(),
            latitude: center.y(),
            longitude: center.x(),
            locations: members
                .iter()
                .take(take)
                .map(|&i| ordered[i].summary())
                .collect(),
        });
    }

    clusters.sort_by(|a, b| b.point_count.cmp(&a.point_count));

    log::debug!(
        "Clustered {} locations into {} clusters (eps {:.1} m)",
        ordered.len(),
        clusters.len(),
        eps_m
    );

    clusters
}

/// Flood fill from `seed`; returns member indices in ascending (name) order.
fn expand_component(
    seed: usize,
    points: &[Point<f64>],
    tree: &RTree<ClusterPoint>,
    assigned: &mut [bool],
    eps_m: f64,
    metric: DistanceMetric,
) -> Vec<usize> {
    let mut members = vec![seed];
    let mut frontier = VecDeque::from([seed]);
    assigned[seed] = true;

    while let Some(current) = frontier.pop_front() {
        let origin = points[current];
        for envelope in search_envelopes(&origin, eps_m) {
            for neighbor in tree.locate_in_envelope(&envelope) {
                let idx = neighbor.data;
                if assigned[idx] {
                    continue;
                }
                if distance_between(&origin, &points[idx], metric) <= eps_m {
                    assigned[idx] = true;
                    members.push(idx);
                    frontier.push_back(idx);
                }
            }
        }
    }

    members.sort_unstable();
    members
}
