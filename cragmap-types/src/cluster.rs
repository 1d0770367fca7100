use crate::location::LocationSummary;
use serde::{Deserialize, Serialize};

/// One cluster produced by a viewport clustering call.
///
/// `cluster_id` is only meaningful within the response that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCluster {
    pub cluster_id: usize,
    pub point_count: usize,
    /// Centroid latitude.
    pub latitude: f64,
    /// Centroid longitude.
    pub longitude: f64,
    pub locations: Vec<LocationSummary>,
}

/// Clustering response for a viewport, largest clusters first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredLocations {
    pub clusters: Vec<LocationCluster>,
    pub total_locations: usize,
}

impl ClusteredLocations {
    /// Wrap clusters, deriving `total_locations` from their point counts.
    pub fn new(clusters: Vec<LocationCluster>) -> Self {
        let total_locations = clusters.iter().map(|c| c.point_count).sum();
        Self {
            clusters,
            total_locations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
