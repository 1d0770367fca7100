//! Distance metrics shared by the query engines.

use serde::{Deserialize, Serialize};

/// Great-circle distance metric used for proximity and clustering.
///
/// Both variants measure along the Earth's surface. Planar (Euclidean)
/// distance on degrees is intentionally not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Spherical great-circle distance on the mean Earth radius.
    #[default]
    Haversine,
    /// Karney's ellipsoidal geodesic on WGS84. Slower, sub-millimetre accurate.
    Geodesic,
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Haversine => write!(f, "haversine"),
            Self::Geodesic => write!(f, "geodesic"),
        }
    }
}
