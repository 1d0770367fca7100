pub mod algorithms;
pub use algorithms::{
    DistanceMetric, MAX_SEARCH_RADIUS_M, centroid, distance_between, search_envelopes,
};

pub mod clustering;
pub use clustering::{cluster_locations, cluster_radius_meters};

pub mod proximity;
pub use proximity::{RadiusQuery, count_within, nearest_within};

pub mod rtree;
pub use rtree::LocationIndex;
