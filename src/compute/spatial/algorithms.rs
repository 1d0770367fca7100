//! Distance, envelope and centroid helpers built on the `geo` crate.

use geo::{Centroid, Distance, Geodesic, Haversine, MultiPoint, Point};
use rstar::AABB;
use smallvec::{SmallVec, smallvec};

pub use cragmap_types::metric::DistanceMetric;

/// Mean Earth radius in meters (IUGG), the sphere used by Haversine.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Longer than any surface distance under either metric (the geodesic
/// half-circumference along the equator is about 20,037.5 km). Larger search
/// radii are clamped to this.
pub const MAX_SEARCH_RADIUS_M: f64 = 20_100_000.0;

/// Envelopes are widened by this factor so that ellipsoidal distances, which
/// differ from spherical ones by well under 1%, never fall outside the
/// pre-filter.
const ENVELOPE_SLACK: f64 = 1.01;

/// Distance between two points in meters.
///
/// Points are `(x = longitude, y = latitude)`.
///
/// # Examples
///
/// ```
/// use cragmap::compute::spatial::{DistanceMetric, distance_between};
/// use geo::Point;
///
/// let boulder = Point::new(-105.2705, 40.0150);
/// let denver = Point::new(-104.9903, 39.7392);
/// let d = distance_between(&boulder, &denver, DistanceMetric::Haversine);
/// assert!(d > 38_000.0 && d < 40_000.0);
/// ```
#[inline]
pub fn distance_between(a: &Point<f64>, b: &Point<f64>, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Haversine => Haversine.distance(*a, *b),
        DistanceMetric::Geodesic => Geodesic.distance(*a, *b),
    }
}

/// Half-extent in degrees `(latitude, longitude)` of a spherical cap of
/// `radius_m` centered at `lat`.
///
/// Returns `None` for the longitude extent when the cap reaches a pole, in
/// which case every longitude must be searched.
fn cap_half_extent(lat: f64, radius_m: f64) -> (f64, Option<f64>) {
    let angular = radius_m / EARTH_MEAN_RADIUS_M;
    let lat_degrees = angular.to_degrees();

    let cos_lat = lat.to_radians().cos();
    let ratio = angular.sin() / cos_lat;

    if angular >= std::f64::consts::FRAC_PI_2 || !ratio.is_finite() || ratio >= 1.0 {
        return (lat_degrees, None);
    }

    (lat_degrees, Some(ratio.asin().to_degrees()))
}

/// Index envelopes covering every point within `radius_m` of `center`.
///
/// One envelope in the common case; two when the circle crosses the
/// antimeridian; a full longitude band when it reaches a pole. The result
/// over-approximates the circle, so callers must still check exact distance.
pub fn search_envelopes(center: &Point<f64>, radius_m: f64) -> SmallVec<[AABB<[f64; 2]>; 2]> {
    let (lon, lat) = (center.x(), center.y());
    let (lat_degrees, lon_degrees) = cap_half_extent(lat, radius_m * ENVELOPE_SLACK);

    let min_y = (lat - lat_degrees).max(-90.0);
    let max_y = (lat + lat_degrees).min(90.0);

    let full_band = || AABB::from_corners([-180.0, min_y], [180.0, max_y]);

    let Some(lon_degrees) = lon_degrees else {
        return smallvec![full_band()];
    };
    if lat - lat_degrees <= -90.0 || lat + lat_degrees >= 90.0 || lon_degrees >= 180.0 {
        return smallvec![full_band()];
    }

    let min_x = lon - lon_degrees;
    let max_x = lon + lon_degrees;

    if min_x < -180.0 {
        smallvec![
            AABB::from_corners([min_x + 360.0, min_y], [180.0, max_y]),
            AABB::from_corners([-180.0, min_y], [max_x, max_y]),
        ]
    } else if max_x > 180.0 {
        smallvec![
            AABB::from_corners([min_x, min_y], [180.0, max_y]),
            AABB::from_corners([-180.0, min_y], [max_x - 360.0, max_y]),
        ]
    } else {
        smallvec![AABB::from_corners([min_x, min_y], [max_x, max_y])]
    }
}

/// Spatial centroid of a point collection.
///
/// This is the planar mean of the coordinates. Collections straddling the
/// ±180° meridian get a centroid near 0° longitude; that case is not
/// corrected.
pub fn centroid(points: &[Point<f64>]) -> Option<Point<f64>> {
    if points.is_empty() {
        return None;
    }
    MultiPoint::new(points.to_vec()).centroid()
}
