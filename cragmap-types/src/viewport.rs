use geo::Rect;
use serde::{Deserialize, Serialize};

/// Rectangular map viewport in WGS84 degrees.
///
/// Containment is inclusive on all four edges. A viewport whose `west` is
/// greater than its `east` (crossing the antimeridian) is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Viewport {
    /// Create a viewport. Well-formedness is checked by the catalog, not here.
    ///
    /// # Examples
    ///
    /// ```
    /// use cragmap_types::viewport::Viewport;
    ///
    /// let vp = Viewport::new(41.0, 39.0, -104.0, -106.0);
    /// assert!(vp.contains(41.0, -106.0));
    /// assert!(!vp.contains(41.1, -105.0));
    /// ```
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Inclusive point containment.
    #[inline]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }

    /// Lower-left `[lon, lat]` corner.
    pub fn min_corner(&self) -> [f64; 2] {
        [self.west, self.south]
    }

    /// Upper-right `[lon, lat]` corner.
    pub fn max_corner(&self) -> [f64; 2] {
        [self.east, self.north]
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: self.west, y: self.south },
            geo::coord! { x: self.east, y: self.north },
        )
    }
}
