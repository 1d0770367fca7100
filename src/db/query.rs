//! Query descriptions accepted by the [`Catalog`](super::Catalog).
//!
//! Optional fields fall back to the catalog's [`Config`](crate::config::Config)
//! defaults when the query runs.

use crate::compute::filter::LocationFilter;
use crate::error::{CragmapError, Result};
use cragmap_types::location::{ClimbingLocation, LocationWithDistance};
use cragmap_types::page::{PageRequest, Pagination};
use cragmap_types::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Proximity query around a point.
///
/// # Examples
///
/// ```
/// use cragmap::{LocationFilter, NearbyQuery};
/// use cragmap_types::location::ClimbingType;
///
/// let query = NearbyQuery::new(40.0150, -105.2705)
///     .with_radius_km(10.0)
///     .with_filter(LocationFilter::any().with_type(ClimbingType::Boulder))
///     .with_limit(20);
/// assert_eq!(query.radius_km, Some(10.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub filter: LocationFilter,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl NearbyQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km: None,
            filter: LocationFilter::any(),
            limit: None,
            offset: None,
        }
    }

    /// Build from possibly-absent request parameters.
    pub fn try_new(latitude: Option<f64>, longitude: Option<f64>) -> Result<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Ok(Self::new(lat, lng)),
            _ => Err(CragmapError::invalid(
                "Latitude and longitude are required",
            )),
        }
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    pub fn with_filter(mut self, filter: LocationFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Viewport clustering query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterQuery {
    pub viewport: Viewport,
    #[serde(default)]
    pub zoom: Option<u8>,
    #[serde(default)]
    pub filter: LocationFilter,
}

impl ClusterQuery {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            zoom: None,
            filter: LocationFilter::any(),
        }
    }

    /// Build from possibly-absent bound parameters; all four are required.
    pub fn from_bounds(
        north: Option<f64>,
        south: Option<f64>,
        east: Option<f64>,
        west: Option<f64>,
    ) -> Result<Self> {
        match (north, south, east, west) {
            (Some(n), Some(s), Some(e), Some(w)) => Ok(Self::new(Viewport::new(n, s, e, w))),
            _ => Err(CragmapError::invalid(
                "Viewport bounds north, south, east and west are required",
            )),
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_filter(mut self, filter: LocationFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Plain listing, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: LocationFilter,
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub page: PageRequest,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: LocationFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

/// One page of the plain listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPage {
    pub locations: Vec<ClimbingLocation>,
    pub pagination: Pagination,
}

/// One page of nearby results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPage {
    pub locations: Vec<LocationWithDistance>,
    pub pagination: Pagination,
}
