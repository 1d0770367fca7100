//! Validation for caller-supplied coordinates, radii, viewports and pages.
//!
//! The query engines assume their input already passed through here; the
//! [`Catalog`](crate::Catalog) runs these checks before dispatching.

use crate::error::{CragmapError, Result};
use cragmap_types::location::NewLocation;
use cragmap_types::viewport::Viewport;

/// Validates a latitude/longitude pair.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use cragmap::compute::validation::validate_coordinates;
///
/// assert!(validate_coordinates(40.0150, -105.2705).is_ok());
/// assert!(validate_coordinates(95.0, -105.0).is_err());
/// assert!(validate_coordinates(40.0, 200.0).is_err());
/// ```
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !longitude.is_finite() {
        return Err(CragmapError::InvalidArgument(format!(
            "Longitude must be finite, got: {}",
            longitude
        )));
    }

    if !latitude.is_finite() {
        return Err(CragmapError::InvalidArgument(format!(
            "Latitude must be finite, got: {}",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CragmapError::InvalidArgument(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CragmapError::InvalidArgument(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }

    Ok(())
}

/// Validates a search radius in kilometers.
///
/// The radius must be finite and positive. There is no upper bound: a
/// radius beyond half the circumference simply covers the whole globe.
///
/// # Examples
///
/// ```
/// use cragmap::compute::validation::validate_radius_km;
///
/// assert!(validate_radius_km(50.0).is_ok());
/// assert!(validate_radius_km(50_000.0).is_ok());
/// assert!(validate_radius_km(0.0).is_err());
/// assert!(validate_radius_km(f64::NAN).is_err());
/// ```
pub fn validate_radius_km(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() {
        return Err(CragmapError::InvalidArgument(format!(
            "Radius must be finite, got: {}",
            radius_km
        )));
    }
    if radius_km <= 0.0 {
        return Err(CragmapError::InvalidArgument(format!(
            "Radius must be positive, got: {}",
            radius_km
        )));
    }
    Ok(())
}

/// Validates a map viewport.
///
/// All four edges must be valid coordinates, `north >= south` and
/// `east >= west`. Viewports that wrap the antimeridian are rejected.
pub fn validate_viewport(viewport: &Viewport) -> Result<()> {
    validate_coordinates(viewport.north, viewport.east)?;
    validate_coordinates(viewport.south, viewport.west)?;

    if viewport.north < viewport.south {
        return Err(CragmapError::InvalidArgument(format!(
            "north ({}) must be >= south ({})",
            viewport.north, viewport.south
        )));
    }
    if viewport.east < viewport.west {
        return Err(CragmapError::InvalidArgument(format!(
            "east ({}) must be >= west ({})",
            viewport.east, viewport.west
        )));
    }

    Ok(())
}

/// Validates a 1-based page number and a page size.
pub fn validate_page(page: usize, page_size: usize) -> Result<()> {
    if page == 0 {
        return Err(CragmapError::invalid("Page numbers start at 1"));
    }
    if page_size == 0 {
        return Err(CragmapError::invalid("Page size must be greater than zero"));
    }
    Ok(())
}

/// Validates producer input before it reaches the store.
pub fn validate_new_location(input: &NewLocation) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(CragmapError::invalid("Location name must not be empty"));
    }

    validate_coordinates(input.latitude, input.longitude)
        .map_err(|e| CragmapError::InvalidArgument(format!("Location '{}': {}", input.name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cragmap_types::location::ClimbingType;

    #[test]
    fn test_valid_coordinates() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.1).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_radius() {
        assert!(validate_radius_km(1.0).is_ok());
        assert!(validate_radius_km(-5.0).is_err());
        assert!(validate_radius_km(f64::INFINITY).is_err());
        assert!(validate_radius_km(50_000.0).is_ok());
        assert!(validate_radius_km(f64::MAX).is_ok());
    }

    #[test]
    fn test_validate_viewport() {
        assert!(validate_viewport(&Viewport::new(41.0, 39.0, -104.0, -106.0)).is_ok());
        // Degenerate but well-formed
        assert!(validate_viewport(&Viewport::new(40.0, 40.0, -105.0, -105.0)).is_ok());

        let err = validate_viewport(&Viewport::new(39.0, 41.0, -104.0, -106.0)).unwrap_err();
        assert!(err.to_string().contains("north"));
        let err = validate_viewport(&Viewport::new(41.0, 39.0, -106.0, -104.0)).unwrap_err();
        assert!(err.to_string().contains("east"));
        assert!(validate_viewport(&Viewport::new(91.0, 39.0, -104.0, -106.0)).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert!(validate_page(1, 50).is_ok());
        assert!(validate_page(0, 50).is_err());
        assert!(validate_page(1, 0).is_err());
    }

    #[test]
    fn test_validate_new_location() {
        let ok = NewLocation::new("Horsetooth", ClimbingType::Boulder, 40.5, -105.1);
        assert!(validate_new_location(&ok).is_ok());

        let blank = NewLocation::new("   ", ClimbingType::Boulder, 40.5, -105.1);
        assert!(validate_new_location(&blank).is_err());

        let off_map = NewLocation::new("Nowhere", ClimbingType::Gym, 140.0, -105.1);
        let err = validate_new_location(&off_map).unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }
}
