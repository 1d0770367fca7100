//! # cragmap-types
//!
//! Core data types for the cragmap climbing-location catalog.
//!
//! - **Locations**: `ClimbingLocation`, `NewLocation`, `LocationWithDistance`, `LocationSummary`
//! - **Clusters**: `LocationCluster`, `ClusteredLocations`
//! - **Viewports**: `Viewport`
//! - **Pagination**: `PageRequest`, `Pagination`
//! - **Metrics**: `DistanceMetric`
//!
//! All types are serializable with Serde. JSON field names follow the
//! camelCase convention used by map front-ends.
//!
//! ## Examples
//!
//! ```rust
//! use cragmap_types::location::{ClimbingType, NewLocation};
//! use cragmap_types::viewport::Viewport;
//!
//! let input = NewLocation::new("Flagstaff Boulder", ClimbingType::Boulder, 40.0, -105.3)
//!     .with_difficulty("V4");
//! assert_eq!(input.difficulty, "V4");
//!
//! let front_range = Viewport::new(41.0, 39.0, -104.0, -106.0);
//! assert!(front_range.contains(input.latitude, input.longitude));
//! ```

pub mod cluster;
pub mod location;
pub mod metric;
pub mod page;
pub mod stats;
pub mod viewport;
