//! Compute layer for query processing and algorithms.
//!
//! Everything here works on borrowed index state and never touches storage
//! directly:
//! - Filters and input validation shared by every query path
//! - Proximity and clustering engines over the R*-tree index
//! - GeoJSON export for map clients

pub mod filter;
pub mod geojson;
pub mod spatial;
pub mod validation;
