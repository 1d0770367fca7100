use serde::{Deserialize, Serialize};

/// Catalog statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of distinct locations currently stored
    pub location_count: usize,
    /// Upserts that created a new record
    pub inserts: u64,
    /// Upserts that overwrote an existing record
    pub updates: u64,
    /// Read queries served (list, nearby, count, clusters)
    pub queries: u64,
}

impl CatalogStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total mutating operations.
    pub fn upserts(&self) -> u64 {
        self.inserts + self.updates
    }
}
