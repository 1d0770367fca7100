//! Catalog builder for flexible configuration.

use crate::config::Config;
use crate::db::Catalog;
use crate::error::Result;
#[cfg(feature = "snapshot")]
use std::path::PathBuf;

/// Builder for a [`Catalog`] with an optional snapshot path and settings.
#[derive(Debug)]
pub struct CatalogBuilder {
    #[cfg(feature = "snapshot")]
    path: Option<PathBuf>,
    config: Config,
}

impl CatalogBuilder {
    /// Create a new builder with default in-memory configuration.
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "snapshot")]
            path: None,
            config: Config::default(),
        }
    }

    /// Persist to a snapshot file at `path`.
    #[cfg(feature = "snapshot")]
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Keep everything in memory, dropping any path set earlier.
    pub fn in_memory(mut self) -> Self {
        #[cfg(feature = "snapshot")]
        {
            self.path = None;
        }
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Catalog> {
        #[cfg(feature = "snapshot")]
        if let Some(path) = self.path {
            return Catalog::open_with_config(path, self.config);
        }
        Catalog::memory_with_config(self.config)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
