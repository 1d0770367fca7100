//! Catalog configuration.
//!
//! Defaults match the public API's historical behavior: a 50 km search
//! radius, 100 nearby results, pages of 50 and zoom level 10.
use serde::de::Error;

pub use cragmap_types::metric::DistanceMetric;

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Radius used by nearby queries that do not specify one
    #[serde(default = "Config::default_radius_km")]
    pub default_radius_km: f64,

    /// Result cap for nearby queries that do not specify a limit
    #[serde(default = "Config::default_nearby_limit")]
    pub default_nearby_limit: usize,

    #[serde(default = "Config::default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "Config::default_zoom")]
    pub default_zoom: u8,

    #[serde(default)]
    pub distance_metric: DistanceMetric,

    /// Maximum member summaries carried per cluster. `point_count` always
    /// reports the full cluster size.
    #[serde(default)]
    pub max_cluster_members: Option<usize>,

    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Snapshot persistence settings
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Write a snapshot after this many upserts. `None` disables auto-snapshots.
    #[serde(default)]
    pub auto_snapshot_ops: Option<usize>,
}

impl Config {
    const fn default_radius_km() -> f64 {
        50.0
    }

    const fn default_nearby_limit() -> usize {
        100
    }

    const fn default_page_size() -> usize {
        50
    }

    const fn default_zoom() -> u8 {
        10
    }

    pub fn with_default_radius_km(mut self, radius_km: f64) -> Self {
        assert!(
            radius_km.is_finite() && radius_km > 0.0,
            "Default radius must be positive and finite"
        );
        self.default_radius_km = radius_km;
        self
    }

    pub fn with_default_nearby_limit(mut self, limit: usize) -> Self {
        assert!(limit > 0, "Nearby limit must be greater than zero");
        self.default_nearby_limit = limit;
        self
    }

    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "Page size must be greater than zero");
        self.default_page_size = page_size;
        self
    }

    pub fn with_default_zoom(mut self, zoom: u8) -> Self {
        self.default_zoom = zoom;
        self
    }

    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    pub fn with_max_cluster_members(mut self, max: usize) -> Self {
        assert!(max > 0, "Cluster member cap must be greater than zero");
        if max < 10 {
            log::warn!(
                "Cluster member cap of {} is very small; map popups will list few locations",
                max
            );
        }
        self.max_cluster_members = Some(max);
        self
    }

    pub fn with_auto_snapshot_ops(mut self, ops: usize) -> Self {
        assert!(ops > 0, "Auto-snapshot interval must be greater than zero");
        self.snapshot.auto_snapshot_ops = Some(ops);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.default_radius_km.is_finite() || self.default_radius_km <= 0.0 {
            return Err(format!(
                "Default radius must be positive and finite, got: {}",
                self.default_radius_km
            ));
        }

        if self.default_nearby_limit == 0 {
            return Err("Nearby limit must be greater than zero".to_string());
        }

        if self.default_page_size == 0 {
            return Err("Page size must be greater than zero".to_string());
        }

        if self.max_cluster_members == Some(0) {
            return Err("Cluster member cap must be greater than zero".to_string());
        }

        if self.snapshot.auto_snapshot_ops == Some(0) {
            return Err("Auto-snapshot interval must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_radius_km: Self::default_radius_km(),
            default_nearby_limit: Self::default_nearby_limit(),
            default_page_size: Self::default_page_size(),
            default_zoom: Self::default_zoom(),
            distance_metric: DistanceMetric::default(),
            max_cluster_members: None,
            snapshot: SnapshotConfig::default(),
        }
    }
}
