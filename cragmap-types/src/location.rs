use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use uuid::Uuid;

/// Kind of climbing location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClimbingType {
    Boulder,
    Gym,
}

impl ClimbingType {
    /// All known variants, in declaration order.
    pub const ALL: [ClimbingType; 2] = [ClimbingType::Boulder, ClimbingType::Gym];

    /// Wire name of the variant (`"BOULDER"`, `"GYM"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boulder => "BOULDER",
            Self::Gym => "GYM",
        }
    }
}

impl fmt::Display for ClimbingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown climbing type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownClimbingType(pub String);

impl fmt::Display for UnknownClimbingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown climbing type: {}", self.0)
    }
}

impl std::error::Error for UnknownClimbingType {}

impl FromStr for ClimbingType {
    type Err = UnknownClimbingType;

    /// Parses the wire name. Matching is exact, like the enum's serde form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOULDER" => Ok(Self::Boulder),
            "GYM" => Ok(Self::Gym),
            other => Err(UnknownClimbingType(other.to_string())),
        }
    }
}

/// A stored climbing location.
///
/// `name` is the natural key: the store holds at most one record per name.
/// `id` and `created_at` never change after the first insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimbingLocation {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ClimbingType,
    /// Free-text grade, empty when unknown.
    pub difficulty: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl ClimbingLocation {
    /// Build a brand new record with a fresh v4 id.
    pub fn create(input: NewLocation, now: SystemTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            kind: input.kind,
            difficulty: input.difficulty,
            latitude: input.latitude,
            longitude: input.longitude,
            address: input.address,
            description: input.description,
            website: input.website,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field from `input`, keeping `id`, `name`
    /// and `created_at`.
    pub fn updated_with(&self, input: NewLocation, now: SystemTime) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            kind: input.kind,
            difficulty: input.difficulty,
            latitude: input.latitude,
            longitude: input.longitude,
            address: input.address,
            description: input.description,
            website: input.website,
            image_url: input.image_url,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Position as a `geo::Point` (x = longitude, y = latitude).
    #[inline]
    pub fn point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }

    pub fn summary(&self) -> LocationSummary {
        LocationSummary {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            difficulty: self.difficulty.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Producer-side input for an upsert.
///
/// # Examples
///
/// ```
/// use cragmap_types::location::{ClimbingType, NewLocation};
///
/// let gym = NewLocation::new("The Spot", ClimbingType::Gym, 40.02, -105.25)
///     .with_website("https://example.com")
///     .with_address("Boulder, CO");
/// assert_eq!(gym.difficulty, "");
/// assert!(gym.website.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ClimbingType,
    #[serde(default)]
    pub difficulty: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewLocation {
    pub fn new(name: impl Into<String>, kind: ClimbingType, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            difficulty: String::new(),
            latitude,
            longitude,
            address: None,
            description: None,
            website: None,
            image_url: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// A location annotated with its distance (meters) from a query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWithDistance {
    #[serde(flatten)]
    pub location: ClimbingLocation,
    pub distance: f64,
}

/// Compact member entry carried by a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ClimbingType,
    pub difficulty: String,
    pub latitude: f64,
    pub longitude: f64,
}
