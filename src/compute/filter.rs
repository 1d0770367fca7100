//! Type/difficulty filters shared by every query path.
//!
//! Listing, proximity and clustering all decide membership through
//! [`LocationFilter::matches`], so a filter selects the same locations no
//! matter which engine evaluates it.

use cragmap_types::location::{ClimbingLocation, ClimbingType};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Conjunctive filter: type set membership AND exact difficulty match.
///
/// An empty `types` set places no restriction on type; `difficulty: None`
/// places none on difficulty.
///
/// # Examples
///
/// ```
/// use cragmap::compute::filter::LocationFilter;
/// use cragmap_types::location::ClimbingType;
///
/// let filter = LocationFilter::from_type_names(["BOULDER", "crag", "BOULDER"])
///     .with_difficulty("V5");
/// assert_eq!(filter.types.as_slice(), &[ClimbingType::Boulder]);
/// assert_eq!(filter.difficulty.as_deref(), Some("V5"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilter {
    #[serde(default)]
    pub types: SmallVec<[ClimbingType; 2]>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl LocationFilter {
    /// Filter that matches every location.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = ClimbingType>,
    {
        self.types = types.into_iter().collect();
        self.normalize()
    }

    pub fn with_type(mut self, kind: ClimbingType) -> Self {
        self.types.push(kind);
        self.normalize()
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self.normalize()
    }

    /// Parse type names as sent by map clients, dropping unknown names.
    pub fn from_type_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types = names.into_iter().filter_map(|name| {
            let name = name.as_ref();
            match name.parse::<ClimbingType>() {
                Ok(kind) => Some(kind),
                Err(_) => {
                    log::debug!("Ignoring unknown climbing type filter '{}'", name);
                    None
                }
            }
        });

        Self::any().with_types(types)
    }

    /// Canonical form: types deduplicated in first-seen order, blank
    /// difficulty treated as absent.
    pub fn normalize(mut self) -> Self {
        let mut seen: SmallVec<[ClimbingType; 2]> = SmallVec::new();
        for kind in self.types.drain(..) {
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        self.types = seen;

        if self
            .difficulty
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            self.difficulty = None;
        }

        self
    }

    /// True when the filter places no restriction at all.
    pub fn is_unrestricted(&self) -> bool {
        self.types.is_empty() && self.difficulty.is_none()
    }

    #[inline]
    pub fn matches(&self, location: &ClimbingLocation) -> bool {
        if !self.types.is_empty() && !self.types.contains(&location.kind) {
            return false;
        }

        match &self.difficulty {
            Some(difficulty) => location.difficulty == *difficulty,
            None => true,
        }
    }
}

/// Case-insensitive substring match on name or description.
///
/// Only the plain listing path supports free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    /// Returns `None` for blank input so callers can skip the predicate.
    pub fn parse(term: &str) -> Option<Self> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, location: &ClimbingLocation) -> bool {
        location.name.to_lowercase().contains(&self.needle)
            || location
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&self.needle))
    }
}
