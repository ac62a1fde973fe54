//! Candidate destination model

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{Location, duration};

/// A point of interest the round trip can lead to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub location: Location,
    pub name: String,
    /// Category the place was searched under (e.g. `park`, `museum`)
    pub category: String,
    /// Average time spent on site, zero when unknown
    #[serde(default = "Duration::zero", with = "duration::seconds")]
    pub visit_duration: Duration,
    /// Provider-specific type tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Place {
    /// Create a place with unknown visit duration and no tags
    #[must_use]
    pub fn new(location: Location, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            category: category.into(),
            visit_duration: Duration::zero(),
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_visit_duration(mut self, visit_duration: Duration) -> Self {
        self.visit_duration = visit_duration;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Whether the place belongs to the category, by name or tag
    #[must_use]
    pub fn matches_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
            || self.tags.iter().any(|tag| tag.eq_ignore_ascii_case(category))
    }
}
