//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::codec::TreeDict;

/// A single entry of a roadmap, e.g. "Web Dev".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Unique id within the owning tree
    pub id: String,
    /// Display name, serialized as `label`
    pub name: String,
    pub description: Option<String>,
}

impl Topic {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description,
        }
    }

    /// Apply a sparse update.
    ///
    /// Only non-empty values overwrite; `None` and `""` leave the field as it is.
    pub fn change(&mut self, patch: &TopicPatch) -> bool {
        if let Some(name) = patch.name.as_deref().filter(|s| !s.is_empty()) {
            self.name = name.to_string();
        }
        if let Some(description) = patch.description.as_deref().filter(|s| !s.is_empty()) {
            self.description = Some(description.to_string());
        }
        true
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Sparse set of field updates for a [`Topic`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl TopicPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True if applying the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
        blank(&self.name) && blank(&self.description)
    }
}

/// Persisted form of a roadmap, keyed by the roadmap's external id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadMapRecord {
    pub id: String,
    pub name: String,
    /// Serialized tree in the `{id: {id, label, description, children}}` shape
    #[serde(default)]
    pub map_json: TreeDict,
    #[serde(default)]
    pub description: String,
}

impl RoadMapRecord {
    /// Record with empty defaults, as created on first `put`.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            map_json: TreeDict::new(),
            description: String::new(),
        }
    }
}

/// One news item related to a roadmap topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Topic name the item was found for
    pub topic: String,
    pub title: String,
    pub url: String,
    pub points: Option<u64>,
    pub author: Option<String>,
}
