//! Wire format of a topic tree
//!
//! A tree serializes to a nested mapping keyed by node id:
//! `{id: {id, label, description, children: {id: {...}, ...}}}`.
//! Children keep insertion order so the output is stable across runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Topic;
use crate::domain::error::{DomainError, DomainResult};

/// Id-keyed mapping of serialized nodes.
pub type TreeDict = IndexMap<String, WireNode>;

/// One serialized node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub children: TreeDict,
}

impl WireNode {
    /// Convert into a topic, checking the mapping key matches the inner id.
    pub(crate) fn to_topic(&self, key: &str) -> DomainResult<Topic> {
        if self.id != key {
            return Err(DomainError::malformed(format!(
                "key '{}' does not match node id '{}'",
                key, self.id
            )));
        }
        Ok(Topic::new(
            self.id.clone(),
            self.label.clone().unwrap_or_default(),
            self.description.clone(),
        ))
    }
}

/// The single root entry of a serialized tree.
pub(crate) fn root_entry(dict: &TreeDict) -> DomainResult<(&String, &WireNode)> {
    match dict.len() {
        1 => dict
            .iter()
            .next()
            .ok_or_else(|| DomainError::malformed("empty tree")),
        n => Err(DomainError::malformed(format!(
            "expected exactly one root entry, found {}",
            n
        ))),
    }
}

/// Parse a JSON document into a tree dict.
pub fn from_json(content: &str) -> DomainResult<TreeDict> {
    serde_json::from_str(content).map_err(|e| DomainError::malformed(e.to_string()))
}

/// Render a tree dict as pretty JSON.
pub fn to_json(dict: &TreeDict) -> String {
    // IndexMap<String, _> with plain structs cannot fail to serialize
    serde_json::to_string_pretty(dict).unwrap_or_default()
}
