//! Structured extraction output types.
//!
//! An extraction produces an ordered list of *data groups*; one group is
//! produced per accepted field occurrence (plus, possibly, a seed group
//! from parent-method injection). Each group maps output names to a
//! [`DataEntry`]: an ordered value list with optional original-script text
//! attached from the 880 index.

use indexmap::IndexMap;
use serde::Serialize;

/// One named output slot inside a data group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataEntry {
    /// Extracted values, in emission order.
    #[serde(rename = "data")]
    pub values: Vec<String>,
    /// Alternate-script text linked via the record's 880 fields, when the
    /// item has original letters enabled and the index holds an entry.
    #[serde(rename = "originalLetters", skip_serializing_if = "Option::is_none")]
    pub original_letters: Option<String>,
}

impl DataEntry {
    /// Create an entry holding a single value.
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        DataEntry {
            values: vec![value.into()],
            original_letters: None,
        }
    }

    /// The first value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// One data group: output names to entries, in emission order.
pub type DataGroup = IndexMap<String, DataEntry>;

/// The complete result of extracting one item from a record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    /// Data groups in field-tag declaration order, then occurrence order.
    pub groups: Vec<DataGroup>,
    /// The item's view-method metadata; set only when any group was
    /// produced.
    #[serde(rename = "view-method", skip_serializing_if = "Option::is_none")]
    pub view_method: Option<String>,
    /// The item's match-key metadata; set only when any group was
    /// produced.
    #[serde(rename = "match-key", skip_serializing_if = "Option::is_none")]
    pub match_key: Option<String>,
}

impl ExtractionResult {
    /// The empty result: no groups, no metadata.
    #[must_use]
    pub fn empty() -> Self {
        ExtractionResult::default()
    }

    /// Whether the extraction produced nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The first entry emitted under the given output name, searching
    /// groups in order.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&DataEntry> {
        self.groups.iter().find_map(|group| group.get(name))
    }

    /// Iterate over every value emitted under the given output name,
    /// across all groups.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.groups
            .iter()
            .filter_map(move |group| group.get(name))
            .flat_map(|entry| entry.values.iter().map(String::as_str))
    }
}
