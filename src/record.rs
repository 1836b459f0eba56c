//! Minimal MARC record model consumed by the extraction engine.
//!
//! The engine does not read ISO 2709 or MARCXML; it only needs the record
//! surface that extraction rules address:
//! - [`Record`] — leader text plus data fields grouped by tag
//! - [`Field`] — tag, two indicators, ordered subfields
//! - [`Subfield`] — coded text unit within a field
//!
//! Fields are stored per tag in insertion order using `IndexMap`, so the
//! occurrence order the extraction rules depend on is preserved.
//!
//! # Examples
//!
//! Build a record with the builder API:
//!
//! ```
//! use marcspec::{Field, Record};
//!
//! let record = Record::builder("00000nam a2200000 a 4500")
//!     .field(
//!         Field::builder("245", '1', '0')
//!             .subfield('a', "The Great Gatsby")
//!             .subfield('c', "F. Scott Fitzgerald")
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(record.fields("245")[0].subfield('a'), Some("The Great Gatsby"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A MARC bibliographic record as seen by the extraction engine.
///
/// The leader is carried as plain text; the engine itself only reads
/// position-addressed characters from it (and hands it to leader-derived
/// accessor methods).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Record leader (24 characters in well-formed records).
    leader: String,
    /// Data fields grouped by tag, preserving insertion order per tag.
    fields: IndexMap<String, Vec<Field>>,
}

/// A data field in a MARC record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag (3 digits).
    pub tag: String,
    /// First indicator.
    pub indicator1: char,
    /// Second indicator.
    pub indicator2: char,
    /// Subfields in document order (`SmallVec` avoids allocation for
    /// typical fields with 4 or fewer subfields).
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character).
    pub code: char,
    /// Subfield value.
    pub value: String,
}

impl Record {
    /// Create a new record with the given leader text.
    #[must_use]
    pub fn new(leader: impl Into<String>) -> Self {
        Record {
            leader: leader.into(),
            fields: IndexMap::new(),
        }
    }

    /// Create a builder for fluently constructing records.
    #[must_use]
    pub fn builder(leader: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            record: Record::new(leader),
        }
    }

    /// Get the record leader text.
    #[must_use]
    pub fn leader(&self) -> &str {
        &self.leader
    }

    /// Add a data field, appending to the tag's occurrence list.
    pub fn add_field(&mut self, field: Field) {
        self.fields
            .entry(field.tag.clone())
            .or_default()
            .push(field);
    }

    /// Get all occurrences of a tag, in document order.
    ///
    /// Returns an empty slice when the record has no such field; a record
    /// without a rule's tags is a normal case, not an error.
    #[must_use]
    pub fn fields(&self, tag: &str) -> &[Field] {
        self.fields.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Get the first occurrence of a tag.
    #[must_use]
    pub fn first_field(&self, tag: &str) -> Option<&Field> {
        self.fields.get(tag).and_then(|v| v.first())
    }

    /// Iterate over all tags present on the record, in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Total number of data fields across all tags.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }
}

impl Field {
    /// Create a new field with the given tag and indicators.
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        Field {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for fluently constructing fields.
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator1: char, indicator2: char) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(tag, indicator1, indicator2),
        }
    }

    /// Append a subfield.
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// Get the value of the first subfield with the given code.
    #[must_use]
    pub fn subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Iterate over the values of every subfield with the given code,
    /// in document order.
    pub fn subfield_values(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Get the indicator character at a position (1 or 2).
    ///
    /// Returns `None` for any other position.
    #[must_use]
    pub fn indicator(&self, position: u8) -> Option<char> {
        match position {
            1 => Some(self.indicator1),
            2 => Some(self.indicator2),
            _ => None,
        }
    }
}

/// Builder for fluently constructing [`Record`] instances.
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Add a data field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Finish building and return the record.
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

/// Builder for fluently constructing [`Field`] instances.
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Append a subfield.
    #[must_use]
    pub fn subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Finish building and return the field.
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = Record::builder("leader")
            .field(
                Field::builder("245", '1', '0')
                    .subfield('a', "Title")
                    .build(),
            )
            .build();

        assert_eq!(record.leader(), "leader");
        assert_eq!(record.field_count(), 1);
        assert_eq!(record.fields("245")[0].subfield('a'), Some("Title"));
    }

    #[test]
    fn test_fields_missing_tag_is_empty() {
        let record = Record::new("");
        assert!(record.fields("300").is_empty());
        assert!(record.first_field("300").is_none());
    }

    #[test]
    fn test_occurrence_order_preserved() {
        let mut record = Record::new("");
        record.add_field(Field::builder("650", ' ', '0').subfield('a', "First").build());
        record.add_field(Field::builder("650", ' ', '0').subfield('a', "Second").build());

        let values: Vec<&str> = record
            .fields("650")
            .iter()
            .filter_map(|f| f.subfield('a'))
            .collect();
        assert_eq!(values, vec!["First", "Second"]);
    }

    #[test]
    fn test_repeated_subfield_values() {
        let field = Field::builder("505", '0', ' ')
            .subfield('t', "Chapter one")
            .subfield('r', "Smith")
            .subfield('t', "Chapter two")
            .build();

        let titles: Vec<&str> = field.subfield_values('t').collect();
        assert_eq!(titles, vec!["Chapter one", "Chapter two"]);
        assert_eq!(field.subfield('t'), Some("Chapter one"));
    }

    #[test]
    fn test_indicator_positions() {
        let field = Field::new("245", '1', '0');
        assert_eq!(field.indicator(1), Some('1'));
        assert_eq!(field.indicator(2), Some('0'));
        assert_eq!(field.indicator(3), None);
        assert_eq!(field.indicator(0), None);
    }
}
