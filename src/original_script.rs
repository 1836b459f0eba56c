//! Original-script side index built from MARC 880 linking fields.
//!
//! The 880 field (Alternate Graphical Representation) carries the original
//! non-Latin form of data that appears romanized in another field. Subfield
//! 6 links the two: its value starts with the base field's tag followed by
//! an occurrence number, e.g. `245-01` on an 880 field links it to the
//! first 245 occurrence.
//!
//! [`OriginalScriptIndex`] is a one-time pass over a record's 880 fields:
//! for each occurrence, the portion of subfield 6 before the first `-`
//! becomes the position key, and every other non-numeric subfield code
//! contributes alternate-script text. Multiple 880 occurrences may share a
//! position key (multiple scripts for one base occurrence); their letter
//! maps accumulate as an ordered list.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::record::Record;

/// The MARC linking field tag carrying alternate-script text.
pub const LINKING_FIELD_TAG: &str = "880";

lazy_static! {
    // Subfield 6 values look like "245-01" or "245-01/$1"; only the part
    // before the first dash addresses the base field.
    static ref LINK_SUFFIX: Regex = Regex::new("-.*$").expect("literal pattern");
}

/// Lookup from (base field tag, occurrence position, subfield code) to
/// alternate-script text.
#[derive(Debug, Clone, Default)]
pub struct OriginalScriptIndex {
    entries: IndexMap<String, Vec<IndexMap<char, String>>>,
}

impl OriginalScriptIndex {
    /// Build the index from every 880 occurrence on a record.
    ///
    /// An 880 field without a subfield 6 link cannot be attributed to a
    /// base field and is skipped.
    #[must_use]
    pub fn build(record: &Record) -> Self {
        let mut entries: IndexMap<String, Vec<IndexMap<char, String>>> = IndexMap::new();
        for field in record.fields(LINKING_FIELD_TAG) {
            let mut position_key: Option<String> = None;
            let mut letters: IndexMap<char, String> = IndexMap::new();
            for subfield in &field.subfields {
                if subfield.code == '6' {
                    position_key = Some(LINK_SUFFIX.replace(&subfield.value, "").into_owned());
                } else if !subfield.code.is_ascii_digit() {
                    letters.insert(subfield.code, subfield.value.clone());
                }
            }
            if let Some(key) = position_key {
                entries.entry(key).or_default().push(letters);
            }
        }
        OriginalScriptIndex { entries }
    }

    /// Look up the alternate-script text for a subfield of the `occurrence`-th
    /// field with the given tag.
    #[must_use]
    pub fn lookup(&self, tag: &str, occurrence: usize, code: char) -> Option<&str> {
        self.entries
            .get(tag)
            .and_then(|maps| maps.get(occurrence))
            .and_then(|letters| letters.get(&code))
            .map(String::as_str)
    }

    /// All letter maps linked to the given position key, in 880 document
    /// order.
    #[must_use]
    pub fn letter_maps(&self, tag: &str) -> &[IndexMap<char, String>] {
        self.entries.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Whether the record carried no usable 880 fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
