//! Explicit capability interface for base-record accessor methods.
//!
//! Parent rules (and the legacy fallback for unknown item names) invoke
//! accessor methods on the surrounding record system by name. Instead of
//! reflective lookup, callers implement [`RecordAccessors`] and enumerate
//! every invokable method up front; the registry validates parent rules
//! against that set, so a misspelled method name is an error at
//! construction time rather than a silent no-op.

use indexmap::IndexMap;

use crate::record::Record;

/// The result shape of an accessor method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorValue {
    /// A single text value, wrapped under the parent rule's declared name.
    Scalar(String),
    /// Name-to-value pairs, each becoming a single-element entry in the
    /// seed data group.
    Map(IndexMap<String, String>),
}

/// Capability set of named accessor methods on the base record.
///
/// `method_names` must enumerate every name `invoke` answers; the
/// extractor validates compiled parent rules against it.
pub trait RecordAccessors {
    /// Every method name this capability provides.
    fn method_names(&self) -> &[&'static str];

    /// Invoke a method by name against the record.
    ///
    /// Returns `None` for names outside the capability set.
    fn invoke(&self, method: &str, record: &Record) -> Option<AccessorValue>;
}

/// The empty capability set: no parent methods, no legacy fallback.
impl RecordAccessors for () {
    fn method_names(&self) -> &[&'static str] {
        &[]
    }

    fn invoke(&self, _method: &str, _record: &Record) -> Option<AccessorValue> {
        None
    }
}

/// Leader-derived accessor methods.
///
/// Provides the two position-addressed leader lookups the extraction specs
/// conventionally seed from:
/// - `BibliographicLevel` — leader position 7
/// - `MultipartResourceRecordLevel` — leader position 19
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaderAccessors;

const LEADER_METHODS: &[&str] = &["BibliographicLevel", "MultipartResourceRecordLevel"];

impl LeaderAccessors {
    /// The bibliographic level name for leader position 7.
    #[must_use]
    pub fn bibliographic_level(leader: &str) -> &'static str {
        match leader.chars().nth(7).map(|c| c.to_ascii_uppercase()) {
            Some('M') => "Monograph",
            Some('S') => "Serial",
            Some('A') => "MonographPart",
            Some('B') => "SerialPart",
            Some('C') => "Collection",
            Some('D') => "CollectionPart",
            _ => "Unknown",
        }
    }

    /// The multipart resource record level name for leader position 19.
    #[must_use]
    pub fn multipart_resource_record_level(leader: &str) -> &'static str {
        match leader.chars().nth(19).map(|c| c.to_ascii_uppercase()) {
            Some('A') => "Set",
            Some('B') => "Part with independent title",
            Some('C') => "Part with dependent title",
            _ => "Unknown",
        }
    }
}

impl RecordAccessors for LeaderAccessors {
    fn method_names(&self) -> &[&'static str] {
        LEADER_METHODS
    }

    fn invoke(&self, method: &str, record: &Record) -> Option<AccessorValue> {
        match method {
            "BibliographicLevel" => Some(AccessorValue::Scalar(
                Self::bibliographic_level(record.leader()).to_string(),
            )),
            "MultipartResourceRecordLevel" => Some(AccessorValue::Scalar(
                Self::multipart_resource_record_level(record.leader()).to_string(),
            )),
            _ => None,
        }
    }
}
