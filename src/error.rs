//! Error types for spec compilation and extraction.
//!
//! This module provides the [`SpecError`] type for all marcspec operations
//! and the [`Result`] convenience type.
//!
//! All configuration problems are reported at spec-compile time and identify
//! the offending item name, field tag, and step, so a broken extraction rule
//! never surfaces as a mysterious empty result at extraction time.

use thiserror::Error;

/// Error type for spec registration, compilation, and validation.
///
/// Absent rule fragments (a field rule with no conditions, an item with no
/// field rules) are *not* errors; they compile to empty rules. Errors are
/// reserved for configuration that can never work: unparseable sources,
/// unknown transform functions, invalid patterns.
#[derive(Error, Debug)]
pub enum SpecError {
    /// A spec source could not be parsed as YAML.
    #[error("Invalid spec source: {0}")]
    InvalidSource(String),

    /// A `function` transform step named a function outside the closed
    /// transform registry.
    #[error("Unknown transform function '{name}' in item '{item}', field {field}")]
    UnknownFunction {
        /// Item name containing the step.
        item: String,
        /// Field tag containing the step.
        field: String,
        /// The unrecognized function name.
        name: String,
    },

    /// A condition or transform step carried an invalid regular expression.
    #[error("Invalid pattern '{pattern}' in item '{item}', field {field} ({step}): {message}")]
    InvalidPattern {
        /// Item name containing the pattern.
        item: String,
        /// Field tag containing the pattern.
        field: String,
        /// Which step kind held the pattern (`condition`, `match`, `replace`).
        step: String,
        /// The raw pattern text.
        pattern: String,
        /// The regex engine's diagnostic.
        message: String,
    },

    /// A condition or transform step had the wrong shape (missing entries,
    /// non-scalar pieces where scalars are required).
    #[error("Malformed step in item '{item}', field {field}: {detail}")]
    MalformedStep {
        /// Item name containing the step.
        item: String,
        /// Field tag containing the step.
        field: String,
        /// What was wrong with the step.
        detail: String,
    },

    /// A `parent` rule named a method outside the caller's declared
    /// accessor capability set.
    #[error("Unknown parent method '{method}' in item '{item}', field {field}")]
    UnknownParentMethod {
        /// Item name containing the parent rule.
        item: String,
        /// Field tag containing the parent rule.
        field: String,
        /// The unavailable method name.
        method: String,
    },

    /// IO error while reading a spec source file.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`SpecError`].
pub type Result<T> = std::result::Result<T, SpecError>;
