//! Closed registry of `function` transform steps.
//!
//! Extraction rules may name transform functions to apply to raw subfield
//! values. The set of supported functions is closed: names are resolved to
//! [`TransformFn`] variants at spec-compile time, so an unknown name is a
//! configuration error reported when the spec is compiled, never a silent
//! no-op at extraction time.

use std::fmt;

/// A named value transform applicable inside a subfield rule.
///
/// Functions receive the value and an optional parameter from the rule.
/// For the trimming variants the parameter is interpreted as the set of
/// characters to trim (default: whitespace); the case-folding variants
/// ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformFn {
    /// Fold the value to lowercase (`lowercase`).
    Lowercase,
    /// Fold the value to uppercase (`uppercase`).
    Uppercase,
    /// Uppercase the first character only (`ucfirst`).
    UppercaseFirst,
    /// Uppercase the first character of every whitespace-separated word
    /// (`titlecase`).
    Titlecase,
    /// Trim both ends (`trim`).
    Trim,
    /// Trim the start (`ltrim`).
    TrimStart,
    /// Trim the end (`rtrim`).
    TrimEnd,
}

/// Every supported transform, in the order used for diagnostics.
pub const ALL_TRANSFORMS: &[TransformFn] = &[
    TransformFn::Lowercase,
    TransformFn::Uppercase,
    TransformFn::UppercaseFirst,
    TransformFn::Titlecase,
    TransformFn::Trim,
    TransformFn::TrimStart,
    TransformFn::TrimEnd,
];

impl TransformFn {
    /// Resolve a spec-source function name to a transform.
    ///
    /// Returns `None` for names outside the closed registry; the spec
    /// compiler turns that into [`crate::SpecError::UnknownFunction`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lowercase" => Some(TransformFn::Lowercase),
            "uppercase" => Some(TransformFn::Uppercase),
            "ucfirst" => Some(TransformFn::UppercaseFirst),
            "titlecase" => Some(TransformFn::Titlecase),
            "trim" => Some(TransformFn::Trim),
            "ltrim" => Some(TransformFn::TrimStart),
            "rtrim" => Some(TransformFn::TrimEnd),
            _ => None,
        }
    }

    /// The spec-source name of this transform.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TransformFn::Lowercase => "lowercase",
            TransformFn::Uppercase => "uppercase",
            TransformFn::UppercaseFirst => "ucfirst",
            TransformFn::Titlecase => "titlecase",
            TransformFn::Trim => "trim",
            TransformFn::TrimStart => "ltrim",
            TransformFn::TrimEnd => "rtrim",
        }
    }

    /// Apply the transform to a value.
    #[must_use]
    pub fn apply(&self, value: &str, parameter: Option<&str>) -> String {
        match self {
            TransformFn::Lowercase => value.to_lowercase(),
            TransformFn::Uppercase => value.to_uppercase(),
            TransformFn::UppercaseFirst => uppercase_first(value),
            TransformFn::Titlecase => value
                .split_inclusive(char::is_whitespace)
                .map(uppercase_first)
                .collect(),
            TransformFn::Trim => match parameter {
                Some(chars) => value.trim_matches(|c| chars.contains(c)).to_string(),
                None => value.trim().to_string(),
            },
            TransformFn::TrimStart => match parameter {
                Some(chars) => value.trim_start_matches(|c| chars.contains(c)).to_string(),
                None => value.trim_start().to_string(),
            },
            TransformFn::TrimEnd => match parameter {
                Some(chars) => value.trim_end_matches(|c| chars.contains(c)).to_string(),
                None => value.trim_end().to_string(),
            },
        }
    }
}

impl fmt::Display for TransformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn uppercase_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
