//! Compiled extraction-rule model.
//!
//! Raw YAML spec sources are compiled once, at registration time, into the
//! strongly-typed model in this module (see [`crate::registry`] for the
//! compiler). Extraction then works exclusively against compiled rules;
//! shape ambiguities in the raw configuration are never re-interpreted per
//! record.
//!
//! One [`ItemSpec`] describes one named output item (e.g. `Pages`,
//! `Title`): its metadata plus an ordered mapping of MARC field tag to
//! [`FieldRule`]. A field rule carries the conditions an occurrence must
//! satisfy, the per-subfield transform chains, and any parent-method steps.

use indexmap::IndexMap;
use regex::Regex;

use crate::transforms::TransformFn;

/// Compiled extraction rule set for one named output item.
#[derive(Debug, Clone)]
pub struct ItemSpec {
    /// Grouping label used for key listing (default `"other"`).
    pub category: String,
    /// Whether original-script text from linked 880 fields is attached to
    /// output entries. Enabled unless the source says `originalletters: no`.
    pub original_letters: bool,
    /// Output name that must be populated for the item's result to be
    /// non-empty. `None` means no gating.
    pub mandatory_field: Option<String>,
    /// Opaque view metadata carried through to the caller (default
    /// `"default"`).
    pub view_method: String,
    /// Opaque match metadata carried through to the caller (default empty).
    pub match_key: String,
    /// Field rules in declaration order, keyed by MARC field tag.
    pub field_rules: IndexMap<String, FieldRule>,
}

impl Default for ItemSpec {
    fn default() -> Self {
        ItemSpec {
            category: "other".to_string(),
            original_letters: true,
            mandatory_field: None,
            view_method: "default".to_string(),
            match_key: String::new(),
            field_rules: IndexMap::new(),
        }
    }
}

impl ItemSpec {
    /// Whether this spec carries no field rules (the default model returned
    /// for unknown item names).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_rules.is_empty()
    }
}

/// Compiled rule for one MARC field tag within an item spec.
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    /// Conditions an occurrence must satisfy, evaluated in declaration
    /// order with short-circuit rejection.
    pub conditions: Vec<Condition>,
    /// Transform chains keyed by subfield code or indicator position, in
    /// declaration order.
    pub subfields: IndexMap<SubfieldKey, TransformChain>,
    /// Parent accessor steps run before this tag's occurrences.
    pub parent: Vec<ParentStep>,
}

/// A single acceptance condition on a field occurrence.
///
/// Negation derives from a leading `!` in the raw pattern, stripped before
/// the pattern is compiled.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Condition on an indicator character.
    Indicator {
        /// Indicator position (1 or 2).
        position: u8,
        /// Pattern the indicator must (or, negated, must not) match.
        pattern: Pattern,
        /// Whether the raw pattern carried a leading `!`.
        negated: bool,
    },
    /// Condition on the text of a coded subfield.
    Subfield {
        /// Subfield code.
        code: char,
        /// Pattern some subfield text must (or, negated, must not) match.
        pattern: Pattern,
        /// Whether the raw pattern carried a leading `!`.
        negated: bool,
    },
}

/// A compiled condition/transform pattern.
///
/// The raw pattern `*` is a wildcard; anything else is a regular
/// expression, compiled at spec-compile time and matched unanchored.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches any text (`*` in the raw source).
    Any,
    /// Matches text containing a match of the regex.
    Regex(Regex),
}

impl Pattern {
    /// Whether the pattern matches the given text.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Regex(re) => re.is_match(text),
        }
    }
}

/// Key addressing a raw value within a field occurrence: either a subfield
/// code or one of the two indicator positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubfieldKey {
    /// A coded subfield (`a`, `b`, `0`, ...).
    Code(char),
    /// An indicator position (`indicator1` / `indicator2` in the source).
    Indicator(u8),
}

impl SubfieldKey {
    /// Parse a raw spec key into a subfield key.
    ///
    /// `indicatorN` tokens address indicator position `N`; any
    /// single-character key is a subfield code. Returns `None` for
    /// anything else.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(position) = raw.strip_prefix("indicator") {
            let position = position.parse::<u8>().ok()?;
            return Some(SubfieldKey::Indicator(position));
        }
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Some(SubfieldKey::Code(code)),
            _ => None,
        }
    }
}

/// Ordered transform chain for one subfield key.
///
/// Steps apply per raw value in fixed priority order: the capture first,
/// then functions in declared order, then replacements in declared order.
/// Any step kind may be absent.
#[derive(Debug, Clone, Default)]
pub struct TransformChain {
    /// Explicit output name; `#`-joined names fan the value out under
    /// every listed name. `None` means an auto-incrementing positional
    /// index is used.
    pub name: Option<String>,
    /// At most one capture step.
    pub capture: Option<Capture>,
    /// Function steps in declared order.
    pub functions: Vec<FunctionStep>,
    /// Replace steps in declared order.
    pub replaces: Vec<ReplaceStep>,
}

/// A `match` step: apply a regex and keep one capture group.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Pattern to match against the raw value.
    pub pattern: Regex,
    /// Capture group index to keep; a failed match empties the value.
    pub group: usize,
}

/// A `function` step: apply a registered transform with an optional
/// parameter.
#[derive(Debug, Clone)]
pub struct FunctionStep {
    /// The transform to apply.
    pub function: TransformFn,
    /// Optional parameter passed to the transform.
    pub parameter: Option<String>,
}

/// A `replace` step: regex find-and-substitute over the value.
#[derive(Debug, Clone)]
pub struct ReplaceStep {
    /// Pattern to find.
    pub pattern: Regex,
    /// Replacement text (supports `$N` group references).
    pub replacement: String,
}

/// A parent rule step: seed default output from a base-record accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentStep {
    /// Invoke the named accessor method.
    Method(String),
    /// Output name under which a scalar method result is wrapped.
    Name(String),
}
