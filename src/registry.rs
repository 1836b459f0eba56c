//! Spec registry: source registration, compilation, and key listing.
//!
//! The registry has an explicit two-phase lifecycle: [`SpecRegistry::register_source`]
//! (or [`SpecRegistry::register_file`]) collects raw YAML documents, and
//! [`SpecRegistry::compile`] parses every pending source into immutable
//! [`ItemSpec`] models. Compilation is never triggered re-entrantly from a
//! query; a registry compiled once can be shared behind `&self`.
//!
//! Registration is idempotent (re-registering identical source text is a
//! no-op) and first-registered wins per item name: a later source never
//! overwrites an already-compiled item.
//!
//! # Source shape
//!
//! ```yaml
//! Pages:
//!   category: description
//!   300:
//!     subfields:
//!       - [a]
//!       - [match, '([0-9]+-[0-9]+)', 1]
//! Title:
//!   mandatory-field: title
//!   245:
//!     conditions:
//!       - [indicator, 2, '0']
//!     a:
//!       - [name, title]
//! ```
//!
//! Field tags with leading zeros (`020`, `001`) must be quoted in the
//! YAML; unquoted they resolve as numbers and lose the leading zeros.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::Value;

use crate::error::{Result, SpecError};
use crate::spec::{
    Capture, Condition, FieldRule, FunctionStep, ItemSpec, ParentStep, Pattern, ReplaceStep,
    SubfieldKey, TransformChain,
};
use crate::transforms::TransformFn;

lazy_static! {
    static ref EMPTY_SPEC: ItemSpec = ItemSpec::default();
}

/// Registry of named extraction specs, compiled from YAML sources.
#[derive(Debug, Default)]
pub struct SpecRegistry {
    /// Raw sources in registration order.
    sources: Vec<String>,
    /// Number of sources already compiled.
    compiled: usize,
    /// Compiled specs by item name, registration order preserved.
    specs: IndexMap<String, ItemSpec>,
    /// Item names per category, registration order preserved.
    categories: IndexMap<String, Vec<String>>,
}

impl SpecRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        SpecRegistry::default()
    }

    /// Register a raw YAML spec source.
    ///
    /// Returns `false` (and changes nothing) when identical source text was
    /// already registered.
    pub fn register_source(&mut self, yaml: impl Into<String>) -> bool {
        let yaml = yaml.into();
        if self.sources.contains(&yaml) {
            return false;
        }
        self.sources.push(yaml);
        true
    }

    /// Register a spec source read from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::IoError`] when the file cannot be read.
    pub fn register_file(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let yaml = fs::read_to_string(path)?;
        Ok(self.register_source(yaml))
    }

    /// Compile every pending source into spec models.
    ///
    /// Idempotent: already-compiled sources are not re-parsed, and an item
    /// name seen in an earlier source is never overwritten by a later one.
    ///
    /// # Errors
    ///
    /// Fails fast on unparseable YAML, unknown transform functions, invalid
    /// patterns, and malformed steps, identifying the offending item and
    /// field.
    pub fn compile(&mut self) -> Result<()> {
        while self.compiled < self.sources.len() {
            let source = self.sources[self.compiled].clone();
            self.compile_source(&source)?;
            self.compiled += 1;
        }
        Ok(())
    }

    /// Whether every registered source has been compiled.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled == self.sources.len()
    }

    /// Get the compiled spec for an item name.
    ///
    /// Unknown names yield the default empty model (see
    /// [`ItemSpec::is_empty`]).
    #[must_use]
    pub fn get_spec(&self, item: &str) -> &ItemSpec {
        self.specs.get(item).unwrap_or(&EMPTY_SPEC)
    }

    /// Whether an item name has a compiled spec.
    #[must_use]
    pub fn has_item(&self, item: &str) -> bool {
        self.specs.contains_key(item)
    }

    /// List compiled item names.
    ///
    /// With no category, every item outside the synthetic `other` bucket is
    /// returned (see [`SpecRegistry::list_keys_with_others`] for all of
    /// them). With a category, that category's names are intersected with
    /// the compiled names, in registration order.
    #[must_use]
    pub fn list_keys(&self, category: Option<&str>) -> Vec<String> {
        match category {
            None => self
                .specs
                .iter()
                .filter(|(_, spec)| spec.category != "other")
                .map(|(name, _)| name.clone())
                .collect(),
            Some(category) => self
                .categories
                .get(category)
                .map(|names| {
                    names
                        .iter()
                        .filter(|name| self.specs.contains_key(*name))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// List every compiled item name, including the `other` bucket.
    #[must_use]
    pub fn list_keys_with_others(&self) -> Vec<String> {
        self.specs.keys().cloned().collect()
    }

    /// Validate every compiled parent `method` step against an explicit
    /// capability list.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnknownParentMethod`] for the first parent rule
    /// naming a method outside `methods`.
    pub fn validate_capabilities(&self, methods: &[&str]) -> Result<()> {
        for (item, spec) in &self.specs {
            for (field, rule) in &spec.field_rules {
                for step in &rule.parent {
                    if let ParentStep::Method(method) = step {
                        if !methods.contains(&method.as_str()) {
                            return Err(SpecError::UnknownParentMethod {
                                item: item.clone(),
                                field: field.clone(),
                                method: method.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn compile_source(&mut self, source: &str) -> Result<()> {
        let value: Value = serde_yaml::from_str(source)
            .map_err(|err| SpecError::InvalidSource(err.to_string()))?;
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(()),
            other => {
                return Err(SpecError::InvalidSource(format!(
                    "expected a mapping of item names at the top level, got {}",
                    value_kind(&other)
                )))
            }
        };

        for (item_key, body) in &mapping {
            let Some(item) = key_string(item_key) else {
                continue;
            };
            // First-registered wins per item name.
            if self.specs.contains_key(&item) {
                continue;
            }
            let spec = compile_item(&item, body)?;
            self.categories
                .entry(spec.category.clone())
                .or_default()
                .push(item.clone());
            self.specs.insert(item, spec);
        }
        Ok(())
    }
}

/// Compile one raw item body into an [`ItemSpec`].
fn compile_item(item: &str, body: &Value) -> Result<ItemSpec> {
    let mut spec = ItemSpec::default();
    let Value::Mapping(mapping) = body else {
        return Ok(spec);
    };

    for (key, value) in mapping {
        let Some(key) = key_string(key) else {
            continue;
        };
        match key.as_str() {
            "category" => {
                if let Some(category) = scalar_string(value) {
                    spec.category = category;
                }
            }
            "originalletters" => {
                // Disabled only by an explicit `no`; YAML may deliver it as
                // a boolean or as the plain string "no".
                let disabled = matches!(value, Value::Bool(false))
                    || matches!(
                        scalar_string(value).as_deref(),
                        Some("no") | Some("false")
                    );
                if disabled {
                    spec.original_letters = false;
                }
            }
            "mandatory-field" => {
                spec.mandatory_field = scalar_string(value).filter(|s| !s.is_empty());
            }
            "view-method" => {
                if let Some(view_method) = scalar_string(value).filter(|s| !s.is_empty()) {
                    spec.view_method = view_method;
                }
            }
            "match-key" => {
                if let Some(match_key) = scalar_string(value) {
                    spec.match_key = match_key;
                }
            }
            tag => {
                let rule = compile_field_rule(item, tag, value)?;
                spec.field_rules.insert(tag.to_string(), rule);
            }
        }
    }
    Ok(spec)
}

/// Compile one field tag's raw rule body.
fn compile_field_rule(item: &str, tag: &str, body: &Value) -> Result<FieldRule> {
    let mut rule = FieldRule::default();
    let Value::Mapping(mapping) = body else {
        return Ok(rule);
    };

    for (key, value) in mapping {
        let Some(key) = key_string(key) else {
            continue;
        };
        match key.as_str() {
            "conditions" => {
                let Value::Sequence(entries) = value else {
                    continue;
                };
                for entry in entries {
                    if let Some(condition) = compile_condition(item, tag, entry)? {
                        rule.conditions.push(condition);
                    }
                }
            }
            "parent" => {
                let Value::Sequence(entries) = value else {
                    continue;
                };
                for entry in entries {
                    if let Some(step) = compile_parent_step(item, tag, entry)? {
                        rule.parent.push(step);
                    }
                }
            }
            // Free-text annotation in some hand-maintained specs; carries
            // no extraction semantics.
            "description" => {}
            "subfields" => {
                // Shorthand: the first entry lists subfield codes, and every
                // code shares the remaining transform steps.
                let Value::Sequence(entries) = value else {
                    continue;
                };
                let Some((codes, steps)) = entries.split_first() else {
                    continue;
                };
                let Value::Sequence(codes) = codes else {
                    return Err(SpecError::MalformedStep {
                        item: item.to_string(),
                        field: tag.to_string(),
                        detail: "subfields shorthand must start with a list of codes".to_string(),
                    });
                };
                let chain = compile_chain(item, tag, steps)?;
                for code in codes {
                    if let Some(key) = scalar_string(code).as_deref().and_then(SubfieldKey::parse)
                    {
                        rule.subfields.insert(key, chain.clone());
                    }
                }
            }
            other => {
                let Some(subfield_key) = SubfieldKey::parse(other) else {
                    continue;
                };
                let Value::Sequence(steps) = value else {
                    continue;
                };
                let chain = compile_chain(item, tag, steps)?;
                rule.subfields.insert(subfield_key, chain);
            }
        }
    }
    Ok(rule)
}

/// Compile one `[type, key, pattern]` condition entry.
///
/// Unknown condition types are skipped; malformed entries are errors.
fn compile_condition(item: &str, tag: &str, entry: &Value) -> Result<Option<Condition>> {
    let Value::Sequence(parts) = entry else {
        return Err(malformed(item, tag, "condition entry must be a sequence"));
    };
    if parts.len() < 3 {
        return Err(malformed(item, tag, "condition needs [type, key, pattern]"));
    }
    let kind = scalar_string(&parts[0]).unwrap_or_default();
    let key = scalar_string(&parts[1]).unwrap_or_default();
    let raw_pattern = pattern_string(&parts[2]);

    let (raw_pattern, negated) = match raw_pattern.strip_prefix('!') {
        Some(stripped) => (stripped.to_string(), true),
        None => (raw_pattern, false),
    };
    let pattern = compile_pattern(item, tag, "condition", &raw_pattern)?;

    match kind.as_str() {
        "indicator" => {
            let position = key
                .parse::<u8>()
                .map_err(|_| malformed(item, tag, "indicator condition key must be 1 or 2"))?;
            Ok(Some(Condition::Indicator {
                position,
                pattern,
                negated,
            }))
        }
        "field" => {
            let code = key
                .chars()
                .next()
                .ok_or_else(|| malformed(item, tag, "field condition key must be a subfield code"))?;
            Ok(Some(Condition::Subfield {
                code,
                pattern,
                negated,
            }))
        }
        _ => Ok(None),
    }
}

/// Compile one `[kind, value]` parent entry. Unknown kinds are skipped.
fn compile_parent_step(item: &str, tag: &str, entry: &Value) -> Result<Option<ParentStep>> {
    let Value::Sequence(parts) = entry else {
        return Err(malformed(item, tag, "parent entry must be a sequence"));
    };
    if parts.len() < 2 {
        return Err(malformed(item, tag, "parent entry needs [kind, value]"));
    }
    let kind = scalar_string(&parts[0]).unwrap_or_default();
    let value = scalar_string(&parts[1]).unwrap_or_default();
    match kind.as_str() {
        "method" => Ok(Some(ParentStep::Method(value))),
        "name" => Ok(Some(ParentStep::Name(value))),
        _ => Ok(None),
    }
}

/// Compile a subfield key's transform steps into a [`TransformChain`].
fn compile_chain(item: &str, tag: &str, steps: &[Value]) -> Result<TransformChain> {
    let mut chain = TransformChain::default();
    for step in steps {
        let Value::Sequence(parts) = step else {
            return Err(malformed(item, tag, "transform step must be a sequence"));
        };
        let Some(kind) = parts.first().and_then(scalar_string) else {
            continue;
        };
        match kind.as_str() {
            "name" => {
                let name = parts
                    .get(1)
                    .and_then(scalar_string)
                    .ok_or_else(|| malformed(item, tag, "name step needs a value"))?;
                chain.name = match chain.name.take() {
                    Some(existing) => Some(format!("{existing}#{name}")),
                    None => Some(name),
                };
            }
            "match" => {
                if parts.len() < 3 {
                    return Err(malformed(item, tag, "match step needs [match, pattern, group]"));
                }
                let raw = pattern_string(&parts[1]);
                let group = scalar_string(&parts[2])
                    .and_then(|g| g.parse::<usize>().ok())
                    .ok_or_else(|| malformed(item, tag, "match group must be an integer"))?;
                let pattern = compile_regex(item, tag, "match", &raw)?;
                chain.capture = Some(Capture { pattern, group });
            }
            "replace" => {
                if parts.len() < 3 {
                    return Err(malformed(
                        item,
                        tag,
                        "replace step needs [replace, pattern, replacement]",
                    ));
                }
                let raw = pattern_string(&parts[1]);
                let replacement = scalar_string(&parts[2]).unwrap_or_default();
                let pattern = compile_regex(item, tag, "replace", &raw)?;
                chain.replaces.push(ReplaceStep {
                    pattern,
                    replacement,
                });
            }
            "function" => {
                let name = parts
                    .get(1)
                    .and_then(scalar_string)
                    .ok_or_else(|| malformed(item, tag, "function step needs a name"))?;
                let function =
                    TransformFn::from_name(&name).ok_or_else(|| SpecError::UnknownFunction {
                        item: item.to_string(),
                        field: tag.to_string(),
                        name,
                    })?;
                let parameter = parts
                    .get(2)
                    .and_then(scalar_string)
                    .filter(|p| !p.is_empty());
                chain.functions.push(FunctionStep {
                    function,
                    parameter,
                });
            }
            _ => {}
        }
    }
    Ok(chain)
}

fn compile_pattern(item: &str, tag: &str, step: &str, raw: &str) -> Result<Pattern> {
    if raw == "*" {
        return Ok(Pattern::Any);
    }
    Ok(Pattern::Regex(compile_regex(item, tag, step, raw)?))
}

fn compile_regex(item: &str, tag: &str, step: &str, raw: &str) -> Result<Regex> {
    Regex::new(raw).map_err(|err| SpecError::InvalidPattern {
        item: item.to_string(),
        field: tag.to_string(),
        step: step.to_string(),
        pattern: raw.to_string(),
        message: err.to_string(),
    })
}

fn malformed(item: &str, tag: &str, detail: &str) -> SpecError {
    SpecError::MalformedStep {
        item: item.to_string(),
        field: tag.to_string(),
        detail: detail.to_string(),
    }
}

/// Render a mapping key as a string. Field tags like `300` arrive as YAML
/// numbers.
fn key_string(value: &Value) -> Option<String> {
    scalar_string(value)
}

/// Render a scalar value as a string; returns `None` for sequences,
/// mappings, and nulls.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render a pattern value, reconstructing negation tags.
///
/// A bare `!0` in YAML parses as a tag rather than a string; the leading
/// `!` is restored so negation survives the round trip.
fn pattern_string(value: &Value) -> String {
    match value {
        Value::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let tag = if tag.starts_with('!') {
                tag
            } else {
                format!("!{tag}")
            };
            format!("{tag}{}", scalar_string(&tagged.value).unwrap_or_default())
        }
        other => scalar_string(other).unwrap_or_default(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGES_SPEC: &str = "
Pages:
  category: description
  300:
    subfields:
      - [a]
      - [match, '([0-9]+-[0-9]+)', 1]
";

    fn compiled(yaml: &str) -> SpecRegistry {
        let mut registry = SpecRegistry::new();
        registry.register_source(yaml);
        registry.compile().expect("spec compiles");
        registry
    }

    // ------------------------------------------------------------------
    // Registration lifecycle
    // ------------------------------------------------------------------

    #[test]
    fn test_register_source_idempotent() {
        let mut registry = SpecRegistry::new();
        assert!(registry.register_source(PAGES_SPEC));
        assert!(!registry.register_source(PAGES_SPEC));
        registry.compile().unwrap();
        assert!(registry.is_compiled());
        assert_eq!(registry.list_keys_with_others(), vec!["Pages"]);
    }

    #[test]
    fn test_first_registered_wins() {
        let mut registry = SpecRegistry::new();
        registry.register_source("Title:\n  category: first\n");
        registry.register_source("Title:\n  category: second\n");
        registry.compile().unwrap();
        assert_eq!(registry.get_spec("Title").category, "first");
    }

    #[test]
    fn test_compile_then_register_more() {
        let mut registry = SpecRegistry::new();
        registry.register_source("A:\n  category: one\n");
        registry.compile().unwrap();
        registry.register_source("B:\n  category: two\n");
        assert!(!registry.is_compiled());
        registry.compile().unwrap();
        assert!(registry.has_item("A"));
        assert!(registry.has_item("B"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let mut registry = SpecRegistry::new();
        registry.register_source(": [");
        assert!(matches!(
            registry.compile(),
            Err(SpecError::InvalidSource(_))
        ));
    }

    // ------------------------------------------------------------------
    // Item metadata
    // ------------------------------------------------------------------

    #[test]
    fn test_item_defaults() {
        let registry = compiled(PAGES_SPEC);
        let spec = registry.get_spec("Pages");
        assert_eq!(spec.category, "description");
        assert!(spec.original_letters);
        assert!(spec.mandatory_field.is_none());
        assert_eq!(spec.view_method, "default");
        assert_eq!(spec.match_key, "");
    }

    #[test]
    fn test_metadata_extraction() {
        let registry = compiled(
            "
Holdings:
  category: holdings
  originalletters: no
  mandatory-field: callnumber
  view-method: table
  match-key: holding
  980:
    a:
      - [name, callnumber]
",
        );
        let spec = registry.get_spec("Holdings");
        assert!(!spec.original_letters);
        assert_eq!(spec.mandatory_field.as_deref(), Some("callnumber"));
        assert_eq!(spec.view_method, "table");
        assert_eq!(spec.match_key, "holding");
        assert_eq!(spec.field_rules.len(), 1);
    }

    #[test]
    fn test_unknown_item_yields_default_spec() {
        let registry = compiled(PAGES_SPEC);
        let spec = registry.get_spec("Nonexistent");
        assert!(spec.is_empty());
        assert_eq!(spec.category, "other");
    }

    // ------------------------------------------------------------------
    // Field rule compilation
    // ------------------------------------------------------------------

    #[test]
    fn test_subfields_shorthand_shares_steps() {
        let registry = compiled(
            "
Extent:
  300:
    subfields:
      - [a, b, c]
      - [function, trim]
",
        );
        let rule = &registry.get_spec("Extent").field_rules["300"];
        assert_eq!(rule.subfields.len(), 3);
        for code in ['a', 'b', 'c'] {
            let chain = &rule.subfields[&SubfieldKey::Code(code)];
            assert_eq!(chain.functions.len(), 1);
            assert_eq!(chain.functions[0].function, TransformFn::Trim);
        }
    }

    #[test]
    fn test_numeric_field_tags_and_codes() {
        // Unquoted `300:` and `0:` arrive as YAML numbers.
        let registry = compiled(
            "
Links:
  856:
    0:
      - [name, link]
",
        );
        let rule = &registry.get_spec("Links").field_rules["856"];
        assert!(rule.subfields.contains_key(&SubfieldKey::Code('0')));
    }

    #[test]
    fn test_conditions_compiled_in_order() {
        let registry = compiled(
            "
Subjects:
  650:
    conditions:
      - [indicator, 2, '0']
      - [field, '2', gnd]
    a:
      - [name, subject]
",
        );
        let rule = &registry.get_spec("Subjects").field_rules["650"];
        assert_eq!(rule.conditions.len(), 2);
        assert!(matches!(
            rule.conditions[0],
            Condition::Indicator { position: 2, negated: false, .. }
        ));
        assert!(matches!(
            rule.conditions[1],
            Condition::Subfield { code: '2', negated: false, .. }
        ));
    }

    #[test]
    fn test_negation_from_quoted_string() {
        let registry = compiled(
            "
NonLocal:
  245:
    conditions:
      - [indicator, 1, '!0']
    a: []
",
        );
        let rule = &registry.get_spec("NonLocal").field_rules["245"];
        assert!(matches!(
            rule.conditions[0],
            Condition::Indicator { position: 1, negated: true, .. }
        ));
    }

    #[test]
    fn test_negation_from_yaml_tag() {
        // An unquoted `!0` parses as a YAML tag; the `!` is restored.
        let registry = compiled(
            "
NonLocal:
  245:
    conditions:
      - [indicator, 1, !0 '']
    a: []
",
        );
        let rule = &registry.get_spec("NonLocal").field_rules["245"];
        assert!(matches!(
            rule.conditions[0],
            Condition::Indicator { position: 1, negated: true, .. }
        ));
    }

    #[test]
    fn test_wildcard_pattern() {
        let registry = compiled(
            "
AnyIsil:
  924:
    conditions:
      - [field, b, '*']
    b: []
",
        );
        let rule = &registry.get_spec("AnyIsil").field_rules["924"];
        assert!(matches!(
            &rule.conditions[0],
            Condition::Subfield { pattern: Pattern::Any, .. }
        ));
    }

    #[test]
    fn test_parent_steps() {
        let registry = compiled(
            "
Level:
  '000':
    parent:
      - [method, BibliographicLevel]
      - [name, level]
",
        );
        let rule = &registry.get_spec("Level").field_rules["000"];
        assert_eq!(
            rule.parent,
            vec![
                ParentStep::Method("BibliographicLevel".to_string()),
                ParentStep::Name("level".to_string()),
            ]
        );
    }

    #[test]
    fn test_name_steps_join_with_hash() {
        let registry = compiled(
            "
Title:
  245:
    a:
      - [name, title]
      - [name, sort]
",
        );
        let rule = &registry.get_spec("Title").field_rules["245"];
        let chain = &rule.subfields[&SubfieldKey::Code('a')];
        assert_eq!(chain.name.as_deref(), Some("title#sort"));
    }

    #[test]
    fn test_empty_field_rule_compiles_empty() {
        let registry = compiled("Sparse:\n  245:\n");
        let rule = &registry.get_spec("Sparse").field_rules["245"];
        assert!(rule.conditions.is_empty());
        assert!(rule.subfields.is_empty());
        assert!(rule.parent.is_empty());
    }

    // ------------------------------------------------------------------
    // Compile-time errors
    // ------------------------------------------------------------------

    #[test]
    fn test_unknown_function_fails_fast() {
        let mut registry = SpecRegistry::new();
        registry.register_source(
            "
Broken:
  245:
    a:
      - [function, strtolower]
",
        );
        match registry.compile() {
            Err(SpecError::UnknownFunction { item, field, name }) => {
                assert_eq!(item, "Broken");
                assert_eq!(field, "245");
                assert_eq!(name, "strtolower");
            }
            other => panic!("expected UnknownFunction, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_regex_identifies_step() {
        let mut registry = SpecRegistry::new();
        registry.register_source(
            "
Broken:
  300:
    a:
      - [match, '([0-9', 1]
",
        );
        match registry.compile() {
            Err(SpecError::InvalidPattern { item, field, step, .. }) => {
                assert_eq!(item, "Broken");
                assert_eq!(field, "300");
                assert_eq!(step, "match");
            }
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_short_condition_is_malformed() {
        let mut registry = SpecRegistry::new();
        registry.register_source(
            "
Broken:
  245:
    conditions:
      - [indicator, 1]
",
        );
        assert!(matches!(
            registry.compile(),
            Err(SpecError::MalformedStep { .. })
        ));
    }

    // ------------------------------------------------------------------
    // Key listing
    // ------------------------------------------------------------------

    #[test]
    fn test_list_keys_excludes_other_bucket() {
        let registry = compiled(
            "
Pages:
  category: description
  300:
    a: []
Misc:
  520:
    a: []
Title:
  category: description
  245:
    a: []
",
        );
        assert_eq!(registry.list_keys(None), vec!["Pages", "Title"]);
        assert_eq!(
            registry.list_keys_with_others(),
            vec!["Pages", "Misc", "Title"]
        );
    }

    #[test]
    fn test_list_keys_by_category() {
        let registry = compiled(
            "
Pages:
  category: description
  300:
    a: []
Title:
  category: description
  245:
    a: []
",
        );
        assert_eq!(
            registry.list_keys(Some("description")),
            vec!["Pages", "Title"]
        );
        assert!(registry.list_keys(Some("holdings")).is_empty());
    }

    // ------------------------------------------------------------------
    // Capability validation
    // ------------------------------------------------------------------

    #[test]
    fn test_validate_capabilities() {
        let registry = compiled(
            "
Level:
  '000':
    parent:
      - [method, BibliographicLevel]
",
        );
        assert!(registry
            .validate_capabilities(&["BibliographicLevel"])
            .is_ok());
        match registry.validate_capabilities(&[]) {
            Err(SpecError::UnknownParentMethod { item, method, .. }) => {
                assert_eq!(item, "Level");
                assert_eq!(method, "BibliographicLevel");
            }
            other => panic!("expected UnknownParentMethod, got {other:?}"),
        }
    }
}
