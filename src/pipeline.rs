//! Subfield transform pipeline.
//!
//! For an accepted field occurrence, every subfield key declared in the
//! rule contributes zero or more raw values: an indicator key yields the
//! indicator character, a code key yields every matching subfield's text in
//! document order (narrowed to the condition-forced value when one was
//! pinned for that code).
//!
//! Each raw value then passes independently through the chain: at most one
//! capture step (a failed match empties the value), function steps in
//! declared order, replace steps in declared order, and a final trim.
//! Empty results are dropped. Surviving values are appended under their
//! output name — an explicit `#`-joined name fans the value out under
//! every listed name, and an absent name falls back to a per-occurrence
//! positional index.

use crate::conditions::ForcedValues;
use crate::original_script::OriginalScriptIndex;
use crate::output::DataGroup;
use crate::record::Field;
use crate::spec::{FieldRule, SubfieldKey, TransformChain};

/// Extraction context shared by every chain applied to one occurrence.
#[derive(Debug)]
pub struct PipelineContext<'a> {
    /// Tag of the field occurrence being processed.
    pub tag: &'a str,
    /// Zero-based position of this occurrence among its tag's fields.
    pub occurrence: usize,
    /// The record's original-script index.
    pub original_letters: &'a OriginalScriptIndex,
    /// Whether the item has original letters enabled.
    pub attach_original: bool,
    /// The item's mandatory output name, if configured.
    pub mandatory_field: Option<&'a str>,
}

/// Apply a rule's subfield chains to one accepted occurrence, merging
/// emitted values into `group`.
///
/// Returns `true` when any emitted output name equals the context's
/// mandatory field.
pub fn apply_subfield_rules(
    rule: &FieldRule,
    field: &Field,
    forced: &ForcedValues,
    ctx: &PipelineContext<'_>,
    group: &mut DataGroup,
) -> bool {
    let mut mandatory_satisfied = false;
    let mut data_index = 0usize;

    for (key, chain) in &rule.subfields {
        for raw in gather_raw_values(key, field, forced) {
            let Some(value) = run_chain(chain, &raw) else {
                continue;
            };
            let name = match &chain.name {
                Some(name) => name.clone(),
                None => {
                    let positional = data_index.to_string();
                    data_index += 1;
                    positional
                }
            };
            for output_name in name.split('#') {
                let entry = group.entry(output_name.to_string()).or_default();
                entry.values.push(value.clone());
                if ctx.attach_original {
                    if let SubfieldKey::Code(code) = key {
                        if let Some(text) =
                            ctx.original_letters.lookup(ctx.tag, ctx.occurrence, *code)
                        {
                            entry.original_letters = Some(text.to_string());
                        }
                    }
                }
                if ctx.mandatory_field == Some(output_name) {
                    mandatory_satisfied = true;
                }
            }
        }
    }
    mandatory_satisfied
}

/// Gather the raw values a subfield key addresses in one occurrence.
fn gather_raw_values(key: &SubfieldKey, field: &Field, forced: &ForcedValues) -> Vec<String> {
    match key {
        SubfieldKey::Indicator(position) => field
            .indicator(*position)
            .map(|ind| vec![ind.to_string()])
            .unwrap_or_default(),
        SubfieldKey::Code(code) => {
            let values = field.subfield_values(*code);
            match forced.get(code) {
                // A condition pinned this code: only the matching text
                // qualifies, suppressing ambiguity among repeats.
                Some(pinned) => values
                    .filter(|value| *value == pinned)
                    .map(str::to_string)
                    .collect(),
                None => values.map(str::to_string).collect(),
            }
        }
    }
}

/// Run one raw value through a transform chain.
///
/// Returns `None` when the value ends up empty after trimming; the literal
/// string `"0"` survives.
fn run_chain(chain: &TransformChain, raw: &str) -> Option<String> {
    let mut value = raw.to_string();

    if let Some(capture) = &chain.capture {
        value = capture
            .pattern
            .captures(&value)
            .and_then(|caps| caps.get(capture.group))
            .map_or_else(String::new, |m| m.as_str().to_string());
    }
    for step in &chain.functions {
        value = step.function.apply(&value, step.parameter.as_deref());
    }
    for step in &chain.replaces {
        value = step
            .pattern
            .replace_all(&value, step.replacement.as_str())
            .into_owned();
    }

    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::spec::{Capture, FunctionStep, ReplaceStep};
    use crate::transforms::TransformFn;
    use indexmap::IndexMap;
    use regex::Regex;

    fn context<'a>(index: &'a OriginalScriptIndex) -> PipelineContext<'a> {
        PipelineContext {
            tag: "300",
            occurrence: 0,
            original_letters: index,
            attach_original: true,
            mandatory_field: None,
        }
    }

    fn chain_with_name(name: &str) -> TransformChain {
        TransformChain {
            name: Some(name.to_string()),
            ..TransformChain::default()
        }
    }

    fn rule_with(key: SubfieldKey, chain: TransformChain) -> FieldRule {
        let mut subfields = IndexMap::new();
        subfields.insert(key, chain);
        FieldRule {
            conditions: Vec::new(),
            subfields,
            parent: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Chain steps
    // ------------------------------------------------------------------

    #[test]
    fn test_capture_step() {
        let chain = TransformChain {
            name: None,
            capture: Some(Capture {
                pattern: Regex::new("([0-9]+-[0-9]+)").unwrap(),
                group: 1,
            }),
            functions: Vec::new(),
            replaces: Vec::new(),
        };
        assert_eq!(run_chain(&chain, "pp. 12-34"), Some("12-34".to_string()));
        // A failed match empties the value, which is then dropped.
        assert_eq!(run_chain(&chain, "unpaged"), None);
    }

    #[test]
    fn test_function_then_replace_order() {
        let chain = TransformChain {
            name: None,
            capture: None,
            functions: vec![FunctionStep {
                function: TransformFn::Uppercase,
                parameter: None,
            }],
            replaces: vec![ReplaceStep {
                pattern: Regex::new("MARC").unwrap(),
                replacement: "MARC 21".to_string(),
            }],
        };
        // Replace sees the post-function value; a lowercase input only
        // matches because the function ran first.
        assert_eq!(run_chain(&chain, "marc"), Some("MARC 21".to_string()));
    }

    #[test]
    fn test_zero_survives_trim_drop() {
        let chain = TransformChain::default();
        assert_eq!(run_chain(&chain, " 0 "), Some("0".to_string()));
        assert_eq!(run_chain(&chain, "   "), None);
        assert_eq!(run_chain(&chain, ""), None);
    }

    #[test]
    fn test_replacement_group_references() {
        let chain = TransformChain {
            replaces: vec![ReplaceStep {
                pattern: Regex::new(r"^(\w+), (\w+)$").unwrap(),
                replacement: "$2 $1".to_string(),
            }],
            ..TransformChain::default()
        };
        assert_eq!(run_chain(&chain, "Smith, John"), Some("John Smith".to_string()));
    }

    // ------------------------------------------------------------------
    // Gathering and naming
    // ------------------------------------------------------------------

    #[test]
    fn test_fan_out_names_receive_identical_values() {
        let field = Field::builder("245", '1', '0')
            .subfield('a', "Main title")
            .build();
        let rule = rule_with(SubfieldKey::Code('a'), chain_with_name("title#sort"));
        let index = OriginalScriptIndex::default();
        let mut group = DataGroup::new();

        apply_subfield_rules(&rule, &field, &ForcedValues::new(), &context(&index), &mut group);
        assert_eq!(group["title"].values, vec!["Main title"]);
        assert_eq!(group["sort"].values, vec!["Main title"]);
        assert_eq!(group["title"].values, group["sort"].values);
    }

    #[test]
    fn test_positional_names_increment_per_value() {
        let field = Field::builder("300", ' ', ' ')
            .subfield('a', "xii, 300 p.")
            .subfield('b', "ill.")
            .build();
        let mut subfields = IndexMap::new();
        subfields.insert(SubfieldKey::Code('a'), TransformChain::default());
        subfields.insert(SubfieldKey::Code('b'), TransformChain::default());
        let rule = FieldRule {
            conditions: Vec::new(),
            subfields,
            parent: Vec::new(),
        };
        let index = OriginalScriptIndex::default();
        let mut group = DataGroup::new();

        apply_subfield_rules(&rule, &field, &ForcedValues::new(), &context(&index), &mut group);
        assert_eq!(group["0"].values, vec!["xii, 300 p."]);
        assert_eq!(group["1"].values, vec!["ill."]);
    }

    #[test]
    fn test_forced_value_narrows_repeats() {
        let field = Field::builder("024", '7', ' ')
            .subfield('a', "10.1000/1")
            .subfield('a', "urn:nbn:de:1")
            .build();
        let rule = rule_with(SubfieldKey::Code('a'), chain_with_name("id"));
        let mut forced = ForcedValues::new();
        forced.insert('a', "10.1000/1".to_string());
        let index = OriginalScriptIndex::default();
        let mut group = DataGroup::new();

        apply_subfield_rules(&rule, &field, &forced, &context(&index), &mut group);
        assert_eq!(group["id"].values, vec!["10.1000/1"]);
    }

    #[test]
    fn test_indicator_key_yields_indicator_char() {
        let field = Field::builder("856", '4', '0').build();
        let rule = rule_with(SubfieldKey::Indicator(2), chain_with_name("access"));
        let index = OriginalScriptIndex::default();
        let mut group = DataGroup::new();

        apply_subfield_rules(&rule, &field, &ForcedValues::new(), &context(&index), &mut group);
        assert_eq!(group["access"].values, vec!["0"]);
    }

    #[test]
    fn test_original_letters_attached_only_when_enabled() {
        let record = Record::builder("")
            .field(
                Field::builder("880", '1', '0')
                    .subfield('6', "300-01")
                    .subfield('a', "原文")
                    .build(),
            )
            .build();
        let index = OriginalScriptIndex::build(&record);
        let field = Field::builder("300", ' ', ' ')
            .subfield('a', "300 p.")
            .build();
        let rule = rule_with(SubfieldKey::Code('a'), chain_with_name("extent"));

        let mut group = DataGroup::new();
        apply_subfield_rules(&rule, &field, &ForcedValues::new(), &context(&index), &mut group);
        assert_eq!(group["extent"].original_letters.as_deref(), Some("原文"));

        let disabled = PipelineContext {
            attach_original: false,
            ..context(&index)
        };
        let mut group = DataGroup::new();
        apply_subfield_rules(&rule, &field, &ForcedValues::new(), &disabled, &mut group);
        assert_eq!(group["extent"].original_letters, None);
    }

    #[test]
    fn test_mandatory_field_tracking() {
        let field = Field::builder("245", '1', '0')
            .subfield('a', "Title")
            .build();
        let rule = rule_with(SubfieldKey::Code('a'), chain_with_name("title"));
        let index = OriginalScriptIndex::default();

        let satisfied_ctx = PipelineContext {
            mandatory_field: Some("title"),
            ..context(&index)
        };
        let mut group = DataGroup::new();
        assert!(apply_subfield_rules(
            &rule,
            &field,
            &ForcedValues::new(),
            &satisfied_ctx,
            &mut group
        ));

        let unsatisfied_ctx = PipelineContext {
            mandatory_field: Some("pages"),
            ..context(&index)
        };
        let mut group = DataGroup::new();
        assert!(!apply_subfield_rules(
            &rule,
            &field,
            &ForcedValues::new(),
            &unsatisfied_ctx,
            &mut group
        ));
    }
}
