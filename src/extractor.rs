//! Data assembly: turning a record plus a compiled spec into structured
//! output.
//!
//! [`Extractor`] binds a record, a compiled [`SpecRegistry`], and a
//! [`RecordAccessors`] capability together for the lifetime of one record's
//! extractions. The original-script index is built once at construction and
//! reused by every [`Extractor::extract`] call.
//!
//! Per extraction request, the assembler:
//! 1. resolves the item's spec (falling back to a same-named accessor
//!    method for unknown items),
//! 2. runs parent-method injection per field tag,
//! 3. filters each occurrence through the condition evaluator and feeds
//!    accepted ones to the transform pipeline,
//! 4. collects non-empty data groups (or the injected seed alone), and
//! 5. enforces the mandatory-field invariant, attaching the item's view
//!    metadata only when output survives.

use crate::accessors::{AccessorValue, RecordAccessors};
use crate::conditions;
use crate::error::Result;
use crate::original_script::OriginalScriptIndex;
use crate::output::{DataEntry, DataGroup, ExtractionResult};
use crate::pipeline::{self, PipelineContext};
use crate::record::Record;
use crate::registry::SpecRegistry;
use crate::spec::{FieldRule, ParentStep};

/// Spec-driven extractor over one record.
///
/// # Examples
///
/// ```
/// use marcspec::{Extractor, Field, Record, SpecRegistry};
///
/// let mut registry = SpecRegistry::new();
/// registry.register_source(
///     "
/// Pages:
///   300:
///     subfields:
///       - [a]
///       - [match, '([0-9]+-[0-9]+)', 1]
/// ",
/// );
/// registry.compile()?;
///
/// let record = Record::builder("00000naa a2200000 a 4500")
///     .field(Field::builder("300", ' ', ' ').subfield('a', "pp. 12-34").build())
///     .build();
///
/// let extractor = Extractor::new(&record, &registry, ())?;
/// let pages = extractor.extract("Pages");
/// assert_eq!(pages.first("0").unwrap().first(), Some("12-34"));
/// # Ok::<(), marcspec::SpecError>(())
/// ```
#[derive(Debug)]
pub struct Extractor<'a, A: RecordAccessors> {
    record: &'a Record,
    registry: &'a SpecRegistry,
    accessors: A,
    original_letters: OriginalScriptIndex,
}

impl<'a, A: RecordAccessors> Extractor<'a, A> {
    /// Bind a record, compiled registry, and accessor capability.
    ///
    /// Builds the record's original-script index and validates every
    /// compiled parent rule against the capability set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SpecError::UnknownParentMethod`] when a parent rule
    /// names a method the capability does not provide.
    pub fn new(record: &'a Record, registry: &'a SpecRegistry, accessors: A) -> Result<Self> {
        registry.validate_capabilities(accessors.method_names())?;
        Ok(Extractor {
            record,
            registry,
            accessors,
            original_letters: OriginalScriptIndex::build(record),
        })
    }

    /// The record's original-script index.
    #[must_use]
    pub fn original_letters(&self) -> &OriginalScriptIndex {
        &self.original_letters
    }

    /// Extract the named item from the record.
    ///
    /// Unregistered item names fall back to a same-named accessor method
    /// when the capability provides one; otherwise the result is empty. A
    /// registered item never delegates, even when it compiles to no field
    /// rules. A configured-but-unsatisfied mandatory field also empties
    /// the result.
    #[must_use]
    pub fn extract(&self, item: &str) -> ExtractionResult {
        if !self.registry.has_item(item) {
            return self.legacy_fallback(item);
        }
        let spec = self.registry.get_spec(item);

        let mut mandatory_satisfied = spec.mandatory_field.is_none();
        let mut groups: Vec<DataGroup> = Vec::new();
        // Fallback when no occurrence produces output: the most recent
        // parent-injected seed stands alone.
        let mut fallback_seed: Option<DataGroup> = None;

        for (tag, rule) in &spec.field_rules {
            let seed = self.seed_from_parent(rule);
            if seed.is_some() {
                fallback_seed.clone_from(&seed);
            }
            let mut seed_pending = seed;

            for (occurrence, field) in self.record.fields(tag).iter().enumerate() {
                let Some(forced) = conditions::evaluate(&rule.conditions, field) else {
                    continue;
                };
                // The injected seed starts the first accepted occurrence's
                // group, then is consumed.
                let mut group = seed_pending.take().unwrap_or_default();
                let ctx = PipelineContext {
                    tag,
                    occurrence,
                    original_letters: &self.original_letters,
                    attach_original: spec.original_letters,
                    mandatory_field: spec.mandatory_field.as_deref(),
                };
                let satisfied =
                    pipeline::apply_subfield_rules(rule, field, &forced, &ctx, &mut group);
                mandatory_satisfied |= satisfied;
                if !group.is_empty() {
                    groups.push(group);
                }
            }
        }

        if groups.is_empty() {
            if let Some(seed) = fallback_seed {
                groups.push(seed);
            }
        }
        if groups.is_empty() || !mandatory_satisfied {
            return ExtractionResult::empty();
        }
        ExtractionResult {
            groups,
            view_method: Some(spec.view_method.clone()),
            match_key: Some(spec.match_key.clone()),
        }
    }

    /// Build the default data group from a rule's parent steps.
    ///
    /// A `Map` accessor result contributes one single-element entry per
    /// name; a `Scalar` result replaces the accumulation and is wrapped
    /// under the rule's declared name (or an anonymous `"0"` entry).
    fn seed_from_parent(&self, rule: &FieldRule) -> Option<DataGroup> {
        if rule.parent.is_empty() {
            return None;
        }
        let mut declared_name: Option<&str> = None;
        let mut group = DataGroup::new();
        let mut scalar: Option<String> = None;

        for step in &rule.parent {
            match step {
                ParentStep::Name(name) => declared_name = Some(name),
                ParentStep::Method(method) => {
                    match self.accessors.invoke(method, self.record) {
                        Some(AccessorValue::Map(values)) => {
                            scalar = None;
                            for (name, value) in values {
                                group.insert(name, DataEntry::single(value));
                            }
                        }
                        Some(AccessorValue::Scalar(value)) => {
                            group.clear();
                            scalar = Some(value);
                        }
                        None => {}
                    }
                }
            }
        }

        if let Some(value) = scalar {
            let name = declared_name.unwrap_or("0");
            let mut group = DataGroup::new();
            group.insert(name.to_string(), DataEntry::single(value));
            Some(group)
        } else if group.is_empty() {
            None
        } else {
            Some(group)
        }
    }

    /// Legacy fallback for items without a spec: delegate to a same-named
    /// accessor method when the capability provides one.
    fn legacy_fallback(&self, item: &str) -> ExtractionResult {
        let Some(value) = self.accessors.invoke(item, self.record) else {
            return ExtractionResult::empty();
        };
        let group = match value {
            AccessorValue::Scalar(scalar) => {
                let mut group = DataGroup::new();
                group.insert("0".to_string(), DataEntry::single(scalar));
                group
            }
            AccessorValue::Map(values) => values
                .into_iter()
                .map(|(name, value)| (name, DataEntry::single(value)))
                .collect(),
        };
        ExtractionResult {
            groups: vec![group],
            view_method: None,
            match_key: None,
        }
    }
}
