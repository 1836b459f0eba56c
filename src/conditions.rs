//! Condition evaluation against field occurrences.
//!
//! A field rule's conditions decide whether a given occurrence qualifies
//! for extraction at all. Conditions are evaluated in declaration order and
//! short-circuit on the first rejection; a rejected occurrence is skipped
//! entirely and extraction moves on to the next occurrence of the same tag.
//!
//! A satisfied (non-negated) subfield condition additionally pins the
//! matching subfield's exact text as a *forced value* for that code: when
//! the same code appears multiple times in the occurrence, only subfields
//! carrying the pinned text feed the transform pipeline.

use std::collections::HashMap;

use crate::record::Field;
use crate::spec::Condition;

/// Subfield values pinned by satisfied conditions, keyed by subfield code.
pub type ForcedValues = HashMap<char, String>;

/// Whether an indicator character counts as set.
///
/// Blank (space) is the MARC "undefined" indicator and counts as unset;
/// every other character, including `0`, is set.
fn is_set(indicator: char) -> bool {
    indicator != ' '
}

/// Evaluate a rule's conditions against one field occurrence.
///
/// Returns `Some(forced_values)` when the occurrence is accepted (the map
/// may be empty), or `None` when any condition rejects it.
#[must_use]
pub fn evaluate(conditions: &[Condition], field: &Field) -> Option<ForcedValues> {
    let mut forced = ForcedValues::new();
    for condition in conditions {
        match condition {
            Condition::Indicator {
                position,
                pattern,
                negated,
            } => {
                let indicator = field.indicator(*position);
                let matched = indicator
                    .filter(|ind| is_set(*ind))
                    .is_some_and(|ind| pattern.matches(&ind.to_string()));
                // Negated: reject precisely when the indicator would match.
                if *negated {
                    if matched {
                        return None;
                    }
                } else if !matched {
                    return None;
                }
            }
            Condition::Subfield {
                code,
                pattern,
                negated,
            } => {
                if *negated {
                    let any_match = field
                        .subfield_values(*code)
                        .any(|value| pattern.matches(value));
                    if any_match {
                        return None;
                    }
                } else {
                    let matched = field
                        .subfield_values(*code)
                        .find(|value| pattern.matches(value));
                    match matched {
                        Some(value) => {
                            forced.insert(*code, value.to_string());
                        }
                        None => return None,
                    }
                }
            }
        }
    }
    Some(forced)
}
