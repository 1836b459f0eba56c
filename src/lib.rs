#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marcspec: spec-driven MARC data extraction
//!
//! A declarative extraction engine that turns a MARC-style cataloging
//! record into named, structured output values, governed entirely by
//! external YAML specifications — dozens of semantically named data points
//! (title, pagination, holdings, ...) without per-field code.
//!
//! ## Quick Start
//!
//! ```
//! use marcspec::{Extractor, Field, Record, SpecRegistry};
//!
//! # fn main() -> marcspec::Result<()> {
//! let mut registry = SpecRegistry::new();
//! registry.register_source(
//!     "
//! Title:
//!   category: core
//!   245:
//!     a:
//!       - [name, title]
//!     b:
//!       - [name, subtitle]
//! ",
//! );
//! registry.compile()?;
//!
//! let record = Record::builder("00000nam a2200000 a 4500")
//!     .field(
//!         Field::builder("245", '1', '0')
//!             .subfield('a', "The intellectual foundation of information organization")
//!             .subfield('b', "Elaine Svenonius")
//!             .build(),
//!     )
//!     .build();
//!
//! let extractor = Extractor::new(&record, &registry, ())?;
//! let title = extractor.extract("Title");
//! assert_eq!(
//!     title.first("title").unwrap().first(),
//!     Some("The intellectual foundation of information organization"),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`record`] — Minimal MARC record model (`Record`, `Field`, `Subfield`)
//! - [`spec`] — Compiled extraction-rule model (`ItemSpec`, `FieldRule`, ...)
//! - [`registry`] — Spec registration, YAML compilation, key listing
//! - [`transforms`] — Closed registry of `function` transform steps
//! - [`conditions`] — Per-occurrence condition evaluation
//! - [`pipeline`] — Subfield transform pipeline
//! - [`original_script`] — 880 alternate-script side index
//! - [`accessors`] — Explicit capability interface for parent-method rules
//! - [`extractor`] — Data assembly (`Extractor::extract`)
//! - [`output`] — Structured output types
//! - [`error`] — Error types and result type

pub mod accessors;
pub mod conditions;
pub mod error;
pub mod extractor;
pub mod original_script;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod spec;
pub mod transforms;

pub use accessors::{AccessorValue, LeaderAccessors, RecordAccessors};
pub use error::{Result, SpecError};
pub use extractor::Extractor;
pub use original_script::OriginalScriptIndex;
pub use output::{DataEntry, DataGroup, ExtractionResult};
pub use record::{Field, FieldBuilder, Record, RecordBuilder, Subfield};
pub use registry::SpecRegistry;
pub use spec::{
    Capture, Condition, FieldRule, FunctionStep, ItemSpec, ParentStep, Pattern, ReplaceStep,
    SubfieldKey, TransformChain,
};
pub use transforms::TransformFn;
