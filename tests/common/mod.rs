//! Common test helpers and fixtures shared across the test suite.

use marcspec::{Field, Record, SpecRegistry};

/// A leader for a monographic record (bibliographic level `m` at
/// position 7).
#[allow(dead_code)]
pub const MONOGRAPH_LEADER: &str = "00000nam a2200000 a 4500";

/// A representative spec source covering conditions, transforms, parent
/// rules, and metadata.
#[allow(dead_code)]
pub const SAMPLE_SPEC: &str = "
Title:
  category: core
  mandatory-field: title
  245:
    a:
      - [name, title]
    b:
      - [name, subtitle]
Pages:
  category: description
  300:
    subfields:
      - [a]
      - [match, '([0-9]+-[0-9]+)', 1]
Subjects:
  category: core
  650:
    conditions:
      - [indicator, 2, '0']
    a:
      - [name, subject]
Level:
  '000':
    parent:
      - [method, BibliographicLevel]
      - [name, level]
";

/// Compile a registry from a single YAML source.
#[allow(dead_code)]
pub fn compiled_registry(yaml: &str) -> SpecRegistry {
    let mut registry = SpecRegistry::new();
    registry.register_source(yaml);
    registry.compile().expect("spec compiles");
    registry
}

/// A realistic monograph record with title, pagination, and subjects.
#[allow(dead_code)]
pub fn monograph_record() -> Record {
    Record::builder(MONOGRAPH_LEADER)
        .field(
            Field::builder("245", '1', '0')
                .subfield('a', "The organization of information")
                .subfield('b', "Arlene G. Taylor")
                .build(),
        )
        .field(
            Field::builder("300", ' ', ' ')
                .subfield('a', "pp. 12-34")
                .build(),
        )
        .field(
            Field::builder("650", ' ', '0')
                .subfield('a', "Information organization")
                .build(),
        )
        .field(
            Field::builder("650", ' ', '7')
                .subfield('a', "Katalogisierung")
                .subfield('2', "gnd")
                .build(),
        )
        .build()
}
