//! Bucket recognized spans into officer and department sets.

use std::collections::BTreeSet;

use precinct_models::{EntityLabel, EntitySpan};

/// Department cue words, matched literally and case-sensitively.
const DEPARTMENT_CUES: [&str; 2] = ["Police", "Station"];

/// Deduplicated role buckets produced from one document's spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntitySets {
    pub officers: BTreeSet<String>,
    pub departments: BTreeSet<String>,
}

/// Classify recognized spans into role buckets.
///
/// Person spans become officers; remaining spans naming a police facility
/// become departments; everything else is discarded. The person rule takes
/// precedence, so a person span mentioning "Police" stays an officer only.
/// Span text is kept verbatim.
#[must_use]
pub fn classify_spans(spans: &[EntitySpan]) -> EntitySets {
    let mut sets = EntitySets::default();
    for span in spans {
        if span.label == EntityLabel::Person {
            sets.officers.insert(span.text.clone());
        } else if DEPARTMENT_CUES.iter().any(|cue| span.text.contains(cue)) {
            sets.departments.insert(span.text.clone());
        }
    }
    sets
}
