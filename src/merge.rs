//! Deep-merge loader
//!
//! Fills the gaps of a partially persisted document from the default
//! catalog. The merge is deliberately shallow-per-subsection: object-valued
//! top-level sections merge one level deep (persisted fields win, missing
//! fields fall back to defaults), while any nested object inside a section
//! replaces its default wholesale. Legacy persisted documents depend on
//! exactly these semantics; do not deepen the merge.

use serde_json::Value;
use tracing::warn;

use crate::catalog::{self, Domain};

/// Result of a merge: the completed document, plus a warning when the
/// persisted input was unusable and defaults were substituted wholesale.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: Value,
    pub warning: Option<MergeWarning>,
}

/// Non-fatal report that a persisted document could not be merged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("persisted {domain} settings were unusable ({reason}); defaults substituted")]
pub struct MergeWarning {
    pub domain: Domain,
    pub reason: String,
}

/// Merge a partially persisted document onto the defaults for `domain`.
///
/// `None` means "nothing persisted yet" and yields the defaults without a
/// warning. Any non-object input also yields the defaults, with a warning.
/// Never panics.
pub fn merge_with_defaults(partial: Option<Value>, domain: Domain) -> MergeOutcome {
    let defaults = catalog::defaults(domain);

    let Some(partial) = partial else {
        return MergeOutcome {
            document: defaults,
            warning: None,
        };
    };

    let Value::Object(partial_map) = partial else {
        let warning = MergeWarning {
            domain,
            reason: format!("expected a JSON object, got {}", json_type(&partial)),
        };
        warn!(%domain, %warning, "settings document unusable, using defaults");
        return MergeOutcome {
            document: defaults,
            warning: Some(warning),
        };
    };

    let mut document = defaults;
    if let Value::Object(merged) = &mut document {
        for (key, incoming) in partial_map {
            match (merged.remove(&key), incoming) {
                // Known object section: persisted fields win one level deep.
                (Some(Value::Object(mut section)), Value::Object(fields)) => {
                    for (field, value) in fields {
                        section.insert(field, value);
                    }
                    merged.insert(key, Value::Object(section));
                }
                // Everything else (scalars, arrays, unknown keys): persisted
                // value replaces wholesale.
                (_, incoming) => {
                    merged.insert(key, incoming);
                }
            }
        }
    }

    MergeOutcome {
        document,
        warning: None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
