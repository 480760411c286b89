//! Config merger
//!
//! Reconciles an arbitrary document against a base configuration. Merging
//! never fails: fields that are missing, mistyped or out of range take the
//! base value, and keys outside the schema are dropped.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::configuration::Configuration;
use super::schema;

/// Keys that did not make it into a merged configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Schema keys whose input value was rejected (base value kept)
    pub rejected: Vec<String>,
    /// Input keys that are not part of the schema
    pub dropped: Vec<String>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.dropped.is_empty()
    }
}

pub fn merge(input: &Value, base: &Configuration) -> Configuration {
    merge_with_report(input, base).0
}

/// Merge against the default schema
pub fn merge_with_default(input: &Value) -> Configuration {
    merge(input, schema::default_configuration())
}

pub fn merge_with_report(input: &Value, base: &Configuration) -> (Configuration, MergeReport) {
    let mut report = MergeReport::default();

    let Some(document) = input.as_object() else {
        warn!(kind = value_kind(input), "Merge input is not a document, keeping base configuration");
        return (base.clone(), report);
    };

    let mut merged = Map::with_capacity(schema::fields().len());
    for field in schema::fields() {
        let fallback = || {
            base.get(field.key)
                .cloned()
                .unwrap_or_else(|| field.default.to_value())
        };

        let value = match document.get(field.key) {
            None => fallback(),
            Some(candidate) => field.kind.coerce(candidate).unwrap_or_else(|| {
                debug!(
                    key = field.key,
                    found = value_kind(candidate),
                    expected = %field.kind.describe(),
                    "Rejected mismatched field, using base value"
                );
                report.rejected.push(field.key.to_string());
                fallback()
            }),
        };
        merged.insert(field.key.to_string(), value);
    }

    for key in document.keys() {
        if schema::field(key).is_none() {
            debug!(key = %key, "Dropped field not present in schema");
            report.dropped.push(key.clone());
        }
    }

    (Configuration::from_values(merged), report)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
