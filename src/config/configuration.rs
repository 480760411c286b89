//! Complete, schema-conformant configuration values

use serde::Serialize;
use serde_json::{Map, Value};

use super::schema;
use crate::constants::presets::NAME_FIELD;
use crate::errors::PresetError;

/// A flat record holding every schema field, in schema order.
///
/// Only the default schema, the merger and `with_field` construct values of
/// this type, so a `Configuration` is always complete and well typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    values: Map<String, Value>,
}

impl Configuration {
    pub(super) fn from_values(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key)?.as_array()?.iter().map(Value::as_str).collect()
    }

    /// User-chosen name carried in the `config_name` field (may be empty)
    pub fn name(&self) -> &str {
        self.get_str(NAME_FIELD).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Flat key/value document, the shape consumed by import
    pub fn to_document(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Return a copy with `key` set to `value`; `self` is left untouched.
    pub fn with_field(&self, key: &str, value: Value) -> Result<Configuration, PresetError> {
        let field = schema::field(key).ok_or_else(|| PresetError::UnknownField {
            key: key.to_string(),
        })?;
        let value = field
            .kind
            .coerce(&value)
            .ok_or_else(|| PresetError::InvalidValue {
                key: key.to_string(),
                expected: field.kind.describe(),
            })?;

        let mut values = self.values.clone();
        values.insert(key.to_string(), value);
        Ok(Self { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_configuration;
    use serde_json::json;

    #[test]
    fn test_with_field_leaves_original_untouched() {
        let original = default_configuration().clone();
        let updated = original.with_field("minimum_mood", json!(5)).unwrap();

        assert_eq!(updated.get_i64("minimum_mood"), Some(5));
        assert_eq!(original.get_i64("minimum_mood"), Some(3));
        assert_eq!(updated.len(), original.len());
    }

    #[test]
    fn test_with_field_keeps_schema_order() {
        let updated = default_configuration()
            .with_field("theme", json!("4"))
            .unwrap();
        let keys: Vec<&str> = updated.iter().map(|(key, _)| key).collect();
        let expected: Vec<&str> = default_configuration().iter().map(|(key, _)| key).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_with_field_rejects_unknown_key() {
        let err = default_configuration()
            .with_field("foo", json!(1))
            .unwrap_err();
        assert!(matches!(err, PresetError::UnknownField { key } if key == "foo"));
    }

    #[test]
    fn test_with_field_rejects_wrong_type() {
        let err = default_configuration()
            .with_field("minimum_mood", json!("high"))
            .unwrap_err();
        match err {
            PresetError::InvalidValue { key, expected } => {
                assert_eq!(key, "minimum_mood");
                assert_eq!(expected, "an integer between 1 and 5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_typed_accessors() {
        let config = default_configuration();
        assert_eq!(config.get_str("theme"), Some("default"));
        assert_eq!(config.get_f64("sleep_time_multiplier"), Some(1.0));
        assert_eq!(config.get_bool("use_adb"), Some(false));
        assert_eq!(
            config.get_list("priority_stat"),
            Some(vec!["spd", "sta", "wit", "pow", "guts"])
        );
        assert_eq!(config.get_i64("theme"), None);
        assert_eq!(config.name(), "");
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let value = serde_json::to_value(default_configuration()).unwrap();
        assert_eq!(value, default_configuration().to_document());
        assert_eq!(value["minimum_mood"], json!(3));
    }
}
