//! Default schema
//!
//! The authoritative field set of a configuration: every key, its type and
//! its default value. Built once per process and never mutated.

use serde_json::Value;
use std::sync::OnceLock;

use super::configuration::Configuration;
use super::themes::THEME_IDS;
use crate::errors::PresetError;

/// Type of a configuration field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Text,
    Toggle,
    /// Enumerated string id (theme id, running position)
    Choice(&'static [&'static str]),
    /// Ordered list of strings
    TextList,
}

/// Default value of a field, in a form usable in a `const` table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Integer(i64),
    Float(f64),
    Text(&'static str),
    Toggle(bool),
    TextList(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub default: DefaultValue,
    pub description: &'static str,
}

const RUNNING_POSITIONS: &[&str] = &["front", "pace", "late", "end"];

const FIELDS: &[FieldSpec] = &[
    // General
    FieldSpec {
        key: "config_name",
        kind: FieldKind::Text,
        default: DefaultValue::Text(""),
        description: "Display name of the configuration",
    },
    FieldSpec {
        key: "theme",
        kind: FieldKind::Choice(THEME_IDS),
        default: DefaultValue::Text("default"),
        description: "Colour theme id",
    },
    // Set-up
    FieldSpec {
        key: "window_name",
        kind: FieldKind::Text,
        default: DefaultValue::Text("Umamusume"),
        description: "Title of the game window to attach to",
    },
    FieldSpec {
        key: "sleep_time_multiplier",
        kind: FieldKind::Float { min: 0.1, max: 10.0 },
        default: DefaultValue::Float(1.0),
        description: "Multiplier applied to every wait between actions",
    },
    FieldSpec {
        key: "use_adb",
        kind: FieldKind::Toggle,
        default: DefaultValue::Toggle(false),
        description: "Drive an Android device over ADB instead of a desktop window",
    },
    FieldSpec {
        key: "device_id",
        kind: FieldKind::Text,
        default: DefaultValue::Text(""),
        description: "ADB device serial",
    },
    // Mood and condition
    FieldSpec {
        key: "minimum_mood",
        kind: FieldKind::Integer { min: 1, max: 5 },
        default: DefaultValue::Integer(3),
        description: "Lowest mood accepted before recreation is scheduled",
    },
    FieldSpec {
        key: "minimum_mood_junior_year",
        kind: FieldKind::Integer { min: 1, max: 5 },
        default: DefaultValue::Integer(2),
        description: "Lowest mood accepted during the junior year",
    },
    FieldSpec {
        key: "minimum_condition_severity",
        kind: FieldKind::Integer { min: 0, max: 5 },
        default: DefaultValue::Integer(1),
        description: "Condition severity that triggers an infirmary visit",
    },
    // Energy
    FieldSpec {
        key: "skip_training_energy",
        kind: FieldKind::Integer { min: 0, max: 100 },
        default: DefaultValue::Integer(30),
        description: "Energy below which training is skipped",
    },
    FieldSpec {
        key: "never_rest_energy",
        kind: FieldKind::Integer { min: 0, max: 100 },
        default: DefaultValue::Integer(70),
        description: "Energy above which resting is never chosen",
    },
    FieldSpec {
        key: "skip_infirmary_unless_missing_energy",
        kind: FieldKind::Integer { min: 0, max: 100 },
        default: DefaultValue::Integer(30),
        description: "Missing energy required before an infirmary visit",
    },
    // Training
    FieldSpec {
        key: "priority_stat",
        kind: FieldKind::TextList,
        default: DefaultValue::TextList(&["spd", "sta", "wit", "pow", "guts"]),
        description: "Stat training priority, highest first",
    },
    FieldSpec {
        key: "maximum_failure",
        kind: FieldKind::Integer { min: 0, max: 100 },
        default: DefaultValue::Integer(15),
        description: "Highest failure chance (percent) accepted for a training",
    },
    FieldSpec {
        key: "minimum_support_cards",
        kind: FieldKind::Integer { min: 0, max: 6 },
        default: DefaultValue::Integer(0),
        description: "Support cards required on a training before it is picked",
    },
    FieldSpec {
        key: "do_race_when_bad_training",
        kind: FieldKind::Toggle,
        default: DefaultValue::Toggle(true),
        description: "Enter a race when no training meets the thresholds",
    },
    // Race style
    FieldSpec {
        key: "position_selection_enabled",
        kind: FieldKind::Toggle,
        default: DefaultValue::Toggle(false),
        description: "Pick the running position before each race",
    },
    FieldSpec {
        key: "preferred_position",
        kind: FieldKind::Choice(RUNNING_POSITIONS),
        default: DefaultValue::Text("end"),
        description: "Running position used when selection is enabled",
    },
    // Skills
    FieldSpec {
        key: "enable_skill_point_check",
        kind: FieldKind::Toggle,
        default: DefaultValue::Toggle(true),
        description: "Stop to buy skills once the point cap is reached",
    },
    FieldSpec {
        key: "skill_point_cap",
        kind: FieldKind::Integer { min: 0, max: 9999 },
        default: DefaultValue::Integer(400),
        description: "Skill points that trigger a skill purchase stop",
    },
    FieldSpec {
        key: "skill_list",
        kind: FieldKind::TextList,
        default: DefaultValue::TextList(&[]),
        description: "Skills to buy, in order",
    },
    // Schedule
    FieldSpec {
        key: "race_schedule",
        kind: FieldKind::TextList,
        default: DefaultValue::TextList(&[]),
        description: "Races to enter, by name",
    },
    FieldSpec {
        key: "cancel_consecutive_race",
        kind: FieldKind::Toggle,
        default: DefaultValue::Toggle(true),
        description: "Decline a race that would be a third consecutive one",
    },
    // Events
    FieldSpec {
        key: "use_optimal_event_choice",
        kind: FieldKind::Toggle,
        default: DefaultValue::Toggle(true),
        description: "Pick event choices from the built-in table",
    },
    FieldSpec {
        key: "event_choices",
        kind: FieldKind::TextList,
        default: DefaultValue::TextList(&[]),
        description: "Manual event choice overrides",
    },
];

/// All schema fields, in canonical order
pub fn fields() -> &'static [FieldSpec] {
    FIELDS
}

pub fn field(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|field| field.key == key)
}

/// Parse a value typed as text for field `key` (lists are comma-separated)
pub fn parse_field(key: &str, raw: &str) -> Result<Value, PresetError> {
    let field = field(key).ok_or_else(|| PresetError::UnknownField {
        key: key.to_string(),
    })?;
    field
        .kind
        .parse_input(raw)
        .ok_or_else(|| PresetError::InvalidValue {
            key: key.to_string(),
            expected: field.kind.describe(),
        })
}

/// Canonical full configuration
pub fn default_configuration() -> &'static Configuration {
    static DEFAULT: OnceLock<Configuration> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        Configuration::from_values(
            FIELDS
                .iter()
                .map(|field| (field.key.to_string(), field.default.to_value()))
                .collect(),
        )
    })
}

impl DefaultValue {
    pub fn to_value(&self) -> Value {
        match *self {
            DefaultValue::Integer(n) => Value::from(n),
            DefaultValue::Float(f) => Value::from(f),
            DefaultValue::Text(s) => Value::from(s),
            DefaultValue::Toggle(b) => Value::Bool(b),
            DefaultValue::TextList(items) => {
                Value::Array(items.iter().map(|item| Value::from(*item)).collect())
            }
        }
    }
}

impl FieldKind {
    /// Normalize `value` into this kind, or `None` when it is incompatible.
    ///
    /// Integers accept whole-number floats (`3.0` becomes `3`); numeric
    /// fields reject values outside their range.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match *self {
            FieldKind::Integer { min, max } => {
                let n = match value {
                    Value::Number(number) => number.as_i64().or_else(|| {
                        number
                            .as_f64()
                            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                            .map(|f| f as i64)
                    }),
                    _ => None,
                }?;
                (min..=max).contains(&n).then(|| Value::from(n))
            }
            FieldKind::Float { min, max } => {
                let f = value.as_f64()?;
                (f.is_finite() && f >= min && f <= max).then(|| Value::from(f))
            }
            FieldKind::Text => value.as_str().map(Value::from),
            FieldKind::Toggle => value.as_bool().map(Value::Bool),
            FieldKind::Choice(options) => value
                .as_str()
                .filter(|id| options.contains(id))
                .map(Value::from),
            FieldKind::TextList => value
                .as_array()?
                .iter()
                .map(|item| item.as_str().map(Value::from))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
        }
    }

    /// Parse a value typed by a user. Lists are comma-separated.
    pub fn parse_input(&self, raw: &str) -> Option<Value> {
        let trimmed = raw.trim();
        let candidate = match self {
            FieldKind::Integer { .. } => trimmed.parse::<i64>().ok().map(Value::from),
            FieldKind::Float { .. } => trimmed.parse::<f64>().ok().map(Value::from),
            FieldKind::Text => Some(Value::from(raw)),
            FieldKind::Toggle => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            FieldKind::Choice(_) => Some(Value::from(trimmed)),
            FieldKind::TextList => Some(Value::Array(
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(Value::from)
                    .collect(),
            )),
        }?;
        self.coerce(&candidate)
    }

    /// Human-readable description of accepted values
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Integer { min, max } => format!("an integer between {min} and {max}"),
            FieldKind::Float { min, max } => format!("a number between {min} and {max}"),
            FieldKind::Text => "text".to_string(),
            FieldKind::Toggle => "true or false".to_string(),
            FieldKind::Choice(options) => format!("one of: {}", options.join(", ")),
            FieldKind::TextList => "a list of text values".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_schema_keys_unique() {
        let keys: HashSet<&str> = fields().iter().map(|field| field.key).collect();
        assert_eq!(keys.len(), fields().len());
    }

    #[test]
    fn test_defaults_satisfy_their_kind() {
        for field in fields() {
            let value = field.default.to_value();
            assert_eq!(
                field.kind.coerce(&value),
                Some(value.clone()),
                "default for {} does not match its kind",
                field.key
            );
        }
    }

    #[test]
    fn test_default_configuration_has_every_field() {
        let config = default_configuration();
        assert_eq!(config.len(), fields().len());
        for field in fields() {
            assert_eq!(config.get(field.key), Some(&field.default.to_value()));
        }
    }

    #[test]
    fn test_default_configuration_is_shared() {
        assert!(std::ptr::eq(default_configuration(), default_configuration()));
    }

    #[test]
    fn test_integer_coerce() {
        let kind = FieldKind::Integer { min: 1, max: 5 };
        assert_eq!(kind.coerce(&json!(3)), Some(json!(3)));
        assert_eq!(kind.coerce(&json!(4.0)), Some(json!(4)));
        assert_eq!(kind.coerce(&json!(2.5)), None);
        assert_eq!(kind.coerce(&json!(9)), None);
        assert_eq!(kind.coerce(&json!("high")), None);
        assert_eq!(kind.coerce(&Value::Null), None);
    }

    #[test]
    fn test_float_coerce_accepts_integers() {
        let kind = FieldKind::Float { min: 0.1, max: 10.0 };
        assert_eq!(kind.coerce(&json!(2)), Some(json!(2.0)));
        assert_eq!(kind.coerce(&json!(0.0)), None);
        assert_eq!(kind.coerce(&json!(true)), None);
    }

    #[test]
    fn test_choice_and_list_coerce() {
        let theme = field("theme").unwrap().kind;
        assert_eq!(theme.coerce(&json!("5")), Some(json!("5")));
        assert_eq!(theme.coerce(&json!("99")), None);
        assert_eq!(theme.coerce(&json!(5)), None);

        let list = FieldKind::TextList;
        assert_eq!(list.coerce(&json!(["a", "b"])), Some(json!(["a", "b"])));
        assert_eq!(list.coerce(&json!(["a", 1])), None);
        assert_eq!(list.coerce(&json!("a")), None);
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(
            FieldKind::Integer { min: 0, max: 100 }.parse_input(" 42 "),
            Some(json!(42))
        );
        assert_eq!(FieldKind::Toggle.parse_input("Yes"), Some(json!(true)));
        assert_eq!(FieldKind::Toggle.parse_input("maybe"), None);
        assert_eq!(
            FieldKind::TextList.parse_input("spd, sta,,wit"),
            Some(json!(["spd", "sta", "wit"]))
        );
        assert_eq!(FieldKind::TextList.parse_input(""), Some(json!([])));
        assert_eq!(
            FieldKind::Choice(RUNNING_POSITIONS).parse_input("pace"),
            Some(json!("pace"))
        );
        assert_eq!(FieldKind::Choice(RUNNING_POSITIONS).parse_input("fast"), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            FieldKind::Integer { min: 1, max: 5 }.describe(),
            "an integer between 1 and 5"
        );
        assert_eq!(
            FieldKind::Choice(RUNNING_POSITIONS).describe(),
            "one of: front, pace, late, end"
        );
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("minimum_mood", "4").unwrap(), json!(4));
        assert_eq!(parse_field("skill_list", "Groundwork").unwrap(), json!(["Groundwork"]));
        assert!(matches!(
            parse_field("minimum_mood", "9"),
            Err(PresetError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_field("retired_field", "1"),
            Err(PresetError::UnknownField { .. })
        ));
    }
}
