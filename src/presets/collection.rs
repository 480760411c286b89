//! Presets and the ordered collection that owns them

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::{default_configuration, merge_with_default, Configuration};
use crate::constants::presets::DEFAULT_NAME_PREFIX;

/// A named, complete configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: String,
    pub config: Configuration,
}

impl Preset {
    pub fn new(name: impl Into<String>, config: Configuration) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Label used for presets without a user-chosen name ("Preset 3" for index 2)
pub fn generated_name(index: usize) -> String {
    format!("{DEFAULT_NAME_PREFIX} {}", index + 1)
}

/// Ordered presets plus the active index.
///
/// `active_index < presets.len()` holds whenever the collection is non-empty.
/// Order is insertion order and only changes through `remove`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresetCollection {
    presets: Vec<Preset>,
    active_index: usize,
}

/// On-disk shape. Entries stay untyped here and are normalized one by one on
/// load, so presets written by older versions or edited by hand still load.
#[derive(Debug, Deserialize)]
pub(crate) struct StoredCollection {
    #[serde(default)]
    presets: Vec<Value>,
    #[serde(default)]
    active_index: Value,
}

/// Rebuild one stored entry. A missing, blank or non-string name becomes
/// the generated name for its slot, and a non-object entry becomes a default
/// preset so later slots keep their indices.
fn restore_preset(index: usize, entry: &Value) -> Preset {
    let Some(fields) = entry.as_object() else {
        warn!(index, "Stored preset is not an object, using defaults");
        return Preset::new(generated_name(index), default_configuration().clone());
    };
    let name = match fields.get("name").and_then(Value::as_str).map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => generated_name(index),
    };
    let config = fields
        .get("config")
        .map(merge_with_default)
        .unwrap_or_else(|| default_configuration().clone());
    Preset::new(name, config)
}

impl PresetCollection {
    pub fn new(presets: Vec<Preset>, active_index: usize) -> Self {
        let mut collection = Self {
            presets,
            active_index,
        };
        collection.clamp_active();
        collection
    }

    pub(crate) fn from_stored(stored: StoredCollection) -> Self {
        let presets = stored
            .presets
            .iter()
            .enumerate()
            .map(|(index, entry)| restore_preset(index, entry))
            .collect();
        let active_index = stored
            .active_index
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
            .unwrap_or(0);
        Self::new(presets, active_index)
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active(&self) -> Option<&Preset> {
        self.presets.get(self.active_index)
    }

    pub fn get(&self, index: usize) -> Option<&Preset> {
        self.presets.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Preset> {
        self.presets.get_mut(index)
    }

    /// Append a preset and return its index
    pub(crate) fn push(&mut self, preset: Preset) -> usize {
        self.presets.push(preset);
        self.presets.len() - 1
    }

    /// Caller validates `index`
    pub(crate) fn set_active(&mut self, index: usize) {
        self.active_index = index;
        self.clamp_active();
    }

    /// Remove a preset, keeping the active index on the same preset when it
    /// survives and clamping it into bounds otherwise. Caller validates `index`.
    pub(crate) fn remove(&mut self, index: usize) -> Preset {
        let removed = self.presets.remove(index);
        if index < self.active_index {
            self.active_index -= 1;
        }
        self.clamp_active();
        removed
    }

    fn clamp_active(&mut self) {
        let last = self.presets.len().saturating_sub(1);
        if self.active_index > last {
            self.active_index = last;
        }
    }
}
