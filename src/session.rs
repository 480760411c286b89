//! Active configuration session
//!
//! The working copy bound to the editor. Edits stay local until `commit`
//! hands them to the preset manager; switching presets or reloading drops
//! them.

use serde_json::Value;
use tracing::{debug, info};

use crate::config::Configuration;
use crate::errors::PresetError;
use crate::presets::{Preset, PresetManager, PresetStore};

pub struct ActiveSession {
    /// Slot the working copy is committed to
    source_index: usize,
    /// Config as last loaded or committed
    baseline: Configuration,
    working: Configuration,
}

impl ActiveSession {
    pub fn load(index: usize, preset: &Preset) -> Self {
        debug!(index, name = %preset.name, "Loaded preset into session");
        Self {
            source_index: index,
            baseline: preset.config.clone(),
            working: preset.config.clone(),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.working
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Whether the working copy differs from what was loaded or committed
    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }

    /// Replace the working copy with one where `key` is set to `value`.
    /// A rejected update leaves the working copy as it was.
    pub fn update(&mut self, key: &str, value: Value) -> Result<&Configuration, PresetError> {
        self.working = self.working.with_field(key, value)?;
        debug!(key, "Updated field");
        Ok(&self.working)
    }

    /// Commit the next save to a new slot appended to the collection
    pub fn detach(&mut self, new_index: usize) {
        self.source_index = new_index;
    }

    /// Drop staged edits
    pub fn revert(&mut self) {
        self.working = self.baseline.clone();
    }

    /// Save the working copy through the manager
    pub fn commit<S: PresetStore>(&mut self, manager: &mut PresetManager<S>) -> Result<usize, PresetError> {
        let result = manager.save_preset(self.source_index, self.working.clone());
        // save_preset selects the slot before writing, so follow it even when the write failed
        self.source_index = manager.active_index();
        if let Ok(slot) = result {
            self.baseline = self.working.clone();
            info!(index = slot, "Committed session");
        }
        result
    }
}
