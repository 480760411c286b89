//! Preset manager
//!
//! Owns the preset collection and mediates between the editing session, the
//! store and the merger. The collection in memory is authoritative: a failed
//! write is reported but the change stays applied so the user can retry.

use serde_json::Value;
use tracing::{error, info, warn};

use super::collection::{generated_name, Preset, PresetCollection};
use super::store::PresetStore;
use crate::config::{default_configuration, merge_with_report, Configuration, MergeReport};
use crate::constants::presets::COPY_SUFFIX;
use crate::errors::PresetError;

pub struct PresetManager<S: PresetStore> {
    store: S,
    collection: PresetCollection,
}

impl<S: PresetStore> PresetManager<S> {
    /// Load presets from `store`, synthesizing a default preset when none exist
    pub fn open(store: S) -> Self {
        let mut collection = store.load();
        if collection.is_empty() {
            info!("No stored presets, starting from the default configuration");
            collection = PresetCollection::new(
                vec![Preset::new(generated_name(0), default_configuration().clone())],
                0,
            );
        }
        info!(
            presets = collection.len(),
            active_index = collection.active_index(),
            "Preset manager ready"
        );
        Self { store, collection }
    }

    pub fn collection(&self) -> &PresetCollection {
        &self.collection
    }

    pub fn presets(&self) -> &[Preset] {
        self.collection.presets()
    }

    /// Preset names in display order
    pub fn list_presets(&self) -> Vec<&str> {
        self.presets().iter().map(|preset| preset.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn active_index(&self) -> usize {
        self.collection.active_index()
    }

    pub fn active_preset(&self) -> &Preset {
        // Never empty: `open` synthesizes a preset and `remove_preset` keeps the last one
        &self.presets()[self.active_index()]
    }

    pub fn preset(&self, index: usize) -> Result<&Preset, PresetError> {
        self.check_index(index)?;
        Ok(&self.presets()[index])
    }

    /// Make `index` the active preset and return its configuration.
    ///
    /// The selection is written back best-effort; a failed write is logged,
    /// not returned, since the switch itself succeeded.
    pub fn switch_active(&mut self, index: usize) -> Result<&Configuration, PresetError> {
        self.check_index(index)?;
        if index != self.active_index() {
            self.collection.set_active(index);
            info!(index, name = %self.presets()[index].name, "Switched active preset");
            if let Err(err) = self.store.save(&self.collection) {
                warn!(error = %err, "Failed to persist active preset selection");
            }
        }
        Ok(&self.presets()[index].config)
    }

    /// Store `config` in slot `index`, keeping the slot's name. An index past
    /// the end appends a new preset named after `config_name`, or "Preset N"
    /// when that is empty. The saved slot becomes active.
    pub fn save_preset(&mut self, index: usize, config: Configuration) -> Result<usize, PresetError> {
        let slot = match self.collection.get_mut(index) {
            Some(preset) => {
                preset.config = config;
                index
            }
            None => {
                let name = match config.name().trim() {
                    "" => generated_name(self.len()),
                    name => name.to_string(),
                };
                info!(name = %name, "Adding new preset");
                self.collection.push(Preset::new(name, config))
            }
        };
        self.collection.set_active(slot);
        self.persist()?;
        info!(index = slot, "Saved preset");
        Ok(slot)
    }

    /// Import pathway: merge `document` over the existing preset's config (the
    /// default configuration for a new slot) so only the fields it carries
    /// change, then save the result.
    pub fn update_preset(
        &mut self,
        index: usize,
        document: &Value,
    ) -> Result<(usize, MergeReport), PresetError> {
        if !document.is_object() {
            return Err(PresetError::import("expected a key/value document"));
        }

        let base = self
            .collection
            .get(index)
            .map(|preset| &preset.config)
            .unwrap_or_else(|| default_configuration());
        let (config, report) = merge_with_report(document, base);
        if !report.is_clean() {
            warn!(
                rejected = ?report.rejected,
                dropped = ?report.dropped,
                "Some imported fields were not applied"
            );
        }

        let slot = self.save_preset(index, config)?;
        Ok((slot, report))
    }

    /// Append a preset built from the default configuration and make it active
    pub fn create_preset(&mut self, name: Option<String>) -> Result<usize, PresetError> {
        let name = match name {
            Some(name) => validated_name(&name)?,
            None => generated_name(self.len()),
        };
        let index = self
            .collection
            .push(Preset::new(name, default_configuration().clone()));
        self.collection.set_active(index);
        info!(index, "Created preset");
        self.persist()?;
        Ok(index)
    }

    /// Append a copy of preset `index` and make it active
    pub fn duplicate_preset(&mut self, index: usize, name: Option<String>) -> Result<usize, PresetError> {
        let source = self.preset(index)?.clone();
        let name = match name {
            Some(name) => validated_name(&name)?,
            None => format!("{}{COPY_SUFFIX}", source.name),
        };
        let copy = self.collection.push(Preset::new(name, source.config));
        self.collection.set_active(copy);
        info!(source = index, index = copy, "Duplicated preset");
        self.persist()?;
        Ok(copy)
    }

    pub fn rename_preset(&mut self, index: usize, name: &str) -> Result<(), PresetError> {
        let name = validated_name(name)?;
        self.check_index(index)?;
        if let Some(preset) = self.collection.get_mut(index) {
            info!(index, from = %preset.name, to = %name, "Renamed preset");
            preset.name = name;
        }
        self.persist()
    }

    /// Remove preset `index`. The last remaining preset cannot be removed.
    pub fn remove_preset(&mut self, index: usize) -> Result<Preset, PresetError> {
        self.check_index(index)?;
        if self.len() == 1 {
            return Err(PresetError::LastPreset);
        }
        let removed = self.collection.remove(index);
        info!(
            index,
            name = %removed.name,
            active_index = self.active_index(),
            "Removed preset"
        );
        self.persist()?;
        Ok(removed)
    }

    /// Write the whole collection to the store
    pub fn persist(&self) -> Result<(), PresetError> {
        self.store
            .save(&self.collection)
            .inspect_err(|err| error!(error = %err, code = err.code(), "Failed to save presets"))
    }

    fn check_index(&self, index: usize) -> Result<(), PresetError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(PresetError::OutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

fn validated_name(name: &str) -> Result<String, PresetError> {
    match name.trim() {
        "" => Err(PresetError::InvalidName),
        trimmed => Ok(trimmed.to_string()),
    }
}
