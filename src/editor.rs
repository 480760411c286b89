//! Editor facade
//!
//! The only surface a front end talks to: read the active configuration,
//! stage field edits, list/select/save presets, import and export documents.
//! State is owned here and handed to the front end by reference.

use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::config::{schema, Configuration, MergeReport};
use crate::document::{self, DocumentFormat};
use crate::errors::PresetError;
use crate::presets::{Preset, PresetManager, PresetStore};
use crate::session::ActiveSession;

pub struct Editor<S: PresetStore> {
    manager: PresetManager<S>,
    session: ActiveSession,
}

impl<S: PresetStore> Editor<S> {
    pub fn open(store: S) -> Self {
        let manager = PresetManager::open(store);
        let session = ActiveSession::load(manager.active_index(), manager.active_preset());
        Self { manager, session }
    }

    /// Working copy, including uncommitted edits
    pub fn active_configuration(&self) -> &Configuration {
        self.session.config()
    }

    pub fn active_index(&self) -> usize {
        self.manager.active_index()
    }

    pub fn presets(&self) -> &[Preset] {
        self.manager.presets()
    }

    pub fn list_presets(&self) -> Vec<&str> {
        self.manager.list_presets()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.session.is_dirty()
    }

    pub fn update_field(&mut self, key: &str, value: Value) -> Result<&Configuration, PresetError> {
        self.session.update(key, value)
    }

    /// Stage an edit typed as text (lists are comma-separated)
    pub fn update_field_from_str(&mut self, key: &str, raw: &str) -> Result<&Configuration, PresetError> {
        let value = schema::parse_field(key, raw)?;
        self.session.update(key, value)
    }

    /// Switch presets; staged edits of the previous preset are dropped.
    /// Selecting the preset already being edited keeps them.
    pub fn select_preset(&mut self, index: usize) -> Result<&Configuration, PresetError> {
        self.manager.switch_active(index)?;
        if index != self.session.source_index() {
            self.reload();
        }
        Ok(self.session.config())
    }

    pub fn save_active_preset(&mut self) -> Result<usize, PresetError> {
        self.session.commit(&mut self.manager)
    }

    /// Save the working copy as a new preset appended to the list
    pub fn save_as_new_preset(&mut self) -> Result<usize, PresetError> {
        self.session.detach(self.manager.len());
        self.save_active_preset()
    }

    /// Merge `document` into the active preset and reload the session from it
    pub fn import_document(&mut self, document: &Value) -> Result<MergeReport, PresetError> {
        let index = self.manager.active_index();
        let result = self.manager.update_preset(index, document);
        self.sync_session(result).map(|(_, report)| report)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<MergeReport, PresetError> {
        let document = document::read_document(path)?;
        let report = self.import_document(&document)?;
        info!(path = %path.display(), "Imported configuration");
        Ok(report)
    }

    pub fn export_document(&self, format: DocumentFormat) -> Result<String, PresetError> {
        document::render_document(self.session.config(), format)
    }

    pub fn export_file(&self, path: &Path) -> Result<(), PresetError> {
        document::write_document(self.session.config(), path)
    }

    pub fn new_preset(&mut self, name: Option<String>) -> Result<usize, PresetError> {
        let result = self.manager.create_preset(name);
        self.sync_session(result)
    }

    pub fn duplicate_preset(&mut self, index: usize, name: Option<String>) -> Result<usize, PresetError> {
        let result = self.manager.duplicate_preset(index, name);
        self.sync_session(result)
    }

    pub fn rename_preset(&mut self, index: usize, name: &str) -> Result<(), PresetError> {
        self.manager.rename_preset(index, name)
    }

    pub fn remove_preset(&mut self, index: usize) -> Result<Preset, PresetError> {
        let result = self.manager.remove_preset(index);
        self.sync_session(result)
    }

    /// Reload the session when the manager's state changed: on success, and
    /// on storage failures, which happen after memory was updated.
    fn sync_session<T>(&mut self, result: Result<T, PresetError>) -> Result<T, PresetError> {
        let changed = match &result {
            Ok(_) => true,
            Err(err) => !err.is_user_error(),
        };
        if changed {
            self.reload();
        }
        result
    }

    fn reload(&mut self) {
        if self.session.is_dirty() {
            warn!(index = self.session.source_index(), "Discarding unsaved edits");
        }
        self.session = ActiveSession::load(self.manager.active_index(), self.manager.active_preset());
    }
}
