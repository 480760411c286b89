//! Import and export of configuration documents
//!
//! Documents are flat key/value tables in JSON or TOML. Anything that does
//! not parse, or parses to something other than a table, is rejected before
//! any preset is touched.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::Configuration;
use crate::errors::PresetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML, everything else is read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

pub fn parse_document(contents: &str, format: DocumentFormat) -> Result<Value, PresetError> {
    let document = match format {
        DocumentFormat::Json => serde_json::from_str::<Value>(contents)
            .map_err(|err| PresetError::import(format!("invalid JSON: {err}")))?,
        DocumentFormat::Toml => {
            let table: toml::Table = toml::from_str(contents)
                .map_err(|err| PresetError::import(format!("invalid TOML: {err}")))?;
            serde_json::to_value(table)
                .map_err(|err| PresetError::import(format!("unsupported TOML value: {err}")))?
        }
    };

    if !document.is_object() {
        return Err(PresetError::import("expected a key/value document"));
    }
    Ok(document)
}

pub fn read_document(path: &Path) -> Result<Value, PresetError> {
    let contents = fs::read_to_string(path)
        .map_err(|err| PresetError::import(format!("cannot read {}: {err}", path.display())))?;
    let document = parse_document(&contents, DocumentFormat::from_path(path))?;
    info!(path = %path.display(), "Read configuration document");
    Ok(document)
}

pub fn render_document(config: &Configuration, format: DocumentFormat) -> Result<String, PresetError> {
    let rendered = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(config)
            .map(|json| json + "\n")
            .map_err(|err| err.to_string()),
        DocumentFormat::Toml => toml::to_string_pretty(config).map_err(|err| err.to_string()),
    };
    rendered.map_err(|reason| PresetError::Export { reason })
}

pub fn write_document(config: &Configuration, path: &Path) -> Result<(), PresetError> {
    let rendered = render_document(config, DocumentFormat::from_path(path))?;
    fs::write(path, rendered).map_err(|err| PresetError::Export {
        reason: format!("cannot write {}: {err}", path.display()),
    })?;
    info!(path = %path.display(), "Exported configuration");
    Ok(())
}
