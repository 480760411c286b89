//! Error types for preset and configuration operations
//!
//! Merge-level mismatches never show up here: the merger absorbs them by
//! falling back to base values. Only boundary failures are surfaced.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("Preset index {index} is out of range ({len} preset(s) available)")]
    OutOfRange { index: usize, len: usize },

    #[error("Failed to write presets to {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode presets: {source}")]
    Encode {
        #[from]
        source: serde_json::Error,
    },

    #[error("Import rejected: {reason}")]
    Import { reason: String },

    #[error("Export failed: {reason}")]
    Export { reason: String },

    #[error("Unknown configuration field '{key}'")]
    UnknownField { key: String },

    #[error("Invalid value for '{key}': expected {expected}")]
    InvalidValue { key: String, expected: String },

    #[error("Invalid preset name: cannot be empty")]
    InvalidName,

    #[error("Cannot remove the last remaining preset")]
    LastPreset,
}

impl PresetError {
    /// Error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            PresetError::OutOfRange { .. } => "PRESET_OUT_OF_RANGE",
            PresetError::Storage { .. } => "STORAGE_FAILURE",
            PresetError::Encode { .. } => "STORAGE_ENCODE_FAILURE",
            PresetError::Import { .. } => "IMPORT_ERROR",
            PresetError::Export { .. } => "EXPORT_ERROR",
            PresetError::UnknownField { .. } => "UNKNOWN_FIELD",
            PresetError::InvalidValue { .. } => "INVALID_VALUE",
            PresetError::InvalidName => "INVALID_PRESET_NAME",
            PresetError::LastPreset => "LAST_PRESET",
        }
    }

    /// Whether the error was caused by user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            PresetError::Storage { .. } | PresetError::Encode { .. } | PresetError::Export { .. }
        )
    }

    pub(crate) fn import(reason: impl Into<String>) -> Self {
        PresetError::Import {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = PresetError::OutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "Preset index 4 is out of range (2 preset(s) available)"
        );
        assert_eq!(err.code(), "PRESET_OUT_OF_RANGE");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_storage_failure_is_not_user_error() {
        let err = PresetError::Storage {
            path: PathBuf::from("/tmp/presets.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.code(), "STORAGE_FAILURE");
        assert!(!err.is_user_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
