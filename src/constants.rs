//! Application-wide constants
//!
//! Single source of truth for file names, identifiers and labels used by the
//! preset store, the manager and the CLI.

/// Preset store location
pub mod storage {
    /// Directory under the user's config dir
    pub const APP_DIR: &str = "uma-auto-train";

    /// Fixed identifier of the stored preset collection
    pub const FILENAME: &str = "presets.json";

    /// Extension of the sibling file written before the atomic rename
    pub const TEMP_EXTENSION: &str = "json.tmp";

    /// Extension of the copy kept when the stored document fails to decode
    pub const BACKUP_EXTENSION: &str = "json.bak";

    /// Environment variable overriding the store path
    pub const PATH_ENV: &str = "UMA_PRESETS_FILE";
}

/// Preset naming
pub mod presets {
    /// Label prefix for generated names ("Preset 1", "Preset 2", ...)
    pub const DEFAULT_NAME_PREFIX: &str = "Preset";

    /// Configuration field that carries a user-chosen preset name
    pub const NAME_FIELD: &str = "config_name";

    /// Suffix appended to duplicated preset names
    pub const COPY_SUFFIX: &str = " (copy)";
}

/// Version probe
pub mod version {
    /// File holding the release identifier, next to the executable
    pub const FILENAME: &str = "version.txt";

    /// Sentinel reported when the version cannot be read
    pub const UNKNOWN: &str = "unknown";
}

/// Logging
pub mod logging {
    /// Environment variable selecting the max log level
    pub const LEVEL_ENV: &str = "LOG_LEVEL";
}
