//! Configuration data for the trainer
//!
//! - **schema**: the default field set, types and values
//! - **configuration**: complete configuration values built from the schema
//! - **merge**: reconciles partial or untrusted documents against a base
//! - **themes**: inert theme table referenced by the `theme` field

pub mod configuration;
pub mod merge;
pub mod schema;
pub mod themes;

// Re-export commonly used types
pub use configuration::Configuration;
pub use merge::{merge_with_default, merge_with_report, MergeReport};
pub use schema::default_configuration;
