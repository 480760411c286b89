#![forbid(unsafe_code)]

//! Configuration presets for Uma Auto Train
//!
//! A schema-driven configuration, a merge engine that reconciles partial or
//! untrusted documents against it, and named presets persisted as one JSON
//! document. `Editor` is the surface front ends drive.

pub mod config;
pub mod constants;
pub mod document;
pub mod editor;
pub mod errors;
pub mod presets;
pub mod session;
pub mod version;

pub use editor::Editor;
pub use errors::PresetError;
