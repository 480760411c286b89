//! Preset lifecycle
//!
//! - **collection**: presets and the active index
//! - **store**: durable storage of the whole collection
//! - **manager**: list/select/save/import operations over the two

pub mod collection;
pub mod manager;
pub mod store;

pub use collection::Preset;
pub use manager::PresetManager;
pub use store::{JsonFileStore, PresetStore};
