//! AI settings module
//!
//! Settings model, storage trait, and the manager that saves them explicitly.

pub mod model;
pub mod manager;
pub mod persistence;

pub use model::*;
pub use manager::SettingsManager;
pub use persistence::SettingsStorage;
