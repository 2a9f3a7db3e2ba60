//! cf-storage - Storage library for commentflow
//!
//! This crate provides the file system implementation of settings storage.

mod settings_store;

pub use settings_store::FileSystemStorage;
