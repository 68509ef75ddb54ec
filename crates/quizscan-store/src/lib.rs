//! Durable record storage.
//!
//! Keeps students and quiz records in one JSON document that is rewritten
//! atomically on every change.

pub mod file;

pub use file::JsonFileStore;
