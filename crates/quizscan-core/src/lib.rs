//! Data model, pipeline stages, and the gradebook.
//!
//! This crate defines the records, the three injected collaborator traits,
//! and every pure stage of the scan-to-record pipeline. Image decoding, HTTP
//! providers and durable storage live in sibling crates.

pub mod error;
pub mod fallback;
pub mod gateway;
pub mod gradebook;
pub mod identity;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod statistics;
pub mod store;
pub mod traits;
