//! Vision provider integrations for quiz extraction.
//!
//! Implements the `VisionProvider` trait for Gemini and OpenAI-compatible
//! endpoints, plus a scripted provider for tests, and loads the provider
//! configuration file.

pub mod config;
pub mod gemini;
mod http;
pub mod mock;
pub mod openai;
mod schema;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, QuizscanConfig};
