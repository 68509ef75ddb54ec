//! Normalizes captured quiz papers before extraction.
//!
//! Decodes the capture, fits it inside a bounded box, applies a fixed
//! enhancement and re-encodes it as JPEG.

pub mod enhance;
pub mod preprocess;

pub use enhance::EnhancementParams;
pub use preprocess::{EnhancingPreprocessor, PreprocessConfig};
