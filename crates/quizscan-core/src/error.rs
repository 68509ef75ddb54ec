//! Error types for every stage of the scan-to-record pipeline.
//!
//! Each stage owns one enum so callers can match on the failure kind without
//! string matching: the fallback policy needs to tell a preprocessing failure
//! (recapture) from a gateway or parse failure (offer an editable result).

use thiserror::Error;

/// Image normalization failures. Terminal for the capture attempt.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// The source bytes could not be decoded as an image.
    #[error("could not decode image: {0}")]
    ImageDecode(String),

    /// The normalized image could not be encoded.
    #[error("could not encode image: {0}")]
    Encode(String),
}

/// Failures talking to the external extraction/grading service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No usable credential or endpoint configuration.
    #[error("provider not configured: {0}")]
    Configuration(String),

    /// The service rejected the credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Any other non-success outcome, including transport errors and timeouts.
    #[error("service error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Service { status: Option<u16>, message: String },

    /// The service answered but returned no text.
    #[error("service returned an empty response")]
    EmptyResponse,
}

impl GatewayError {
    pub fn service(message: impl Into<String>) -> Self {
        GatewayError::Service {
            status: None,
            message: message.into(),
        }
    }
}

/// Failures turning the service's raw text into an [`crate::model::ExtractedResult`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// No parseable JSON object could be found. Carries the raw text.
    #[error("response did not contain a JSON object")]
    MalformedResponse { raw: String },

    /// A JSON object was found but a required field is missing or mistyped.
    #[error("invalid result: {0}")]
    Validation(String),
}

/// Persistence failures and save-time input rejections.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage failed; prior state is untouched.
    #[error("storage error: {0}")]
    Storage(String),

    /// The record was rejected before anything was written.
    #[error("invalid quiz: {0}")]
    Validation(String),
}

/// Any failure of the capture → extract → parse pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl PipelineError {
    /// Short, stable name of the failure kind, for logs and UI hints.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Preprocess(PreprocessError::ImageDecode(_)) => "image_decode",
            PipelineError::Preprocess(PreprocessError::Encode(_)) => "encode",
            PipelineError::Gateway(GatewayError::Configuration(_)) => "configuration",
            PipelineError::Gateway(GatewayError::Auth(_)) => "auth",
            PipelineError::Gateway(GatewayError::Service { .. }) => "service",
            PipelineError::Gateway(GatewayError::EmptyResponse) => "empty_response",
            PipelineError::Parse(ParseError::MalformedResponse { .. }) => "malformed_response",
            PipelineError::Parse(ParseError::Validation(_)) => "validation",
        }
    }
}
