//! What to show the user when the pipeline fails.
//!
//! Gateway and parse failures still leave the user something to review: a
//! placeholder result they can correct by hand. Preprocessing failures have
//! no such result; the paper has to be captured again.

use tracing::warn;

use crate::error::PipelineError;
use crate::model::ExtractedResult;

pub const UNKNOWN_STUDENT: &str = "Unknown Student";
pub const UNKNOWN_SUBJECT: &str = "Unknown Subject";
pub const PLACEHOLDER_TOTAL: f64 = 10.0;

/// The editable placeholder for a failure, if the failure allows one.
pub fn fallback_result(error: &PipelineError) -> Option<ExtractedResult> {
    match error {
        PipelineError::Preprocess(_) => None,
        PipelineError::Gateway(_) | PipelineError::Parse(_) => {
            warn!(kind = error.kind(), %error, "falling back to placeholder result");
            Some(placeholder())
        }
    }
}

pub fn placeholder() -> ExtractedResult {
    ExtractedResult {
        student_name: UNKNOWN_STUDENT.to_string(),
        score: 0.0,
        total_marks: PLACEHOLDER_TOTAL,
        subject: UNKNOWN_SUBJECT.to_string(),
    }
}
