//! Core trait definitions for the pipeline's three injected collaborators.
//!
//! `quizscan-imaging` implements [`ImagePreprocessor`], `quizscan-providers`
//! implements [`VisionProvider`], and `quizscan-store` (plus the in-crate
//! [`crate::store::MemoryStore`]) implements [`RecordStore`].

use async_trait::async_trait;

use crate::error::{GatewayError, PreprocessError, StoreError};
use crate::model::{PreparedImage, QuizRecord, Student};

// ---------------------------------------------------------------------------
// Image preprocessing
// ---------------------------------------------------------------------------

/// Turns raw captured bytes into a compact, enhanced, encodable image.
///
/// Implementations are CPU-bound and synchronous; async callers run them on
/// the blocking pool.
pub trait ImagePreprocessor: Send + Sync {
    fn preprocess(&self, raw: &[u8]) -> Result<PreparedImage, PreprocessError>;
}

// ---------------------------------------------------------------------------
// Vision provider
// ---------------------------------------------------------------------------

/// Trait for AI backends that read quiz papers from images.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send one request and return the service's raw text reply.
    async fn complete(&self, request: &VisionRequest) -> Result<String, GatewayError>;
}

/// One multimodal request: instructions, images in order, output contract.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Natural-language instructions for the service.
    pub instructions: String,
    /// Images in the order the service should see them.
    pub images: Vec<PreparedImage>,
    /// Fields the structured reply must contain.
    pub output: &'static [OutputField],
}

/// One required field of the structured-output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputField {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// JSON type of an [`OutputField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

/// The four-field contract every extraction and grading request declares.
pub const RESULT_CONTRACT: &[OutputField] = &[
    OutputField {
        name: "studentName",
        kind: FieldKind::String,
    },
    OutputField {
        name: "score",
        kind: FieldKind::Number,
    },
    OutputField {
        name: "totalMarks",
        kind: FieldKind::Number,
    },
    OutputField {
        name: "subject",
        kind: FieldKind::String,
    },
];

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

/// Durable keyed storage for students and quiz records.
///
/// Every method is atomic on its own: a failure leaves both collections as
/// they were before the call.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All students, in the order they were first saved.
    async fn list_students(&self) -> Result<Vec<Student>, StoreError>;

    /// All quiz records, in the order they were first saved.
    async fn list_quizzes(&self) -> Result<Vec<QuizRecord>, StoreError>;

    async fn get_student(&self, id: &str) -> Result<Option<Student>, StoreError>;

    /// Create or replace a student keyed by `id`.
    async fn upsert_student(&self, student: &Student) -> Result<(), StoreError>;

    /// Create or replace a quiz record keyed by `id`.
    async fn upsert_quiz(&self, record: &QuizRecord) -> Result<(), StoreError>;

    /// Insert `record`, and `new_student` with it when given, as one atomic
    /// change: either both are stored or neither is.
    async fn record_quiz(
        &self,
        new_student: Option<&Student>,
        record: &QuizRecord,
    ) -> Result<(), StoreError>;

    /// A student's records, most recent `timestamp` first.
    async fn quizzes_for_student(&self, student_id: &str) -> Result<Vec<QuizRecord>, StoreError>;

    /// Remove a student and every record referencing it. Returns the number
    /// of records removed.
    async fn delete_student_cascade(&self, student_id: &str) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_has_four_required_fields() {
        let names: Vec<&str> = RESULT_CONTRACT.iter().map(|f| f.name).collect();
        assert_eq!(names, ["studentName", "score", "totalMarks", "subject"]);
        assert_eq!(
            RESULT_CONTRACT
                .iter()
                .filter(|f| f.kind == FieldKind::Number)
                .count(),
            2
        );
    }
}
