//! Core data model types for quizscan.
//!
//! These are the entities the whole system passes around: persisted
//! students and quiz records, the transient result of one AI round-trip,
//! and the prepared image that travels from the preprocessor to a provider.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student, identified by `id`. `name` is the canonical display form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Opaque identifier (UUIDv4).
    pub id: String,
    /// Canonical spelling, as first accepted.
    pub name: String,
    /// When the student was first created.
    pub joined_at: DateTime<Utc>,
}

impl Student {
    /// Create a student with a fresh identifier, joined now.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            joined_at: Utc::now(),
        }
    }
}

/// A persisted quiz result. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    /// Opaque identifier (UUIDv4).
    pub id: String,
    /// The owning student.
    pub student_id: String,
    /// Copy of the student's canonical name at write time.
    pub student_name: String,
    pub subject: String,
    pub score: f64,
    pub total_marks: f64,
    /// Calendar date of the quiz, persisted as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Creation time in Unix milliseconds.
    pub timestamp: i64,
    /// Where the captured paper image lives, if it was kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl QuizRecord {
    /// `score / total_marks` as a percentage, or `None` when the denominator
    /// is not positive.
    pub fn percentage(&self) -> Option<f64> {
        percentage(self.score, self.total_marks)
    }
}

/// The partial record handed to [`crate::gradebook::Gradebook::add_quiz`].
///
/// Identity, id and timestamp are stamped at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuiz {
    /// Name as typed or extracted; resolved to a canonical student on save.
    pub student_name: String,
    pub subject: String,
    pub score: f64,
    pub total_marks: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewQuiz {
    /// Build a new quiz from a reviewed extraction result.
    pub fn from_extracted(result: ExtractedResult, date: NaiveDate) -> Self {
        Self {
            student_name: result.student_name,
            subject: result.subject,
            score: result.score,
            total_marks: result.total_marks,
            date,
            image_url: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// The validated output of one extraction or grading round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResult {
    pub student_name: String,
    pub score: f64,
    pub total_marks: f64,
    pub subject: String,
}

/// A normalized image ready for transmission and on-screen confirmation.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes` (e.g. `image/jpeg`).
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl PreparedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            width,
            height,
        }
    }

    /// Standard base64 of the encoded bytes, as inline image APIs expect.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// A `data:` URL suitable for previews and data-URL image inputs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl std::fmt::Debug for PreparedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedImage")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Aggregate statistics over every quiz record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_quizzes: usize,
    /// Mean percentage across records.
    pub average_score: f64,
    pub highest_scorer: Option<TopScorer>,
}

/// The record with the best score ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopScorer {
    pub name: String,
    pub score: f64,
    pub total_marks: f64,
    pub percentage: f64,
    pub subject: String,
}

/// Per-student roll-up used by student listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student: Student,
    pub quiz_count: usize,
    /// Mean percentage, `None` when no record has a usable total.
    pub average_score: Option<f64>,
    pub last_quiz_date: Option<NaiveDate>,
}

/// Generate a fresh opaque identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// `score / total * 100`, guarded against non-positive denominators.
pub fn percentage(score: f64, total: f64) -> Option<f64> {
    if total > 0.0 && score.is_finite() && total.is_finite() {
        Some(score / total * 100.0)
    } else {
        None
    }
}
