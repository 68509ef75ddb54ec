//! The gradebook: the only writer of students and quiz records.
//!
//! `Gradebook` wraps an injected [`RecordStore`] and serializes every
//! mutation behind one async mutex, so identity resolution, student creation
//! and record creation happen as a single step. Two saves for the same new
//! name can therefore never create two students.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::identity;
use crate::model::{new_id, NewQuiz, QuizRecord, Stats, Student, StudentSummary};
use crate::statistics::{compute_stats, summarize_students};
use crate::traits::RecordStore;

pub struct Gradebook {
    store: Arc<dyn RecordStore>,
    writer: Mutex<()>,
}

impl Gradebook {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Save a reviewed quiz against its resolved student.
    ///
    /// Resolves `new.student_name` against the students present when the
    /// call starts, then persists the stamped record and any newly created
    /// student in one store call. A failed write leaves no student behind.
    pub async fn add_quiz(&self, new: NewQuiz) -> Result<QuizRecord, StoreError> {
        validate_new_quiz(&new)?;

        let _guard = self.writer.lock().await;

        let students = self.store.list_students().await?;
        let resolution = identity::resolve(&new.student_name, &students);
        let created = resolution.is_new();
        let student = resolution.into_student();

        let record = QuizRecord {
            id: new_id(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            subject: new.subject.trim().to_string(),
            score: new.score,
            total_marks: new.total_marks,
            date: new.date,
            timestamp: Utc::now().timestamp_millis(),
            image_url: new.image_url,
        };
        self.store
            .record_quiz(created.then_some(&student), &record)
            .await?;
        if created {
            info!(student_id = %student.id, name = %student.name, "created student");
        }
        info!(
            quiz_id = %record.id,
            student_id = %record.student_id,
            score = record.score,
            total_marks = record.total_marks,
            "saved quiz"
        );
        Ok(record)
    }

    /// Remove a student and all of its records.
    pub async fn delete_student(&self, student_id: &str) -> Result<usize, StoreError> {
        let _guard = self.writer.lock().await;
        let removed = self.store.delete_student_cascade(student_id).await?;
        info!(student_id, removed, "deleted student");
        Ok(removed)
    }

    pub async fn students(&self) -> Result<Vec<Student>, StoreError> {
        self.store.list_students().await
    }

    pub async fn quizzes(&self) -> Result<Vec<QuizRecord>, StoreError> {
        self.store.list_quizzes().await
    }

    /// A student's records, most recent first.
    pub async fn history(&self, student_id: &str) -> Result<Vec<QuizRecord>, StoreError> {
        self.store.quizzes_for_student(student_id).await
    }

    /// Find a student by id, or else by name under the resolver's matching rule.
    pub async fn find_student(&self, id_or_name: &str) -> Result<Option<Student>, StoreError> {
        if let Some(student) = self.store.get_student(id_or_name).await? {
            return Ok(Some(student));
        }
        let key = identity::normalize_name(id_or_name);
        Ok(self
            .store
            .list_students()
            .await?
            .into_iter()
            .find(|s| identity::normalize_name(&s.name) == key))
    }

    /// Dashboard statistics over every record.
    pub async fn stats(&self) -> Result<Stats, StoreError> {
        let records = self.store.list_quizzes().await?;
        debug!(records = records.len(), "computing stats");
        Ok(compute_stats(&records))
    }

    pub async fn student_summaries(&self) -> Result<Vec<StudentSummary>, StoreError> {
        let students = self.store.list_students().await?;
        let records = self.store.list_quizzes().await?;
        Ok(summarize_students(&students, &records))
    }
}

/// Save-time checks. Percentage math needs a positive total, and every
/// record must name a student.
fn validate_new_quiz(new: &NewQuiz) -> Result<(), StoreError> {
    if new.student_name.trim().is_empty() {
        return Err(StoreError::Validation("student name is empty".into()));
    }
    if !new.total_marks.is_finite() || new.total_marks <= 0.0 {
        return Err(StoreError::Validation(format!(
            "total marks must be positive, got {}",
            new.total_marks
        )));
    }
    if !new.score.is_finite() || new.score < 0.0 {
        return Err(StoreError::Validation(format!(
            "score must be zero or more, got {}",
            new.score
        )));
    }
    Ok(())
}
