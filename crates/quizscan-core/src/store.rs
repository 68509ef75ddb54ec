//! In-memory record collections and the [`MemoryStore`] built on them.
//!
//! [`Collections`] holds both keyed maps plus the `studentId` secondary
//! index. Both maps keep insertion order, so listings and the persisted file
//! follow the order records were saved in. Durable stores reuse it: they
//! mutate a clone, persist the clone, and only then swap it in, which keeps
//! every call atomic.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::model::{QuizRecord, Student};
use crate::traits::RecordStore;

/// Students and quizzes keyed by id, with quizzes indexed by student.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    students: IndexMap<String, Student>,
    quizzes: IndexMap<String, QuizRecord>,
    by_student: HashMap<String, BTreeSet<String>>,
}

/// Serialized form of [`Collections`]: the two logical collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub quizzes: Vec<QuizRecord>,
}

impl Collections {
    /// Rebuild collections (and the index) from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut collections = Self::default();
        for student in snapshot.students {
            collections.upsert_student(student);
        }
        for record in snapshot.quizzes {
            collections.upsert_quiz(record);
        }
        collections
    }

    /// Both collections in insertion order.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            students: self.students(),
            quizzes: self.quizzes(),
        }
    }

    /// Students in the order they were first saved.
    pub fn students(&self) -> Vec<Student> {
        self.students.values().cloned().collect()
    }

    /// Quiz records in the order they were first saved.
    pub fn quizzes(&self) -> Vec<QuizRecord> {
        self.quizzes.values().cloned().collect()
    }

    pub fn student(&self, id: &str) -> Option<Student> {
        self.students.get(id).cloned()
    }

    pub fn upsert_student(&mut self, student: Student) {
        self.students.insert(student.id.clone(), student);
    }

    pub fn upsert_quiz(&mut self, record: QuizRecord) {
        if let Some(previous) = self.quizzes.get(&record.id) {
            if previous.student_id != record.student_id {
                let old_owner = previous.student_id.clone();
                self.unindex(&old_owner, &record.id);
            }
        }
        self.by_student
            .entry(record.student_id.clone())
            .or_default()
            .insert(record.id.clone());
        self.quizzes.insert(record.id.clone(), record);
    }

    /// Save a record together with the student it introduces, as one change.
    pub fn record_quiz(&mut self, new_student: Option<Student>, record: QuizRecord) {
        if let Some(student) = new_student {
            self.upsert_student(student);
        }
        self.upsert_quiz(record);
    }

    /// A student's records, most recent first.
    pub fn quizzes_for_student(&self, student_id: &str) -> Vec<QuizRecord> {
        let mut records: Vec<QuizRecord> = self
            .by_student
            .get(student_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.quizzes.get(id).cloned())
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// Remove a student and its records; returns how many records went.
    pub fn delete_student_cascade(&mut self, student_id: &str) -> usize {
        self.students.shift_remove(student_id);
        let ids = self.by_student.remove(student_id).unwrap_or_default();
        let mut removed = 0;
        for id in ids {
            if self.quizzes.shift_remove(&id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    fn unindex(&mut self, student_id: &str, quiz_id: &str) {
        if let Some(ids) = self.by_student.get_mut(student_id) {
            ids.remove(quiz_id);
            if ids.is_empty() {
                self.by_student.remove(student_id);
            }
        }
    }
}

/// A [`RecordStore`] that lives only in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(Collections::from_snapshot(snapshot)),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.inner.read().await.students())
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizRecord>, StoreError> {
        Ok(self.inner.read().await.quizzes())
    }

    async fn get_student(&self, id: &str) -> Result<Option<Student>, StoreError> {
        Ok(self.inner.read().await.student(id))
    }

    async fn upsert_student(&self, student: &Student) -> Result<(), StoreError> {
        self.inner.write().await.upsert_student(student.clone());
        Ok(())
    }

    async fn upsert_quiz(&self, record: &QuizRecord) -> Result<(), StoreError> {
        self.inner.write().await.upsert_quiz(record.clone());
        Ok(())
    }

    async fn record_quiz(
        &self,
        new_student: Option<&Student>,
        record: &QuizRecord,
    ) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .record_quiz(new_student.cloned(), record.clone());
        Ok(())
    }

    async fn quizzes_for_student(&self, student_id: &str) -> Result<Vec<QuizRecord>, StoreError> {
        Ok(self.inner.read().await.quizzes_for_student(student_id))
    }

    async fn delete_student_cascade(&self, student_id: &str) -> Result<usize, StoreError> {
        Ok(self.inner.write().await.delete_student_cascade(student_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str, student_id: &str, timestamp: i64) -> QuizRecord {
        QuizRecord {
            id: id.into(),
            student_id: student_id.into(),
            student_name: "Asha".into(),
            subject: "Maths".into(),
            score: 5.0,
            total_marks: 10.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            timestamp,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn history_is_most_recent_first() {
        let store = MemoryStore::new();
        let asha = Student::new("Asha");
        store.upsert_student(&asha).await.unwrap();
        for (id, ts) in [("a", 100), ("b", 300), ("c", 200)] {
            store.upsert_quiz(&record(id, &asha.id, ts)).await.unwrap();
        }

        let history = store.quizzes_for_student(&asha.id).await.unwrap();
        let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_id() {
        let store = MemoryStore::new();
        let r = record("q1", "s1", 1);
        store.upsert_quiz(&r).await.unwrap();
        store.upsert_quiz(&r).await.unwrap();
        assert_eq!(store.list_quizzes().await.unwrap().len(), 1);
        assert_eq!(store.quizzes_for_student("s1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reassigned_record_moves_in_index() {
        let store = MemoryStore::new();
        store.upsert_quiz(&record("q1", "s1", 1)).await.unwrap();
        store.upsert_quiz(&record("q1", "s2", 1)).await.unwrap();
        assert!(store.quizzes_for_student("s1").await.unwrap().is_empty());
        assert_eq!(store.quizzes_for_student("s2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cascade_removes_student_and_records_only() {
        let store = MemoryStore::new();
        let asha = Student::new("Asha");
        let ravi = Student::new("Ravi");
        store.upsert_student(&asha).await.unwrap();
        store.upsert_student(&ravi).await.unwrap();
        store.upsert_quiz(&record("a1", &asha.id, 1)).await.unwrap();
        store.upsert_quiz(&record("a2", &asha.id, 2)).await.unwrap();
        store.upsert_quiz(&record("r1", &ravi.id, 3)).await.unwrap();

        let removed = store.delete_student_cascade(&asha.id).await.unwrap();

        assert_eq!(removed, 2);
        assert!(store.get_student(&asha.id).await.unwrap().is_none());
        let remaining = store.list_quizzes().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].student_id, ravi.id);
    }

    #[test]
    fn listings_keep_save_order() {
        let mut collections = Collections::default();
        let names = ["Zoe", "Asha", "Meena", "Bilal", "Ravi", "Kiran"];
        for (i, name) in names.iter().enumerate() {
            let student = Student::new(*name);
            let quiz = record(&format!("q{i}"), &student.id, 7);
            collections.record_quiz(Some(student), quiz);
        }
        let meena = collections.students()[2].id.clone();
        collections.delete_student_cascade(&meena);

        let listed: Vec<String> = collections.students().into_iter().map(|s| s.name).collect();
        assert_eq!(listed, ["Zoe", "Asha", "Bilal", "Ravi", "Kiran"]);
        let ids: Vec<String> = collections.quizzes().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, ["q0", "q1", "q3", "q4", "q5"]);

        let rebuilt = Collections::from_snapshot(collections.to_snapshot());
        assert_eq!(rebuilt.quizzes(), collections.quizzes());
    }

    #[tokio::test]
    async fn record_quiz_adds_student_and_record_together() {
        let store = MemoryStore::new();
        let asha = Student::new("Asha");
        store
            .record_quiz(Some(&asha), &record("q1", &asha.id, 1))
            .await
            .unwrap();
        store.record_quiz(None, &record("q2", &asha.id, 2)).await.unwrap();

        assert_eq!(store.list_students().await.unwrap(), vec![asha.clone()]);
        assert_eq!(store.quizzes_for_student(&asha.id).await.unwrap().len(), 2);
    }

    #[test]
    fn snapshot_round_trip_rebuilds_index() {
        let mut collections = Collections::default();
        let asha = Student::new("Asha");
        collections.upsert_student(asha.clone());
        collections.upsert_quiz(record("q1", &asha.id, 5));

        let rebuilt = Collections::from_snapshot(collections.to_snapshot());
        assert_eq!(rebuilt.quizzes_for_student(&asha.id).len(), 1);
        assert_eq!(rebuilt.student(&asha.id), Some(asha));
    }
}
