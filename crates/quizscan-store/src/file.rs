//! A [`RecordStore`] backed by a single JSON file.
//!
//! Every mutation is applied to a copy of the collections, the copy is
//! written to a temp file in the same directory and renamed over the data
//! file, and only then does the copy replace the in-memory state. A failed
//! write therefore leaves both the file and memory as they were.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use quizscan_core::error::StoreError;
use quizscan_core::model::{QuizRecord, Student};
use quizscan_core::store::{Collections, Snapshot};
use quizscan_core::traits::RecordStore;

pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<Collections>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or empty file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Snapshot::default(),
            Ok(text) => serde_json::from_str::<Snapshot>(&text).map_err(|e| {
                StoreError::Storage(format!("corrupt data file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        info!(
            path = %path.display(),
            students = snapshot.students.len(),
            quizzes = snapshot.quizzes.len(),
            "opened data file"
        );
        Ok(Self {
            path,
            state: Mutex::new(Collections::from_snapshot(snapshot)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the state, persist it, then swap it in.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Collections) -> T,
    ) -> Result<T, StoreError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let out = change(&mut next);

        let snapshot = next.to_snapshot();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_snapshot(&path, &snapshot))
            .await
            .map_err(|e| StoreError::Storage(format!("write task failed: {e}")))??;

        *state = next;
        Ok(out)
    }
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let storage = |what: &str, e: &dyn std::fmt::Display| {
        StoreError::Storage(format!("{what} {}: {e}", path.display()))
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| storage("failed to create directory for", &e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| storage("failed to create temp file for", &e))?;
    serde_json::to_writer_pretty(&mut tmp, snapshot)
        .map_err(|e| storage("failed to serialize", &e))?;
    tmp.write_all(b"\n")
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| storage("failed to write", &e))?;
    tmp.persist(path)
        .map_err(|e| storage("failed to replace", &e.error))?;

    debug!(
        path = %path.display(),
        students = snapshot.students.len(),
        quizzes = snapshot.quizzes.len(),
        "wrote data file"
    );
    Ok(())
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.state.lock().await.students())
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizRecord>, StoreError> {
        Ok(self.state.lock().await.quizzes())
    }

    async fn get_student(&self, id: &str) -> Result<Option<Student>, StoreError> {
        Ok(self.state.lock().await.student(id))
    }

    async fn upsert_student(&self, student: &Student) -> Result<(), StoreError> {
        let student = student.clone();
        self.mutate(move |c| c.upsert_student(student)).await
    }

    async fn upsert_quiz(&self, record: &QuizRecord) -> Result<(), StoreError> {
        let record = record.clone();
        self.mutate(move |c| c.upsert_quiz(record)).await
    }

    async fn record_quiz(
        &self,
        new_student: Option<&Student>,
        record: &QuizRecord,
    ) -> Result<(), StoreError> {
        let student = new_student.cloned();
        let record = record.clone();
        self.mutate(move |c| c.record_quiz(student, record)).await
    }

    async fn quizzes_for_student(&self, student_id: &str) -> Result<Vec<QuizRecord>, StoreError> {
        Ok(self.state.lock().await.quizzes_for_student(student_id))
    }

    async fn delete_student_cascade(&self, student_id: &str) -> Result<usize, StoreError> {
        self.mutate(|c| c.delete_student_cascade(student_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str, student: &Student, timestamp: i64) -> QuizRecord {
        QuizRecord {
            id: id.into(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            subject: "History".into(),
            score: 6.0,
            total_marks: 10.0,
            date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            timestamp,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data.json")).await.unwrap();
        assert!(store.list_students().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let asha = Student::new("Asha");
        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store.upsert_student(&asha).await.unwrap();
            store.upsert_quiz(&record("q1", &asha, 1)).await.unwrap();
            store.upsert_quiz(&record("q2", &asha, 2)).await.unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get_student(&asha.id).await.unwrap(), Some(asha.clone()));
        let history = reopened.quizzes_for_student(&asha.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "q2");
    }

    #[tokio::test]
    async fn file_layout_has_both_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        let ravi = Student::new("Ravi");
        store.upsert_student(&ravi).await.unwrap();
        store.upsert_quiz(&record("q1", &ravi, 1)).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["students"][0]["name"], "Ravi");
        assert_eq!(json["quizzes"][0]["studentId"], ravi.id);
        assert_eq!(json["quizzes"][0]["totalMarks"], 10.0);
    }

    #[tokio::test]
    async fn cascade_delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        let asha = Student::new("Asha");
        let ravi = Student::new("Ravi");
        store.upsert_student(&asha).await.unwrap();
        store.upsert_student(&ravi).await.unwrap();
        for i in 0..3 {
            store.upsert_quiz(&record(&format!("a{i}"), &asha, i)).await.unwrap();
        }
        store.upsert_quiz(&record("r0", &ravi, 9)).await.unwrap();

        assert_eq!(store.delete_student_cascade(&asha.id).await.unwrap(), 3);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert!(reopened.get_student(&asha.id).await.unwrap().is_none());
        let quizzes = reopened.list_quizzes().await.unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].student_id, ravi.id);
    }

    #[tokio::test]
    async fn failed_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        let asha = Student::new("Asha");
        store.upsert_student(&asha).await.unwrap();

        // A directory in the file's place makes the final rename fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        let err = store.upsert_student(&Student::new("Ravi")).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        let students = store.list_students().await.unwrap();
        assert_eq!(students, vec![asha]);
    }

    #[tokio::test]
    async fn failed_record_write_adds_neither_student_nor_quiz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        let asha = Student::new("Asha");
        store
            .record_quiz(Some(&asha), &record("q1", &asha, 1))
            .await
            .unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        let ravi = Student::new("Ravi");
        let err = store
            .record_quiz(Some(&ravi), &record("q2", &ravi, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.list_students().await.unwrap(), vec![asha]);
        assert_eq!(store.list_quizzes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reopened_file_keeps_save_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let names = ["Zoe", "Asha", "Meena", "Bilal"];
        {
            let store = JsonFileStore::open(&path).await.unwrap();
            for (i, name) in names.iter().enumerate() {
                let student = Student::new(*name);
                // Identical timestamps leave insertion order as the only ordering.
                store
                    .record_quiz(Some(&student), &record(&format!("q{i}"), &student, 5))
                    .await
                    .unwrap();
            }
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let listed: Vec<String> = reopened
            .list_quizzes()
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.student_name)
            .collect();
        assert_eq!(listed, names);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StoreError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn empty_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "\n").unwrap();
        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(store.list_quizzes().await.unwrap().is_empty());
    }
}
