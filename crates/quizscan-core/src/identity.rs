//! Identity resolution: free-text name → canonical [`Student`].
//!
//! Resolution is a pure function over a snapshot of the current students.
//! It never persists anything; [`crate::gradebook::Gradebook::add_quiz`]
//! calls it under the writer lock and stores any newly created student.

use crate::model::Student;

/// Outcome of resolving a name against existing students.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An existing student matched; returned unchanged.
    Existing(Student),
    /// No match; a new student the caller must persist.
    Created(Student),
}

impl Resolution {
    pub fn student(&self) -> &Student {
        match self {
            Resolution::Existing(s) | Resolution::Created(s) => s,
        }
    }

    pub fn into_student(self) -> Student {
        match self {
            Resolution::Existing(s) | Resolution::Created(s) => s,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}

/// Comparison key for a name: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Map `raw_name` to an existing student, or build a new one.
///
/// A new student keeps the trimmed spelling as typed, so the first accepted
/// casing becomes canonical.
pub fn resolve(raw_name: &str, existing: &[Student]) -> Resolution {
    let key = normalize_name(raw_name);
    match existing.iter().find(|s| normalize_name(&s.name) == key) {
        Some(student) => Resolution::Existing(student.clone()),
        None => Resolution::Created(Student::new(raw_name.trim())),
    }
}
