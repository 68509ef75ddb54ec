//! Aggregate statistics, recomputed from the full record set on demand.
//!
//! Nothing here is cached or maintained incrementally. Records whose
//! `total_marks` is not positive are counted but excluded from any
//! percentage math.

use std::collections::HashMap;

use tracing::warn;

use crate::model::{percentage, QuizRecord, Stats, Student, StudentSummary, TopScorer};

/// Compute dashboard statistics over every quiz record.
///
/// `highest_scorer` is the record with the greatest `score / total_marks`.
/// Ties keep the record encountered first in `records`.
pub fn compute_stats(records: &[QuizRecord]) -> Stats {
    let mut sum = 0.0;
    let mut counted = 0usize;
    let mut best: Option<(&QuizRecord, f64)> = None;

    for record in records {
        let Some(pct) = record.percentage() else {
            warn!(
                quiz_id = %record.id,
                total_marks = record.total_marks,
                "excluding record with non-positive total from statistics"
            );
            continue;
        };
        sum += pct;
        counted += 1;
        match best {
            Some((_, best_pct)) if pct <= best_pct => {}
            _ => best = Some((record, pct)),
        }
    }

    let average_score = if counted == 0 {
        0.0
    } else {
        sum / counted as f64
    };

    Stats {
        total_quizzes: records.len(),
        average_score,
        highest_scorer: best.map(|(record, pct)| TopScorer {
            name: record.student_name.clone(),
            score: record.score,
            total_marks: record.total_marks,
            percentage: pct,
            subject: record.subject.clone(),
        }),
    }
}

/// Roll up each student's records. Students are returned sorted by name.
pub fn summarize_students(students: &[Student], records: &[QuizRecord]) -> Vec<StudentSummary> {
    let mut by_student: HashMap<&str, Vec<&QuizRecord>> = HashMap::new();
    for record in records {
        by_student
            .entry(record.student_id.as_str())
            .or_default()
            .push(record);
    }

    let mut summaries: Vec<StudentSummary> = students
        .iter()
        .map(|student| {
            let own = by_student
                .get(student.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let percentages: Vec<f64> = own
                .iter()
                .filter_map(|r| percentage(r.score, r.total_marks))
                .collect();
            let average_score = if percentages.is_empty() {
                None
            } else {
                Some(percentages.iter().sum::<f64>() / percentages.len() as f64)
            };
            StudentSummary {
                student: student.clone(),
                quiz_count: own.len(),
                average_score,
                last_quiz_date: own.iter().map(|r| r.date).max(),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.student
            .name
            .to_lowercase()
            .cmp(&b.student.name.to_lowercase())
    });
    summaries
}
