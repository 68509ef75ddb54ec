//! The `quizscan add` command.

use anyhow::Result;
use chrono::{Local, NaiveDate};

use quizscan_core::model::NewQuiz;

use super::{fmt_marks, open_session, GlobalOpts};

pub async fn execute(
    opts: &GlobalOpts,
    name: String,
    subject: String,
    score: f64,
    total: f64,
    date: Option<NaiveDate>,
) -> Result<()> {
    let session = open_session(opts).await?;
    let record = session
        .gradebook
        .add_quiz(NewQuiz {
            student_name: name,
            subject,
            score,
            total_marks: total,
            date: date.unwrap_or_else(|| Local::now().date_naive()),
            image_url: None,
        })
        .await?;

    println!(
        "Saved {}/{} in {} for {} (student {})",
        fmt_marks(record.score),
        fmt_marks(record.total_marks),
        record.subject,
        record.student_name,
        record.student_id
    );
    Ok(())
}
