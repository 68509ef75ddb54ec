//! Shows a pipeline result for review, applies edits, and saves on request.

use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use comfy_table::{Cell, Table};

use quizscan_core::model::{percentage, ExtractedResult, NewQuiz};
use quizscan_core::pipeline::Review;

use super::{fmt_marks, fmt_percent, Session};

/// Review edits applied before saving.
#[derive(Args, Debug, Default, Clone)]
pub struct ReviewArgs {
    /// Save the reviewed result
    #[arg(long)]
    pub save: bool,

    /// Correct the student name
    #[arg(long)]
    pub name: Option<String>,

    /// Correct the subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Correct the score
    #[arg(long)]
    pub score: Option<f64>,

    /// Correct the total marks
    #[arg(long)]
    pub total: Option<f64>,

    /// Quiz date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl ReviewArgs {
    pub fn apply(&self, mut result: ExtractedResult) -> ExtractedResult {
        if let Some(name) = &self.name {
            result.student_name = name.clone();
        }
        if let Some(subject) = &self.subject {
            result.subject = subject.clone();
        }
        if let Some(score) = self.score {
            result.score = score;
        }
        if let Some(total) = self.total {
            result.total_marks = total;
        }
        result
    }
}

/// Print the result, then save it if `--save` was given.
pub async fn finish(
    session: &Session,
    review: Review,
    args: &ReviewArgs,
    source: &Path,
) -> Result<()> {
    if let Some(failure) = &review.failure {
        eprintln!(
            "Could not read the paper ({}): {failure}",
            failure.kind()
        );
        eprintln!("Showing a placeholder result; correct it with --name/--subject/--score/--total.");
    }

    let result = args.apply(review.result);
    println!("{}", result_table(&result));
    eprintln!(
        "Image sent: {}x{} {} ({} bytes)",
        review.paper.width,
        review.paper.height,
        review.paper.mime_type,
        review.paper.bytes.len()
    );

    if !args.save {
        println!("Not saved. Re-run with --save (and any corrections) to record it.");
        return Ok(());
    }

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let quiz =
        NewQuiz::from_extracted(result, date).with_image_url(source.display().to_string());
    let record = session.gradebook.add_quiz(quiz).await?;
    println!(
        "Saved quiz {} for {} (student {})",
        record.id, record.student_name, record.student_id
    );
    Ok(())
}

fn result_table(result: &ExtractedResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![Cell::new("Student"), Cell::new(&result.student_name)]);
    table.add_row(vec![Cell::new("Subject"), Cell::new(&result.subject)]);
    table.add_row(vec![
        Cell::new("Score"),
        Cell::new(format!(
            "{} / {}",
            fmt_marks(result.score),
            fmt_marks(result.total_marks)
        )),
    ]);
    table.add_row(vec![
        Cell::new("Percentage"),
        Cell::new(fmt_percent(percentage(result.score, result.total_marks))),
    ]);
    table
}
