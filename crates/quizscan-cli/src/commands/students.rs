//! The `quizscan students` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{fmt_percent, open_session, GlobalOpts};

pub async fn execute(opts: &GlobalOpts) -> Result<()> {
    let session = open_session(opts).await?;
    let summaries = session.gradebook.student_summaries().await?;

    if summaries.is_empty() {
        println!("No students yet. Record a quiz with `quizscan scan --save` or `quizscan add`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "ID", "Quizzes", "Average", "Last quiz"]);
    for summary in &summaries {
        table.add_row(vec![
            Cell::new(&summary.student.name),
            Cell::new(&summary.student.id),
            Cell::new(summary.quiz_count),
            Cell::new(fmt_percent(summary.average_score)),
            Cell::new(
                summary
                    .last_quiz_date
                    .map_or_else(|| "-".to_string(), |d| d.to_string()),
            ),
        ]);
    }
    println!("{table}");
    println!("{} student(s)", summaries.len());
    Ok(())
}
