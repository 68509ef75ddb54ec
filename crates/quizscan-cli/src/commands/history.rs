//! The `quizscan history` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use super::{fmt_marks, fmt_percent, open_session, GlobalOpts};

pub async fn execute(opts: &GlobalOpts, student: String) -> Result<()> {
    let session = open_session(opts).await?;
    let found = session
        .gradebook
        .find_student(&student)
        .await?
        .with_context(|| format!("no student matches '{student}'"))?;
    let history = session.gradebook.history(&found.id).await?;

    println!("{} ({})", found.name, found.id);
    if history.is_empty() {
        println!("No quizzes recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Subject", "Score", "Percentage"]);
    for record in &history {
        table.add_row(vec![
            Cell::new(record.date),
            Cell::new(&record.subject),
            Cell::new(format!(
                "{}/{}",
                fmt_marks(record.score),
                fmt_marks(record.total_marks)
            )),
            Cell::new(fmt_percent(record.percentage())),
        ]);
    }
    println!("{table}");
    Ok(())
}
