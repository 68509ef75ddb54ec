//! The `quizscan stats` command.

use anyhow::Result;

use super::{fmt_marks, open_session, GlobalOpts};

pub async fn execute(opts: &GlobalOpts, json: bool) -> Result<()> {
    let session = open_session(opts).await?;
    let stats = session.gradebook.stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Total quizzes: {}", stats.total_quizzes);
    println!("Average score: {:.1}%", stats.average_score);
    match &stats.highest_scorer {
        Some(top) => println!(
            "Top scorer:    {} with {}/{} ({:.1}%) in {}",
            top.name,
            fmt_marks(top.score),
            fmt_marks(top.total_marks),
            top.percentage,
            top.subject
        ),
        None => println!("Top scorer:    -"),
    }
    Ok(())
}
