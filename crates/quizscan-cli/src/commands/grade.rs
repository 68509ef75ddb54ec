//! The `quizscan grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::review::{finish, ReviewArgs};
use super::{build_pipeline, open_session, GlobalOpts};

pub async fn execute(
    opts: &GlobalOpts,
    student: PathBuf,
    reference: Option<PathBuf>,
    provider: Option<String>,
    review_args: ReviewArgs,
) -> Result<()> {
    let student_raw = tokio::fs::read(&student)
        .await
        .with_context(|| format!("failed to read image: {}", student.display()))?;
    let reference_raw = match &reference {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read image: {}", path.display()))?,
        ),
        None => None,
    };

    let session = open_session(opts).await?;
    let pipeline = build_pipeline(&session.config, provider.as_deref())?;
    match &reference {
        Some(key) => eprintln!(
            "Grading {} against {} with {}...",
            student.display(),
            key.display(),
            pipeline.gateway().provider_name()
        ),
        None => eprintln!(
            "Grading {} from subject knowledge with {}...",
            student.display(),
            pipeline.gateway().provider_name()
        ),
    }

    let review = pipeline
        .grade_for_review(reference_raw, student_raw)
        .await
        .context("recapture the paper and try again")?;
    finish(&session, review, &review_args, &student).await
}
