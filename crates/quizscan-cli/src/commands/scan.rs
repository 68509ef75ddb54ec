//! The `quizscan scan` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::review::{finish, ReviewArgs};
use super::{build_pipeline, open_session, GlobalOpts};

pub async fn execute(
    opts: &GlobalOpts,
    image: PathBuf,
    provider: Option<String>,
    review_args: ReviewArgs,
) -> Result<()> {
    let raw = tokio::fs::read(&image)
        .await
        .with_context(|| format!("failed to read image: {}", image.display()))?;
    let session = open_session(opts).await?;
    let pipeline = build_pipeline(&session.config, provider.as_deref())?;
    eprintln!(
        "Reading {} with {}...",
        image.display(),
        pipeline.gateway().provider_name()
    );

    let review = pipeline
        .scan_for_review(raw)
        .await
        .context("recapture the paper and try again")?;
    finish(&session, review, &review_args, &image).await
}
