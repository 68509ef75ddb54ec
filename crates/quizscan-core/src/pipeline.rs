//! The capture → preprocess → gateway → parse flow.
//!
//! A [`ScanPipeline`] never persists anything. Its output is a result for the
//! user to review; saving goes through [`crate::gradebook::Gradebook`].

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{PipelineError, PreprocessError};
use crate::fallback::{fallback_result, placeholder};
use crate::gateway::{ExtractionGateway, GradingMode};
use crate::model::{ExtractedResult, PreparedImage};
use crate::parser::parse_response;
use crate::traits::ImagePreprocessor;

/// A successful pipeline run: the image that was sent, and what came back.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The student's paper after preprocessing.
    pub paper: PreparedImage,
    pub result: ExtractedResult,
}

/// A result ready for review, possibly a placeholder.
#[derive(Debug)]
pub struct Review {
    pub paper: PreparedImage,
    pub result: ExtractedResult,
    /// Set when `result` is the fallback placeholder.
    pub failure: Option<PipelineError>,
}

impl Review {
    pub fn is_placeholder(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Clone)]
pub struct ScanPipeline {
    preprocessor: Arc<dyn ImagePreprocessor>,
    gateway: ExtractionGateway,
}

impl ScanPipeline {
    pub fn new(preprocessor: Arc<dyn ImagePreprocessor>, gateway: ExtractionGateway) -> Self {
        Self {
            preprocessor,
            gateway,
        }
    }

    pub fn gateway(&self) -> &ExtractionGateway {
        &self.gateway
    }

    /// Read the marks off an already-graded paper.
    pub async fn scan(&self, raw: Vec<u8>) -> Result<ScanOutcome, PipelineError> {
        let paper = self.prepare(raw).await?;
        let result = self.extract(&paper).await?;
        Ok(ScanOutcome { paper, result })
    }

    /// Grade a student's paper, against a reference key when one is given.
    ///
    /// Both images are preprocessed concurrently.
    pub async fn grade(
        &self,
        reference: Option<Vec<u8>>,
        student: Vec<u8>,
    ) -> Result<ScanOutcome, PipelineError> {
        let (mode, paper) = self.prepare_grading(reference, student).await?;
        let result = self.grade_prepared(&mode, &paper).await?;
        Ok(ScanOutcome { paper, result })
    }

    /// [`Self::scan`], substituting the placeholder on gateway or parse
    /// failure. Preprocessing failures are still returned as errors.
    pub async fn scan_for_review(&self, raw: Vec<u8>) -> Result<Review, PipelineError> {
        let paper = self.prepare(raw).await?;
        let outcome = self.extract(&paper).await;
        Ok(into_review(paper, outcome))
    }

    /// [`Self::grade`], with the same fallback as [`Self::scan_for_review`].
    pub async fn grade_for_review(
        &self,
        reference: Option<Vec<u8>>,
        student: Vec<u8>,
    ) -> Result<Review, PipelineError> {
        let (mode, paper) = self.prepare_grading(reference, student).await?;
        let outcome = self.grade_prepared(&mode, &paper).await;
        Ok(into_review(paper, outcome))
    }

    async fn prepare(&self, raw: Vec<u8>) -> Result<PreparedImage, PreprocessError> {
        let preprocessor = Arc::clone(&self.preprocessor);
        let input_len = raw.len();
        let started = Instant::now();
        let image = tokio::task::spawn_blocking(move || preprocessor.preprocess(&raw))
            .await
            .map_err(|e| PreprocessError::Encode(format!("preprocessing task failed: {e}")))??;
        debug!(
            input_bytes = input_len,
            output_bytes = image.bytes.len(),
            width = image.width,
            height = image.height,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "preprocessed image"
        );
        Ok(image)
    }

    async fn prepare_grading(
        &self,
        reference: Option<Vec<u8>>,
        student: Vec<u8>,
    ) -> Result<(GradingMode, PreparedImage), PreprocessError> {
        match reference {
            Some(reference) => {
                let (reference, paper) =
                    futures::try_join!(self.prepare(reference), self.prepare(student))?;
                Ok((GradingMode::WithReference(reference), paper))
            }
            None => Ok((GradingMode::WithoutReference, self.prepare(student).await?)),
        }
    }

    async fn extract(&self, paper: &PreparedImage) -> Result<ExtractedResult, PipelineError> {
        let raw = self.gateway.extract_score(paper).await?;
        let result = parse_response(&raw)?;
        info!(provider = self.gateway.provider_name(), "extracted result");
        Ok(result)
    }

    async fn grade_prepared(
        &self,
        mode: &GradingMode,
        paper: &PreparedImage,
    ) -> Result<ExtractedResult, PipelineError> {
        let raw = self.gateway.grade_paper(mode, paper).await?;
        let result = parse_response(&raw)?;
        info!(
            provider = self.gateway.provider_name(),
            with_reference = matches!(mode, GradingMode::WithReference(_)),
            "graded paper"
        );
        Ok(result)
    }
}

fn into_review(
    paper: PreparedImage,
    outcome: Result<ExtractedResult, PipelineError>,
) -> Review {
    match outcome {
        Ok(result) => Review {
            paper,
            result,
            failure: None,
        },
        Err(error) => Review {
            paper,
            // Preprocessing has already passed, so a fallback always exists.
            result: fallback_result(&error).unwrap_or_else(placeholder),
            failure: Some(error),
        },
    }
}
