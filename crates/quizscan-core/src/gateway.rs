//! The single point of contact with the extraction/grading service.
//!
//! `ExtractionGateway` owns prompt selection and image ordering; the wrapped
//! [`VisionProvider`] owns the wire format. Errors pass through untouched and
//! nothing is retried here.

use std::sync::Arc;

use tracing::debug;

use crate::error::GatewayError;
use crate::model::PreparedImage;
use crate::prompts::{EXTRACT_PROMPT, GRADE_FROM_KNOWLEDGE_PROMPT, GRADE_WITH_REFERENCE_PROMPT};
use crate::traits::{VisionProvider, VisionRequest, RESULT_CONTRACT};

/// How a student's paper is graded.
#[derive(Debug, Clone)]
pub enum GradingMode {
    /// Compare against this answer-key image.
    WithReference(PreparedImage),
    /// Grade from the service's own subject knowledge.
    WithoutReference,
}

/// Sends pipeline requests through a [`VisionProvider`].
#[derive(Clone)]
pub struct ExtractionGateway {
    provider: Arc<dyn VisionProvider>,
}

impl ExtractionGateway {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Read name, score, total and subject off an already-marked paper.
    pub async fn extract_score(&self, paper: &PreparedImage) -> Result<String, GatewayError> {
        let request = VisionRequest {
            instructions: EXTRACT_PROMPT.to_string(),
            images: vec![paper.clone()],
            output: RESULT_CONTRACT,
        };
        self.send(request).await
    }

    /// Grade a student's paper, against a key or from subject knowledge.
    pub async fn grade_paper(
        &self,
        mode: &GradingMode,
        student: &PreparedImage,
    ) -> Result<String, GatewayError> {
        let request = match mode {
            GradingMode::WithReference(reference) => VisionRequest {
                instructions: GRADE_WITH_REFERENCE_PROMPT.to_string(),
                images: vec![reference.clone(), student.clone()],
                output: RESULT_CONTRACT,
            },
            GradingMode::WithoutReference => VisionRequest {
                instructions: GRADE_FROM_KNOWLEDGE_PROMPT.to_string(),
                images: vec![student.clone()],
                output: RESULT_CONTRACT,
            },
        };
        self.send(request).await
    }

    async fn send(&self, request: VisionRequest) -> Result<String, GatewayError> {
        debug!(
            provider = self.provider.name(),
            images = request.images.len(),
            "sending vision request"
        );
        let text = self.provider.complete(&request).await?;
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}
