//! Mock provider for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizscan_core::error::GatewayError;
use quizscan_core::traits::{VisionProvider, VisionRequest};

/// A vision provider that replays scripted replies without network calls.
///
/// Queued replies are returned in order. Once the queue is empty every call
/// gets the fallback reply, if one was set, or [`GatewayError::EmptyResponse`].
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Result<String, GatewayError>>>,
    fallback: Option<String>,
    call_count: AtomicU32,
    requests: Mutex<Vec<VisionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: None,
            call_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn with_fixed_reply(reply: &str) -> Self {
        Self {
            fallback: Some(reply.to_string()),
            ..Self::new()
        }
    }

    /// Queue a successful reply.
    pub fn then_reply(self, reply: &str) -> Self {
        self.push(Ok(reply.to_string()));
        self
    }

    /// Queue a failure.
    pub fn then_fail(self, error: GatewayError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<VisionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn push(&self, reply: Result<String, GatewayError>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(reply);
        }
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &VisionRequest) -> Result<String, GatewayError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        let next = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(reply) => reply,
            None => self.fallback.clone().ok_or(GatewayError::EmptyResponse),
        }
    }
}
