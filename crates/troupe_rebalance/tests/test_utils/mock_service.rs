//! Scripted generation service.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use troupe_core::{GenerateRequest, GenerateResponse, Output};
use troupe_error::{GenerationError, GenerationErrorKind, TroupeResult};
use troupe_interface::GenerationService;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text
    Text(String),
    /// Fail with a transport error
    Error,
    /// Never answer
    Hang,
}

/// A service that replays queued responses, then repeats a fallback response.
#[derive(Debug)]
pub struct MockService {
    queue: Mutex<VecDeque<MockResponse>>,
    then: MockResponse,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockService {
    /// Replay `responses` in order, then fail.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            queue: Mutex::new(responses.into()),
            then: MockResponse::Error,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always return `text`.
    pub fn new_success(text: &str) -> Self {
        Self {
            then: MockResponse::Text(text.to_string()),
            ..Self::new_sequence(Vec::new())
        }
    }

    /// Always fail.
    pub fn new_error() -> Self {
        Self::new_sequence(Vec::new())
    }

    /// Never answer.
    pub fn new_hang() -> Self {
        Self {
            then: MockResponse::Hang,
            ..Self::new_sequence(Vec::new())
        }
    }

    /// Number of generate calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().expect("requests lock").last().cloned()
    }

    /// User message of the most recent request.
    pub fn last_prompt(&self) -> Option<String> {
        let requests = self.requests.lock().expect("requests lock");
        requests
            .last()
            .and_then(|r| r.messages().last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl GenerationService for MockService {
    async fn generate(&self, req: &GenerateRequest) -> TroupeResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock").push(req.clone());

        let next = self
            .queue
            .lock()
            .expect("queue lock")
            .pop_front()
            .unwrap_or_else(|| self.then.clone());

        match next {
            MockResponse::Text(text) => Ok(GenerateResponse::new(vec![Output::Text(text)])),
            MockResponse::Error => Err(GenerationError::new(GenerationErrorKind::Transport(
                "mock failure".to_string(),
            ))
            .into()),
            MockResponse::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending never resolves")
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
