use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

/// Failures of the external text-generation service. All of them make
/// the requesting operation fail as a whole; nothing is persisted and
/// nothing is retried.
#[derive(Debug, Clone, Error)]
pub enum TextGenError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type ArcTextGenerator = Arc<Box<dyn TextGenerator + Send + Sync + 'static>>;

/// Prompt-in, text-out port to the generative-text backend.
#[async_trait::async_trait]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenError>;

    /// Structured-output mode: the backend is asked for JSON and the
    /// parsed value is returned.
    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, TextGenError>;
}

/// Deterministic stand-in for tests: records every prompt and replays a
/// canned response, or fails on demand.
#[derive(Clone)]
pub struct MockTextGenerator {
    prompts: Arc<Mutex<Vec<String>>>,
    response: Arc<String>,
    json_response: Arc<serde_json::Value>,
    fail: Arc<AtomicBool>,
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::with_response("Generated narrative.")
    }
}

impl MockTextGenerator {
    pub fn with_response(response: &str) -> Self {
        Self {
            prompts: Arc::new(Mutex::new(Vec::new())),
            response: Arc::new(response.to_string()),
            json_response: Arc::new(serde_json::json!({})),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_json_response(value: serde_json::Value) -> Self {
        Self {
            json_response: Arc::new(value),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let mock = Self::default();
        mock.fail.store(true, Ordering::SeqCst);
        mock
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TextGenError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(TextGenError::Request("mock failure".to_string()));
        }
        Ok(self.response.as_ref().clone())
    }

    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, TextGenError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(TextGenError::Request("mock failure".to_string()));
        }
        Ok(self.json_response.as_ref().clone())
    }
}
