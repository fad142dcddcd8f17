use crate::error::{DataTaleError, QueryFailure};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_SECS: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-completion call. Built fresh per call site and never mutated
/// after construction; retries resend the same serialized bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }
}

/// Bounded retry with a constant backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Duration::from_secs(DEFAULT_BACKOFF_SECS),
        }
    }
}

impl RetryPolicy {
    /// Drives `op` until it succeeds, fails terminally, or all attempts
    /// are exhausted. The backoff sleep happens only between attempts.
    pub(crate) async fn run<F, Fut>(&self, mut op: F) -> Result<String, DataTaleError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<String, QueryFailure>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut last_failure: Option<QueryFailure> = None;

        for attempt in 1..=max_attempts {
            match op(attempt).await {
                Ok(text) => return Ok(text),
                Err(failure) if !failure.is_retryable() => {
                    error!(attempt, cause = %failure, "LLM response was unusable");
                    return Err(DataTaleError::InvalidResponse(failure.to_string()));
                }
                Err(failure) => {
                    if attempt < max_attempts {
                        warn!(
                            attempt,
                            max_attempts,
                            cause = %failure,
                            "LLM request failed, retrying"
                        );
                        tokio::time::sleep(self.backoff).await;
                    }
                    last_failure = Some(failure);
                }
            }
        }

        let cause = last_failure
            .unwrap_or_else(|| QueryFailure::Transport("no attempts were made".to_string()));
        error!(attempts = max_attempts, cause = %cause, "LLM request failed after all attempts");
        Err(DataTaleError::AnalysisUnavailable {
            attempts: max_attempts,
            cause,
        })
    }
}

/// Everything the client needs, injected at construction so tests can point
/// it at a local mock server.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_token: String,
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl LlmConfig {
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            model: model.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the request and returns the assistant's text verbatim.
    async fn query(&self, request: &ChatRequest) -> Result<String, DataTaleError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

/// Stateless chat-completion client over HTTP. Holds only the injected
/// configuration and a connection pool; no state survives between calls.
pub struct HttpChatClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl HttpChatClient {
    pub fn new(config: LlmConfig) -> Result<Self, DataTaleError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// One attempt: POST the pre-serialized body and extract the completion
    /// text. All failure modes collapse into the [`QueryFailure`] taxonomy.
    async fn dispatch(&self, body: &[u8]) -> Result<String, QueryFailure> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryFailure::BadStatus(status.as_u16()));
        }

        let payload = response
            .bytes()
            .await
            .map_err(classify_transport_error)?;

        let completion: ChatCompletion = serde_json::from_slice(&payload)
            .map_err(|e| QueryFailure::MalformedBody(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| QueryFailure::MalformedBody("no completion choices".to_string()))
    }
}

fn classify_transport_error(error: reqwest::Error) -> QueryFailure {
    if error.is_timeout() {
        QueryFailure::Timeout
    } else {
        QueryFailure::Transport(error.to_string())
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn query(&self, request: &ChatRequest) -> Result<String, DataTaleError> {
        if request.messages.is_empty() {
            return Err(DataTaleError::InvalidArguments(
                "chat request must carry at least one message".to_string(),
            ));
        }

        // Serialized once; every retry resends identical bytes.
        let body = serde_json::to_vec(request)?;
        let policy = self.config.retry;
        policy.run(|_attempt| self.dispatch(&body)).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
