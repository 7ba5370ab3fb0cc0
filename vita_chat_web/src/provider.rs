use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use std::{fmt, time::Duration};

use crate::credentials::{self, ProviderAuth};

// Persona for the fixed system turn; VITA_SYSTEM_PROMPT overrides it for
// deployments targeting another language.
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a virtual assistant answering everyday-life questions.";

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Completion capability the relay depends on: one user turn under a fixed
/// system prompt, first completion text back. Object-safe so the relay
/// handler can be exercised against a stub.
#[async_trait]
pub trait ChatCompletion {
    async fn complete(&self, message: &str) -> Result<String, CompletionError>;
}

/// Why a completion attempt produced no reply text.
#[derive(Debug)]
pub enum CompletionError {
    /// The request never reached the provider, or transport failed
    /// mid-exchange (includes decode failures of the response body).
    Request(reqwest::Error),
    /// The provider answered with a non-success status.
    Provider { status: u16, detail: String },
    /// The provider answered successfully but the payload held no usable
    /// completion.
    MalformedCompletion(&'static str),
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Request(err) => {
                write!(f, "error exchanging with the completion provider: {err}")
            }
            CompletionError::Provider { status, detail } => {
                write!(f, "completion provider answered with status {status}: {detail}")
            }
            CompletionError::MalformedCompletion(reason) => {
                write!(f, "unusable completion payload: {reason}")
            }
        }
    }
}

impl std::error::Error for CompletionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompletionError::Request(err) => Some(err),
            _ => None,
        }
    }
}

/// Process-wide, read-only handle to the hosted chat-completion API.
/// Built once at startup and shared across request handlers.
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    system_prompt: String,
    auth: ProviderAuth,
}

impl ProviderClient {
    /// Builds the provider handle from the environment. A missing endpoint
    /// or model, or a failed credential lookup, fails startup here rather
    /// than surfacing per-request.
    pub async fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var(crate::env::PROVIDER_URL)
            .with_context(|| format!("missing provider endpoint ({})", crate::env::PROVIDER_URL))?;
        let model = std::env::var(crate::env::CHAT_MODEL)
            .with_context(|| format!("missing chat model identifier ({})", crate::env::CHAT_MODEL))?;
        let system_prompt = std::env::var(crate::env::SYSTEM_PROMPT)
            .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string());
        let auth = credentials::resolve().await?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build provider http client")?;

        tracing::info!("chat model = {model}, endpoint = {base_url}");

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            system_prompt,
            auth,
        })
    }
}

#[async_trait]
impl ChatCompletion for ProviderClient {
    async fn complete(&self, message: &str) -> Result<String, CompletionError> {
        // Stateless from the model's perspective: the fixed persona plus the
        // latest user message, never any prior turns.
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": self.system_prompt },
                { "role": "user", "content": message },
            ],
        });

        let mut request = self
            .http
            .post(format!("{}{CHAT_COMPLETIONS_PATH}", self.base_url))
            .json(&body);
        if let ProviderAuth::Bearer(key) = &self.auth {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(CompletionError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                detail,
            });
        }

        let completion = response
            .json::<ChatCompletionPayload>()
            .await
            .map_err(CompletionError::Request)?;

        first_choice_text(completion)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionPayload {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

fn first_choice_text(completion: ChatCompletionPayload) -> Result<String, CompletionError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(CompletionError::MalformedCompletion(
            "completion carried no reply text",
        ))
}
