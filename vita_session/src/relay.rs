use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::wire::{ChatRequest, ChatResponse};

// Bounds how long a single exchange may stay unresolved; a stuck relay
// resolves to the composer's fallback reply instead of pending forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport seam between the composer and the chat relay endpoint.
#[async_trait]
pub trait RelayTransport {
    /// Sends one user message and resolves to the relay's reply payload.
    async fn send_message(&self, message: &str) -> anyhow::Result<ChatResponse>;
}

/// HTTP client for the relay's `/api/chat` endpoint.
pub struct RelayClient {
    base_url: String,
    http: reqwest::Client,
}

impl RelayClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build relay http client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl RelayTransport for RelayClient {
    async fn send_message(&self, message: &str) -> anyhow::Result<ChatResponse> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .context("error sending message to relay")?
            .error_for_status()
            .context("relay rejected the message")?;

        response
            .json::<ChatResponse>()
            .await
            .context("error decoding relay reply")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = RelayClient::new("http://localhost:3000/").unwrap();
        assert_eq!("http://localhost:3000", client.base_url);
    }
}
