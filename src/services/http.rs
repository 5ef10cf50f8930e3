//! HTTP chat service implementation
//!
//! Talks to a server-side endpoint that proxies the generative model. The
//! endpoint accepts a JSON `{query, history}` body and answers with
//! `{message}`. A 429 status is surfaced as a distinct rate-limit error so
//! the panel can show actionable guidance instead of a generic failure.

use crate::config::HttpServiceConfig;
use crate::error::{LedgermindError, Result};
use crate::services::{ChatRequest, ChatService};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// HTTP chat completion service
///
/// # Examples
///
/// ```no_run
/// use ledgermind::config::HttpServiceConfig;
/// use ledgermind::services::{ChatRequest, ChatService, HttpChatService};
///
/// # async fn example() -> ledgermind::error::Result<()> {
/// let config = HttpServiceConfig {
///     endpoint: "http://localhost:8000/api/chat".to_string(),
///     timeout_seconds: 60,
/// };
/// let service = HttpChatService::new(config)?;
/// let reply = service.send(&ChatRequest::bare("How many open leads?")).await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpChatService {
    client: Client,
    config: HttpServiceConfig,
}

/// Successful response body from the chat endpoint
#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    message: String,
}

impl HttpChatService {
    /// Create a new HTTP chat service
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: HttpServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ledgermind/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                LedgermindError::Service(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!("Initialized HTTP chat service: endpoint={}", config.endpoint);

        Ok(Self { client, config })
    }

    /// The configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send(&self, request: &ChatRequest) -> Result<String> {
        tracing::debug!(
            "Sending chat request: query_len={}, history_len={}",
            request.query.len(),
            request.history.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Chat request failed to send: {}", e);
                LedgermindError::Service(format!("Failed to reach chat service: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Chat service rate limited: {}", body);
            return Err(LedgermindError::RateLimited(if body.is_empty() {
                "too many requests".to_string()
            } else {
                body
            })
            .into());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Chat service returned {}: {}", status, body);
            return Err(
                LedgermindError::Service(format!("Chat service returned {}: {}", status, body))
                    .into(),
            );
        }

        let reply: ChatReply = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse chat service response: {}", e);
            LedgermindError::Service(format!("Failed to parse chat service response: {}", e))
        })?;

        tracing::debug!("Received chat reply: {} bytes", reply.message.len());
        Ok(reply.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_service() {
        let service = HttpChatService::new(HttpServiceConfig::default());
        assert!(service.is_ok());
        assert_eq!(
            service.unwrap().endpoint(),
            HttpServiceConfig::default().endpoint
        );
    }

    #[test]
    fn test_reply_body_message_defaults_to_empty() {
        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(reply.message.is_empty());
    }
}
