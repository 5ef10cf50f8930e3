//! Collaborator seams for the assistant panel
//!
//! This module defines the chat completion service abstraction, its HTTP
//! implementation, and the speech capture seam.

pub mod http;
pub mod speech;

pub use http::HttpChatService;
pub use speech::{SpeechCapture, UnsupportedSpeech};

use crate::config::ServiceConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// One outbound chat request
///
/// `history` is the serialized transcript replayed for conversational
/// grounding; it is omitted from the wire when empty (the record-summary
/// path sends query-only requests).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's query text
    pub query: String,
    /// Serialized transcript context, empty for one-shot calls
    #[serde(skip_serializing_if = "String::is_empty")]
    pub history: String,
}

impl ChatRequest {
    /// Build a request carrying transcript context
    pub fn new(query: impl Into<String>, history: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            history: history.into(),
        }
    }

    /// Build a one-shot request with no context
    pub fn bare(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            history: String::new(),
        }
    }
}

/// Chat completion service seam
///
/// The panel never talks to the model directly; it sends requests through
/// this trait so tests can substitute a fake and hosts can plug in their own
/// transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one chat request and return the raw reply text
    ///
    /// # Errors
    ///
    /// Returns [`crate::LedgermindError::RateLimited`] when the service
    /// reports a rate-limit condition, and
    /// [`crate::LedgermindError::Service`] for other transport failures.
    async fn send(&self, request: &ChatRequest) -> Result<String>;
}

/// Create a chat service instance based on configuration
///
/// # Errors
///
/// Returns error if the service type is unknown or initialization fails.
pub fn create_service(config: &ServiceConfig) -> Result<Box<dyn ChatService>> {
    match config.service_type.as_str() {
        "http" => Ok(Box::new(HttpChatService::new(config.http.clone())?)),
        other => Err(crate::error::LedgermindError::Config(format!(
            "Unknown service type: {}",
            other
        ))
        .into()),
    }
}
