//! Error types for ledgermind
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for ledgermind operations
///
/// Covers configuration loading, chat-service transport, structured-block
/// parsing, chart generation, speech capture, and the panel's own state
/// guards. Every failure is local to the operation that raised it; nothing
/// here is fatal to a panel session.
#[derive(Error, Debug)]
pub enum LedgermindError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat service transport errors (network, non-success status, bad body)
    #[error("Chat service error: {0}")]
    Service(String),

    /// The chat service reported a rate-limit condition (HTTP 429)
    #[error("Rate limited by chat service: {0}")]
    RateLimited(String),

    /// A tagged chart-data region failed JSON extraction or parsing
    #[error("Malformed chart data block: {0}")]
    MalformedBlock(String),

    /// The chart backend failed to render one chart kind
    #[error("Chart rendering failed: {0}")]
    ChartRender(String),

    /// Speech capture is unavailable on this platform
    #[error("Speech capture unavailable: {0}")]
    SpeechUnavailable(String),

    /// A submit was rejected because another request is still pending
    #[error("A chat request is already in flight")]
    RequestInFlight,

    /// A chart selector was mutated after generation locked it
    #[error("Chart selector is locked after generation")]
    SelectorLocked,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for ledgermind operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = LedgermindError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_service_error_display() {
        let error = LedgermindError::Service("connection refused".to_string());
        assert_eq!(error.to_string(), "Chat service error: connection refused");
    }

    #[test]
    fn test_rate_limited_display_is_distinct() {
        let rate = LedgermindError::RateLimited("wait 30 seconds".to_string());
        let generic = LedgermindError::Service("wait 30 seconds".to_string());
        assert_ne!(rate.to_string(), generic.to_string());
        assert!(rate.to_string().contains("Rate limited"));
    }

    #[test]
    fn test_malformed_block_display() {
        let error = LedgermindError::MalformedBlock("no JSON object".to_string());
        assert_eq!(
            error.to_string(),
            "Malformed chart data block: no JSON object"
        );
    }

    #[test]
    fn test_chart_render_display() {
        let error = LedgermindError::ChartRender("missing datasets".to_string());
        assert_eq!(
            error.to_string(),
            "Chart rendering failed: missing datasets"
        );
    }

    #[test]
    fn test_speech_unavailable_display() {
        let error = LedgermindError::SpeechUnavailable("no capture backend".to_string());
        assert!(error.to_string().contains("Speech capture unavailable"));
    }

    #[test]
    fn test_request_in_flight_display() {
        let error = LedgermindError::RequestInFlight;
        assert_eq!(error.to_string(), "A chat request is already in flight");
    }

    #[test]
    fn test_selector_locked_display() {
        let error = LedgermindError::SelectorLocked;
        assert_eq!(
            error.to_string(),
            "Chart selector is locked after generation"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: LedgermindError = io_error.into();
        assert!(matches!(error, LedgermindError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let error: LedgermindError = json_error.into();
        assert!(matches!(error, LedgermindError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: LedgermindError = yaml_error.into();
        assert!(matches!(error, LedgermindError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LedgermindError>();
    }
}
