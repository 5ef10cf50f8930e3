//! Speech capture seam
//!
//! Speech recognition is an optional platform capability. A capture session
//! is one-shot: it delivers the first transcribed result and is not reused.
//! Hosts without a recognition backend plug in [`UnsupportedSpeech`], which
//! reports unavailability so the panel can surface a one-time notice.

use crate::error::{LedgermindError, Result};
use async_trait::async_trait;

/// Speech recognition collaborator
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Whether the platform offers speech recognition at all
    fn is_available(&self) -> bool;

    /// Run one capture session and return the first transcribed result
    ///
    /// # Errors
    ///
    /// Returns error if recognition is unavailable or the session fails
    /// before producing a result.
    async fn capture_once(&self) -> Result<String>;

    /// Recognition language tag
    fn lang(&self) -> &str {
        "en"
    }
}

/// Stand-in for hosts without a speech recognition backend
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSpeech;

#[async_trait]
impl SpeechCapture for UnsupportedSpeech {
    fn is_available(&self) -> bool {
        false
    }

    async fn capture_once(&self) -> Result<String> {
        Err(LedgermindError::SpeechUnavailable(
            "speech recognition is not supported on this platform".to_string(),
        )
        .into())
    }
}
