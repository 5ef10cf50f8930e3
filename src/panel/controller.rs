//! Conversation controller
//!
//! Owns the visible message list and the pending-request lifecycle: a
//! submitted query is appended optimistically, a typing placeholder marks
//! the in-flight request, and the placeholder is replaced by the rendered
//! assistant reply or by a failure notice. Established exchanges are
//! recorded in the bounded transcript and replayed as context with each
//! request; failed or empty exchanges are not.
//!
//! The controller enforces single-flight: a second submit while one is
//! pending is rejected instead of being allowed to complete out of order.

use crate::config::PanelConfig;
use crate::error::{LedgermindError, Result};
use crate::panel::renderer::{RenderedReply, ReplyRenderer};
use crate::panel::transcript::Transcript;
use crate::services::{ChatRequest, ChatService, SpeechCapture};

/// One entry in the visible message list
#[derive(Debug)]
pub enum PanelEntry {
    /// A message the user submitted
    User(String),
    /// A rendered assistant reply
    Assistant(RenderedReply),
    /// Transient placeholder shown while a request is pending
    Typing,
    /// Assistant-role failure notice (not part of the transcript)
    Notice(String),
}

/// Conversation controller for one panel session
pub struct PanelController {
    service: Box<dyn ChatService>,
    renderer: ReplyRenderer,
    transcript: Transcript,
    entries: Vec<PanelEntry>,
    pending: bool,
}

impl PanelController {
    /// Create a controller and seed the configured greeting
    pub fn new(
        service: Box<dyn ChatService>,
        renderer: ReplyRenderer,
        config: &PanelConfig,
    ) -> Self {
        let mut controller = Self {
            service,
            renderer,
            transcript: Transcript::new(config.transcript.max_entries),
            entries: Vec::new(),
            pending: false,
        };

        if !config.greeting.is_empty() {
            let mut rendered = RenderedReply::new();
            controller.renderer.render(&mut rendered, &config.greeting);
            controller.entries.push(PanelEntry::Assistant(rendered));
        }

        controller
    }

    /// Submit one user query
    ///
    /// Input that is empty after trimming is a silent no-op. Otherwise the
    /// trimmed query is appended to the visible list immediately, a typing
    /// placeholder is inserted, and one request is sent with the serialized
    /// transcript as context.
    ///
    /// On success with a non-empty reply the placeholder is removed, the
    /// reply is rendered and appended, and the exchange is recorded in the
    /// transcript. An empty reply only removes the placeholder. On failure
    /// the placeholder is replaced by an assistant-role notice and the
    /// transcript is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgermindError::RequestInFlight`] if another submit is
    /// still pending. Service failures are absorbed into a visible notice
    /// and do not surface as errors here.
    pub async fn submit(&mut self, text: &str) -> Result<()> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(());
        }
        if self.pending {
            return Err(LedgermindError::RequestInFlight.into());
        }

        let history = self.transcript.serialize()?;
        let query = query.to_string();

        self.entries.push(PanelEntry::User(query.clone()));
        self.entries.push(PanelEntry::Typing);
        self.pending = true;

        tracing::debug!("Submitting query: {} chars", query.len());
        let result = {
            // The guard clears the flag and the placeholder on every exit
            // path, including a submit future dropped at the await.
            let _guard = FlightGuard {
                pending: &mut self.pending,
                entries: &mut self.entries,
            };
            self.service
                .send(&ChatRequest::new(query.clone(), history))
                .await
        };

        match result {
            Ok(reply) if !reply.trim().is_empty() => {
                self.transcript.push_exchange(&query, &reply);
                let mut rendered = RenderedReply::new();
                self.renderer.render(&mut rendered, &reply);
                self.entries.push(PanelEntry::Assistant(rendered));
            }
            Ok(_) => {
                tracing::warn!("Chat service returned an empty reply");
            }
            Err(err) => {
                tracing::warn!("Chat request failed: {}", err);
                self.entries.push(PanelEntry::Notice(failure_notice(&err)));
            }
        }

        Ok(())
    }

    /// Capture one spoken query and submit it
    ///
    /// A capture session is one-shot; each call runs a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`LedgermindError::SpeechUnavailable`] when the platform has
    /// no recognition capability, for a one-time user notice. Capture
    /// failures propagate; submit behavior is as in [`Self::submit`].
    pub async fn submit_voice(&mut self, speech: &dyn SpeechCapture) -> Result<()> {
        if !speech.is_available() {
            return Err(LedgermindError::SpeechUnavailable(
                "speech recognition is not supported on this platform".to_string(),
            )
            .into());
        }

        let text = speech.capture_once().await?;
        tracing::debug!("Captured voice input: {} chars", text.len());
        self.submit(&text).await
    }

    /// The visible message list, oldest first
    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    /// Mutable access to the visible list, for interactive selector updates
    pub fn entries_mut(&mut self) -> &mut [PanelEntry] {
        &mut self.entries
    }

    /// The bounded transcript replayed as request context
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Whether a request is currently pending
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clear the visible list, the transcript, and any stale pending state
    pub fn clear(&mut self) {
        self.entries.clear();
        self.transcript.clear();
        self.pending = false;
    }
}

/// In-flight marker that unwinds itself when a submit ends or is dropped
struct FlightGuard<'a> {
    pending: &'a mut bool,
    entries: &'a mut Vec<PanelEntry>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *self.pending = false;
        self.entries
            .retain(|entry| !matches!(entry, PanelEntry::Typing));
    }
}

/// Build the assistant-role notice for a failed request
///
/// Rate-limit failures carry wait guidance and are textually distinct from
/// generic transport failures.
fn failure_notice(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LedgermindError>() {
        Some(LedgermindError::RateLimited(detail)) => format!(
            "The assistant is rate limited right now ({}). Please wait a moment and try again.",
            detail
        ),
        _ => format!("The assistant request failed: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::panel::renderer::ReplyNode;
    use crate::services::MockChatService;
    use mockall::predicate;

    fn controller_with(service: MockChatService) -> PanelController {
        let config = PanelConfig {
            greeting: String::new(),
            ..PanelConfig::default()
        };
        PanelController::new(Box::new(service), ReplyRenderer::default(), &config)
    }

    fn assistant_text(entry: &PanelEntry) -> String {
        match entry {
            PanelEntry::Assistant(rendered) => rendered
                .nodes()
                .iter()
                .filter_map(|n| match n {
                    ReplyNode::Narrative(t) => Some(t.clone()),
                    _ => None,
                })
                .collect(),
            other => panic!("Expected assistant entry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_silent_noop() {
        let mut service = MockChatService::new();
        service.expect_send().times(0);
        let mut controller = controller_with(service);

        controller.submit("   \n\t ").await.unwrap();
        assert!(controller.entries().is_empty());
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let mut service = MockChatService::new();
        service
            .expect_send()
            .with(predicate::function(|r: &ChatRequest| {
                r.query == "how are sales?" && r.history == "[]"
            }))
            .times(1)
            .returning(|_| Ok("Sales look healthy.".to_string()));
        let mut controller = controller_with(service);

        controller.submit("  how are sales?  ").await.unwrap();

        let entries = controller.entries();
        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[0], PanelEntry::User(t) if t == "how are sales?"));
        assert_eq!(assistant_text(&entries[1]), "Sales look healthy.");
        // Typing placeholder is gone
        assert!(!entries.iter().any(|e| matches!(e, PanelEntry::Typing)));

        assert_eq!(controller.transcript().len(), 2);
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_history_reflects_prior_exchanges() {
        let mut service = MockChatService::new();
        service
            .expect_send()
            .withf(|r: &ChatRequest| r.query == "first" && r.history == "[]")
            .times(1)
            .returning(|_| Ok("one".to_string()));
        service
            .expect_send()
            .withf(|r: &ChatRequest| r.query == "second" && r.history.contains("\"first\""))
            .times(1)
            .returning(|_| Ok("two".to_string()));
        let mut controller = controller_with(service);

        controller.submit("first").await.unwrap();
        controller.submit("second").await.unwrap();
        assert_eq!(controller.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_failure_produces_notice_and_skips_transcript() {
        let mut service = MockChatService::new();
        service
            .expect_send()
            .times(1)
            .returning(|_| Err(LedgermindError::Service("boom".to_string()).into()));
        let mut controller = controller_with(service);

        controller.submit("hello").await.unwrap();

        let entries = controller.entries();
        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[0], PanelEntry::User(_)));
        assert!(matches!(&entries[1], PanelEntry::Notice(_)));
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_notice_is_distinguishable() {
        let mut service = MockChatService::new();
        service
            .expect_send()
            .times(1)
            .returning(|_| Err(LedgermindError::RateLimited("free tier".to_string()).into()));
        service
            .expect_send()
            .times(1)
            .returning(|_| Err(LedgermindError::Service("free tier".to_string()).into()));
        let mut controller = controller_with(service);

        controller.submit("one").await.unwrap();
        controller.submit("two").await.unwrap();

        let notices: Vec<_> = controller
            .entries()
            .iter()
            .filter_map(|e| match e {
                PanelEntry::Notice(t) => Some(t.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(notices.len(), 2);
        assert_ne!(notices[0], notices[1]);
        assert!(notices[0].contains("rate limited"));
        assert!(notices[0].contains("wait"));
    }

    #[tokio::test]
    async fn test_submit_rejected_while_pending() {
        let mut service = MockChatService::new();
        service.expect_send().times(0);
        let mut controller = controller_with(service);

        controller.pending = true;
        let err = controller.submit("second").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgermindError>(),
            Some(LedgermindError::RequestInFlight)
        ));
        // The rejected submit left no trace in the visible list
        assert!(controller.entries().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_submit_recovers() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        /// Stalls forever on the first call, answers on the second
        struct StallThenAnswer {
            calls: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl ChatService for StallThenAnswer {
            async fn send(&self, _request: &ChatRequest) -> Result<String> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    std::future::pending().await
                } else {
                    Ok("recovered".to_string())
                }
            }
        }

        let config = PanelConfig {
            greeting: String::new(),
            ..PanelConfig::default()
        };
        let service = StallThenAnswer {
            calls: AtomicUsize::new(0),
        };
        let mut controller =
            PanelController::new(Box::new(service), ReplyRenderer::default(), &config);

        // Drop the submit future at its await point, as a timeout would
        let mut first = tokio_test::task::spawn(controller.submit("first"));
        assert!(first.poll().is_pending());
        drop(first);

        // The in-flight state unwound: no stale flag, no placeholder
        assert!(!controller.is_pending());
        assert!(!controller
            .entries()
            .iter()
            .any(|e| matches!(e, PanelEntry::Typing)));
        assert_eq!(controller.entries().len(), 1);
        assert!(matches!(&controller.entries()[0], PanelEntry::User(t) if t == "first"));

        // A later submit goes through normally
        controller.submit("second").await.unwrap();
        assert_eq!(assistant_text(controller.entries().last().unwrap()), "recovered");
        assert_eq!(controller.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_resets_stale_pending_flag() {
        let mut service = MockChatService::new();
        service
            .expect_send()
            .times(1)
            .returning(|_| Ok("ok".to_string()));
        let mut controller = controller_with(service);

        controller.pending = true;
        controller.clear();
        assert!(!controller.is_pending());
        controller.submit("hello").await.unwrap();
        assert_eq!(controller.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_reply_appends_nothing() {
        let mut service = MockChatService::new();
        service
            .expect_send()
            .times(1)
            .returning(|_| Ok("   ".to_string()));
        let mut controller = controller_with(service);

        controller.submit("hello").await.unwrap();

        let entries = controller.entries();
        assert_eq!(entries.len(), 1);
        assert!(matches!(&entries[0], PanelEntry::User(_)));
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_cap_applies_across_submits() {
        let mut service = MockChatService::new();
        service
            .expect_send()
            .times(15)
            .returning(|_| Ok("ack".to_string()));
        let config = PanelConfig {
            greeting: String::new(),
            ..PanelConfig::default()
        };
        let mut controller =
            PanelController::new(Box::new(service), ReplyRenderer::default(), &config);

        for i in 0..15 {
            controller.submit(&format!("q{}", i)).await.unwrap();
        }

        assert_eq!(controller.transcript().len(), 20);
        let last = controller.transcript().entries().last().unwrap();
        assert_eq!(last.text, "ack");
        let first = controller.transcript().entries().next().unwrap();
        assert_eq!(first.text, "q5");
    }

    #[tokio::test]
    async fn test_reply_with_chart_block_renders_selector() {
        let mut service = MockChatService::new();
        service.expect_send().times(1).returning(|_| {
            Ok(r#"Here you go: <chart_data>{"title":"Leads","data":{}}</chart_data>"#.to_string())
        });
        let mut controller = controller_with(service);

        controller.submit("chart please").await.unwrap();

        match &controller.entries()[1] {
            PanelEntry::Assistant(rendered) => {
                assert!(rendered
                    .nodes()
                    .iter()
                    .any(|n| matches!(n, ReplyNode::Selector(_))));
            }
            other => panic!("Expected assistant entry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_greeting_is_seeded() {
        let service = MockChatService::new();
        let config = PanelConfig::default();
        let controller =
            PanelController::new(Box::new(service), ReplyRenderer::default(), &config);

        assert_eq!(controller.entries().len(), 1);
        assert!(assistant_text(&controller.entries()[0]).contains("assistant"));
    }

    #[tokio::test]
    async fn test_voice_unavailable_surfaces_capability_error() {
        let mut service = MockChatService::new();
        service.expect_send().times(0);
        let mut controller = controller_with(service);

        let speech = crate::services::UnsupportedSpeech;
        let result = controller.submit_voice(&speech).await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err().downcast_ref::<LedgermindError>(),
            Some(LedgermindError::SpeechUnavailable(_))
        ));
        assert!(controller.entries().is_empty());
    }

    #[tokio::test]
    async fn test_voice_capture_feeds_submit() {
        struct ScriptedSpeech;

        #[async_trait::async_trait]
        impl SpeechCapture for ScriptedSpeech {
            fn is_available(&self) -> bool {
                true
            }
            async fn capture_once(&self) -> Result<String> {
                Ok("show revenue".to_string())
            }
        }

        let mut service = MockChatService::new();
        service
            .expect_send()
            .withf(|r: &ChatRequest| r.query == "show revenue")
            .times(1)
            .returning(|_| Ok("Revenue is flat.".to_string()));
        let mut controller = controller_with(service);

        controller.submit_voice(&ScriptedSpeech).await.unwrap();
        assert_eq!(controller.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_resets_list_and_transcript() {
        let mut service = MockChatService::new();
        service
            .expect_send()
            .times(1)
            .returning(|_| Ok("ok".to_string()));
        let mut controller = controller_with(service);

        controller.submit("hey").await.unwrap();
        controller.clear();
        assert!(controller.entries().is_empty());
        assert!(controller.transcript().is_empty());
    }
}
