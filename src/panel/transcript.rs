//! Bounded conversational transcript
//!
//! The transcript is a fixed-cap sliding window over the established
//! user/assistant exchanges. It is write-only from the panel's perspective:
//! entries are never read back into the display, only serialized and
//! replayed to the chat service as conversational grounding.

use crate::error::Result;
use serde::Serialize;
use std::collections::VecDeque;

/// Role of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A message typed (or dictated) by the user
    User,
    /// A reply produced by the assistant
    Assistant,
}

/// One transcript entry: role plus raw, pre-formatting text
///
/// Entries are immutable once created; the transcript is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// Who produced the text
    pub role: Role,
    /// Raw message content
    #[serde(rename = "content")]
    pub text: String,
}

/// Bounded, append-only conversational history
///
/// Capped at a fixed maximum number of entries. When an appended exchange
/// pushes the length over the cap, the oldest entries are evicted first
/// (FIFO), so the most recent exchange is always present.
///
/// # Examples
///
/// ```
/// use ledgermind::panel::Transcript;
///
/// let mut transcript = Transcript::new(4);
/// transcript.push_exchange("q1", "a1");
/// transcript.push_exchange("q2", "a2");
/// transcript.push_exchange("q3", "a3");
/// assert_eq!(transcript.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: VecDeque<TranscriptEntry>,
    max_entries: usize,
}

impl Transcript {
    /// Create an empty transcript with the given entry cap
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    /// Record one established exchange, user message then assistant reply
    ///
    /// Applies FIFO eviction afterwards so the length never exceeds the cap.
    pub fn push_exchange(
        &mut self,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) {
        self.entries.push_back(TranscriptEntry {
            role: Role::User,
            text: user_text.into(),
        });
        self.entries.push_back(TranscriptEntry {
            role: Role::Assistant,
            text: assistant_text.into(),
        });

        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Serialize the transcript as request context
    ///
    /// Produces a JSON array of `{"role", "content"}` objects.
    ///
    /// # Errors
    ///
    /// Returns error if JSON serialization fails.
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Entries currently held, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured entry cap
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
