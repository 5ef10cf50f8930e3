//! Record summary prompts
//!
//! Builds the canned analysis prompts offered alongside a business record
//! and sends them as standalone queries. Summary requests carry no
//! conversation history and their replies are returned verbatim.

use crate::error::Result;
use crate::services::{ChatRequest, ChatService};

/// The canned analyses offered for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    /// A plain summary of a sales lead
    LeadSummary,
    /// A plausibility review of a sales invoice
    InvoiceAnalysis,
}

impl SummaryKind {
    /// Button label shown next to the record
    pub fn label(&self) -> &'static str {
        match self {
            SummaryKind::LeadSummary => "Summarize with AI",
            SummaryKind::InvoiceAnalysis => "Analyze with AI",
        }
    }

    /// Build the full prompt for one record
    pub fn prompt(&self, record: &serde_json::Value) -> String {
        match self {
            SummaryKind::LeadSummary => {
                format!("Summarize this Lead: {}", record)
            }
            SummaryKind::InvoiceAnalysis => {
                format!(
                    "Analyze this Sales Invoice and tell me if it looks normal: {}",
                    record
                )
            }
        }
    }
}

/// Request a one-shot summary of a record
///
/// The record is embedded in the prompt as JSON and the request is sent
/// without history. The reply is not scanned for chart blocks; whatever the
/// service returns is handed back as-is.
///
/// # Errors
///
/// Propagates service failures, including rate limiting.
pub async fn summarize_record(
    service: &dyn ChatService,
    kind: SummaryKind,
    record: &serde_json::Value,
) -> Result<String> {
    let prompt = kind.prompt(record);
    tracing::debug!("Requesting {:?} ({} chars)", kind, prompt.len());
    service.send(&ChatRequest::bare(prompt)).await
}
