//! Assistant reply scanner
//!
//! An assistant reply is free-form narrative text that may embed structured
//! chart data inside `<chart_data>…</chart_data>` tags. One scanning pass
//! splits the reply into a sequence of segments: narrative spans, parsed
//! chart blocks, and malformed-block markers. A malformed block never aborts
//! the rest of the reply.
//!
//! The model is not guaranteed to emit pure JSON inside the tags, so payload
//! extraction is tolerant: the widest span from the first `{` to the last `}`
//! within the tag content is parsed, and any surrounding prose is discarded.

use crate::chart::StructuredBlock;
use crate::error::{LedgermindError, Result};

const OPEN_TAG: &str = "<chart_data>";
const CLOSE_TAG: &str = "</chart_data>";

/// One parsed unit of an assistant reply, in reply order
#[derive(Debug, Clone, PartialEq)]
pub enum ReplySegment {
    /// Ordinary narrative text, raw (pre-formatting)
    Narrative(String),
    /// A successfully parsed structured data block
    Chart(StructuredBlock),
    /// A tagged region whose payload could not be extracted or parsed
    Malformed {
        /// Human-readable reason shown inline in the block's position
        detail: String,
    },
}

/// Split an assistant reply into narrative, chart, and malformed segments
///
/// Tagged regions are non-overlapping and non-nested; the scan keeps a cursor
/// at the end of the previously consumed region. An opening tag without a
/// matching close is treated as narrative. Adjacent tags produce no empty
/// narrative span between them.
///
/// # Examples
///
/// ```
/// use ledgermind::reply::{parse_reply, ReplySegment};
///
/// let segments = parse_reply("Here are your numbers.");
/// assert_eq!(segments.len(), 1);
/// assert!(matches!(segments[0], ReplySegment::Narrative(_)));
/// ```
pub fn parse_reply(text: &str) -> Vec<ReplySegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(rel_open) = text[cursor..].find(OPEN_TAG) {
        let open_at = cursor + rel_open;
        let content_start = open_at + OPEN_TAG.len();

        let Some(rel_close) = text[content_start..].find(CLOSE_TAG) else {
            // Unterminated tag: the remainder is narrative.
            break;
        };
        let close_at = content_start + rel_close;

        if open_at > cursor {
            segments.push(ReplySegment::Narrative(text[cursor..open_at].to_string()));
        }

        match parse_block(&text[content_start..close_at]) {
            Ok(block) => segments.push(ReplySegment::Chart(block)),
            Err(e) => {
                tracing::warn!("Dropping malformed chart data block: {}", e);
                segments.push(ReplySegment::Malformed {
                    detail: e.to_string(),
                });
            }
        }

        cursor = close_at + CLOSE_TAG.len();
    }

    if cursor < text.len() {
        segments.push(ReplySegment::Narrative(text[cursor..].to_string()));
    }

    segments
}

/// Parse the content of one tagged region into a structured block
///
/// Extracts the widest `{…}` span and parses it as JSON. Extra prose around
/// the object is tolerated; a region with no braces, or an unparsable span,
/// is an error.
///
/// # Errors
///
/// Returns [`LedgermindError::MalformedBlock`] when no JSON object span is
/// present or the span fails to parse.
pub fn parse_block(content: &str) -> Result<StructuredBlock> {
    let span = json_object_span(content).ok_or_else(|| {
        LedgermindError::MalformedBlock("no JSON object found inside chart data tag".to_string())
    })?;

    let block: StructuredBlock = serde_json::from_str(span)
        .map_err(|e| LedgermindError::MalformedBlock(format!("invalid chart payload: {}", e)))?;

    Ok(block)
}

/// Widest first-`{` to last-`}` span within the content
///
/// With multiple top-level objects in one region this may over-capture; that
/// surfaces as a parse failure rather than a partial guess.
fn json_object_span(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&content[start..=end])
}
