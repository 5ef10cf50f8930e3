//! Reply renderer
//!
//! Maps a full assistant reply onto an output sink: narrative spans go
//! through the markdown-formatting collaborator, structured blocks become
//! chart-type selector widgets, and malformed blocks become inline error
//! nodes. Output order matches reply order.
//!
//! The renderer is stateless across calls: each [`ReplyRenderer::render`]
//! consumes one reply string and hands everything it builds to the sink.

use crate::chart::ChartSelector;
use crate::reply::{parse_reply, ReplySegment};

/// Markdown/text formatting collaborator
///
/// A pure function from raw reply text to a presentation-ready fragment.
/// The host implementation is expected to neutralize unsafe markup.
pub trait MarkdownFormatter {
    /// Format one narrative span
    fn format(&self, raw: &str) -> String;
}

/// Passthrough formatter for plain-text hosts
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatter;

impl MarkdownFormatter for PlainTextFormatter {
    fn format(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Output sink populated by one render pass
///
/// Implementations own everything pushed into them; the renderer retains no
/// references after `render` returns.
pub trait OutputSink {
    /// Append a formatted narrative span
    fn narrative(&mut self, formatted: String);

    /// Append an interactive chart-type selector
    fn chart_selector(&mut self, selector: ChartSelector);

    /// Append an inline error in a malformed block's position
    fn block_error(&mut self, detail: String);
}

/// One node of a rendered reply, in reply order
#[derive(Debug, Clone)]
pub enum ReplyNode {
    /// Formatted narrative span
    Narrative(String),
    /// Chart-type selector for a parsed block
    Selector(ChartSelector),
    /// Inline error shown where a malformed block sat
    Error(String),
}

/// Vec-backed output sink
///
/// The default sink for hosts that render the reply themselves after the
/// parse, and for tests.
#[derive(Debug, Clone, Default)]
pub struct RenderedReply {
    nodes: Vec<ReplyNode>,
}

impl RenderedReply {
    /// Create an empty rendered reply
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in reply order
    pub fn nodes(&self) -> &[ReplyNode] {
        &self.nodes
    }

    /// Mutable access to the nodes, for interactive selector updates
    pub fn nodes_mut(&mut self) -> &mut [ReplyNode] {
        &mut self.nodes
    }
}

impl OutputSink for RenderedReply {
    fn narrative(&mut self, formatted: String) {
        self.nodes.push(ReplyNode::Narrative(formatted));
    }

    fn chart_selector(&mut self, selector: ChartSelector) {
        self.nodes.push(ReplyNode::Selector(selector));
    }

    fn block_error(&mut self, detail: String) {
        self.nodes.push(ReplyNode::Error(detail));
    }
}

/// Renders assistant replies onto an output sink
pub struct ReplyRenderer {
    formatter: Box<dyn MarkdownFormatter + Send + Sync>,
}

impl ReplyRenderer {
    /// Create a renderer over the given formatting collaborator
    pub fn new(formatter: Box<dyn MarkdownFormatter + Send + Sync>) -> Self {
        Self { formatter }
    }

    /// Render one full assistant reply into the sink
    ///
    /// A malformed block produces an inline error node and never aborts the
    /// rest of the reply.
    pub fn render(&self, sink: &mut dyn OutputSink, text: &str) {
        for segment in parse_reply(text) {
            match segment {
                ReplySegment::Narrative(raw) => sink.narrative(self.formatter.format(&raw)),
                ReplySegment::Chart(block) => sink.chart_selector(ChartSelector::new(block)),
                ReplySegment::Malformed { detail } => sink.block_error(detail),
            }
        }
    }
}

impl Default for ReplyRenderer {
    fn default() -> Self {
        Self::new(Box::new(PlainTextFormatter))
    }
}
