//! The assistant panel: conversation controller, transcript, and renderer

pub mod controller;
pub mod renderer;
pub mod transcript;

pub use controller::{PanelController, PanelEntry};
pub use renderer::{
    MarkdownFormatter, OutputSink, PlainTextFormatter, RenderedReply, ReplyNode, ReplyRenderer,
};
pub use transcript::{Role, Transcript, TranscriptEntry};
