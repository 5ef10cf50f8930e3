//! Ledgermind - AI assistant panel library
//!
//! This library provides the core functionality for an embeddable AI
//! assistant panel over business data: a bounded conversation controller,
//! reply rendering with chart extraction, and record summary prompts.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `panel`: Conversation controller, transcript, and reply rendering
//! - `reply`: Reply text scanning and chart block extraction
//! - `chart`: Chart kinds, specs, pickers, and the backend seam
//! - `services`: Chat service abstraction, HTTP transport, speech capture
//! - `sidebar`: Canned record summary prompts
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use ledgermind::{Config, PanelController, ReplyRenderer};
//! use ledgermind::services::create_service;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     config.validate()?;
//!
//!     let service = create_service(&config.service)?;
//!     let mut panel = PanelController::new(service, ReplyRenderer::default(), &config.panel);
//!     panel.submit("How many open leads do we have?").await?;
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod panel;
pub mod reply;
pub mod services;
pub mod sidebar;
pub mod term;

// Re-export commonly used types
pub use chart::{ChartKind, ChartSelector, StructuredBlock};
pub use config::Config;
pub use error::{LedgermindError, Result};
pub use panel::{PanelController, PanelEntry, RenderedReply, ReplyRenderer};
pub use reply::{parse_reply, ReplySegment};
