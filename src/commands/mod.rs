/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat`      — Interactive assistant panel
- `summarize` — One-shot record summary

These handlers are intentionally small and use the library components:
the panel controller, the chat service, and the chart backends.
*/

use crate::chart::{ChartKind, ChartSelector, ALL_CHART_KINDS};
use crate::config::{ChartDefaults, Config};
use crate::error::{LedgermindError, Result};
use crate::panel::{OutputSink, PanelController, PanelEntry, ReplyNode, ReplyRenderer};
use crate::services::create_service;
use crate::term::{TableChartBackend, TerminalSink};
use colored::Colorize;

// Interactive panel handler
pub mod chat {
    //! Interactive assistant panel.
    //!
    //! Creates the chat service from config, seeds a panel controller, and
    //! runs a readline-based loop that submits user input and prints the
    //! rendered reply nodes. Chart pickers are driven with the `/chart`
    //! command against the most recent reply that carried one.

    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive panel
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `endpoint` - Optional override for the configured chat endpoint
    pub async fn run_chat(mut config: Config, endpoint: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive panel");

        if let Some(endpoint) = endpoint {
            config.service.http.endpoint = endpoint;
        }
        config.validate()?;

        let service = create_service(&config.service)?;
        let renderer = ReplyRenderer::default();
        let mut controller = PanelController::new(service, renderer, &config.panel);

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner();
        print_entries_from(&controller, 0);
        let mut printed = controller.entries().len();

        loop {
            match rl.readline("you> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    rl.add_history_entry(trimmed)?;

                    match trimmed {
                        "exit" | "quit" => break,
                        "/help" => {
                            print_help();
                            continue;
                        }
                        "/clear" => {
                            controller.clear();
                            printed = 0;
                            println!("{}", "Conversation cleared.".yellow());
                            continue;
                        }
                        "/voice" => {
                            let speech = crate::services::UnsupportedSpeech;
                            if let Err(e) = controller.submit_voice(&speech).await {
                                println!("{}", format!("{}", e).yellow());
                            }
                            print_entries_from(&controller, printed);
                            printed = controller.entries().len();
                            continue;
                        }
                        _ => {}
                    }

                    if let Some(args) = trimmed.strip_prefix("/chart") {
                        let defaults = &config.panel.chart;
                        if let Err(e) = handle_chart_command(&mut controller, args, defaults) {
                            println!("{}", format!("{}", e).red());
                        }
                        continue;
                    }

                    if let Err(e) = controller.submit(trimmed).await {
                        // Only the single-flight guard surfaces here
                        println!("{}", format!("{}", e).yellow());
                    }
                    print_entries_from(&controller, printed);
                    printed = controller.entries().len();
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Readline error: {}", e);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome_banner() {
        println!();
        println!("{}", "Ledgermind assistant panel".bold());
        println!(
            "Type a question, {} for commands, {} to leave.",
            "/help".cyan(),
            "exit".cyan()
        );
        println!();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /chart <kinds>  Generate charts from the latest reply (e.g. /chart bar pie)");
        println!("  /voice          Submit a spoken question");
        println!("  /clear          Clear the conversation");
        println!("  /help           Show this help");
        println!("  exit, quit      Leave the panel");
        let kinds: Vec<&str> = ALL_CHART_KINDS.iter().map(|k| k.label()).collect();
        println!("Chart kinds: {}", kinds.join(", "));
    }
}

/// Print panel entries starting at `start`, oldest first
fn print_entries_from(controller: &PanelController, start: usize) {
    let mut sink = TerminalSink;
    for entry in &controller.entries()[start..] {
        match entry {
            PanelEntry::User(text) => {
                println!("{} {}", "you:".bold(), text);
            }
            PanelEntry::Assistant(rendered) => {
                for node in rendered.nodes() {
                    match node {
                        ReplyNode::Narrative(text) => sink.narrative(text.clone()),
                        ReplyNode::Selector(selector) => sink.chart_selector(selector.clone()),
                        ReplyNode::Error(detail) => sink.block_error(detail.clone()),
                    }
                }
            }
            PanelEntry::Notice(text) => {
                println!("{}", text.yellow());
            }
            PanelEntry::Typing => {}
        }
    }
}

/// Toggle the requested kinds on the most recent chart picker and generate
fn handle_chart_command(
    controller: &mut PanelController,
    args: &str,
    defaults: &ChartDefaults,
) -> Result<()> {
    let kinds = parse_chart_kinds(args)?;
    if kinds.is_empty() {
        return Err(LedgermindError::ChartRender(
            "no chart kinds given (try: /chart bar pie)".to_string(),
        )
        .into());
    }

    let selector = latest_selector(controller).ok_or_else(|| {
        LedgermindError::ChartRender("no chart data in the conversation yet".to_string())
    })?;

    for kind in kinds {
        selector.toggle(kind)?;
    }

    let outcomes = selector.generate(&TableChartBackend, defaults)?;
    for outcome in outcomes {
        match outcome.rendered {
            Ok(text) => println!("\n{}", text),
            Err(detail) => println!(
                "{}",
                format!("Could not draw {} chart: {}", outcome.kind, detail).red()
            ),
        }
    }
    Ok(())
}

fn parse_chart_kinds(args: &str) -> Result<Vec<ChartKind>> {
    let mut kinds = Vec::new();
    for word in args.split([' ', ',']).filter(|w| !w.is_empty()) {
        let kind = ChartKind::parse_str(word).map_err(LedgermindError::ChartRender)?;
        kinds.push(kind);
    }
    Ok(kinds)
}

fn latest_selector(controller: &mut PanelController) -> Option<&mut ChartSelector> {
    controller
        .entries_mut()
        .iter_mut()
        .rev()
        .find_map(|entry| match entry {
            PanelEntry::Assistant(rendered) => rendered
                .nodes_mut()
                .iter_mut()
                .rev()
                .find_map(|node| match node {
                    ReplyNode::Selector(selector) => Some(selector),
                    _ => None,
                }),
            _ => None,
        })
}

// Record summary handler
pub mod summarize {
    //! One-shot record summary.
    //!
    //! Reads a record from a JSON file, builds the canned prompt for the
    //! requested analysis, and prints the raw reply.

    use super::*;
    use crate::sidebar::{summarize_record, SummaryKind};
    use std::path::Path;

    /// Summarize one record from a JSON file
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `kind` - Analysis name ("lead" or "invoice")
    /// * `record_path` - Path to the record JSON file
    pub async fn run_summarize(config: Config, kind: &str, record_path: &Path) -> Result<()> {
        config.validate()?;

        let summary_kind = match kind {
            "lead" => SummaryKind::LeadSummary,
            "invoice" => SummaryKind::InvoiceAnalysis,
            other => {
                return Err(LedgermindError::Config(format!(
                    "Unknown summary kind: {} (expected lead or invoice)",
                    other
                ))
                .into())
            }
        };

        let raw = std::fs::read_to_string(record_path)?;
        let record: serde_json::Value = serde_json::from_str(&raw)?;

        tracing::info!("Requesting {} for {}", kind, record_path.display());
        let service = create_service(&config.service)?;
        let reply = summarize_record(service.as_ref(), summary_kind, &record).await?;

        println!("{}", reply);
        Ok(())
    }
}
