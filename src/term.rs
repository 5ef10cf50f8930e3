//! Terminal presentation
//!
//! Renders panel entries to the terminal: narrative text, chart pickers,
//! and block errors through an [`OutputSink`], and chart data as plain
//! tables through a [`ChartBackend`]. The table backend stands in for a
//! graphical charting layer; it prints one row per label with its values.

use crate::chart::{ChartBackend, ChartSelector, ChartSpec, ALL_CHART_KINDS};
use crate::error::{LedgermindError, Result};
use crate::panel::renderer::OutputSink;
use colored::Colorize;
use prettytable::{format, Table};

/// Sink that prints rendered reply nodes to stdout
pub struct TerminalSink;

impl OutputSink for TerminalSink {
    fn narrative(&mut self, formatted: String) {
        println!("{}", formatted);
    }

    fn chart_selector(&mut self, selector: ChartSelector) {
        let title = selector
            .block()
            .title
            .as_deref()
            .unwrap_or("Data Insight");
        println!(
            "{} {} ({})",
            "Chart data available:".cyan(),
            title.bold(),
            "use /chart <kinds>".cyan()
        );
        let kinds: Vec<&str> = ALL_CHART_KINDS.iter().map(|k| k.label()).collect();
        println!("  Kinds: {}", kinds.join(", "));
    }

    fn block_error(&mut self, detail: String) {
        println!("{}", format!("Could not read chart data: {}", detail).red());
    }
}

/// Chart backend that renders a spec as a bordered text table
///
/// Expects the conventional series shape: a `labels` array plus a
/// `datasets` array of objects carrying `values`. Anything else is a
/// render failure, reported per chart without affecting siblings.
pub struct TableChartBackend;

impl TableChartBackend {
    fn series_parts(spec: &ChartSpec) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
        let labels = spec
            .data
            .get("labels")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                LedgermindError::ChartRender("series has no labels array".to_string())
            })?
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>();

        let datasets = spec
            .data
            .get("datasets")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                LedgermindError::ChartRender("series has no datasets array".to_string())
            })?;

        let mut columns = Vec::new();
        for dataset in datasets {
            let values = dataset
                .get("values")
                .and_then(|v| v.as_array())
                .ok_or_else(|| {
                    LedgermindError::ChartRender("dataset has no values array".to_string())
                })?
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0))
                .collect::<Vec<_>>();
            if values.len() != labels.len() {
                return Err(LedgermindError::ChartRender(format!(
                    "dataset has {} values for {} labels",
                    values.len(),
                    labels.len()
                ))
                .into());
            }
            columns.push(values);
        }

        if columns.is_empty() {
            return Err(LedgermindError::ChartRender("series has no datasets".to_string()).into());
        }

        Ok((labels, columns))
    }
}

impl ChartBackend for TableChartBackend {
    fn render(&self, spec: &ChartSpec) -> Result<String> {
        let (labels, columns) = Self::series_parts(spec)?;

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

        // Pie-family charts get a share column instead of raw columns
        if spec.chart_type == "pie" {
            let total: f64 = columns[0].iter().sum();
            table.add_row(prettytable::row!["Label", "Value", "Share"]);
            for (label, value) in labels.iter().zip(&columns[0]) {
                let share = if total > 0.0 {
                    format!("{:.1}%", value / total * 100.0)
                } else {
                    "-".to_string()
                };
                table.add_row(prettytable::row![label, format!("{}", value), share]);
            }
        } else {
            table.add_row(prettytable::row!["Label", "Value"]);
            for (i, label) in labels.iter().enumerate() {
                let values: Vec<String> =
                    columns.iter().map(|c| format!("{}", c[i])).collect();
                table.add_row(prettytable::row![label, values.join(" / ")]);
            }
        }

        Ok(format!("{}\n{}", spec.title, table))
    }
}
