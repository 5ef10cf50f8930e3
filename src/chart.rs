//! Chart kinds, structured data blocks, and the chart-type selector
//!
//! An assistant reply may embed chart-worthy data blocks. Each block becomes
//! a [`ChartSelector`]: the user toggles chart kinds on and off and then
//! generates the selected charts through a [`ChartBackend`]. After a
//! generation pass the selector locks so a partial re-render cannot leave
//! the widget in an inconsistent state.

use crate::config::ChartDefaults;
use crate::error::{LedgermindError, Result};
use serde::Deserialize;
use std::fmt;

/// Chart kind selectable for a structured data block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical bar chart
    Bar,
    /// Line chart
    Line,
    /// Pie chart
    Pie,
    /// Donut chart
    Donut,
    /// Percentage breakdown (rendered with the backend's pie primitive)
    Percentage,
}

/// All chart kinds, in presentation order
pub const ALL_CHART_KINDS: [ChartKind; 5] = [
    ChartKind::Bar,
    ChartKind::Line,
    ChartKind::Pie,
    ChartKind::Donut,
    ChartKind::Percentage,
];

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bar => write!(f, "bar"),
            Self::Line => write!(f, "line"),
            Self::Pie => write!(f, "pie"),
            Self::Donut => write!(f, "donut"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}

impl ChartKind {
    /// Parse a chart kind from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use ledgermind::chart::ChartKind;
    ///
    /// let kind = ChartKind::parse_str("donut").unwrap();
    /// assert_eq!(kind, ChartKind::Donut);
    /// assert!(ChartKind::parse_str("sparkline").is_err());
    /// ```
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "pie" => Ok(Self::Pie),
            "donut" => Ok(Self::Donut),
            "percentage" => Ok(Self::Percentage),
            other => Err(format!("Unknown chart kind: {}", other)),
        }
    }

    /// Capitalized label used in chart titles ("Bar", "Percentage", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bar => "Bar",
            Self::Line => "Line",
            Self::Pie => "Pie",
            Self::Donut => "Donut",
            Self::Percentage => "Percentage",
        }
    }

    /// The backend primitive used to render this kind
    ///
    /// There is no native percentage primitive; percentage charts are drawn
    /// with the pie primitive.
    pub fn backend_type(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie | Self::Percentage => "pie",
            Self::Donut => "donut",
        }
    }
}

/// A structured data block parsed out of an assistant reply
///
/// `series` is opaque to the panel and forwarded verbatim to the chart
/// backend; its wire key inside the tagged payload is `data`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructuredBlock {
    /// Optional block title
    #[serde(default)]
    pub title: Option<String>,
    /// Opaque series payload forwarded to the chart backend
    #[serde(default, rename = "data")]
    pub series: serde_json::Value,
}

/// Line-chart options forwarded to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOptions {
    /// Hide data-point dots
    pub hide_dots: bool,
    /// Fill the region under the line
    pub region_fill: bool,
}

/// One fully-resolved chart request handed to the backend
///
/// Carries the collaborator's recognized option set: title, data, type,
/// height, colors, line options, and navigability.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// Display title, suffixed with the requested kind label
    pub title: String,
    /// Series payload, forwarded verbatim from the block
    pub data: serde_json::Value,
    /// Backend primitive name ("bar", "line", "pie", "donut")
    pub chart_type: &'static str,
    /// Chart height in pixels
    pub height: u32,
    /// Color palette
    pub colors: Vec<String>,
    /// Line-chart options
    pub line_options: LineOptions,
    /// Whether the chart is keyboard-navigable
    pub is_navigable: bool,
}

impl ChartSpec {
    /// Build a chart spec for one kind from a block and the configured defaults
    pub fn from_block(block: &StructuredBlock, kind: ChartKind, defaults: &ChartDefaults) -> Self {
        let base_title = block.title.as_deref().unwrap_or("Data Insight");
        Self {
            title: format!("{} ({})", base_title, kind.label()),
            data: block.series.clone(),
            chart_type: kind.backend_type(),
            height: defaults.height,
            colors: defaults.colors.clone(),
            line_options: LineOptions {
                hide_dots: defaults.hide_dots,
                region_fill: defaults.region_fill,
            },
            is_navigable: defaults.is_navigable,
        }
    }
}

/// Charting collaborator seam
///
/// A backend renders one chart synchronously when invoked and may fail on
/// malformed series data. The sink appends the chart's slot before the
/// backend runs, so the backend always renders into an already-placed slot.
pub trait ChartBackend {
    /// Render one chart and return its textual/markup representation
    ///
    /// # Errors
    ///
    /// Returns error if the series payload cannot be rendered as the
    /// requested chart type.
    fn render(&self, spec: &ChartSpec) -> Result<String>;
}

/// Outcome of rendering one selected chart kind
///
/// Failures are captured per kind rather than propagated, so one bad kind
/// never suppresses the others.
#[derive(Debug, Clone)]
pub struct ChartOutcome {
    /// The kind that was requested
    pub kind: ChartKind,
    /// Rendered chart, or the error message shown in that kind's slot
    pub rendered: std::result::Result<String, String>,
}

/// Chart-type selector bound to one structured block
///
/// Tracks the user's kind selection in click order and the post-generation
/// lock. The generate control is visible iff the selection is non-empty and
/// the selector has not been locked.
#[derive(Debug, Clone)]
pub struct ChartSelector {
    block: StructuredBlock,
    selected: Vec<ChartKind>,
    locked: bool,
}

impl ChartSelector {
    /// Create a selector for a parsed block with an empty selection
    pub fn new(block: StructuredBlock) -> Self {
        Self {
            block,
            selected: Vec::new(),
            locked: false,
        }
    }

    /// The block this selector is bound to
    pub fn block(&self) -> &StructuredBlock {
        &self.block
    }

    /// Selected kinds, in selection order
    pub fn selection(&self) -> &[ChartKind] {
        &self.selected
    }

    /// Whether the selector has been locked by a generation pass
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the generate control should be visible
    pub fn generate_visible(&self) -> bool {
        !self.selected.is_empty() && !self.locked
    }

    /// Toggle a chart kind in the selection
    ///
    /// Returns whether the kind is selected after the toggle.
    ///
    /// # Errors
    ///
    /// Returns [`LedgermindError::SelectorLocked`] once the selector is locked.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledgermind::chart::{ChartKind, ChartSelector, StructuredBlock};
    ///
    /// let block = StructuredBlock { title: None, series: serde_json::Value::Null };
    /// let mut selector = ChartSelector::new(block);
    /// assert!(selector.toggle(ChartKind::Bar).unwrap());
    /// assert!(!selector.toggle(ChartKind::Bar).unwrap());
    /// assert!(!selector.generate_visible());
    /// ```
    pub fn toggle(&mut self, kind: ChartKind) -> Result<bool> {
        if self.locked {
            return Err(LedgermindError::SelectorLocked.into());
        }

        if let Some(pos) = self.selected.iter().position(|k| *k == kind) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(kind);
            Ok(true)
        }
    }

    /// Generate the selected charts through the backend
    ///
    /// Iterates the selection in selection order and renders each kind
    /// independently: a backend failure becomes an error outcome in that
    /// kind's slot and the remaining kinds still render. A non-empty pass
    /// locks the selector; an empty selection is a no-op that leaves the
    /// selector unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`LedgermindError::SelectorLocked`] if generation already ran.
    pub fn generate(
        &mut self,
        backend: &dyn ChartBackend,
        defaults: &ChartDefaults,
    ) -> Result<Vec<ChartOutcome>> {
        if self.locked {
            return Err(LedgermindError::SelectorLocked.into());
        }
        if self.selected.is_empty() {
            return Ok(Vec::new());
        }

        let outcomes = self
            .selected
            .iter()
            .map(|&kind| {
                let spec = ChartSpec::from_block(&self.block, kind, defaults);
                let rendered = backend.render(&spec).map_err(|e| {
                    tracing::warn!("Chart backend failed for kind {}: {}", kind, e);
                    e.to_string()
                });
                ChartOutcome { kind, rendered }
            })
            .collect();

        self.locked = true;
        Ok(outcomes)
    }
}
