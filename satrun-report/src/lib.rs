#![warn(missing_docs)]
//! SatRun Report - Table Rendering
//!
//! Renders an aggregate through a pluggable [`TableSink`]:
//! - Text (space-separated, the default terminal output)
//! - JSON (machine-readable)
//! - CSV (spreadsheet-compatible)
//! - Markdown (notes and PR descriptions)

mod csv;
mod json;
mod markdown;
mod sink;
mod text;

pub use self::csv::{CsvSink, generate_csv_report};
pub use json::{JsonReport, JsonRow, JsonSink, JsonTable, generate_json_report};
pub use markdown::{MarkdownSink, generate_markdown_report};
pub use sink::{SinkError, TableSink, TableView, emit};
pub use text::{TextSink, generate_text_report};

use satrun_stats::Aggregate;
use std::io::Write;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Space-separated tables
    #[default]
    Text,
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Markdown tables
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "human" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// Build the sink for a format around a writer
pub fn sink_for<'w, W: Write + 'w>(format: OutputFormat, writer: W) -> Box<dyn TableSink + 'w> {
    match format {
        OutputFormat::Text => Box::new(TextSink::new(writer)),
        OutputFormat::Json => Box::new(JsonSink::new(writer)),
        OutputFormat::Csv => Box::new(CsvSink::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownSink::new(writer)),
    }
}

/// Render an aggregate in the requested format
pub fn generate_report(aggregate: &Aggregate, format: OutputFormat) -> Result<String, SinkError> {
    match format {
        OutputFormat::Text => generate_text_report(aggregate),
        OutputFormat::Json => generate_json_report(aggregate),
        OutputFormat::Csv => generate_csv_report(aggregate),
        OutputFormat::Markdown => generate_markdown_report(aggregate),
    }
}
