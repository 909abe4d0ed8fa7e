//! Report module for rendering audit results
//!
//! This module handles every artifact the pipeline writes, including:
//! - JSON reports carrying the summary and all bucketed findings
//! - Self-contained styled HTML reports
//! - PNG charts of issue counts and top-issue scores
//! - Excel workbooks with a summary sheet and per-severity sheets

mod chart;
mod html;
mod json;
mod spreadsheet;

pub use chart::render_charts;
pub use html::{render_html_report, write_html_report};
pub use json::write_json_report;
pub use spreadsheet::write_spreadsheet;

pub(crate) use html::escape;

use thiserror::Error;

/// Errors that can occur while writing report artifacts
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
