//! SEO-Audit: an automated technical SEO audit pipeline
//!
//! This crate drives an external SEO spider (through its command line or its
//! HTTP control API), loads the CSV exports the spider produces, applies a
//! fixed catalog of technical SEO checks, and renders prioritized JSON, HTML,
//! chart, and spreadsheet reports with optional email delivery.

pub mod audit;
pub mod config;
pub mod exports;
pub mod report;
pub mod spider;
pub mod workflow;

use thiserror::Error;

/// Main error type for audit pipeline operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] exports::ExportError),

    #[error("Report error: {0}")]
    Report(#[from] report::ReportError),

    #[error("Email delivery error: {0}")]
    Delivery(#[from] workflow::DeliveryError),

    #[error("Crawl failed: {0}")]
    Crawl(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for audit pipeline operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use audit::{run_audit, AuditReport, AuditSummary, Issue, IssueKind, Severity};
pub use config::Config;
pub use exports::{load_exports, ExportSet, ExportTab, ExportTable};
pub use spider::{build_driver, CrawlDriver, CrawlOptions, CrawlTarget};
