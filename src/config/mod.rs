//! Configuration module for the audit pipeline
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use seo_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("seo-audit.toml")).unwrap();
//! println!("Spider API: {}", config.spider.api_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, EmailConfig, ReportConfig, SpiderConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
