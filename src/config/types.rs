use std::path::PathBuf;

use serde::Deserialize;

use crate::audit::DEFAULT_TOP_ISSUES;
use crate::exports::ExportTab;
use crate::spider::{CrawlOptions, DriverKind};

/// Main configuration structure for the audit pipeline
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub spider: SpiderConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

impl Config {
    /// Crawl options assembled from the crawl and spider sections
    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            max_urls: self.crawl.max_urls,
            include_subdomains: self.crawl.include_subdomains,
            follow_external_nofollow: self.crawl.follow_external_nofollow,
            spider_config: self.spider.config_file.clone(),
            export_tabs: self.crawl.resolved_export_tabs(),
        }
    }
}

/// Spider driver configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SpiderConfig {
    /// Which crawl strategy to use
    #[serde(default = "default_driver")]
    pub driver: DriverKind,

    /// Path to the spider CLI executable
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Base URL of the spider's control API
    #[serde(rename = "api-url", default = "default_api_url")]
    pub api_url: String,

    /// Seconds between crawl status polls
    #[serde(rename = "poll-interval-secs", default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Seconds to wait for an API crawl before giving up
    #[serde(rename = "wait-timeout-secs", default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Spider configuration file forwarded to the CLI
    #[serde(rename = "config-file", default)]
    pub config_file: Option<PathBuf>,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            executable: None,
            api_url: default_api_url(),
            poll_interval_secs: default_poll_interval(),
            wait_timeout_secs: default_wait_timeout(),
            config_file: None,
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CrawlConfig {
    /// Stop the crawl after this many URLs
    #[serde(rename = "max-urls", default)]
    pub max_urls: Option<u32>,

    /// Crawl subdomains of the start host as internal
    #[serde(rename = "include-subdomains", default)]
    pub include_subdomains: bool,

    /// Follow external links marked nofollow
    #[serde(rename = "follow-external-nofollow", default)]
    pub follow_external_nofollow: bool,

    /// Tabs to export, by their spider names
    #[serde(rename = "export-tabs", default)]
    pub export_tabs: Option<Vec<String>>,
}

impl CrawlConfig {
    /// The tabs to export, falling back to every tab the audit reads.
    ///
    /// Unknown names were rejected during validation, so they are simply
    /// skipped here.
    pub fn resolved_export_tabs(&self) -> Vec<ExportTab> {
        match &self.export_tabs {
            Some(names) => names
                .iter()
                .filter_map(|name| ExportTab::from_api_name(name))
                .collect(),
            None => ExportTab::ALL.to_vec(),
        }
    }
}

/// Report generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// How many highest-impact issues the summary calls out
    #[serde(rename = "top-issues", default = "default_top_issues")]
    pub top_issues: usize,

    /// Root directory for end-to-end project runs
    #[serde(rename = "projects-dir", default = "default_projects_dir")]
    pub projects_dir: PathBuf,

    /// Root directory for audit-only runs
    #[serde(rename = "outputs-dir", default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_issues: default_top_issues(),
            projects_dir: default_projects_dir(),
            outputs_dir: default_outputs_dir(),
        }
    }
}

/// Email delivery configuration.
///
/// The SMTP password never lives in the file; it arrives through a flag or
/// environment variable at run time.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Report recipients
    pub recipients: Vec<String>,

    /// SMTP relay host
    #[serde(rename = "smtp-server")]
    pub smtp_server: String,

    /// SMTP submission port
    #[serde(rename = "smtp-port", default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username, also used as the From address
    #[serde(rename = "smtp-user")]
    pub smtp_user: String,
}

fn default_driver() -> DriverKind {
    DriverKind::Cli
}

fn default_api_url() -> String {
    "http://localhost:8777".to_string()
}

fn default_poll_interval() -> u64 {
    10
}

fn default_wait_timeout() -> u64 {
    3600
}

fn default_top_issues() -> usize {
    DEFAULT_TOP_ISSUES
}

fn default_projects_dir() -> PathBuf {
    PathBuf::from("projects")
}

fn default_outputs_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_smtp_port() -> u16 {
    587
}
