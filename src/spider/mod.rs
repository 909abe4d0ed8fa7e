//! Spider module for driving the crawler
//!
//! This module handles both ways of running a crawl, including:
//! - Launching the spider CLI as a headless subprocess
//! - Driving a running spider instance over its HTTP control API
//! - Waiting for crawls to reach a terminal state
//! - Collecting the CSV exports a finished crawl produced

mod api;
mod cli;

pub use api::SpiderApi;
pub use cli::SpiderCli;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::Deserialize;
use tokio::process::Child;

use crate::config::Config;
use crate::exports::ExportTab;

/// Which crawl strategy drives the spider
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Headless subprocess of the spider CLI
    Cli,
    /// HTTP control API of an already-running spider
    Api,
}

/// What the spider should crawl
#[derive(Debug, Clone)]
pub enum CrawlTarget {
    /// Spider a site outward from this URL
    Url(String),

    /// Crawl exactly the URLs listed in a file, one per line
    UrlList(PathBuf),
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlTarget::Url(url) => write!(f, "{}", url),
            CrawlTarget::UrlList(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Options forwarded to the crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Stop the crawl after this many URLs
    pub max_urls: Option<u32>,
    /// Crawl subdomains of the start host as internal
    pub include_subdomains: bool,
    /// Follow external links marked nofollow
    pub follow_external_nofollow: bool,
    /// Spider configuration file handed to the CLI
    pub spider_config: Option<PathBuf>,
    /// Tabs the CLI should export while crawling
    pub export_tabs: Vec<ExportTab>,
}

/// A crawl in flight
pub enum CrawlHandle {
    /// Subprocess with its stdio pipes still attached
    Process(Child),

    /// Remote crawl tracked by ID
    Remote { crawl_id: String },
}

/// Terminal state of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The crawl ran to completion
    Finished,
    /// The crawl failed or was cut short
    Failed,
}

/// A way of running the spider and collecting its exports.
///
/// Drivers report failure through logs and absent return values rather
/// than errors; the workflow turns any gap into an aborted crawl stage.
#[async_trait]
pub trait CrawlDriver: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Whether the driver can reach its spider right now
    async fn is_available(&self) -> bool;

    /// Starts a crawl, returning a handle to wait on
    async fn start(&self, target: &CrawlTarget, options: &CrawlOptions) -> Option<CrawlHandle>;

    /// Blocks until the crawl reaches a terminal state
    async fn wait(&self, handle: &mut CrawlHandle) -> CrawlOutcome;

    /// Collects the named export tabs, returning the CSV files found
    async fn export(&self, handle: &CrawlHandle, tabs: &[ExportTab]) -> Option<Vec<PathBuf>>;
}

/// Builds the crawl driver selected by the configuration
///
/// # Arguments
///
/// * `config` - Resolved pipeline configuration
/// * `exports_dir` - Directory crawl exports should land in
///
/// # Returns
///
/// * `Ok(Box<dyn CrawlDriver>)` - The configured driver
/// * `Err(AuditError)` - The API client could not be constructed
pub fn build_driver(config: &Config, exports_dir: PathBuf) -> crate::Result<Box<dyn CrawlDriver>> {
    let driver: Box<dyn CrawlDriver> = match config.spider.driver {
        DriverKind::Cli => Box::new(SpiderCli::new(config.spider.executable.clone(), exports_dir)),
        DriverKind::Api => Box::new(
            SpiderApi::new(config.spider.api_url.clone(), exports_dir)?.with_polling(
                Duration::from_secs(config.spider.poll_interval_secs),
                Duration::from_secs(config.spider.wait_timeout_secs),
            ),
        ),
    };
    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_target_display() {
        let url = CrawlTarget::Url("https://example.com".to_string());
        assert_eq!(url.to_string(), "https://example.com");

        let list = CrawlTarget::UrlList(PathBuf::from("urls.txt"));
        assert_eq!(list.to_string(), "urls.txt");
    }

    #[test]
    fn test_driver_kind_config_names() {
        let cli: DriverKind = serde_json::from_str("\"cli\"").unwrap();
        assert_eq!(cli, DriverKind::Cli);
        let api: DriverKind = serde_json::from_str("\"api\"").unwrap();
        assert_eq!(api, DriverKind::Api);
    }
}
