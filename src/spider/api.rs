//! HTTP control API driver
//!
//! Talks to an already-running spider instance: starts crawls, polls their
//! status until a terminal state, and asks the spider to write tab exports
//! as CSV files.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::exports::ExportTab;

use super::{CrawlDriver, CrawlHandle, CrawlOptions, CrawlOutcome, CrawlTarget};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Drives a running spider over its control API
pub struct SpiderApi {
    base_url: String,
    client: Client,
    exports_dir: PathBuf,
    poll_interval: Duration,
    wait_timeout: Duration,
}

/// Status payload for a crawl in progress
#[derive(Debug, Deserialize)]
struct CrawlStatus {
    #[serde(default)]
    status: String,

    #[serde(default, rename = "urlsCrawled")]
    urls_crawled: u64,
}

impl SpiderApi {
    /// Creates an API driver against the given base URL
    pub fn new(base_url: String, exports_dir: PathBuf) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("seo-audit/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            exports_dir,
            poll_interval: DEFAULT_POLL_INTERVAL,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        })
    }

    /// Overrides how often status is polled and how long to wait overall
    pub fn with_polling(mut self, poll_interval: Duration, wait_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.wait_timeout = wait_timeout;
        self
    }

    /// Whether the spider answers its status endpoint
    pub async fn check_status(&self) -> bool {
        match self.get_json("status").await {
            Some(value) => value.get("status").and_then(Value::as_str) == Some("OK"),
            None => false,
        }
    }

    /// Starts a crawl of `url` and returns its ID
    pub async fn start_crawl(&self, url: &str, options: &CrawlOptions) -> Option<String> {
        let mut crawl_options = json!({
            "includeSubdomains": options.include_subdomains,
            "followExternalNofollow": options.follow_external_nofollow,
        });
        if let Some(max_urls) = options.max_urls {
            crawl_options["maxUrls"] = json!(max_urls);
        }
        let body = json!({ "url": url, "crawlOptions": crawl_options });

        info!("Starting crawl of {}", url);
        let crawl_id = self
            .post_json("crawl", &body)
            .await
            .as_ref()
            .and_then(|value| value.get("id"))
            .map(id_to_string);
        match crawl_id {
            Some(crawl_id) => {
                info!("Crawl started with ID: {}", crawl_id);
                Some(crawl_id)
            }
            None => {
                error!("Failed to start crawl");
                None
            }
        }
    }

    /// Polls the crawl until it finishes, fails, or the wait timeout passes
    pub async fn wait_for_completion(&self, crawl_id: &str) -> bool {
        info!("Waiting for crawl {} to complete", crawl_id);
        let started = Instant::now();

        loop {
            let elapsed = started.elapsed();
            if elapsed > self.wait_timeout {
                error!(
                    "Timeout waiting for crawl to complete after {} seconds",
                    self.wait_timeout.as_secs()
                );
                return false;
            }

            let status = match self.crawl_status(crawl_id).await {
                Some(status) => status,
                None => {
                    error!("Failed to get crawl status");
                    return false;
                }
            };
            info!(
                "Crawl status: {}, URLs crawled: {}",
                status.status, status.urls_crawled
            );

            match status.status.as_str() {
                "FINISHED" => {
                    info!(
                        "Crawl completed successfully after {} seconds",
                        elapsed.as_secs()
                    );
                    return true;
                }
                "FAILED" | "STOPPED" | "INTERRUPTED" => {
                    error!("Crawl failed with status: {}", status.status);
                    return false;
                }
                _ => {}
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Asks the spider to export one tab into the exports directory
    pub async fn export_tab(&self, crawl_id: &str, tab: ExportTab) -> Option<PathBuf> {
        let path = self.exports_dir.join(tab.file_name());
        let body = json!({
            "id": crawl_id,
            "format": "csv",
            "path": path.to_string_lossy(),
            "tabs": [tab.api_name()],
        });

        info!("Exporting tab {} to {}", tab, path.display());
        let ok = self
            .post_json("export", &body)
            .await
            .as_ref()
            .and_then(|value| value.get("status"))
            .and_then(Value::as_str)
            == Some("OK");
        if ok {
            Some(path)
        } else {
            error!("Failed to export tab {}", tab);
            None
        }
    }

    async fn crawl_status(&self, crawl_id: &str) -> Option<CrawlStatus> {
        let value = self.get_json(&format!("crawl/{}", crawl_id)).await?;
        serde_json::from_value(value).ok()
    }

    async fn get_json(&self, endpoint: &str) -> Option<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        match self.client.get(&url).send().await {
            Ok(response) => Self::read_json(response).await,
            Err(e) => {
                error!("API request error: {}", e);
                None
            }
        }
    }

    async fn post_json(&self, endpoint: &str, body: &Value) -> Option<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        match self.client.post(&url).json(body).send().await {
            Ok(response) => Self::read_json(response).await,
            Err(e) => {
                error!("API request error: {}", e);
                None
            }
        }
    }

    async fn read_json(response: reqwest::Response) -> Option<Value> {
        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            error!("API request failed: {} - {}", status.as_u16(), text);
            return None;
        }
        match response.json().await {
            Ok(value) => Some(value),
            Err(e) => {
                error!("API request error: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl CrawlDriver for SpiderApi {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn is_available(&self) -> bool {
        self.check_status().await
    }

    async fn start(&self, target: &CrawlTarget, options: &CrawlOptions) -> Option<CrawlHandle> {
        let url = match target {
            CrawlTarget::Url(url) => url,
            CrawlTarget::UrlList(_) => {
                error!("List crawls are not supported over the spider API");
                return None;
            }
        };
        let crawl_id = self.start_crawl(url, options).await?;
        Some(CrawlHandle::Remote { crawl_id })
    }

    async fn wait(&self, handle: &mut CrawlHandle) -> CrawlOutcome {
        let crawl_id = match handle {
            CrawlHandle::Remote { crawl_id } => crawl_id.clone(),
            CrawlHandle::Process(_) => {
                error!("API driver cannot wait on a subprocess crawl");
                return CrawlOutcome::Failed;
            }
        };
        if self.wait_for_completion(&crawl_id).await {
            CrawlOutcome::Finished
        } else {
            CrawlOutcome::Failed
        }
    }

    async fn export(&self, handle: &CrawlHandle, tabs: &[ExportTab]) -> Option<Vec<PathBuf>> {
        let crawl_id = match handle {
            CrawlHandle::Remote { crawl_id } => crawl_id,
            CrawlHandle::Process(_) => {
                error!("API driver cannot export a subprocess crawl");
                return None;
            }
        };
        if let Err(e) = std::fs::create_dir_all(&self.exports_dir) {
            error!(
                "Cannot create exports directory {}: {}",
                self.exports_dir.display(),
                e
            );
            return None;
        }

        // Every tab is attempted even after a failure, but one failed tab
        // fails the export as a whole
        let mut files = Vec::new();
        let mut all_ok = true;
        for tab in tabs {
            match self.export_tab(crawl_id, *tab).await {
                Some(path) => files.push(path),
                None => all_ok = false,
            }
        }
        if all_ok {
            Some(files)
        } else {
            None
        }
    }
}

/// Crawl IDs may arrive as JSON strings or numbers
fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}
