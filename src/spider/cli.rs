//! Headless CLI driver
//!
//! Runs the spider executable as a subprocess, streams its output into the
//! logs, and picks up the CSV files it leaves in the exports directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::exports::ExportTab;

use super::{CrawlDriver, CrawlHandle, CrawlOptions, CrawlOutcome, CrawlTarget};

/// Drives the spider CLI in headless mode
pub struct SpiderCli {
    executable: PathBuf,
    exports_dir: PathBuf,
}

impl SpiderCli {
    /// Creates a driver for the given executable, falling back to the
    /// platform default install location when none is configured
    pub fn new(executable: Option<PathBuf>, exports_dir: PathBuf) -> Self {
        let executable = executable.unwrap_or_else(default_executable);
        if !executable.exists() {
            warn!("Spider executable not found at {}", executable.display());
        }
        Self {
            executable,
            exports_dir,
        }
    }

    /// Command-line arguments for a crawl, in the order the CLI expects
    fn build_args(&self, target: &CrawlTarget, options: &CrawlOptions) -> Vec<String> {
        let mut args = vec!["--headless".to_string()];

        match target {
            CrawlTarget::Url(url) => {
                args.push("--crawl".to_string());
                args.push(url.clone());
            }
            CrawlTarget::UrlList(path) => {
                args.push("--list-crawl".to_string());
                args.push(path.to_string_lossy().into_owned());
            }
        }
        args.push("--output-folder".to_string());
        args.push(self.exports_dir.to_string_lossy().into_owned());

        // A configured spider config file is only passed along if it exists
        if let Some(config) = &options.spider_config {
            if config.exists() {
                args.push("--config".to_string());
                args.push(config.to_string_lossy().into_owned());
            }
        }
        if let Some(max_urls) = options.max_urls {
            args.push("--bulk-max-urls".to_string());
            args.push(max_urls.to_string());
        }
        for tab in &options.export_tabs {
            args.push("--export-tabs".to_string());
            args.push(tab.api_name().to_string());
        }

        args
    }
}

#[async_trait]
impl CrawlDriver for SpiderCli {
    fn name(&self) -> &'static str {
        "cli"
    }

    async fn is_available(&self) -> bool {
        self.executable.exists()
    }

    async fn start(&self, target: &CrawlTarget, options: &CrawlOptions) -> Option<CrawlHandle> {
        if let CrawlTarget::UrlList(path) = target {
            if !path.exists() {
                error!("URL list file not found: {}", path.display());
                return None;
            }
        }
        if let Err(e) = std::fs::create_dir_all(&self.exports_dir) {
            error!(
                "Cannot create exports directory {}: {}",
                self.exports_dir.display(),
                e
            );
            return None;
        }

        match target {
            CrawlTarget::Url(url) => info!("Starting spider crawl of {}", url),
            CrawlTarget::UrlList(path) => {
                info!("Starting spider list crawl with URLs from {}", path.display())
            }
        }
        let args = self.build_args(target, options);
        info!("Command: {} {}", self.executable.display(), args.join(" "));

        match Command::new(&self.executable)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => Some(CrawlHandle::Process(child)),
            Err(e) => {
                error!("Error launching spider process: {}", e);
                None
            }
        }
    }

    /// Waits for the subprocess to exit. No timeout is applied; the crawl
    /// runs for as long as the spider keeps running.
    async fn wait(&self, handle: &mut CrawlHandle) -> CrawlOutcome {
        let child = match handle {
            CrawlHandle::Process(child) => child,
            CrawlHandle::Remote { .. } => {
                error!("CLI driver cannot wait on a remote crawl");
                return CrawlOutcome::Failed;
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Stream crawl progress into the log while the process runs;
        // stderr is held back unless the crawl fails
        let stdout_task = async {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    info!("{}", line.trim());
                }
            }
        };
        let stderr_task = async {
            let mut collected = Vec::new();
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    collected.push(line);
                }
            }
            collected
        };
        let ((), stderr_lines) = tokio::join!(stdout_task, stderr_task);

        match child.wait().await {
            Ok(status) if status.success() => CrawlOutcome::Finished,
            Ok(status) => {
                match status.code() {
                    Some(code) => error!("Spider crawl failed with return code {}", code),
                    None => error!("Spider crawl terminated by signal"),
                }
                for line in &stderr_lines {
                    error!("{}", line.trim());
                }
                CrawlOutcome::Failed
            }
            Err(e) => {
                error!("Error waiting for spider process: {}", e);
                CrawlOutcome::Failed
            }
        }
    }

    async fn export(&self, _handle: &CrawlHandle, tabs: &[ExportTab]) -> Option<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.exports_dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!(
                    "Cannot read exports directory {}: {}",
                    self.exports_dir.display(),
                    e
                );
                return None;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect();
        files.sort();

        let mut any_found = false;
        for tab in tabs {
            let found = files.iter().any(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| tab.matches_file(name))
            });
            if found {
                any_found = true;
            } else {
                warn!("Export for tab '{}' not found", tab);
            }
        }
        if !any_found {
            error!("No exports were created. Crawl may have failed.");
            return None;
        }

        info!(
            "Spider crawl completed successfully. Exports saved to {}",
            self.exports_dir.display()
        );
        Some(files)
    }
}

/// Default install location of the spider CLI
#[cfg(windows)]
fn default_executable() -> PathBuf {
    PathBuf::from("C:\\Program Files\\Screaming Frog SEO Spider\\ScreamingFrogSEOSpiderCli.exe")
}

/// Default install location of the spider CLI
#[cfg(not(windows))]
fn default_executable() -> PathBuf {
    let app_bundle = Path::new("/Applications/Screaming Frog SEO Spider.app");
    if app_bundle.exists() {
        app_bundle.join("Contents/MacOS/ScreamingFrogSEOSpiderCli")
    } else {
        PathBuf::from("/usr/bin/screamingfrogseospider")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(exports_dir: &Path) -> SpiderCli {
        SpiderCli::new(
            Some(PathBuf::from("/opt/spider/bin/spider-cli")),
            exports_dir.to_path_buf(),
        )
    }

    #[test]
    fn test_default_executable_names_the_spider() {
        let path = default_executable().to_string_lossy().to_lowercase();
        assert!(path.contains("screamingfrog"));
    }

    #[test]
    fn test_crawl_args_in_cli_order() {
        let cli = driver(Path::new("/tmp/exports"));
        let options = CrawlOptions {
            max_urls: Some(500),
            export_tabs: vec![ExportTab::InternalAll, ExportTab::ResponseCodes],
            ..CrawlOptions::default()
        };
        let target = CrawlTarget::Url("https://example.com".to_string());

        let args = cli.build_args(&target, &options);
        assert_eq!(
            args,
            vec![
                "--headless",
                "--crawl",
                "https://example.com",
                "--output-folder",
                "/tmp/exports",
                "--bulk-max-urls",
                "500",
                "--export-tabs",
                "Internal:All",
                "--export-tabs",
                "Response Codes",
            ]
        );
    }

    #[test]
    fn test_list_crawl_args() {
        let cli = driver(Path::new("/tmp/exports"));
        let target = CrawlTarget::UrlList(PathBuf::from("/tmp/urls.txt"));

        let args = cli.build_args(&target, &CrawlOptions::default());
        assert_eq!(
            args,
            vec![
                "--headless",
                "--list-crawl",
                "/tmp/urls.txt",
                "--output-folder",
                "/tmp/exports",
            ]
        );
    }

    #[test]
    fn test_missing_config_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cli = driver(dir.path());

        let absent = CrawlOptions {
            spider_config: Some(dir.path().join("missing.seospiderconfig")),
            ..CrawlOptions::default()
        };
        let target = CrawlTarget::Url("https://example.com".to_string());
        let args = cli.build_args(&target, &absent);
        assert!(!args.iter().any(|arg| arg == "--config"));

        let config_path = dir.path().join("present.seospiderconfig");
        std::fs::write(&config_path, b"config").unwrap();
        let present = CrawlOptions {
            spider_config: Some(config_path.clone()),
            ..CrawlOptions::default()
        };
        let args = cli.build_args(&target, &present);
        let position = args.iter().position(|arg| arg == "--config").unwrap();
        assert_eq!(args[position + 1], config_path.to_string_lossy());
    }

    #[tokio::test]
    async fn test_export_collects_known_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("internal_all.csv"), b"Address\n").unwrap();
        std::fs::write(dir.path().join("response_codes.csv"), b"Address\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not an export").unwrap();

        let cli = driver(dir.path());
        let handle = CrawlHandle::Remote {
            crawl_id: String::new(),
        };
        let files = cli
            .export(
                &handle,
                &[ExportTab::InternalAll, ExportTab::ResponseCodes, ExportTab::Images],
            )
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|path| {
            path.extension().is_some_and(|ext| ext == "csv")
        }));
    }

    #[tokio::test]
    async fn test_export_fails_when_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unrelated.csv"), b"col\n").unwrap();

        let cli = driver(dir.path());
        let handle = CrawlHandle::Remote {
            crawl_id: String::new(),
        };
        let files = cli.export(&handle, &[ExportTab::InternalAll]).await;
        assert!(files.is_none());
    }
}
