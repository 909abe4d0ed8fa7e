//! Workflow module for running audits end to end
//!
//! This module ties the pipeline stages together, including:
//! - Creating the per-run directory layout
//! - Driving the spider and collecting its exports
//! - Auditing exports and rendering every report format
//! - Emailing finished reports to the configured recipients

mod email;

pub use email::{send_report_email, DeliveryError, EmailSettings};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, info};

use crate::audit::{run_audit, AuditReport};
use crate::config::Config;
use crate::exports::load_exports;
use crate::report::{render_charts, write_html_report, write_json_report, write_spreadsheet};
use crate::spider::{build_driver, CrawlDriver, CrawlOptions, CrawlOutcome, CrawlTarget};
use crate::{AuditError, Result};

/// Returns the timestamp shared by every artifact of one run
pub fn run_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Directory layout of a single audit run
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// Run root holding everything the run produced
    pub base: PathBuf,
    /// Where crawl exports land
    pub exports: PathBuf,
    /// Where generated reports land
    pub reports: PathBuf,
}

impl RunPaths {
    /// Creates the run directories under `base`
    pub fn create(base: PathBuf) -> std::io::Result<Self> {
        let exports = base.join("exports");
        let reports = base.join("reports");
        fs::create_dir_all(&exports)?;
        fs::create_dir_all(&reports)?;
        Ok(Self {
            base,
            exports,
            reports,
        })
    }
}

/// Paths of the artifacts one audit run generated
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub json: PathBuf,
    pub charts: PathBuf,
    pub html: PathBuf,
    pub spreadsheet: PathBuf,
}

impl ReportFiles {
    /// All artifacts in generation order
    pub fn all(&self) -> [&PathBuf; 4] {
        [&self.json, &self.charts, &self.html, &self.spreadsheet]
    }
}

/// Audits the exports in `exports_dir` and writes every report format
///
/// # Arguments
///
/// * `exports_dir` - Directory holding the spider's CSV exports
/// * `reports_dir` - Directory report artifacts are written to
/// * `domain` - Audited domain, baked into the spreadsheet filename
/// * `timestamp` - Run timestamp baked into every filename
/// * `top_issues` - How many highest-impact issues the summary calls out
///
/// # Returns
///
/// * `Ok((AuditReport, ReportFiles))` - The report and where it was written
/// * `Err(AuditError)` - Loading the exports or writing a report failed
pub fn run_audit_stage(
    exports_dir: &Path,
    reports_dir: &Path,
    domain: &str,
    timestamp: &str,
    top_issues: usize,
) -> Result<(AuditReport, ReportFiles)> {
    info!("Starting SEO audit analysis...");

    let exports = match load_exports(exports_dir) {
        Ok(exports) => exports,
        Err(e) => {
            error!("Failed to load export files. Audit aborted.");
            return Err(e.into());
        }
    };

    let report = run_audit(&exports, top_issues);

    let json = write_json_report(&report, reports_dir, timestamp)?;
    let charts = render_charts(&report, reports_dir, timestamp)?;
    let html = write_html_report(&report, reports_dir, timestamp)?;

    info!("SEO audit completed successfully");
    info!("JSON report: {}", json.display());
    info!("Charts: {}", charts.display());
    info!("HTML report: {}", html.display());

    info!("Generating Excel report...");
    let spreadsheet = write_spreadsheet(&report, domain, reports_dir, timestamp)?;

    Ok((
        report,
        ReportFiles {
            json,
            charts,
            html,
            spreadsheet,
        },
    ))
}

/// End-to-end workflow: crawl a site, audit the exports, deliver reports
pub struct EndToEndWorkflow {
    domain: String,
    timestamp: String,
    paths: RunPaths,
    driver: Box<dyn CrawlDriver>,
    options: CrawlOptions,
    top_issues: usize,
}

impl EndToEndWorkflow {
    /// Creates the workflow and its run directory under the projects root
    ///
    /// # Arguments
    ///
    /// * `domain` - The domain being audited
    /// * `config` - Resolved pipeline configuration
    ///
    /// # Returns
    ///
    /// * `Ok(EndToEndWorkflow)` - Ready to run
    /// * `Err(AuditError)` - Directory creation or driver construction failed
    pub fn new(domain: &str, config: &Config) -> Result<Self> {
        let timestamp = run_timestamp();
        let base = config
            .report
            .projects_dir
            .join(format!("{}_{}", domain, timestamp));
        let paths = RunPaths::create(base)?;
        let driver = build_driver(config, paths.exports.clone())?;

        info!("Initialized End-to-End SEO workflow for {}", domain);
        info!("Base directory: {}", paths.base.display());

        Ok(Self {
            domain: domain.to_string(),
            timestamp,
            paths,
            driver,
            options: config.crawl_options(),
            top_issues: config.report.top_issues,
        })
    }

    /// Where this run keeps its exports and reports
    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    /// Runs the complete workflow against `target`
    ///
    /// The crawl and audit stages abort the run on failure; a failed email
    /// delivery is logged but does not fail an otherwise complete run.
    pub async fn run(
        &self,
        target: &CrawlTarget,
        email: Option<&EmailSettings>,
    ) -> Result<ReportFiles> {
        info!(
            "Starting complete end-to-end SEO workflow for {}",
            self.domain
        );

        self.run_crawl(target).await?;

        let (report, files) = run_audit_stage(
            &self.paths.exports,
            &self.paths.reports,
            &self.domain,
            &self.timestamp,
            self.top_issues,
        )?;

        if let Some(settings) = email {
            if let Err(e) = send_report_email(
                settings,
                &self.domain,
                &self.timestamp,
                &report.summary,
                &files,
            ) {
                error!("Failed to send email: {}", e);
            }
        }

        info!("End-to-end SEO workflow completed for {}", self.domain);
        info!("All reports available in {}", self.paths.reports.display());
        Ok(files)
    }

    async fn run_crawl(&self, target: &CrawlTarget) -> Result<()> {
        if self.crawl_steps(target).await.is_none() {
            error!("Spider crawl failed. Workflow aborted.");
            return Err(AuditError::Crawl(format!(
                "{} crawl of {} failed",
                self.driver.name(),
                target
            )));
        }

        info!(
            "Spider crawl completed. Exports saved to {}",
            self.paths.exports.display()
        );
        Ok(())
    }

    /// Drivers log failure specifics at the point of failure; `None` here
    /// only marks which stage stopped the run.
    async fn crawl_steps(&self, target: &CrawlTarget) -> Option<()> {
        if !self.driver.is_available().await {
            return None;
        }

        let mut handle = self.driver.start(target, &self.options).await?;

        if self.driver.wait(&mut handle).await != CrawlOutcome::Finished {
            return None;
        }

        self.driver
            .export(&handle, &self.options.export_tabs)
            .await?;
        Some(())
    }
}

/// Audit-only workflow over exports an earlier crawl already produced
pub struct ExportsWorkflow {
    domain: String,
    timestamp: String,
    exports_path: PathBuf,
    paths: RunPaths,
    top_issues: usize,
}

impl ExportsWorkflow {
    /// Creates the workflow and its run directory
    ///
    /// The run lands under the outputs root unless `output_path` overrides
    /// the base directory outright.
    ///
    /// # Arguments
    ///
    /// * `domain` - The domain being audited
    /// * `exports_path` - Directory holding existing spider exports
    /// * `output_path` - Optional base directory override for this run
    /// * `config` - Resolved pipeline configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ExportsWorkflow)` - Ready to run
    /// * `Err(AuditError)` - Directory creation failed
    pub fn new(
        domain: &str,
        exports_path: PathBuf,
        output_path: Option<PathBuf>,
        config: &Config,
    ) -> Result<Self> {
        let timestamp = run_timestamp();
        let base = output_path.unwrap_or_else(|| {
            config
                .report
                .outputs_dir
                .join(format!("{}_{}", domain, timestamp))
        });
        let paths = RunPaths::create(base)?;

        info!("Initialized SEO workflow for {}", domain);
        info!("Exports path: {}", exports_path.display());
        info!("Output path: {}", paths.base.display());

        Ok(Self {
            domain: domain.to_string(),
            timestamp,
            exports_path,
            paths,
            top_issues: config.report.top_issues,
        })
    }

    /// Where this run keeps its exports and reports
    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    /// Runs the copy, audit, and delivery stages
    pub fn run(&self, email: Option<&EmailSettings>) -> Result<ReportFiles> {
        info!("Starting complete SEO audit workflow for {}", self.domain);

        self.copy_exports()?;

        let (report, files) = match run_audit_stage(
            &self.paths.exports,
            &self.paths.reports,
            &self.domain,
            &self.timestamp,
            self.top_issues,
        ) {
            Ok(result) => result,
            Err(e) => {
                error!("Audit failed. Workflow aborted.");
                return Err(e);
            }
        };

        if let Some(settings) = email {
            if let Err(e) = send_report_email(
                settings,
                &self.domain,
                &self.timestamp,
                &report.summary,
                &files,
            ) {
                error!("Failed to send email: {}", e);
            }
        }

        info!("SEO audit workflow completed for {}", self.domain);
        Ok(files)
    }

    /// Copies the source CSV exports into the run's exports directory
    fn copy_exports(&self) -> Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.exports_path)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_string_lossy().ends_with(".csv") {
                fs::copy(entry.path(), self.paths.exports.join(&name))?;
                count += 1;
            }
        }

        info!(
            "Copied {} export files to {}",
            count,
            self.paths.exports.display()
        );
        Ok(count)
    }
}
