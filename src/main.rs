//! SEO-Audit main entry point
//!
//! This is the command-line interface for the SEO audit pipeline.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use seo_audit::config::{load_config_or_default, Config};
use seo_audit::spider::{CrawlTarget, DriverKind};
use seo_audit::workflow::{EmailSettings, EndToEndWorkflow, ExportsWorkflow};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SEO-Audit: automated technical SEO audits
///
/// SEO-Audit drives an external SEO spider over a site, loads the CSV
/// exports it produces, applies a catalog of technical SEO checks, and
/// renders prioritized JSON, HTML, chart, and Excel reports that can be
/// emailed to stakeholders.
#[derive(Parser, Debug)]
#[command(name = "seo-audit")]
#[command(version = "1.0.0")]
#[command(about = "Automated technical SEO audits", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site with the spider, then audit its exports
    Run(RunArgs),

    /// Audit export files an earlier crawl already produced
    Audit(AuditArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Domain being audited (e.g. example.com)
    #[arg(long)]
    domain: String,

    /// URL to crawl (e.g. https://example.com)
    #[arg(long, value_name = "URL")]
    crawl_url: Option<String>,

    /// File of URLs to crawl instead of spidering outward
    #[arg(long, value_name = "FILE", conflicts_with = "crawl_url")]
    url_list: Option<PathBuf>,

    /// Crawl strategy: spider subprocess or HTTP control API
    #[arg(long, value_enum)]
    driver: Option<DriverKind>,

    /// Path to the spider executable
    #[arg(long, value_name = "PATH")]
    spider_path: Option<PathBuf>,

    /// Base URL of the spider's HTTP control API
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Maximum URLs to crawl
    #[arg(long)]
    max_urls: Option<u32>,

    /// Path to a spider configuration file
    #[arg(long, value_name = "FILE")]
    spider_config: Option<PathBuf>,

    #[command(flatten)]
    email: EmailArgs,
}

#[derive(Args, Debug)]
struct AuditArgs {
    /// Domain being audited (e.g. example.com)
    #[arg(long)]
    domain: String,

    /// Directory containing spider export files
    #[arg(long, value_name = "DIR")]
    exports_path: PathBuf,

    /// Output directory for this run (defaults under the outputs root)
    #[arg(long, value_name = "DIR")]
    output_path: Option<PathBuf>,

    #[command(flatten)]
    email: EmailArgs,
}

#[derive(Args, Debug)]
struct EmailArgs {
    /// Send the reports by email when the run completes
    #[arg(long)]
    send_email: bool,

    /// Comma-separated list of email recipients
    #[arg(long, value_name = "ADDRS", value_delimiter = ',')]
    email_recipients: Vec<String>,

    /// SMTP server for sending email
    #[arg(long, value_name = "HOST")]
    smtp_server: Option<String>,

    /// SMTP port (default: 587)
    #[arg(long, value_name = "PORT")]
    smtp_port: Option<u16>,

    /// SMTP username
    #[arg(long, value_name = "USER")]
    smtp_user: Option<String>,

    /// SMTP password
    #[arg(
        long,
        value_name = "PASS",
        env = "SEO_AUDIT_SMTP_PASSWORD",
        hide_env_values = true
    )]
    smtp_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    if let Some(path) = cli.config.as_deref() {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Run(args) => handle_run(args, config).await,
        Command::Audit(args) => handle_audit(args, config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_audit=info,warn"),
            1 => EnvFilter::new("seo_audit=debug,info"),
            2 => EnvFilter::new("seo_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the `run` subcommand: crawl a site, then audit and report
async fn handle_run(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(driver) = args.driver {
        config.spider.driver = driver;
    }
    if let Some(path) = args.spider_path {
        config.spider.executable = Some(path);
    }
    if let Some(url) = args.api_url {
        config.spider.api_url = url;
    }
    if let Some(max_urls) = args.max_urls {
        config.crawl.max_urls = Some(max_urls);
    }
    if let Some(file) = args.spider_config {
        config.spider.config_file = Some(file);
    }

    let target = if let Some(url) = args.crawl_url {
        CrawlTarget::Url(url)
    } else if let Some(path) = args.url_list {
        CrawlTarget::UrlList(path)
    } else {
        bail!("Either --crawl-url or --url-list must be provided");
    };

    let email = resolve_email(&args.email, &config)?;

    let workflow = EndToEndWorkflow::new(&args.domain, &config)?;
    workflow.run(&target, email.as_ref()).await?;

    Ok(())
}

/// Handles the `audit` subcommand: audit exports that already exist
fn handle_audit(args: AuditArgs, config: Config) -> anyhow::Result<()> {
    let email = resolve_email(&args.email, &config)?;

    let workflow =
        ExportsWorkflow::new(&args.domain, args.exports_path, args.output_path, &config)?;
    workflow.run(email.as_ref())?;

    Ok(())
}

/// Resolves email delivery settings from CLI flags and the config file
///
/// Explicit flags win over the `[email]` config table. Returns `None` when
/// `--send-email` was not given; incomplete settings are a usage error
/// before any crawl or audit work happens.
fn resolve_email(args: &EmailArgs, config: &Config) -> anyhow::Result<Option<EmailSettings>> {
    if !args.send_email {
        return Ok(None);
    }

    let from_config = config.email.as_ref();

    let recipients = if args.email_recipients.is_empty() {
        from_config
            .map(|email| email.recipients.clone())
            .unwrap_or_default()
    } else {
        args.email_recipients.clone()
    };
    let smtp_server = args
        .smtp_server
        .clone()
        .or_else(|| from_config.map(|email| email.smtp_server.clone()));
    let smtp_port = args
        .smtp_port
        .or_else(|| from_config.map(|email| email.smtp_port))
        .unwrap_or(587);
    let smtp_user = args
        .smtp_user
        .clone()
        .or_else(|| from_config.map(|email| email.smtp_user.clone()));

    match (smtp_server, smtp_user, args.smtp_password.clone()) {
        (Some(server), Some(user), Some(password)) if !recipients.is_empty() => {
            Ok(Some(EmailSettings {
                recipients,
                smtp_server: server,
                smtp_port,
                smtp_user: user,
                smtp_password: password,
            }))
        }
        _ => bail!("Email sending requires recipients, SMTP server, user and password"),
    }
}
