//! Email delivery of finished audit reports
//!
//! Builds a multipart message with an HTML summary body and every generated
//! report attached, then hands it to the configured SMTP relay over STARTTLS.

use std::fs;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::info;

use crate::audit::AuditSummary;
use crate::report::escape;
use crate::workflow::ReportFiles;

/// Errors that can occur while assembling or sending the report email
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to assemble message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Invalid attachment content type: {0}")]
    ContentType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connection and addressing details for report delivery
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub recipients: Vec<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
}

/// Sends the report email for one finished run
///
/// The body carries the summary counts; every report file that exists is
/// attached. Missing files are skipped rather than treated as errors.
///
/// # Arguments
///
/// * `settings` - SMTP relay and recipient details
/// * `domain` - Audited domain, used in the subject and body
/// * `timestamp` - Run timestamp, used in the subject
/// * `summary` - Summary counts rendered into the body
/// * `files` - Artifacts from the run to attach
///
/// # Returns
///
/// * `Ok(())` - The relay accepted the message
/// * `Err(DeliveryError)` - Assembly or submission failed
pub fn send_report_email(
    settings: &EmailSettings,
    domain: &str,
    timestamp: &str,
    summary: &AuditSummary,
    files: &ReportFiles,
) -> Result<(), DeliveryError> {
    info!("Sending email report to {}", settings.recipients.join(", "));

    let mut builder = Message::builder()
        .from(settings.smtp_user.parse()?)
        .subject(format!("SEO Audit Report for {} - {}", domain, timestamp));
    for recipient in &settings.recipients {
        builder = builder.to(recipient.parse()?);
    }

    let mut parts =
        MultiPart::mixed().singlepart(SinglePart::html(render_email_body(domain, summary)));

    for path in files.all() {
        if !path.exists() {
            continue;
        }
        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let content_type = ContentType::parse("application/octet-stream")
            .map_err(|e| DeliveryError::ContentType(e.to_string()))?;
        parts = parts.singlepart(Attachment::new(filename).body(fs::read(path)?, content_type));
    }

    let message = builder.multipart(parts)?;

    let mailer = SmtpTransport::starttls_relay(&settings.smtp_server)?
        .port(settings.smtp_port)
        .credentials(Credentials::new(
            settings.smtp_user.clone(),
            settings.smtp_password.clone(),
        ))
        .build();

    mailer.send(&message)?;
    info!("Email sent successfully");
    Ok(())
}

/// Renders the HTML summary body of the report email
fn render_email_body(domain: &str, summary: &AuditSummary) -> String {
    let mut body = String::new();

    body.push_str("<html>\n<body>\n");
    body.push_str(&format!(
        "    <h1>SEO Audit Report for {}</h1>\n",
        escape(domain)
    ));
    body.push_str(&format!("    <p>Date: {}</p>\n", escape(&summary.date)));
    body.push_str("    <h2>Summary of Findings</h2>\n");
    body.push_str("    <ul>\n");
    body.push_str(&format!(
        "        <li><strong>Total Issues:</strong> {}</li>\n",
        summary.total_issues
    ));
    body.push_str(&format!(
        "        <li><strong>Critical Issues:</strong> {}</li>\n",
        summary.critical_count
    ));
    body.push_str(&format!(
        "        <li><strong>High Priority Issues:</strong> {}</li>\n",
        summary.high_count
    ));
    body.push_str(&format!(
        "        <li><strong>Medium Priority Issues:</strong> {}</li>\n",
        summary.medium_count
    ));
    body.push_str(&format!(
        "        <li><strong>Low Priority Issues:</strong> {}</li>\n",
        summary.low_count
    ));
    body.push_str("    </ul>\n");
    body.push_str("    <p>Please see the attached reports for details.</p>\n");
    body.push_str("    <p>This report was automatically generated.</p>\n");
    body.push_str("</body>\n</html>\n");

    body
}
