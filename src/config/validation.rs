use crate::config::types::{Config, CrawlConfig, EmailConfig, ReportConfig, SpiderConfig};
use crate::exports::ExportTab;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_spider_config(&config.spider)?;
    validate_crawl_config(&config.crawl)?;
    validate_report_config(&config.report)?;
    if let Some(email) = &config.email {
        validate_email_config(email)?;
    }
    Ok(())
}

/// Validates spider driver configuration
fn validate_spider_config(config: &SpiderConfig) -> Result<(), ConfigError> {
    if config.poll_interval_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "poll_interval_secs must be >= 1, got {}",
            config.poll_interval_secs
        )));
    }

    if config.wait_timeout_secs < config.poll_interval_secs {
        return Err(ConfigError::Validation(format!(
            "wait_timeout_secs must be >= poll_interval_secs, got {}",
            config.wait_timeout_secs
        )));
    }

    let url = Url::parse(&config.api_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_url: {}", e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_url must use http or https, got '{}'",
            config.api_url
        )));
    }

    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if let Some(max_urls) = config.max_urls {
        if max_urls < 1 {
            return Err(ConfigError::Validation(format!(
                "max_urls must be >= 1, got {}",
                max_urls
            )));
        }
    }

    if let Some(tabs) = &config.export_tabs {
        if tabs.is_empty() {
            return Err(ConfigError::Validation(
                "export_tabs cannot be empty".to_string(),
            ));
        }
        for name in tabs {
            if ExportTab::from_api_name(name).is_none() {
                return Err(ConfigError::Validation(format!(
                    "Unknown export tab '{}'",
                    name
                )));
            }
        }
    }

    Ok(())
}

/// Validates report generation configuration
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.top_issues < 1 {
        return Err(ConfigError::Validation(format!(
            "top_issues must be >= 1, got {}",
            config.top_issues
        )));
    }

    Ok(())
}

/// Validates email delivery configuration
fn validate_email_config(config: &EmailConfig) -> Result<(), ConfigError> {
    if config.recipients.is_empty() {
        return Err(ConfigError::Validation(
            "Email recipients cannot be empty".to_string(),
        ));
    }
    for recipient in &config.recipients {
        validate_email(recipient)?;
    }

    if config.smtp_server.is_empty() {
        return Err(ConfigError::Validation(
            "smtp_server cannot be empty".to_string(),
        ));
    }

    if config.smtp_port == 0 {
        return Err(ConfigError::Validation(
            "smtp_port cannot be 0".to_string(),
        ));
    }

    if config.smtp_user.is_empty() {
        return Err(ConfigError::Validation(
            "smtp_user cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "Email address cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("reports@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_poll_interval_bounds() {
        let mut config = Config::default();
        config.spider.poll_interval_secs = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        let mut config = Config::default();
        config.spider.wait_timeout_secs = 5;
        config.spider.poll_interval_secs = 10;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_api_url_must_be_http() {
        let mut config = Config::default();
        config.spider.api_url = "ftp://localhost:8777".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        let mut config = Config::default();
        config.spider.api_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_export_tabs_must_be_known() {
        let mut config = Config::default();
        config.crawl.export_tabs = Some(vec!["Internal:All".to_string()]);
        assert!(validate(&config).is_ok());

        config.crawl.export_tabs = Some(vec!["Unknown Tab".to_string()]);
        assert!(validate(&config).is_err());

        config.crawl.export_tabs = Some(Vec::new());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_email_config_checks() {
        let email = EmailConfig {
            recipients: vec!["user@example.com".to_string()],
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: "reports@example.com".to_string(),
        };

        let mut config = Config::default();
        config.email = Some(email.clone());
        assert!(validate(&config).is_ok());

        let mut no_recipients = email.clone();
        no_recipients.recipients.clear();
        config.email = Some(no_recipients);
        assert!(validate(&config).is_err());

        let mut bad_port = email.clone();
        bad_port.smtp_port = 0;
        config.email = Some(bad_port);
        assert!(validate(&config).is_err());

        let mut bad_recipient = email;
        bad_recipient.recipients = vec!["not-an-address".to_string()];
        config.email = Some(bad_recipient);
        assert!(validate(&config).is_err());
    }
}
