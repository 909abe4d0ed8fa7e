use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use seo_audit::config::load_config;
///
/// let config = load_config(Path::new("seo-audit.toml")).unwrap();
/// println!("Driver: {:?}", config.spider.driver);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Loads the configuration if a path was given, otherwise the defaults
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - The loaded or default configuration
/// * `Err(ConfigError)` - A file was given but could not be loaded
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spider::DriverKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[spider]
driver = "api"
api-url = "http://localhost:9999"
poll-interval-secs = 5
wait-timeout-secs = 600

[crawl]
max-urls = 500
include-subdomains = true
export-tabs = ["Internal:All", "Response Codes"]

[report]
top-issues = 5
projects-dir = "runs"

[email]
recipients = ["team@example.com"]
smtp-server = "smtp.example.com"
smtp-user = "reports@example.com"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.spider.driver, DriverKind::Api);
        assert_eq!(config.spider.api_url, "http://localhost:9999");
        assert_eq!(config.spider.poll_interval_secs, 5);
        assert_eq!(config.crawl.max_urls, Some(500));
        assert!(config.crawl.include_subdomains);
        assert_eq!(config.crawl.resolved_export_tabs().len(), 2);
        assert_eq!(config.report.top_issues, 5);
        assert_eq!(config.report.projects_dir.to_str(), Some("runs"));

        let email = config.email.unwrap();
        assert_eq!(email.recipients, vec!["team@example.com"]);
        assert_eq!(email.smtp_port, 587);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.spider.driver, DriverKind::Cli);
        assert_eq!(config.spider.api_url, "http://localhost:8777");
        assert_eq!(config.spider.poll_interval_secs, 10);
        assert_eq!(config.spider.wait_timeout_secs, 3600);
        assert_eq!(config.report.top_issues, 3);
        assert!(config.email.is_none());
        assert_eq!(config.crawl.resolved_export_tabs().len(), 10);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/seo-audit.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawl]
export-tabs = ["No Such Tab"]
"#;
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_no_path_yields_defaults() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.spider.driver, DriverKind::Cli);
    }
}
