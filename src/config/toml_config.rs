use crate::core::ConfigProvider;
use crate::core::report::ReportFormat;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 100;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub owner_id: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub upcoming_limit: Option<usize>,
    pub recent_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Rest,
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["json".to_string()]
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            upcoming_limit: None,
            recent_limit: None,
        }
    }
}

impl SourceConfig {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            r#type: "file".to_string(),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn rest(endpoint: impl Into<String>, owner_id: Option<String>) -> Self {
        Self {
            r#type: "rest".to_string(),
            endpoint: Some(endpoint.into()),
            owner_id,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> Result<SourceKind> {
        match self.r#type.trim().to_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "rest" => Ok(SourceKind::Rest),
            other => Err(DashboardError::InvalidConfigValueError {
                field: "source.type".to_string(),
                value: other.to_string(),
                reason: "Valid source types: file, rest".to_string(),
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.headers.clone().unwrap_or_default()
    }
}

impl DashboardConfig {
    pub fn new(source: SourceConfig) -> Self {
        Self {
            source,
            report: ReportConfig::default(),
            logging: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        match self.source.kind()? {
            SourceKind::File => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                validation::validate_path("source.path", path)?;
                validation::validate_file_extension("source.path", path, &["json"])?;
            }
            SourceKind::Rest => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                validation::validate_url("source.endpoint", endpoint)?;

                let owner =
                    validation::validate_required_field("source.owner_id", &self.source.owner_id)?;
                validation::validate_non_empty_string("source.owner_id", owner)?;

                if let Some(timeout) = self.source.timeout_seconds {
                    validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
                }
            }
        }

        validation::validate_path("report.output_path", &self.report.output_path)?;

        if self.report.output_formats.is_empty() {
            return Err(DashboardError::MissingConfigError {
                field: "report.output_formats".to_string(),
            });
        }
        for format in &self.report.output_formats {
            if ReportFormat::parse(format).is_none() {
                return Err(DashboardError::InvalidConfigValueError {
                    field: "report.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        ReportFormat::ALL.join(", ")
                    ),
                });
            }
        }

        if let Some(limit) = self.report.upcoming_limit {
            validation::validate_range("report.upcoming_limit", limit, 1, MAX_LIMIT)?;
        }
        if let Some(limit) = self.report.recent_limit {
            validation::validate_range("report.recent_limit", limit, 1, MAX_LIMIT)?;
        }

        if let Some(level) = self.log_level() {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(DashboardError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for DashboardConfig {
    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.report.output_formats
    }

    fn upcoming_limit(&self) -> usize {
        self.report.upcoming_limit.unwrap_or(DEFAULT_LIMIT)
    }

    fn recent_limit(&self) -> usize {
        self.report.recent_limit.unwrap_or(DEFAULT_LIMIT)
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_rest_config() {
        let toml_content = r#"
[source]
type = "rest"
endpoint = "https://example.supabase.co/rest/v1"
owner_id = "user-1"
timeout_seconds = 10
headers = { apikey = "anon-key" }

[report]
output_path = "./reports"
output_formats = ["json", "csv"]
upcoming_limit = 3

[logging]
level = "debug"
json = true
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source.kind().unwrap(), SourceKind::Rest);
        assert_eq!(config.source.timeout(), Duration::from_secs(10));
        assert_eq!(config.source.headers()["apikey"], "anon-key");
        assert_eq!(config.upcoming_limit(), 3);
        assert_eq!(config.recent_limit(), 5);
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_report_section_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
[source]
type = "file"
path = "snapshot.json"
"#,
        )
        .unwrap();

        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.output_formats(), &["json".to_string()]);
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SITE_PULSE_TEST_OWNER", "owner-42");

        let toml_content = r#"
[source]
type = "rest"
endpoint = "https://example.supabase.co/rest/v1"
owner_id = "${SITE_PULSE_TEST_OWNER}"
headers = { apikey = "${SITE_PULSE_TEST_UNSET_KEY}" }
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.owner_id.as_deref(), Some("owner-42"));
        assert_eq!(
            config.source.headers()["apikey"],
            "${SITE_PULSE_TEST_UNSET_KEY}"
        );

        std::env::remove_var("SITE_PULSE_TEST_OWNER");
    }

    #[test]
    fn test_config_validation_failures() {
        let mut config = DashboardConfig::new(SourceConfig::rest("invalid-url", Some("u1".into())));
        assert!(config.validate().is_err());

        config.source = SourceConfig::rest("https://example.com", None);
        assert!(matches!(
            config.validate(),
            Err(DashboardError::MissingConfigError { .. })
        ));

        config.source = SourceConfig::file("snapshot.csv");
        assert!(config.validate().is_err());

        config.source = SourceConfig::file("snapshot.json");
        config.report.output_formats = vec!["xlsx".to_string()];
        assert!(config.validate().is_err());

        config.report.output_formats = vec!["csv".to_string()];
        config.report.recent_limit = Some(0);
        assert!(config.validate().is_err());

        config.report.recent_limit = None;
        config.source.r#type = "ftp".to_string();
        assert!(matches!(
            config.validate(),
            Err(DashboardError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = DashboardConfig::from_toml_str("[source\ntype = ");
        assert!(matches!(
            result,
            Err(DashboardError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[source]
type = "file"
path = "exports/snapshot.json"

[report]
output_formats = ["csv"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = DashboardConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.source.path.as_deref(), Some("exports/snapshot.json"));
        assert_eq!(config.output_formats(), &["csv".to_string()]);
    }
}
