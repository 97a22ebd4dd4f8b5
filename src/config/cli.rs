use crate::config::toml_config::{DashboardConfig, SourceConfig};
use crate::utils::error::{DashboardError, Result};
use clap::Parser;
use std::collections::HashMap;

#[derive(Debug, Clone, Parser)]
#[command(name = "site-pulse")]
#[command(about = "Portfolio and project progress summaries for construction projects")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON snapshot exported from the backend
    #[arg(long, conflicts_with = "endpoint")]
    pub snapshot: Option<String>,

    /// Base REST endpoint, e.g. https://<project>.supabase.co/rest/v1
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Owner (user id) every list query is scoped to
    #[arg(long)]
    pub owner: Option<String>,

    /// Sent as `apikey` and bearer token
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Report formats: json, csv
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Reference time (RFC 3339 or YYYY-MM-DD); defaults to the current time
    #[arg(long)]
    pub now: Option<String>,

    #[arg(long)]
    pub upcoming_limit: Option<usize>,

    #[arg(long)]
    pub recent_limit: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    /// Fetch and summarize without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 合併配置檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::new(self.source_from_flags()?),
        };

        if self.config.is_some() && (self.snapshot.is_some() || self.endpoint.is_some()) {
            config.source = self.source_from_flags()?;
        }
        if let Some(owner) = &self.owner {
            config.source.owner_id = Some(owner.clone());
        }
        if let Some(key) = &self.api_key {
            config
                .source
                .headers
                .get_or_insert_with(HashMap::new)
                .extend(api_key_headers(key));
        }
        if let Some(path) = &self.output_path {
            config.report.output_path = path.clone();
        }
        if !self.format.is_empty() {
            config.report.output_formats = self.format.clone();
        }
        if self.upcoming_limit.is_some() {
            config.report.upcoming_limit = self.upcoming_limit;
        }
        if self.recent_limit.is_some() {
            config.report.recent_limit = self.recent_limit;
        }

        Ok(config)
    }

    fn source_from_flags(&self) -> Result<SourceConfig> {
        match (&self.snapshot, &self.endpoint) {
            (Some(path), _) => Ok(SourceConfig::file(path.clone())),
            (None, Some(endpoint)) => Ok(SourceConfig::rest(endpoint.clone(), self.owner.clone())),
            (None, None) => Err(DashboardError::MissingConfigError {
                field: "--snapshot, --endpoint or --config".to_string(),
            }),
        }
    }
}

fn api_key_headers(key: &str) -> [(String, String); 2] {
    [
        ("apikey".to_string(), key.to_string()),
        ("Authorization".to_string(), format!("Bearer {}", key)),
    ]
}
