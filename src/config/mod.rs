#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{DashboardConfig, ReportConfig, SourceConfig, SourceKind};

use crate::domain::model::parse_timestamp;
use crate::utils::error::{DashboardError, Result};
use chrono::{DateTime, Utc};

/// 參考時間：未指定時才讀取系統時鐘
pub fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        None => Ok(Utc::now()),
        Some(value) => parse_timestamp(value).ok_or_else(|| DashboardError::InvalidTimestamp {
            value: value.to_string(),
        }),
    }
}
