use crate::adapters::{FileSnapshotSource, LocalStorage, RestSnapshotSource};
use crate::config::{DashboardConfig, SourceKind};
use crate::core::engine::DashboardEngine;
use crate::core::report::DashboardReport;
use crate::core::{ConfigProvider, SnapshotSource};
use crate::utils::error::{DashboardError, Result};
use chrono::{DateTime, Utc};

/// 依 `source.type` 建立對應的快照來源
pub fn build_source(config: &DashboardConfig) -> Result<Box<dyn SnapshotSource>> {
    let source = &config.source;

    match source.kind()? {
        SourceKind::File => {
            let path = source
                .path
                .clone()
                .ok_or_else(|| DashboardError::MissingConfigError {
                    field: "source.path".to_string(),
                })?;
            // 相對路徑以目前工作目錄為準
            let storage = LocalStorage::new(".".to_string());
            Ok(Box::new(FileSnapshotSource::new(storage, path)))
        }
        SourceKind::Rest => {
            let endpoint =
                source
                    .endpoint
                    .as_deref()
                    .ok_or_else(|| DashboardError::MissingConfigError {
                        field: "source.endpoint".to_string(),
                    })?;
            let owner_id =
                source
                    .owner_id
                    .as_deref()
                    .ok_or_else(|| DashboardError::MissingConfigError {
                        field: "source.owner_id".to_string(),
                    })?;
            let rest = RestSnapshotSource::new(
                endpoint,
                owner_id,
                &source.headers(),
                source.timeout(),
            )?;
            Ok(Box::new(rest))
        }
    }
}

fn engine(
    config: &DashboardConfig,
) -> Result<DashboardEngine<Box<dyn SnapshotSource>, LocalStorage, DashboardConfig>> {
    let source = build_source(config)?;
    let storage = LocalStorage::new(config.output_path().to_string());
    Ok(DashboardEngine::new(source, storage, config.clone()))
}

/// Fetch, aggregate and write the report; returns the written paths.
pub async fn run_with_config(config: &DashboardConfig, now: DateTime<Utc>) -> Result<Vec<String>> {
    engine(config)?.run(now).await
}

/// Fetch and aggregate only. Nothing is written.
pub async fn preview(config: &DashboardConfig, now: DateTime<Utc>) -> Result<DashboardReport> {
    let engine = engine(config)?;
    let snapshot = engine.extract().await?;
    Ok(engine.aggregate(&snapshot, now))
}
