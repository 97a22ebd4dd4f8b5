use crate::core::integrity::validate_snapshot;
use crate::core::report::{build_report, render_json, render_projects_csv, DashboardReport, ReportFormat};
use crate::core::{ConfigProvider, Snapshot, SnapshotSource, Storage};
use crate::utils::error::{DashboardError, Result};
use chrono::{DateTime, Utc};

pub struct DashboardEngine<S: SnapshotSource, T: Storage, C: ConfigProvider> {
    source: S,
    storage: T,
    config: C,
}

impl<S: SnapshotSource, T: Storage, C: ConfigProvider> DashboardEngine<S, T, C> {
    pub fn new(source: S, storage: T, config: C) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    pub async fn extract(&self) -> Result<Snapshot> {
        tracing::info!("📥 Fetching snapshot from {}", self.source.describe());
        let snapshot = self.source.fetch().await?;
        tracing::info!(
            "Fetched {} projects and {} milestones",
            snapshot.projects.len(),
            snapshot.milestones.len()
        );
        Ok(snapshot)
    }

    pub fn aggregate(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> DashboardReport {
        let issues = validate_snapshot(snapshot);
        for issue in &issues {
            tracing::warn!("⚠️ {}", issue);
        }

        let report = build_report(
            snapshot,
            now,
            self.config.upcoming_limit(),
            self.config.recent_limit(),
            issues.len(),
        );
        tracing::info!(
            "📊 {} active of {} projects, budget utilization {}%, {} overdue milestones",
            report.portfolio.active_count,
            report.portfolio.total_count,
            report.portfolio.utilization_percent,
            report.overdue_milestones
        );
        report
    }

    /// 依設定的格式寫出報表，回傳寫出的路徑
    pub async fn load(&self, report: &DashboardReport) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for raw in self.config.output_formats() {
            let format = ReportFormat::parse(raw).ok_or_else(|| {
                DashboardError::InvalidConfigValueError {
                    field: "report.output_formats".to_string(),
                    value: raw.clone(),
                    reason: format!("Valid formats: {}", ReportFormat::ALL.join(", ")),
                }
            })?;

            let data = match format {
                ReportFormat::Json => render_json(report)?,
                ReportFormat::Csv => render_projects_csv(report)?,
            };

            tracing::debug!("Writing {} ({} bytes)", format.file_name(), data.len());
            self.storage.write_file(format.file_name(), &data).await?;
            written.push(format!("{}/{}", self.config.output_path(), format.file_name()));
        }

        Ok(written)
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        tracing::info!("Starting dashboard aggregation (now = {})", now.to_rfc3339());

        let snapshot = self.extract().await?;
        let report = self.aggregate(&snapshot, now);
        let written = self.load(&report).await?;

        for path in &written {
            tracing::info!("📁 Report saved to: {}", path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DashboardError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| DashboardError::SourceError {
                message: format!("no such file: {}", path),
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct StaticSource(Snapshot);

    #[async_trait]
    impl SnapshotSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn fetch(&self) -> Result<Snapshot> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SnapshotSource for FailingSource {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        async fn fetch(&self) -> Result<Snapshot> {
            Err(DashboardError::SourceError {
                message: "HTTP 503".to_string(),
            })
        }
    }

    struct TestConfig {
        formats: Vec<String>,
    }

    impl ConfigProvider for TestConfig {
        fn output_path(&self) -> &str {
            "./out"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn upcoming_limit(&self) -> usize {
            5
        }

        fn recent_limit(&self) -> usize {
            5
        }
    }

    fn snapshot() -> Snapshot {
        serde_json::from_value(serde_json::json!({
            "projects": [{"id": "p1", "name": "Kitchen", "status": "active", "budget": 400, "actual_cost": 100}],
            "milestones": [{"id": "m1", "project_id": "p1", "status": "pending", "due_date": "2024-05-01"}]
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_run_writes_all_formats() {
        let storage = MockStorage::new();
        let config = TestConfig {
            formats: vec!["json".to_string(), "csv".to_string()],
        };
        let engine = DashboardEngine::new(StaticSource(snapshot()), storage.clone(), config);

        let written = engine.run(now()).await.unwrap();
        assert_eq!(written, vec!["./out/dashboard.json", "./out/projects.csv"]);

        let json = storage.get_file("dashboard.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["portfolio"]["utilization_percent"], 25);
        assert_eq!(value["overdue_milestones"], 1);

        let csv = String::from_utf8(storage.get_file("projects.csv").await.unwrap()).unwrap();
        assert!(csv.contains("p1,Kitchen,active"));
    }

    #[tokio::test]
    async fn test_unknown_format_is_rejected() {
        let config = TestConfig {
            formats: vec!["xlsx".to_string()],
        };
        let engine = DashboardEngine::new(StaticSource(snapshot()), MockStorage::new(), config);

        let result = engine.run(now()).await;
        assert!(matches!(
            result,
            Err(DashboardError::InvalidConfigValueError { .. })
        ));
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let config = TestConfig {
            formats: vec!["json".to_string()],
        };
        let storage = MockStorage::new();
        let engine = DashboardEngine::new(FailingSource, storage.clone(), config);

        let result = engine.run(now()).await;
        assert!(matches!(result, Err(DashboardError::SourceError { .. })));
        assert!(storage.get_file("dashboard.json").await.is_none());
    }

    #[test]
    fn test_aggregate_keeps_duplicate_projects_and_counts_issue() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "projects": [
                {"id": "p", "name": "A", "status": "active"},
                {"id": "p", "name": "B", "status": "active"}
            ]
        }))
        .unwrap();
        let config = TestConfig {
            formats: vec!["json".to_string()],
        };
        let engine = DashboardEngine::new(StaticSource(snapshot.clone()), MockStorage::new(), config);

        let report = engine.aggregate(&snapshot, now());
        let names: Vec<&str> = report.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(report.issue_count, 1);
    }
}
