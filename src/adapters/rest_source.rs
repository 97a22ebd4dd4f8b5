use crate::domain::model::{ClientUpdate, Milestone, Project, Resource, Snapshot, Task};
use crate::domain::ports::SnapshotSource;
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// Lists snapshot tables from a PostgREST-style backend, scoped to one owner.
pub struct RestSnapshotSource {
    client: Client,
    endpoint: String,
    owner_id: String,
    headers: HeaderMap,
}

impl RestSnapshotSource {
    pub fn new(
        endpoint: &str,
        owner_id: &str,
        headers: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                DashboardError::ConfigError {
                    message: format!("Invalid header name '{}': {}", name, e),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| DashboardError::ConfigError {
                message: format!("Invalid value for header '{}': {}", name.as_str(), e),
            })?;
            header_map.insert(name, value);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            owner_id: owner_id.to_string(),
            headers: header_map,
        })
    }

    async fn list<T: DeserializeOwned>(&self, table: &str, order: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.endpoint, table);
        let owner_filter = format!("eq.{}", self.owner_id);

        tracing::debug!("Listing {} (order={})", url, order);
        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .query(&[
                ("select", "*"),
                ("user_id", owner_filter.as_str()),
                ("order", order),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("{} responded with {}", table, status);
        if !status.is_success() {
            return Err(DashboardError::SourceError {
                message: format!("listing {} returned HTTP {}", table, status),
            });
        }

        let rows: Vec<T> = response.json().await?;
        Ok(rows)
    }
}

#[async_trait]
impl SnapshotSource for RestSnapshotSource {
    fn describe(&self) -> String {
        format!("backend {} (owner {})", self.endpoint, self.owner_id)
    }

    async fn fetch(&self) -> Result<Snapshot> {
        let (projects, milestones, resources, tasks, client_updates) = tokio::try_join!(
            self.list::<Project>("projects", "created_at.desc"),
            self.list::<Milestone>("milestones", "due_date.asc"),
            self.list::<Resource>("resources", "created_at.desc"),
            self.list::<Task>("tasks", "created_at.desc"),
            self.list::<ClientUpdate>("client_updates", "created_at.desc"),
        )?;

        Ok(Snapshot {
            projects,
            milestones,
            resources,
            tasks,
            client_updates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_header_name() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "x".to_string());

        let result = RestSnapshotSource::new(
            "https://example.supabase.co/rest/v1",
            "u1",
            &headers,
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(DashboardError::ConfigError { .. })));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let source = RestSnapshotSource::new(
            "https://example.supabase.co/rest/v1/",
            "u1",
            &HashMap::new(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(source.describe(), "backend https://example.supabase.co/rest/v1 (owner u1)");
    }
}
