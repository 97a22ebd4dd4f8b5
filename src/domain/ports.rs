use crate::domain::model::Snapshot;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn upcoming_limit(&self) -> usize;
    fn recent_limit(&self) -> usize;
}

/// Where a snapshot comes from: an exported file or the hosted backend.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<Snapshot>;
}

#[async_trait]
impl SnapshotSource for Box<dyn SnapshotSource> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    async fn fetch(&self) -> Result<Snapshot> {
        (**self).fetch().await
    }
}
