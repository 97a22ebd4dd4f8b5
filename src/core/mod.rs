pub mod aggregation;
pub mod display;
pub mod engine;
pub mod integrity;
pub mod report;

pub use crate::domain::model::Snapshot;
pub use crate::domain::ports::{ConfigProvider, SnapshotSource, Storage};
pub use crate::utils::error::Result;
