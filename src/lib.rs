pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::{FileSnapshotSource, LocalStorage, RestSnapshotSource};
pub use crate::config::DashboardConfig;
pub use crate::core::aggregation::{
    overdue_milestone_count, portfolio_summary, project_detail, project_progress,
    PortfolioSummary,
};
pub use crate::core::display::{DisplayTone, Tone};
pub use crate::core::engine::DashboardEngine;
pub use crate::domain::model::{ClientUpdate, Milestone, Project, Resource, Snapshot, Task};
pub use crate::utils::error::{DashboardError, Result};
