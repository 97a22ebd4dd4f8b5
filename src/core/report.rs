use crate::core::aggregation::{
    overdue_milestone_count, portfolio_summary, project_details, recent_projects,
    upcoming_milestones, PortfolioSummary, ProjectDetailSummary,
};
use crate::core::display::{DisplayTone, Tone};
use crate::domain::model::Snapshot;
use crate::domain::status::{Lexicon, MilestoneStatus, ProjectStatus};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub const ALL: [&'static str; 2] = ["json", "csv"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Json => "dashboard.json",
            ReportFormat::Csv => "projects.csv",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneDigest {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub status: MilestoneStatus,
    pub status_label: String,
    pub tone: Tone,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDigest {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub status_label: String,
    pub tone: Tone,
    pub budget: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub portfolio: PortfolioSummary,
    pub overdue_milestones: usize,
    pub upcoming_milestones: Vec<MilestoneDigest>,
    pub recent_projects: Vec<ProjectDigest>,
    pub projects: Vec<ProjectDetailSummary>,
    pub issue_count: usize,
}

pub fn build_report(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    upcoming_limit: usize,
    recent_limit: usize,
    issue_count: usize,
) -> DashboardReport {
    let upcoming = upcoming_milestones(&snapshot.milestones, upcoming_limit)
        .into_iter()
        .map(|m| {
            let status = m.effective_status(now);
            MilestoneDigest {
                id: m.id.clone(),
                project_id: m.project_id.clone(),
                title: m.title.clone(),
                due_date: m.due_date,
                status_label: status.label(),
                tone: status.tone(),
                status,
                progress: m.progress.unwrap_or(0.0),
            }
        })
        .collect();

    let recent = recent_projects(&snapshot.projects, recent_limit)
        .into_iter()
        .map(|p| ProjectDigest {
            id: p.id.clone(),
            name: p.name.clone(),
            status: p.status.clone(),
            status_label: p.status.label(),
            tone: p.status.tone(),
            budget: p.budget_or_zero(),
        })
        .collect();

    DashboardReport {
        generated_at: now,
        portfolio: portfolio_summary(&snapshot.projects),
        overdue_milestones: overdue_milestone_count(&snapshot.milestones, now),
        upcoming_milestones: upcoming,
        recent_projects: recent,
        projects: project_details(snapshot, now),
        issue_count,
    }
}

#[derive(Debug, Serialize)]
struct ProjectCsvRow<'a> {
    id: &'a str,
    name: &'a str,
    status: &'a str,
    budget: f64,
    actual_cost: f64,
    utilization_percent: u64,
    progress_percent: u8,
    milestones: usize,
    overdue_milestones: usize,
    open_tasks: usize,
    resource_cost: f64,
}

/// 每個專案一列
pub fn render_projects_csv(report: &DashboardReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for detail in &report.projects {
        writer.serialize(ProjectCsvRow {
            id: &detail.project_id,
            name: &detail.name,
            status: detail.status.as_str(),
            budget: detail.budget,
            actual_cost: detail.actual_cost,
            utilization_percent: detail.utilization_percent,
            progress_percent: detail.progress_percent,
            milestones: detail.milestone_count,
            overdue_milestones: detail.overdue_milestones,
            open_tasks: detail.tasks.total_count - detail.tasks.completed_count,
            resource_cost: detail.resources.total_cost,
        })?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::utils::error::DashboardError::IoError(e.into_error()))
}

pub fn render_json(report: &DashboardReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}
