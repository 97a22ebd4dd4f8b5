//! Derived dashboard metrics.
//!
//! Everything here is a pure function of its arguments: snapshots are borrowed, nothing
//! is mutated, and the reference time is always passed in by the caller.

use crate::domain::model::{Milestone, Project, Resource, Snapshot, Task};
use crate::domain::status::{ProjectStatus, ResourceType, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub active_count: usize,
    pub total_count: usize,
    pub total_budget: f64,
    pub total_actual_cost: f64,
    pub utilization_percent: u64,
}

pub fn portfolio_summary(projects: &[Project]) -> PortfolioSummary {
    let active_count = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Active)
        .count();
    let total_budget: f64 = projects.iter().map(Project::budget_or_zero).sum();
    let total_actual_cost: f64 = projects.iter().map(Project::actual_cost_or_zero).sum();

    PortfolioSummary {
        active_count,
        total_count: projects.len(),
        total_budget,
        total_actual_cost,
        utilization_percent: utilization_percent(total_actual_cost, total_budget),
    }
}

/// `round(actual / budget * 100)`, or 0 when there is no positive budget.
pub fn utilization_percent(actual_cost: f64, budget: f64) -> u64 {
    if budget > 0.0 {
        rounded_percent(actual_cost / budget)
    } else {
        0
    }
}

fn rounded_percent(ratio: f64) -> u64 {
    let percent = (ratio * 100.0).round();
    if percent.is_finite() && percent > 0.0 {
        percent as u64
    } else {
        0
    }
}

pub fn overdue_milestone_count(milestones: &[Milestone], now: DateTime<Utc>) -> usize {
    count_overdue(milestones, now)
}

fn count_overdue<'a, I>(milestones: I, now: DateTime<Utc>) -> usize
where
    I: IntoIterator<Item = &'a Milestone>,
{
    milestones.into_iter().filter(|m| m.is_overdue(now)).count()
}

/// Share of completed milestones as a whole percent; 0 for a project without milestones.
pub fn project_progress(milestones: &[Milestone]) -> u8 {
    completion_percent(milestones)
}

fn completion_percent<'a, I>(milestones: I) -> u8
where
    I: IntoIterator<Item = &'a Milestone>,
{
    let (total, completed) = milestones
        .into_iter()
        .fold((0usize, 0usize), |(total, completed), m| {
            (total + 1, completed + usize::from(m.is_completed()))
        });
    if total == 0 {
        return 0;
    }
    rounded_percent(completed as f64 / total as f64) as u8
}

/// 依截止日由近到遠排序，沒有截止日的排最後
pub fn upcoming_milestones(milestones: &[Milestone], limit: usize) -> Vec<&Milestone> {
    let mut ordered: Vec<&Milestone> = milestones.iter().collect();
    ordered.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ordered.truncate(limit);
    ordered
}

/// 依建立時間由新到舊排序，沒有建立時間的排最後
pub fn recent_projects(projects: &[Project], limit: usize) -> Vec<&Project> {
    let mut ordered: Vec<&Project> = projects.iter().collect();
    ordered.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ordered.truncate(limit);
    ordered
}

/// Case-insensitive match on name, client or location. A blank term matches everything.
pub fn search_projects<'a>(projects: &'a [Project], term: &str) -> Vec<&'a Project> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return projects.iter().collect();
    }

    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&needle));

    projects
        .iter()
        .filter(|p| {
            contains(Some(p.name.as_str()))
                || contains(p.client.as_deref())
                || contains(p.location.as_deref())
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceSummary {
    pub total_count: usize,
    pub material_count: usize,
    pub equipment_count: usize,
    pub subcontractor_count: usize,
    pub other_count: usize,
    pub total_cost: f64,
}

pub fn resource_summary(resources: &[Resource]) -> ResourceSummary {
    summarize_resources(resources)
}

fn summarize_resources<'a, I>(resources: I) -> ResourceSummary
where
    I: IntoIterator<Item = &'a Resource>,
{
    resources
        .into_iter()
        .fold(ResourceSummary::default(), |mut summary, resource| {
            summary.total_count += 1;
            match resource.kind {
                ResourceType::Material => summary.material_count += 1,
                ResourceType::Equipment => summary.equipment_count += 1,
                ResourceType::Subcontractor => summary.subcontractor_count += 1,
                ResourceType::Unknown(_) => summary.other_count += 1,
            }
            summary.total_cost += resource.cost();
            summary
        })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskSummary {
    pub total_count: usize,
    pub todo_count: usize,
    pub in_progress_count: usize,
    pub completed_count: usize,
    pub open_high_priority_count: usize,
    pub overdue_count: usize,
}

pub fn task_summary(tasks: &[Task], now: DateTime<Utc>) -> TaskSummary {
    summarize_tasks(tasks, now)
}

fn summarize_tasks<'a, I>(tasks: I, now: DateTime<Utc>) -> TaskSummary
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut summary = TaskSummary::default();

    for task in tasks {
        summary.total_count += 1;
        match task.status {
            TaskStatus::Todo => summary.todo_count += 1,
            TaskStatus::InProgress => summary.in_progress_count += 1,
            TaskStatus::Completed => summary.completed_count += 1,
            TaskStatus::Unknown(_) => {}
        }
        if task.is_open() && task.priority == TaskPriority::High {
            summary.open_high_priority_count += 1;
        }
        if task.is_overdue(now) {
            summary.overdue_count += 1;
        }
    }

    summary
}

/// Everything the project detail page shows above its tabs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetailSummary {
    pub project_id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub budget: f64,
    pub actual_cost: f64,
    pub utilization_percent: u64,
    pub progress_percent: u8,
    pub milestone_count: usize,
    pub overdue_milestones: usize,
    pub resources: ResourceSummary,
    pub tasks: TaskSummary,
    pub client_update_count: usize,
}

/// 某個 project_id 底下的子資料
#[derive(Debug, Default)]
struct ProjectChildren<'a> {
    milestones: Vec<&'a Milestone>,
    resources: Vec<&'a Resource>,
    tasks: Vec<&'a Task>,
    client_update_count: usize,
}

fn children_by_project(snapshot: &Snapshot) -> HashMap<&str, ProjectChildren<'_>> {
    let mut grouped: HashMap<&str, ProjectChildren<'_>> = HashMap::new();

    for milestone in &snapshot.milestones {
        grouped
            .entry(milestone.project_id.as_str())
            .or_default()
            .milestones
            .push(milestone);
    }
    for resource in &snapshot.resources {
        grouped
            .entry(resource.project_id.as_str())
            .or_default()
            .resources
            .push(resource);
    }
    for task in &snapshot.tasks {
        grouped.entry(task.project_id.as_str()).or_default().tasks.push(task);
    }
    for update in &snapshot.client_updates {
        grouped
            .entry(update.project_id.as_str())
            .or_default()
            .client_update_count += 1;
    }

    grouped
}

fn detail_for(
    project: &Project,
    children: Option<&ProjectChildren<'_>>,
    now: DateTime<Utc>,
) -> ProjectDetailSummary {
    let empty = ProjectChildren::default();
    let children = children.unwrap_or(&empty);
    let milestones = children.milestones.iter().copied();

    let budget = project.budget_or_zero();
    let actual_cost = project.actual_cost_or_zero();

    ProjectDetailSummary {
        project_id: project.id.clone(),
        name: project.name.clone(),
        status: project.status.clone(),
        budget,
        actual_cost,
        utilization_percent: utilization_percent(actual_cost, budget),
        progress_percent: completion_percent(milestones.clone()),
        milestone_count: children.milestones.len(),
        overdue_milestones: count_overdue(milestones, now),
        resources: summarize_resources(children.resources.iter().copied()),
        tasks: summarize_tasks(children.tasks.iter().copied(), now),
        client_update_count: children.client_update_count,
    }
}

pub fn project_detail(
    snapshot: &Snapshot,
    project_id: &str,
    now: DateTime<Utc>,
) -> Option<ProjectDetailSummary> {
    let project = snapshot.project(project_id)?;
    let grouped = children_by_project(snapshot);
    Some(detail_for(project, grouped.get(project_id), now))
}

/// 每個專案一筆，順序與快照相同。重複 id 的專案各自保留。
pub fn project_details(snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<ProjectDetailSummary> {
    let grouped = children_by_project(snapshot);
    snapshot
        .projects
        .iter()
        .map(|project| detail_for(project, grouped.get(project.id.as_str()), now))
        .collect()
}
