//! Non-fatal snapshot checks.
//!
//! Aggregation never fails on odd data; these checks only surface what looks wrong so
//! the caller can log it.

use crate::domain::model::Snapshot;
use crate::domain::status::{Lexicon, MilestoneStatus};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Milestone,
    Resource,
    Task,
    ClientUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    NegativeAmount { field: &'static str, value: f64 },
    UnknownStatus { field: &'static str, value: String },
    ProgressOutOfRange { value: f64 },
    CompletedWithPartialProgress { value: f64 },
    MissingProject { project_id: String },
    DuplicateId { occurrences: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotIssue {
    pub entity: EntityKind,
    pub id: String,
    pub problem: Problem,
}

impl fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}: ", self.entity, self.id)?;
        match &self.problem {
            Problem::NegativeAmount { field, value } => {
                write!(f, "{} is negative ({})", field, value)
            }
            Problem::UnknownStatus { field, value } => {
                write!(f, "unrecognised {} '{}'", field, value)
            }
            Problem::ProgressOutOfRange { value } => {
                write!(f, "progress {} is outside 0..=100", value)
            }
            Problem::CompletedWithPartialProgress { value } => {
                write!(f, "completed but progress is {}", value)
            }
            Problem::MissingProject { project_id } => {
                write!(f, "refers to unknown project '{}'", project_id)
            }
            Problem::DuplicateId { occurrences } => {
                write!(f, "id appears {} times", occurrences)
            }
        }
    }
}

pub fn validate_snapshot(snapshot: &Snapshot) -> Vec<SnapshotIssue> {
    let mut issues = Vec::new();
    let mut push = |entity: EntityKind, id: &str, problem: Problem| {
        issues.push(SnapshotIssue {
            entity,
            id: id.to_string(),
            problem,
        })
    };

    let project_ids: HashSet<&str> = snapshot.projects.iter().map(|p| p.id.as_str()).collect();

    for (entity, ids) in [
        (EntityKind::Project, snapshot.projects.iter().map(|p| p.id.as_str()).collect::<Vec<_>>()),
        (EntityKind::Milestone, snapshot.milestones.iter().map(|m| m.id.as_str()).collect()),
        (EntityKind::Resource, snapshot.resources.iter().map(|r| r.id.as_str()).collect()),
        (EntityKind::Task, snapshot.tasks.iter().map(|t| t.id.as_str()).collect()),
        (EntityKind::ClientUpdate, snapshot.client_updates.iter().map(|u| u.id.as_str()).collect()),
    ] {
        for (id, occurrences) in duplicate_ids(&ids) {
            push(entity, id, Problem::DuplicateId { occurrences });
        }
    }

    for project in &snapshot.projects {
        for (field, value) in [("budget", project.budget), ("actual_cost", project.actual_cost)] {
            if let Some(value) = value.filter(|v| *v < 0.0) {
                push(EntityKind::Project, &project.id, Problem::NegativeAmount { field, value });
            }
        }
        if !project.status.is_known() {
            push(
                EntityKind::Project,
                &project.id,
                Problem::UnknownStatus {
                    field: "status",
                    value: project.status.to_string(),
                },
            );
        }
    }

    for milestone in &snapshot.milestones {
        if !project_ids.contains(milestone.project_id.as_str()) {
            push(
                EntityKind::Milestone,
                &milestone.id,
                Problem::MissingProject {
                    project_id: milestone.project_id.clone(),
                },
            );
        }
        if !milestone.status.is_known() {
            push(
                EntityKind::Milestone,
                &milestone.id,
                Problem::UnknownStatus {
                    field: "status",
                    value: milestone.status.to_string(),
                },
            );
        }
        if let Some(progress) = milestone.progress {
            if !(0.0..=100.0).contains(&progress) {
                push(
                    EntityKind::Milestone,
                    &milestone.id,
                    Problem::ProgressOutOfRange { value: progress },
                );
            } else if milestone.status == MilestoneStatus::Completed && progress < 100.0 {
                push(
                    EntityKind::Milestone,
                    &milestone.id,
                    Problem::CompletedWithPartialProgress { value: progress },
                );
            }
        }
    }

    for resource in &snapshot.resources {
        if !project_ids.contains(resource.project_id.as_str()) {
            push(
                EntityKind::Resource,
                &resource.id,
                Problem::MissingProject {
                    project_id: resource.project_id.clone(),
                },
            );
        }
        if !resource.status.is_known() {
            push(
                EntityKind::Resource,
                &resource.id,
                Problem::UnknownStatus {
                    field: "status",
                    value: resource.status.to_string(),
                },
            );
        }
        if !resource.kind.is_known() {
            push(
                EntityKind::Resource,
                &resource.id,
                Problem::UnknownStatus {
                    field: "type",
                    value: resource.kind.to_string(),
                },
            );
        }
    }

    for task in &snapshot.tasks {
        if !project_ids.contains(task.project_id.as_str()) {
            push(
                EntityKind::Task,
                &task.id,
                Problem::MissingProject {
                    project_id: task.project_id.clone(),
                },
            );
        }
        if !task.status.is_known() {
            push(
                EntityKind::Task,
                &task.id,
                Problem::UnknownStatus {
                    field: "status",
                    value: task.status.to_string(),
                },
            );
        }
        if !task.priority.is_known() {
            push(
                EntityKind::Task,
                &task.id,
                Problem::UnknownStatus {
                    field: "priority",
                    value: task.priority.to_string(),
                },
            );
        }
    }

    for update in &snapshot.client_updates {
        if !project_ids.contains(update.project_id.as_str()) {
            push(
                EntityKind::ClientUpdate,
                &update.id,
                Problem::MissingProject {
                    project_id: update.project_id.clone(),
                },
            );
        }
    }

    issues
}

/// 出現超過一次的 id，依第一次出現的順序
fn duplicate_ids<'a>(ids: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in ids {
        *counts.entry(*id).or_default() += 1;
    }

    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| counts.get(id).filter(|n| **n > 1).map(|n| (*id, *n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_snapshot_has_no_issues() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "projects": [{"id": "p1", "status": "active", "budget": 100, "actual_cost": 20}],
            "milestones": [{"id": "m1", "project_id": "p1", "status": "completed", "progress": 100}],
            "tasks": [{"id": "t1", "project_id": "p1", "status": "todo", "priority": "low"}]
        }))
        .unwrap();
        assert!(validate_snapshot(&snapshot).is_empty());
    }

    #[test]
    fn test_reports_problems_without_failing() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "projects": [{"id": "p1", "status": "archived", "budget": -5}],
            "milestones": [
                {"id": "m1", "project_id": "p1", "status": "completed", "progress": 60},
                {"id": "m2", "project_id": "p1", "status": "pending", "progress": 140}
            ],
            "resources": [{"id": "r1", "project_id": "ghost", "type": "material", "status": "ordered"}]
        }))
        .unwrap();

        let issues = validate_snapshot(&snapshot);
        assert_eq!(issues.len(), 5);
        assert!(issues.contains(&SnapshotIssue {
            entity: EntityKind::Project,
            id: "p1".to_string(),
            problem: Problem::NegativeAmount {
                field: "budget",
                value: -5.0
            },
        }));
        assert!(issues
            .iter()
            .any(|i| i.problem == Problem::CompletedWithPartialProgress { value: 60.0 }));
        assert!(issues
            .iter()
            .any(|i| i.problem == Problem::ProgressOutOfRange { value: 140.0 }));
        assert!(issues.iter().any(|i| i.entity == EntityKind::Resource
            && i.to_string().contains("unknown project 'ghost'")));
    }

    #[test]
    fn test_duplicate_ids_are_reported_once() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "projects": [
                {"id": "p", "name": "A", "status": "active"},
                {"id": "p", "name": "B", "status": "active"},
                {"id": "q", "name": "C", "status": "planning"}
            ],
            "tasks": [
                {"id": "t1", "project_id": "p", "status": "todo"},
                {"id": "t1", "project_id": "q", "status": "todo"},
                {"id": "t1", "project_id": "q", "status": "completed"}
            ]
        }))
        .unwrap();

        let issues = validate_snapshot(&snapshot);
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0],
            SnapshotIssue {
                entity: EntityKind::Project,
                id: "p".to_string(),
                problem: Problem::DuplicateId { occurrences: 2 },
            }
        );
        assert_eq!(issues[1].entity, EntityKind::Task);
        assert_eq!(issues[1].to_string(), "Task t1: id appears 3 times");
    }
}
