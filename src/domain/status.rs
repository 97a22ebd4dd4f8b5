//! Canonical status vocabularies.
//!
//! The backend and the UI disagree on spelling (`in_progress`, `in-progress`, `active`),
//! so every enum here parses leniently and always serializes the canonical kebab-case
//! form. Values outside the vocabulary are kept verbatim in `Unknown` instead of failing
//! the whole snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared behaviour of every status vocabulary.
pub trait Lexicon: Sized {
    /// Parse an already-normalized key (lowercase, `-` separated).
    fn from_key(key: &str) -> Option<Self>;

    fn unknown(raw: String) -> Self;

    fn as_str(&self) -> &str;

    fn is_known(&self) -> bool;

    fn parse(raw: &str) -> Self {
        Self::from_key(&normalize_key(raw)).unwrap_or_else(|| Self::unknown(raw.to_string()))
    }

    /// 顯示用文字，例如 `on-hold` -> `on hold`
    fn label(&self) -> String {
        self.as_str().replace(['-', '_'], " ")
    }
}

/// `" In_Progress "` -> `"in-progress"`
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

macro_rules! lexicon_conversions {
    ($ty:ident) => {
        impl From<String> for $ty {
            fn from(raw: String) -> Self {
                <$ty as Lexicon>::parse(&raw)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
    Unknown(String),
}

impl Lexicon for ProjectStatus {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "planning" => Some(Self::Planning),
            "active" | "in-progress" => Some(Self::Active),
            "on-hold" => Some(Self::OnHold),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    fn unknown(raw: String) -> Self {
        Self::Unknown(raw)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown(raw) => raw,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

lexicon_conversions!(ProjectStatus);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Overdue,
    Unknown(String),
}

impl Lexicon for MilestoneStatus {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    fn unknown(raw: String) -> Self {
        Self::Unknown(raw)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Unknown(raw) => raw,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

lexicon_conversions!(MilestoneStatus);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    #[default]
    Material,
    Equipment,
    Subcontractor,
    Unknown(String),
}

impl Lexicon for ResourceType {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "material" => Some(Self::Material),
            "equipment" => Some(Self::Equipment),
            "subcontractor" => Some(Self::Subcontractor),
            _ => None,
        }
    }

    fn unknown(raw: String) -> Self {
        Self::Unknown(raw)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Material => "material",
            Self::Equipment => "equipment",
            Self::Subcontractor => "subcontractor",
            Self::Unknown(raw) => raw,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

lexicon_conversions!(ResourceType);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ResourceStatus {
    #[default]
    Ordered,
    Delivered,
    InUse,
    Completed,
    Unknown(String),
}

impl Lexicon for ResourceStatus {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "ordered" => Some(Self::Ordered),
            "delivered" => Some(Self::Delivered),
            "in-use" => Some(Self::InUse),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    fn unknown(raw: String) -> Self {
        Self::Unknown(raw)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Ordered => "ordered",
            Self::Delivered => "delivered",
            Self::InUse => "in-use",
            Self::Completed => "completed",
            Self::Unknown(raw) => raw,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

lexicon_conversions!(ResourceStatus);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    Unknown(String),
}

impl TaskStatus {
    /// 勾選框切換：completed <-> todo，其他狀態一律視為完成
    pub fn toggled(&self) -> Self {
        match self {
            Self::Completed => Self::Todo,
            _ => Self::Completed,
        }
    }
}

impl Lexicon for TaskStatus {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "todo" | "pending" => Some(Self::Todo),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    fn unknown(raw: String) -> Self {
        Self::Unknown(raw)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Unknown(raw) => raw,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

lexicon_conversions!(TaskStatus);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Unknown(String),
}

impl Lexicon for TaskPriority {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    fn unknown(raw: String) -> Self {
        Self::Unknown(raw)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown(raw) => raw,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

lexicon_conversions!(TaskPriority);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum UpdateKind {
    #[default]
    Progress,
    Milestone,
    Issue,
    Completion,
    Unknown(String),
}

impl Lexicon for UpdateKind {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "progress" => Some(Self::Progress),
            "milestone" => Some(Self::Milestone),
            "issue" => Some(Self::Issue),
            "completion" => Some(Self::Completion),
            _ => None,
        }
    }

    fn unknown(raw: String) -> Self {
        Self::Unknown(raw)
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Progress => "progress",
            Self::Milestone => "milestone",
            Self::Issue => "issue",
            Self::Completion => "completion",
            Self::Unknown(raw) => raw,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

lexicon_conversions!(UpdateKind);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_spellings_collapse() {
        for raw in ["active", "in_progress", "in-progress", "In Progress", " ACTIVE "] {
            assert_eq!(ProjectStatus::parse(raw), ProjectStatus::Active, "{raw}");
        }
        assert_eq!(ProjectStatus::parse("on_hold"), ProjectStatus::OnHold);
        assert_eq!(ProjectStatus::parse("canceled"), ProjectStatus::Cancelled);
    }

    #[test]
    fn test_unknown_status_keeps_raw_value() {
        let status = ProjectStatus::parse("archived");
        assert_eq!(status, ProjectStatus::Unknown("archived".to_string()));
        assert!(!status.is_known());
        assert_eq!(status.as_str(), "archived");
    }

    #[test]
    fn test_task_pending_is_todo() {
        assert_eq!(TaskStatus::parse("pending"), TaskStatus::Todo);
        assert_eq!(TaskStatus::parse("todo"), TaskStatus::Todo);
        assert_eq!(ResourceStatus::parse("in_use"), ResourceStatus::InUse);
        assert_eq!(MilestoneStatus::parse("in_progress"), MilestoneStatus::InProgress);
    }

    #[test]
    fn test_serializes_canonical_spelling() {
        let status: ProjectStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"on-hold\"");

        let unknown: TaskPriority = serde_json::from_str("\"urgent\"").unwrap();
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"urgent\"");
    }

    #[test]
    fn test_labels() {
        assert_eq!(ProjectStatus::OnHold.label(), "on hold");
        assert_eq!(MilestoneStatus::InProgress.label(), "in progress");
        assert_eq!(ProjectStatus::parse("waiting_on_permit").label(), "waiting on permit");
    }

    #[test]
    fn test_task_toggle() {
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Todo);
        assert_eq!(TaskStatus::Todo.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
    }
}
