use crate::domain::status::{
    Lexicon, MilestoneStatus, ProjectStatus, ResourceStatus, ResourceType, TaskPriority, TaskStatus,
    UpdateKind,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub description: Option<String>,
    #[serde(default, alias = "client_name", deserialize_with = "lenient_optional_text")]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_lexicon")]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub budget: Option<f64>,
    #[serde(default, alias = "actualCost", deserialize_with = "lenient_amount")]
    pub actual_cost: Option<f64>,
    #[serde(default, alias = "startDate", deserialize_with = "lenient_timestamp")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "endDate", deserialize_with = "lenient_timestamp")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn budget_or_zero(&self) -> f64 {
        self.budget.unwrap_or(0.0)
    }

    pub fn actual_cost_or_zero(&self) -> f64 {
        self.actual_cost.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    #[serde(alias = "projectId")]
    pub project_id: String,
    #[serde(default, alias = "name", deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, alias = "dueDate", deserialize_with = "lenient_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_lexicon")]
    pub status: MilestoneStatus,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub progress: Option<f64>,
}

impl Milestone {
    pub fn is_completed(&self) -> bool {
        self.status == MilestoneStatus::Completed
    }

    /// 已過期：截止日早於 `now` 且尚未完成。沒有截止日的里程碑永遠不算過期。
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < now)
    }

    /// 以 `now` 推導出的狀態，過期的里程碑顯示為 `Overdue`
    pub fn effective_status(&self, now: DateTime<Utc>) -> MilestoneStatus {
        if self.is_overdue(now) {
            MilestoneStatus::Overdue
        } else {
            self.status.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(alias = "projectId")]
    pub project_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_lexicon")]
    pub kind: ResourceType,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub unit: Option<String>,
    #[serde(
        default,
        alias = "cost",
        alias = "costPerUnit",
        deserialize_with = "lenient_amount"
    )]
    pub unit_cost: Option<f64>,
    #[serde(default, alias = "totalCost", deserialize_with = "lenient_amount")]
    pub total_cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub supplier: Option<String>,
    #[serde(default, deserialize_with = "lenient_lexicon")]
    pub status: ResourceStatus,
}

impl Resource {
    /// 有總價就用總價，否則數量 x 單價
    pub fn cost(&self) -> f64 {
        self.total_cost
            .unwrap_or_else(|| self.quantity.unwrap_or(0.0) * self.unit_cost.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(alias = "projectId")]
    pub project_id: String,
    #[serde(default, alias = "milestoneId", deserialize_with = "lenient_optional_text")]
    pub milestone_id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_lexicon")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient_lexicon")]
    pub priority: TaskPriority,
    #[serde(default, alias = "assignedTo", deserialize_with = "lenient_optional_text")]
    pub assigned_to: Option<String>,
    #[serde(default, alias = "dueDate", deserialize_with = "lenient_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Completed
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && self.due_date.is_some_and(|due| due < now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub id: String,
    #[serde(alias = "projectId")]
    pub project_id: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_lexicon")]
    pub kind: UpdateKind,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A point-in-time copy of everything the dashboard reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, alias = "clientUpdates")]
    pub client_updates: Vec<ClientUpdate>,
}

impl Snapshot {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }
}

/// 支援 `YYYY-MM-DD`（視為 UTC 午夜）、RFC 3339，以及不帶時區的 ISO 時間
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn amount_from_value(value: &serde_json::Value) -> Option<f64> {
    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|a| a.is_finite())
}

/// 數值欄位：數字、數字字串或 null；其他一律當作缺值
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(amount_from_value))
}

/// 狀態欄位：null 用預設值，非字串保留原文當作未知值
fn lenient_lexicon<'de, D, L>(deserializer: D) -> Result<L, D::Error>
where
    D: Deserializer<'de>,
    L: Lexicon + Default,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => L::default(),
        Some(serde_json::Value::String(s)) => L::parse(&s),
        Some(other) => L::unknown(other.to_string()),
    })
}

fn text_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_from_value).unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_from_value))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => parse_timestamp(&s),
        _ => None,
    })
}
