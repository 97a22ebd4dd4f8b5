use crate::domain::status::{
    MilestoneStatus, ProjectStatus, ResourceStatus, TaskPriority, TaskStatus, UpdateKind,
};
use serde::Serialize;

/// Display category a status renders with (badge / dot colour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Blue,
    Yellow,
    Red,
    /// 未知狀態一律使用
    #[default]
    Gray,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Green => "green",
            Tone::Blue => "blue",
            Tone::Yellow => "yellow",
            Tone::Red => "red",
            Tone::Gray => "gray",
        }
    }
}

pub trait DisplayTone {
    fn tone(&self) -> Tone;
}

impl DisplayTone for ProjectStatus {
    fn tone(&self) -> Tone {
        match self {
            ProjectStatus::Active => Tone::Green,
            ProjectStatus::Planning => Tone::Blue,
            ProjectStatus::OnHold => Tone::Yellow,
            ProjectStatus::Cancelled => Tone::Red,
            ProjectStatus::Completed | ProjectStatus::Unknown(_) => Tone::default(),
        }
    }
}

impl DisplayTone for MilestoneStatus {
    fn tone(&self) -> Tone {
        match self {
            MilestoneStatus::Completed => Tone::Green,
            MilestoneStatus::InProgress => Tone::Blue,
            MilestoneStatus::Pending => Tone::Yellow,
            MilestoneStatus::Overdue => Tone::Red,
            MilestoneStatus::Unknown(_) => Tone::default(),
        }
    }
}

impl DisplayTone for ResourceStatus {
    fn tone(&self) -> Tone {
        match self {
            ResourceStatus::Ordered => Tone::Yellow,
            ResourceStatus::Delivered | ResourceStatus::InUse => Tone::Blue,
            ResourceStatus::Completed => Tone::Green,
            ResourceStatus::Unknown(_) => Tone::default(),
        }
    }
}

impl DisplayTone for TaskStatus {
    fn tone(&self) -> Tone {
        match self {
            TaskStatus::Completed => Tone::Green,
            TaskStatus::InProgress => Tone::Blue,
            TaskStatus::Todo => Tone::Yellow,
            TaskStatus::Unknown(_) => Tone::default(),
        }
    }
}

impl DisplayTone for TaskPriority {
    fn tone(&self) -> Tone {
        match self {
            TaskPriority::High => Tone::Red,
            TaskPriority::Medium => Tone::Yellow,
            TaskPriority::Low => Tone::Green,
            TaskPriority::Unknown(_) => Tone::default(),
        }
    }
}

impl DisplayTone for UpdateKind {
    fn tone(&self) -> Tone {
        match self {
            UpdateKind::Progress | UpdateKind::Milestone => Tone::Blue,
            UpdateKind::Issue => Tone::Red,
            UpdateKind::Completion => Tone::Green,
            UpdateKind::Unknown(_) => Tone::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Lexicon;

    #[test]
    fn test_project_tones() {
        assert_eq!(ProjectStatus::Active.tone(), Tone::Green);
        assert_eq!(ProjectStatus::parse("in_progress").tone(), Tone::Green);
        assert_eq!(ProjectStatus::OnHold.tone(), Tone::Yellow);
        assert_eq!(ProjectStatus::Cancelled.tone(), Tone::Red);
    }

    #[test]
    fn test_unknown_values_fall_back_to_default() {
        assert_eq!(ProjectStatus::parse("archived").tone(), Tone::Gray);
        assert_eq!(MilestoneStatus::parse("blocked").tone(), Tone::Gray);
        assert_eq!(ResourceStatus::parse("lost").tone(), Tone::Gray);
        assert_eq!(TaskPriority::parse("urgent").tone(), Tone::Gray);
        assert_eq!(Tone::default(), Tone::Gray);
    }

    #[test]
    fn test_priority_tones() {
        assert_eq!(TaskPriority::High.tone(), Tone::Red);
        assert_eq!(TaskPriority::Medium.tone(), Tone::Yellow);
        assert_eq!(TaskPriority::Low.tone(), Tone::Green);
    }

    #[test]
    fn test_tone_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tone::Yellow).unwrap(), "\"yellow\"");
        assert_eq!(Tone::Red.as_str(), "red");
    }
}
