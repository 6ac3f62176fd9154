//! Enumerations used to categorise and filter tasks.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// How important a task is.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities in ascending order, as offered by selectors.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Completion-status filter applied to the task list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    /// Whether a task passes this filter.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }

    /// Message shown when the filtered list is empty.
    pub fn empty_message(self) -> &'static str {
        match self {
            StatusFilter::Completed => "No completed tasks",
            StatusFilter::Active => "No active tasks",
            StatusFilter::All => "No tasks yet",
        }
    }

    /// The next filter in All -> Active -> Completed -> All order.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn test_status_filter_cycles() {
        let mut f = StatusFilter::All;
        f = f.next();
        assert_eq!(f, StatusFilter::Active);
        f = f.next();
        assert_eq!(f, StatusFilter::Completed);
        assert_eq!(f.next(), StatusFilter::All);
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(StatusFilter::All.empty_message(), "No tasks yet");
        assert_eq!(StatusFilter::Active.empty_message(), "No active tasks");
        assert_eq!(StatusFilter::Completed.empty_message(), "No completed tasks");
    }
}
