//! Task data structure and the seed set used on first launch.
//!
//! A `Task` is the atomic record of the todo list. Its JSON shape is the
//! persisted document format: camelCase field names, lowercase priority,
//! RFC 3339 UTC timestamps and `notes` omitted when absent.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::Priority;

/// A single to-do record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The two example tasks shown when no usable document exists.
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    vec![
        Task {
            id: "1".into(),
            text: "Go see cherry blossoms".into(),
            completed: false,
            priority: Priority::Medium,
            category: "Leisure".into(),
            notes: Some("Would like to see the night cherry blossom light-up too".into()),
            created_at: now,
        },
        Task {
            id: "2".into(),
            text: "Try new Japanese sweets".into(),
            completed: true,
            priority: Priority::Low,
            category: "Food".into(),
            notes: None,
            created_at: now - Duration::days(1),
        },
    ]
}
