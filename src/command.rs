//! Typed mutation commands issued by the front ends.
//!
//! Constructors validate user input so that the store never sees an empty task
//! text; the store applies commands without further checks.

use crate::error::{Error, Result};
use crate::fields::Priority;

/// Category used when a task is added without one.
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        text: String,
        priority: Priority,
        category: String,
        notes: Option<String>,
    },
    Toggle {
        id: String,
    },
    Delete {
        id: String,
    },
    Edit {
        id: String,
        text: String,
    },
}

impl Command {
    /// Build an add command from raw form input.
    ///
    /// Text and notes are trimmed, an empty category falls back to
    /// [`DEFAULT_CATEGORY`] and blank notes are dropped.
    pub fn add(text: &str, priority: Priority, category: &str, notes: Option<&str>) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };
        let notes = notes.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string);
        Ok(Command::Add {
            text: text.to_string(),
            priority,
            category: category.to_string(),
            notes,
        })
    }

    pub fn toggle(id: impl Into<String>) -> Self {
        Command::Toggle { id: id.into() }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Command::Delete { id: id.into() }
    }

    /// Build an edit command; whitespace-only text is rejected.
    pub fn edit(id: impl Into<String>, text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        Ok(Command::Edit {
            id: id.into(),
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_normalises_input() {
        let cmd = Command::add("  Buy milk ", Priority::High, "", Some("   ")).unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                text: "Buy milk".into(),
                priority: Priority::High,
                category: "General".into(),
                notes: None,
            }
        );
    }

    #[test]
    fn test_add_keeps_notes() {
        let cmd = Command::add("Run", Priority::Low, "Health", Some(" 5km ")).unwrap();
        match cmd {
            Command::Add { notes, category, .. } => {
                assert_eq!(notes.as_deref(), Some("5km"));
                assert_eq!(category, "Health");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(matches!(Command::add("   ", Priority::Medium, "Work", None), Err(Error::EmptyText)));
        assert!(matches!(Command::edit("1", "\t"), Err(Error::EmptyText)));
    }
}
