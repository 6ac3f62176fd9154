//! The owned, write-through task collection.
//!
//! `TaskStore` holds the in-memory list in insertion order and writes a full
//! snapshot to its [`TaskStorage`] after every change. The in-memory list is
//! authoritative for the session: a failed write is logged and remembered but
//! never rolls the change back.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::db::TaskStorage;
use crate::error::{Error, Result};
use crate::fields::Priority;
use crate::task::{seed_tasks, Task};

pub struct TaskStore<S> {
    tasks: Vec<Task>,
    storage: S,
    last_issued_id: i64,
    last_save_error: Option<String>,
}

impl<S: TaskStorage> TaskStore<S> {
    /// Load the task list from `storage`.
    ///
    /// A missing or unreadable document yields the seed tasks instead, which
    /// are written back right away; opening never fails.
    pub fn open(storage: S) -> Self {
        let (tasks, seeded) = match storage.load() {
            Ok(Some(tasks)) => {
                info!(count = tasks.len(), "loaded tasks");
                (tasks, false)
            }
            Ok(None) => {
                info!("no stored tasks, starting from seed set");
                (seed_tasks(Utc::now()), true)
            }
            Err(e) => {
                warn!(error = %e, "stored tasks unreadable, starting from seed set");
                (seed_tasks(Utc::now()), true)
            }
        };
        let mut store = Self {
            tasks,
            storage,
            last_issued_id: 0,
            last_save_error: None,
        };
        // The seed set replaces whatever was (or wasn't) stored.
        if seeded {
            store.persist();
        }
        store
    }

    /// All tasks in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Message of the most recent failed save, cleared by the next successful one.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Append a new incomplete task and return a copy of it.
    pub fn add(&mut self, text: &str, priority: Priority, category: &str, notes: Option<String>) -> Task {
        let now = Utc::now();
        let task = Task {
            id: self.next_id(now),
            text: text.to_string(),
            completed: false,
            priority,
            category: category.to_string(),
            notes,
            created_at: now,
        };
        debug!(id = %task.id, "added task");
        self.tasks.push(task.clone());
        self.persist();
        task
    }

    /// Flip completion of the task with `id`. Returns false if no such task exists.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        debug!(id, completed = task.completed, "toggled task");
        self.persist();
        true
    }

    /// Remove the task with `id`. Returns false if no such task exists.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        debug!(id, "deleted task");
        self.persist();
        true
    }

    /// Replace the text of the task with `id`.
    ///
    /// Empty or whitespace-only text is ignored, as is an unknown id; both
    /// return false.
    pub fn edit(&mut self, id: &str, new_text: &str) -> bool {
        if new_text.trim().is_empty() {
            return false;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.text = new_text.to_string();
        debug!(id, "edited task");
        self.persist();
        true
    }

    /// Apply a validated command. Returns whether the list changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Add { text, priority, category, notes } => {
                self.add(&text, priority, &category, notes);
                true
            }
            Command::Toggle { id } => self.toggle(&id),
            Command::Delete { id } => self.delete(&id),
            Command::Edit { id, text } => self.edit(&id, &text),
        }
    }

    /// Resolve a user-supplied identifier to a task id.
    ///
    /// An exact id match wins; otherwise the identifier is compared
    /// case-insensitively with task texts and must match exactly one task.
    pub fn resolve(&self, identifier: &str) -> Result<String> {
        if self.get(identifier).is_some() {
            return Ok(identifier.to_string());
        }
        let wanted = identifier.trim().to_lowercase();
        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.text.trim().to_lowercase() == wanted)
            .collect();
        match matches.as_slice() {
            [] => Err(Error::TaskNotFound(identifier.to_string())),
            [only] => Ok(only.id.clone()),
            many => Err(Error::AmbiguousTask {
                identifier: identifier.to_string(),
                ids: many.iter().map(|t| t.id.clone()).collect(),
            }),
        }
    }

    /// Time-based id: Unix milliseconds, bumped past anything already issued or present.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis().max(self.last_issued_id + 1);
        while self.tasks.iter().any(|t| t.id == candidate.to_string()) {
            candidate += 1;
        }
        self.last_issued_id = candidate;
        candidate.to_string()
    }

    fn persist(&mut self) {
        match self.storage.save(&self.tasks) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                error!(error = %e, "failed to save tasks; keeping in-memory state");
                self.last_save_error = Some(e.to_string());
            }
        }
    }
}
