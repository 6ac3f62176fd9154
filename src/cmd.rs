//! Command implementations for the CLI interface.
//!
//! Each handler works against an open [`TaskStore`] and prints its result to
//! stdout. Identifiers accept either a task id or the task's exact text.

use std::io::{self, Write};

use chrono::Local;
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::command::Command;
use crate::db::TaskStorage;
use crate::error::{Error, Result};
use crate::fields::{Priority, StatusFilter};
use crate::store::TaskStore;
use crate::task::Task;
use crate::tui::run::run_tui;
use crate::views;
use crate::window::HeadlessWindow;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// What needs doing.
        text: String,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Category name. Defaults to General.
        #[arg(long, default_value = "")]
        category: String,
        /// Additional details or notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Status filter: all | active | completed.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        /// Only show tasks in this category.
        #[arg(long, default_value = "")]
        category: String,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show a single task by id or text.
    View {
        /// Task id or text.
        id: String,
    },

    /// Toggle a task between active and completed.
    Toggle {
        /// Task id or text.
        id: String,
    },

    /// Replace the text of a task.
    Edit {
        /// Task id or text.
        id: String,
        /// New task text.
        text: String,
    },

    /// Delete a task by id or text.
    Delete {
        /// Task id or text.
        id: String,
    },

    /// Show total, completed, pending and high-priority counts.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List known categories.
    Categories,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface with a headless window host.
pub fn cmd_ui<S: TaskStorage>(store: TaskStore<S>) -> Result<()> {
    run_tui(store, Some(Box::new(HeadlessWindow::new())))?;
    Ok(())
}

pub fn cmd_add<S: TaskStorage>(
    store: &mut TaskStore<S>,
    out: &mut impl Write,
    text: &str,
    priority: Priority,
    category: &str,
    notes: Option<&str>,
) -> Result<()> {
    store.apply(Command::add(text, priority, category, notes)?);
    warn_on_save_failure(store);
    if let Some(task) = store.list().last() {
        writeln!(out, "Added task {}", task.id)?;
    }
    Ok(())
}

pub fn cmd_list<S: TaskStorage>(
    store: &TaskStore<S>,
    out: &mut impl Write,
    status: StatusFilter,
    category: &str,
    json: bool,
) -> Result<()> {
    let tasks = views::filter(store.list(), status, category);
    if json {
        serde_json::to_writer_pretty(&mut *out, &tasks)?;
        writeln!(out)?;
        return Ok(());
    }
    if tasks.is_empty() {
        writeln!(out, "{}", status.empty_message())?;
        return Ok(());
    }
    print_table(out, &tasks)
}

pub fn cmd_view<S: TaskStorage>(store: &TaskStore<S>, out: &mut impl Write, identifier: &str) -> Result<()> {
    let id = store.resolve(identifier)?;
    let task = store.get(&id).ok_or_else(|| Error::TaskNotFound(identifier.to_string()))?;
    writeln!(out, "ID:        {}", task.id)?;
    writeln!(out, "Text:      {}", task.text)?;
    writeln!(out, "Status:    {}", if task.completed { "Completed" } else { "Active" })?;
    writeln!(out, "Priority:  {}", task.priority.label())?;
    writeln!(out, "Category:  {}", task.category)?;
    writeln!(out, "Created:   {}", task.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"))?;
    writeln!(out, "Notes:\n{}", task.notes.as_deref().unwrap_or("-"))?;
    Ok(())
}

pub fn cmd_toggle<S: TaskStorage>(store: &mut TaskStore<S>, out: &mut impl Write, identifier: &str) -> Result<()> {
    let id = store.resolve(identifier)?;
    store.apply(Command::toggle(id.clone()));
    warn_on_save_failure(store);
    let done = store.get(&id).is_some_and(|t| t.completed);
    writeln!(out, "Task {} marked {}", id, if done { "completed" } else { "active" })?;
    Ok(())
}

pub fn cmd_edit<S: TaskStorage>(
    store: &mut TaskStore<S>,
    out: &mut impl Write,
    identifier: &str,
    text: &str,
) -> Result<()> {
    let id = store.resolve(identifier)?;
    store.apply(Command::edit(id.clone(), text)?);
    warn_on_save_failure(store);
    writeln!(out, "Updated task {}", id)?;
    Ok(())
}

pub fn cmd_delete<S: TaskStorage>(store: &mut TaskStore<S>, out: &mut impl Write, identifier: &str) -> Result<()> {
    let id = store.resolve(identifier)?;
    store.apply(Command::delete(id.clone()));
    warn_on_save_failure(store);
    writeln!(out, "Deleted task {}", id)?;
    Ok(())
}

pub fn cmd_stats<S: TaskStorage>(store: &TaskStore<S>, out: &mut impl Write, json: bool) -> Result<()> {
    let stats = views::stats(store.list());
    if json {
        serde_json::to_writer_pretty(&mut *out, &stats)?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "Total:          {}", stats.total)?;
    writeln!(out, "Completed:      {}", stats.completed)?;
    writeln!(out, "Pending:        {}", stats.pending)?;
    writeln!(out, "High priority:  {}", stats.high_priority)?;
    writeln!(out, "Completion:     {:.1}%", stats.completion_rate())?;
    Ok(())
}

pub fn cmd_categories<S: TaskStorage>(store: &TaskStore<S>, out: &mut impl Write) -> Result<()> {
    for category in views::categories(store.list()) {
        let count = store.list().iter().filter(|t| t.category == category).count();
        writeln!(out, "{category:<16} {count}")?;
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

/// Print tasks as a fixed-width table.
pub fn print_table(out: &mut impl Write, tasks: &[&Task]) -> Result<()> {
    writeln!(out, "{:<15} {:<4} {:<8} {:<12} {}", "ID", "Done", "Priority", "Category", "Text")?;
    for t in tasks {
        writeln!(
            out,
            "{:<15} {:<4} {:<8} {:<12} {}",
            t.id,
            if t.completed { "[x]" } else { "[ ]" },
            t.priority.label(),
            truncate(&t.category, 12),
            t.text
        )?;
    }
    Ok(())
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn warn_on_save_failure<S: TaskStorage>(store: &TaskStore<S>) {
    if let Some(err) = store.last_save_error() {
        eprintln!("Warning: change kept in memory but not saved: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;

    fn seeded() -> TaskStore<MemoryStorage> {
        TaskStore::open(MemoryStorage::new())
    }

    fn run(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Shopping", 12), "Shopping");
        assert_eq!(truncate("Neighbourhood", 6), "Neigh…");
    }

    #[test]
    fn test_list_active_table() {
        let store = seeded();
        let out = run(|o| cmd_list(&store, o, StatusFilter::Active, "", false));
        assert!(out.contains("Go see cherry blossoms"));
        assert!(!out.contains("Try new Japanese sweets"));
    }

    #[test]
    fn test_list_empty_message() {
        let store = seeded();
        let out = run(|o| cmd_list(&store, o, StatusFilter::Completed, "Work", false));
        assert_eq!(out.trim(), "No completed tasks");
    }

    #[test]
    fn test_list_json() {
        let store = seeded();
        let out = run(|o| cmd_list(&store, o, StatusFilter::All, "Food", true));
        let tasks: Vec<Task> = serde_json::from_str(&out).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "2");
    }

    #[test]
    fn test_add_then_stats() {
        let mut store = seeded();
        let out = run(|o| cmd_add(&mut store, o, "Buy milk", Priority::High, "Shopping", None));
        assert!(out.starts_with("Added task "));

        let stats = run(|o| cmd_stats(&store, o, true));
        let value: serde_json::Value = serde_json::from_str(&stats).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["highPriority"], 1);
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut store = seeded();
        let mut buf = Vec::new();
        let err = cmd_add(&mut store, &mut buf, "  ", Priority::Low, "", None).unwrap_err();
        assert!(matches!(err, Error::EmptyText));
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_toggle_by_text() {
        let mut store = seeded();
        let out = run(|o| cmd_toggle(&mut store, o, "go see cherry blossoms"));
        assert_eq!(out.trim(), "Task 1 marked completed");
        assert!(store.get("1").unwrap().completed);
    }

    #[test]
    fn test_delete_unknown_is_error() {
        let mut store = seeded();
        let mut buf = Vec::new();
        assert!(matches!(cmd_delete(&mut store, &mut buf, "99"), Err(Error::TaskNotFound(_))));
    }

    #[test]
    fn test_view_and_edit() {
        let mut store = seeded();
        run(|o| cmd_edit(&mut store, o, "2", "Try mochi"));
        let out = run(|o| cmd_view(&store, o, "2"));
        assert!(out.contains("Text:      Try mochi"));
        assert!(out.contains("Status:    Completed"));
        assert!(out.contains("Category:  Food"));
    }

    #[test]
    fn test_categories_lists_counts() {
        let store = seeded();
        let out = run(|o| cmd_categories(&store, o));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Work"));
        assert!(out.contains("Leisure          1"));
    }
}
