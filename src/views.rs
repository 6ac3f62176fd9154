//! Derived views over the task list.
//!
//! Everything here is a pure function of a task slice and is recomputed
//! whenever the list changes.

use serde::Serialize;

use crate::fields::{Priority, StatusFilter};
use crate::task::Task;

/// Categories offered even before any task uses them.
pub const BASE_CATEGORIES: [&str; 7] = ["Work", "Personal", "Health", "Learning", "Leisure", "Food", "Shopping"];

/// Aggregate counts shown above the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// High-priority tasks that are still open.
    pub high_priority: usize,
}

impl TaskStats {
    /// Percentage of tasks completed, 0.0 for an empty list.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

pub fn filter_by_status(tasks: &[Task], status: StatusFilter) -> Vec<&Task> {
    tasks.iter().filter(|t| status.matches(t)).collect()
}

/// Tasks in `category`; an empty category selects everything.
pub fn filter_by_category<'a>(tasks: &'a [Task], category: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| category_matches(t, category)).collect()
}

/// Tasks passing both the status and the category filter.
pub fn filter<'a>(tasks: &'a [Task], status: StatusFilter, category: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| status.matches(t) && category_matches(t, category))
        .collect()
}

fn category_matches(task: &Task, category: &str) -> bool {
    category.is_empty() || task.category == category
}

/// Base categories followed by task categories in first-seen order, without duplicates.
pub fn categories(tasks: &[Task]) -> Vec<String> {
    let mut out: Vec<String> = BASE_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for task in tasks {
        if !out.contains(&task.category) {
            out.push(task.category.clone());
        }
    }
    out
}

pub fn stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let high_priority = tasks
        .iter()
        .filter(|t| t.priority == Priority::High && !t.completed)
        .count();
    TaskStats {
        total,
        completed,
        pending: total - completed,
        high_priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::seed_tasks;
    use chrono::Utc;

    fn task(id: &str, category: &str, priority: Priority, completed: bool) -> Task {
        Task {
            id: id.into(),
            text: format!("task {id}"),
            completed,
            priority,
            category: category.into(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_seed_status_filters() {
        let tasks = seed_tasks(Utc::now());

        let done = filter_by_status(&tasks, StatusFilter::Completed);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].text, "Try new Japanese sweets");

        let active = filter_by_status(&tasks, StatusFilter::Active);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "Go see cherry blossoms");

        assert_eq!(filter_by_status(&tasks, StatusFilter::All).len(), 2);
    }

    #[test]
    fn test_category_filter() {
        let tasks = vec![
            task("1", "Work", Priority::Low, false),
            task("2", "Food", Priority::Low, true),
            task("3", "Work", Priority::High, true),
        ];
        assert_eq!(filter_by_category(&tasks, "").len(), 3);
        let work: Vec<&str> = filter_by_category(&tasks, "Work").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(work, ["1", "3"]);
        assert!(filter_by_category(&tasks, "work").is_empty());
    }

    #[test]
    fn test_combined_filter_is_and() {
        let tasks = vec![
            task("1", "Work", Priority::Low, false),
            task("2", "Food", Priority::Low, true),
            task("3", "Work", Priority::High, true),
        ];
        let ids: Vec<&str> = filter(&tasks, StatusFilter::Completed, "Work")
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["3"]);
        assert_eq!(filter(&tasks, StatusFilter::Active, "Food").len(), 0);
    }

    #[test]
    fn test_categories_for_seed_data() {
        let cats = categories(&seed_tasks(Utc::now()));
        assert_eq!(cats, BASE_CATEGORIES.map(String::from).to_vec());
    }

    #[test]
    fn test_categories_append_first_seen() {
        let tasks = vec![
            task("1", "Garden", Priority::Low, false),
            task("2", "Work", Priority::Low, false),
            task("3", "Errands", Priority::Low, false),
            task("4", "Garden", Priority::Low, false),
        ];
        let cats = categories(&tasks);
        assert_eq!(cats.len(), BASE_CATEGORIES.len() + 2);
        assert_eq!(&cats[BASE_CATEGORIES.len()..], ["Garden", "Errands"]);
    }

    #[test]
    fn test_stats() {
        let tasks = vec![
            task("1", "Work", Priority::High, false),
            task("2", "Work", Priority::High, true),
            task("3", "Food", Priority::Low, true),
            task("4", "Food", Priority::Medium, false),
        ];
        let s = stats(&tasks);
        assert_eq!(
            s,
            TaskStats {
                total: 4,
                completed: 2,
                pending: 2,
                high_priority: 1,
            }
        );
        assert!((s.completion_rate() - 50.0).abs() < f64::EPSILON);
        assert_eq!(stats(&[]).completion_rate(), 0.0);
    }
}
