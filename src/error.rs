//! Error types for the todo store and its front ends.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("No task found matching '{0}'")]
    TaskNotFound(String),

    /// A text identifier matched more than one task.
    #[error("Multiple tasks match '{identifier}' (ids: {}). Please use the id instead.", ids.join(", "))]
    AmbiguousTask { identifier: String, ids: Vec<String> },

    #[error("Could not determine a data directory; pass --dir or set SAKURA_TODO_DIR")]
    NoDataDir,

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
