use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Cherry-blossom todo list for the terminal.
/// Tasks live in a single JSON document in the data directory.
#[derive(Parser)]
#[command(name = "sakura", version, about = "Beautiful task management to brighten your days")]
pub struct Cli {
    /// Directory holding the task document and log file.
    #[arg(long, global = true, env = "SAKURA_TODO_DIR")]
    pub dir: Option<PathBuf>,

    /// Log filter, e.g. info, debug or sakura_todo=trace.
    #[arg(long, global = true, env = "SAKURA_TODO_LOG")]
    pub log_level: Option<String>,

    /// Without a subcommand the interactive UI is launched.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
