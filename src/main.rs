//! # Sakura - cherry-blossom todo list
//!
//! A small local-first task manager with an interactive terminal UI and a
//! scriptable CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! sakura
//!
//! # Add a task via CLI
//! sakura add "Buy milk" --priority high --category Shopping
//!
//! # List what is still open
//! sakura list --status active
//!
//! # Toggle a task by id or by its text
//! sakura toggle "Buy milk"
//! ```
//!
//! Tasks are stored as `sakura-todos.json` in the data directory
//! (`--dir` or `SAKURA_TODO_DIR`, otherwise the platform data directory).
//! Logs go to `sakura-todo.log` next to it.

use std::io;

use clap::Parser;

use sakura_todo::cli::Cli;
use sakura_todo::cmd::*;
use sakura_todo::config::Config;
use sakura_todo::db::JsonFileStorage;
use sakura_todo::logging;
use sakura_todo::store::TaskStore;
use sakura_todo::Result;

fn main() {
    let cli = Cli::parse();

    // Completions need neither a data directory nor logging.
    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.dir, cli.log_level)?;
    if let Err(e) = logging::init(&config) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let mut store = TaskStore::open(JsonFileStorage::in_dir(config.data_dir()));
    let mut out = io::stdout().lock();

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(store),
        Commands::Add { text, priority, category, notes } => {
            cmd_add(&mut store, &mut out, &text, priority, &category, notes.as_deref())
        }
        Commands::List { status, category, json } => cmd_list(&store, &mut out, status, &category, json),
        Commands::View { id } => cmd_view(&store, &mut out, &id),
        Commands::Toggle { id } => cmd_toggle(&mut store, &mut out, &id),
        Commands::Edit { id, text } => cmd_edit(&mut store, &mut out, &id, &text),
        Commands::Delete { id } => cmd_delete(&mut store, &mut out, &id),
        Commands::Stats { json } => cmd_stats(&store, &mut out, json),
        Commands::Categories => cmd_categories(&store, &mut out),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}
