//! # Sakura Todo
//!
//! A local-first todo list with priorities, categories and notes, kept in a
//! single JSON document and driven from the command line or a terminal UI.
//!
//! - [`store::TaskStore`] owns the tasks and writes every change through a
//!   [`db::TaskStorage`] port.
//! - [`views`] derives filtered lists, categories and stats from a snapshot.
//! - [`command::Command`] is the validated boundary the CLI and TUI issue
//!   mutations through.
//! - [`window::WindowHost`] is the narrow chrome capability the UI talks to.

pub mod cli;
pub mod cmd;
pub mod command;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod logging;
pub mod store;
pub mod task;
pub mod views;
pub mod window;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

pub use error::{Error, Result};
