//! # td - Customer task dashboard CLI
//!
//! A command-line task dashboard for customer work: create, edit, search,
//! filter and sort tasks, with derived SLA statistics (pending, overdue,
//! due-today and approaching-breach counts).
//!
//! ## Key Features
//!
//! - **Derived status**: `overdue` is never stored; it is computed from the
//!   due date every time the view is rebuilt, so a task can never get stuck
//!   in a stale overdue state.
//! - **Single source of truth**: all state lives in one in-memory store;
//!   every mutation synchronously recomputes the filtered list and the
//!   dashboard counters.
//! - **Local file storage**: one JSON file holding the tasks and the
//!   presentation preferences. Search, sort and filters reset each session.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! td add "Review Q3 performance report" --due 2025-08-29T10:00:00Z \
//!     --priority high --customer "Acme Corp"
//!
//! # List with filters
//! td list --status overdue --status in-progress --sort priority
//!
//! # Search
//! td list --search acme
//!
//! # Dashboard counters
//! td stats
//! ```
//!
//! Data is stored locally in `~/.taskdash/tasks.json` (override with
//! `--db`). We recommend you back the file up periodically.

use std::path::PathBuf;

use clap::Parser;

pub mod classify;
pub mod cli;
pub mod clock;
pub mod cmd;
pub mod db;
pub mod fields;
pub mod query;
pub mod store;
pub mod task;
pub mod validate;

use cli::Cli;
use cmd::*;
use db::StoreFile;
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    // Completions don't need the store.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".taskdash");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create data directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir.join("tasks.json")
    });

    // Restore the persisted snapshot; criteria start fresh each session.
    let mut store = TaskStore::restore(StoreFile::load(&db_path));

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add {
            title,
            desc,
            due,
            priority,
            status,
            customer,
        } => cmd_add(&mut store, &db_path, title, desc, due, priority, status, customer),

        Commands::List {
            search,
            status,
            priority,
            sort,
            limit,
        } => cmd_list(&mut store, search, status, priority, sort, limit),

        Commands::View { id } => cmd_view(&store, id),

        Commands::Update {
            id,
            title,
            desc,
            clear_desc,
            due,
            clear_due,
            priority,
            status,
            customer,
            clear_customer,
        } => cmd_update(
            &mut store,
            &db_path,
            id,
            title,
            desc,
            clear_desc,
            due,
            clear_due,
            priority,
            status,
            customer,
            clear_customer,
        ),

        Commands::Delete { id } => cmd_delete(&mut store, &db_path, id),

        Commands::Toggle { id } => cmd_toggle(&mut store, &db_path, id),

        Commands::Stats => cmd_stats(&store),

        Commands::Mode { mode } => cmd_mode(&mut store, &db_path, mode),

        Commands::Sidebar => cmd_sidebar(&mut store, &db_path),
    }
}
