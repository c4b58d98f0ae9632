use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task dashboard CLI.
/// Storage defaults to ~/.taskdash/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "td", version, about = "Customer task dashboard CLI")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
