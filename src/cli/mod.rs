pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "Live basketball stats from the command line", long_about = None)]
pub struct Cli {
    /// Database file (default: <data dir>/courtside/courtside.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (default: <config dir>/courtside/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll one or more games until stopped, printing each update
    Watch {
        /// Game ids or URLs, each polled on its own
        #[arg(required = true, num_args = 1..)]
        games: Vec<String>,

        /// Poll interval (e.g., "500ms", "5s", "1m")
        #[arg(short, long)]
        interval: Option<String>,

        /// Stop after this many poll cycles
        #[arg(short = 'n', long)]
        iterations: Option<u64>,

        /// Start from scratch instead of the stored snapshot
        #[arg(long)]
        fresh: bool,
    },
    /// Poll one or more games once and print their snapshots
    Snapshot {
        /// Game ids or URLs
        #[arg(required = true, num_args = 1..)]
        games: Vec<String>,

        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the stored snapshot of a game
    Show {
        /// Game id or URL
        game: String,

        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored games
    List,
    /// Delete a stored game and its events
    Remove {
        /// Game id or URL
        game: String,
    },
    /// Parse a saved page and print what was extracted as JSON
    Parse {
        /// Path to the saved HTML page
        file: PathBuf,

        /// Page kind (e.g., "boxscore" or "bs.html"); guessed from the file name if omitted
        #[arg(short, long)]
        kind: Option<String>,
    },
}
