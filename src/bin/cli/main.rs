mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lexis-cli", about = "Spaced repetition vocabulary sessions", version)]
struct Cli {
    /// Data directory holding config.toml and the tracking file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show which words the next session would pick (does not record anything)
    Select {
        /// Vocabulary file (JSON array of [source, target, pronunciation?])
        vocab: PathBuf,
        /// Number of words to select (default from config)
        #[arg(long)]
        count: Option<usize>,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a review round in the terminal and save the results
    Review {
        /// Vocabulary file (JSON array of [source, target, pronunciation?])
        vocab: PathBuf,
        /// Number of words to review (default from config)
        #[arg(long)]
        count: Option<usize>,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Record a single review event for a word
    Mark {
        word: String,
        translation: String,
        /// Record the word as not understood
        #[arg(long)]
        missed: bool,
    },

    /// List tracked words, most urgent first
    Stats {
        /// Maximum rows
        #[arg(long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Select { vocab, count, seed } => {
            commands::select::run(&app, &vocab, count, seed, &cli.format, use_color)?;
        }
        Command::Review { vocab, count, seed } => {
            commands::review::run(&mut app, &vocab, count, seed, &cli.format, use_color)?;
        }
        Command::Mark { word, translation, missed } => {
            commands::mark::run(&mut app, &word, &translation, missed, &cli.format)?;
        }
        Command::Stats { limit } => {
            commands::stats::run(&app, limit, &cli.format, use_color)?;
        }
    }

    Ok(())
}
