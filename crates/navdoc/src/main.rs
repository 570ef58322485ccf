#![allow(clippy::print_stderr, clippy::print_stdout)]
mod build;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use navdoc_engine::EntryOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderChoice {
    /// Entries within a kind section sorted by name.
    Lexicographic,
    /// Entries kept in the order declarations arrived in.
    Declaration,
}

impl From<OrderChoice> for EntryOrder {
    fn from(choice: OrderChoice) -> EntryOrder {
        match choice {
            OrderChoice::Lexicographic => EntryOrder::Lexicographic,
            OrderChoice::Declaration => EntryOrder::Declaration,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Build navigation sidebar indexes for generated documentation")]
pub struct Options {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a sidebar index artifact from declaration records.
    Build {
        /// Path to a declaration file (.json array or .jsonl) or a directory
        /// containing such files.
        input: Utf8PathBuf,
        /// Output file, or output directory with --split. Defaults to stdout.
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
        /// Write one sidebar.json per module under the output directory.
        #[arg(long, requires = "output")]
        split: bool,
        /// Ordering of entries within a kind section.
        #[arg(long, value_enum, default_value = "lexicographic")]
        order: OrderChoice,
        /// Exit non-zero if any declaration was skipped or deduplicated.
        #[arg(long)]
        deny_warnings: bool,
    },
    /// Print a per-kind summary of the collected index.
    Summary {
        /// Path to a declaration file or directory (same formats as build).
        input: Utf8PathBuf,
    },
}

fn main() {
    init_tracing();

    let opts = Options::parse();
    let result = match &opts.command {
        Command::Build {
            input,
            output,
            split,
            order,
            deny_warnings,
        } => build::run_build(
            input,
            output.as_ref(),
            *split,
            (*order).into(),
            *deny_warnings,
        ),
        Command::Summary { input } => build::run_summary(input),
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", "Error:".red());
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
