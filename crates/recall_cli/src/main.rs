//! Recall CLI: inspect and maintain a memoization cache directory.
//!
//! Provides `recall clear` to wipe cached results, `recall info` for a summary
//! of the cache, and `recall list` to print every stored entry.

#![warn(missing_docs)]

mod clear;
mod info;
mod list;
mod store;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Recall: disk-backed memoization cache tool.
#[derive(Parser, Debug)]
#[command(name = "recall", version, about = "Recall memoization cache tool")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `recall.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Cache root directory, overriding `cache.root` from the configuration.
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Delete every cached result; `--verbose` reports what was removed.
    Clear,
    /// Show the cache location, entry count and total size.
    Info,
    /// List cached entries as `<fingerprint> <bytes>`.
    List,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
    /// Optional cache root override.
    pub root: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
        root: cli.root,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Clear => clear::run(&global),
        Command::Info => info::run(&global),
        Command::List => list::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Default log filter when `RUST_LOG` is not set.
fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}

fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
