#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use bundleplan_core::Config;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bundleplan")]
#[command(author, version, about = "Resolve and inspect bundler build plans", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Ignore .env files in the project root
    #[arg(long, global = true)]
    no_env_files: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve the build plan and print or write it
    Resolve {
        /// Build mode; only "production" selects production (defaults to NODE_ENV)
        #[arg(long, short = 'm')]
        mode: Option<String>,

        /// Dev server port (overrides PORT)
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Write the plan JSON to this file
        #[arg(long, short = 'o', value_name = "FILE", env = "BUNDLEPLAN_OUT")]
        out: Option<PathBuf>,
    },

    /// Show which transform rule applies to each path
    Match {
        /// File paths, relative to the project root or absolute
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Build mode; only "production" selects production (defaults to NODE_ENV)
        #[arg(long, short = 'm')]
        mode: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let cwd = bundleplan_util::fs::absolute(&cwd).into_diagnostic()?;

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json)
        .with_env_files(!cli.no_env_files);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Resolve { mode, port, out }) => commands::resolve::run(
            &config,
            commands::resolve::ResolveAction { mode, port, out },
            cli.json,
        ),
        Some(Commands::Match { paths, mode }) => {
            commands::match_path::run(&config, mode.as_deref(), &paths, cli.json)
        }
    }
}
