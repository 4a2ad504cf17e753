#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod diagnostic;
mod logging;

use clap::{Parser, Subcommand};
use miette::Result;
use moon_core::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moonc")]
#[command(author, version, about = "Compile JavaScript with embedded Moon views", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output as JSON (logs become JSON lines on stderr)
    #[arg(long, global = true)]
    json: bool,

    /// Working directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Project config file (defaults to moon.json in the working directory)
    #[arg(long, global = true, value_name = "FILE", env = "MOONC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version information
    Version,

    /// Compile files, replacing views with runtime calls
    Compile {
        /// Files to compile (`-` reads stdin and writes stdout)
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,

        /// Directory to write compiled files to
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Print compiled code instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Parse files and report syntax errors without writing anything
    Check {
        /// Files to check (`-` reads stdin)
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,
    },

    /// Compile every source file under a directory
    Build {
        /// Directory to scan (defaults to the working directory)
        #[arg(value_name = "ROOT")]
        root: Option<PathBuf>,

        /// Directory to write compiled files to, mirroring the source tree
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Build config
    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json)
        .with_config_path(cli.config);

    // Initialize logging
    logging::init(config.verbosity, config.json_logs);

    // Create root span with cwd
    let _span = tracing::info_span!("moonc", cwd = %config.cwd.display()).entered();

    match cli.command {
        Some(Commands::Compile {
            inputs,
            out_dir,
            stdout,
        }) => {
            let action = commands::compile::CompileAction {
                inputs,
                out_dir,
                stdout,
            };
            commands::compile::run(&config, &action, cli.json)
        }
        Some(Commands::Check { inputs }) => commands::check::run(&config, &inputs, cli.json),
        Some(Commands::Build { root, out_dir }) => {
            let action = commands::build::BuildAction { root, out_dir };
            commands::build::run(&config, &action, cli.json)
        }
        Some(Commands::Version) | None => commands::version::run(cli.json),
    }
}
