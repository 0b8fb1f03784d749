use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use deadexports::config::Config;
use deadexports::export::ExportFormat;
use deadexports::runner;

#[derive(Parser)]
#[command(name = "deadexports")]
#[command(version)]
#[command(about = "Find unused exports in TypeScript and JavaScript projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report exports that no other module uses
    Analyze {
        /// Path to tsconfig.json
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Modules matching this regex do not count as consumers
        #[arg(short, long)]
        skip: Option<String>,

        /// Drop results for files matching this regex
        #[arg(short, long)]
        ignore: Option<String>,

        /// Output format (text, json, csv, markdown)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Hide exports that are used inside their own module
        #[arg(short, long)]
        unused_in_module: bool,

        /// Exit with status 1 if anything is reported
        #[arg(short, long)]
        error: bool,

        /// Enable debug logging
        #[arg(short, long, conflicts_with = "quiet")]
        verbose: bool,

        /// Only log errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show version information
    Version,
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            project,
            skip,
            ignore,
            format,
            unused_in_module,
            error,
            verbose,
            quiet,
        }) => {
            init_logging(verbose, quiet);

            let cwd = std::env::current_dir().context("Failed to determine working directory")?;
            let mut config = Config::load(&cwd)?;
            if let Some(project) = project {
                config.project = project;
            }
            if skip.is_some() {
                config.skip = skip;
            }
            if ignore.is_some() {
                config.ignore = ignore;
            }
            if let Some(format) = format {
                config.format = format;
            }
            config.unused_in_module |= unused_in_module;
            config.error |= error;

            let stdout = std::io::stdout();
            let count = runner::run_in(&config, &cwd, &mut stdout.lock())?;

            if config.error && count > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Version) => {
            println!("deadexports v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("deadexports - find unused exports in TypeScript/JavaScript projects");
            println!("Run 'deadexports analyze' in a directory with a tsconfig.json");
            println!("Run 'deadexports --help' for more information");
        }
    }

    Ok(ExitCode::SUCCESS)
}
