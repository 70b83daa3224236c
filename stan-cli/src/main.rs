use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use stan_export::{ExportFormat, export_to_file};
use std::io;
use std::path::PathBuf;

mod batch;
mod config;
mod filter;
mod glob;
mod state;

use filter::{BookingFilter, FilterArgs, write_report};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STAN_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "stan", version = VERSION, about = "Statement analyzer for Postbank account statements")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ~/.stan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse statements and check that they are consecutive and consistent
    Check {
        /// Statement files or glob patterns (*, ?, **)
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Check statements, then write each one next to its source file
    Export {
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Output format: json, ofx, qif, csv or mt940 (default from config, else json)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },

    /// Check statements, then print the booking items matching all criteria
    Filter {
        #[arg(required = true)]
        patterns: Vec<String>,

        #[command(flatten)]
        args: FilterArgs,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file unless one exists
    Init,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { patterns } => {
            batch::check(&patterns)?;
        }

        Command::Export { patterns, format } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let format = format.unwrap_or(cfg.export.format);
            let exporter = format.exporter(cfg.category_matcher()?);

            let statements = batch::check(&patterns)?;

            println!("Exporting {} files...", exporter.name());
            for st in &statements {
                let path = export_to_file(st, exporter.as_ref())
                    .with_context(|| format!("exporting '{}'", st.filename))?;
                println!("Successfully exported\n\t{}", path.display());
            }
            println!("Exported {} statement(s) in total.\n", statements.len());
        }

        Command::Filter { patterns, args } => {
            let filter = BookingFilter::new(&args)?;
            let statements = batch::check(&patterns)?;
            let bookings = filter.apply(&statements);
            write_report(&bookings, &mut io::stdout().lock())?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
        },
    }

    Ok(())
}
