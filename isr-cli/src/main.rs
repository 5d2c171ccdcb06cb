use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use isr_cli::commands;
use isr_cli::config::{AppConfig, OutputFormat};
use isr_cli::logging::{init_logging, make_filter};
use isr_core::TaxEngine;
use isr_data::{batch_loader, profile_loader};
use tracing::debug;

/// Annual ISR balance calculator for salaried taxpayers.
///
/// Computes taxable income, authorized personal deductions, determined and
/// withheld tax, and the resulting balance in favor or to pay.
#[derive(Parser, Debug)]
#[command(name = "isr")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of isr_<year>.toml tables (defaults to the built-in tables)
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// CSV of monthly brackets that replaces the loaded schedules
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "isr_core=debug,info"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the balance for one taxpayer profile (JSON)
    Calculate {
        /// Path to the profile JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Fiscal year to use instead of the one in the profile
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Calculate balances for every row of a CSV batch
    Batch {
        /// Path to the batch CSV file
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show the parameters used for a fiscal year
    Table {
        /// Fiscal year (defaults to the configured year, then last year)
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.tables {
        config.tables_dir = Some(dir);
    }
    if let Some(file) = cli.brackets {
        config.brackets_file = Some(file);
    }

    init_logging(make_filter(cli.log_level.as_deref(), &config.log_level)?);
    debug!(?config, "resolved configuration");

    let engine = TaxEngine::new(config.build_registry()?);

    let output = match cli.command {
        Command::Calculate {
            input,
            year,
            format,
        } => {
            let profile = profile_loader::load_from_file(&input)
                .with_context(|| format!("Failed to load profile: {}", input.display()))?;
            commands::calculate(&engine, profile, year, format.unwrap_or(config.format))?
        }
        Command::Batch { input, format } => {
            let profiles = batch_loader::load_from_file(&input)
                .with_context(|| format!("Failed to load batch: {}", input.display()))?;
            commands::batch(&engine, &profiles, format.unwrap_or(config.format))?
        }
        Command::Table { year, format } => commands::table(
            engine.registry(),
            config.resolve_year(year),
            format.unwrap_or(config.format),
        )?,
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}
