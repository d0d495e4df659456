//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_projection_adapter::CsvProjectionAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_file_adapter::JsonFileAdapter;
use crate::domain::cashflow::Cashflow;
use crate::domain::describe::describe_all;
use crate::domain::document::{DecodeOptions, decode_all, encode_all};
use crate::domain::error::CashflowError;
use crate::domain::projection::{Projection, project};
use crate::domain::settings::{ProjectionSettings, SettingsOverrides, decode_options_from_config};
use crate::ports::cashflow_port::CashflowPort;
use crate::ports::projection_port::ProjectionPort;

#[derive(Parser, Debug)]
#[command(name = "cashflow", about = "Project future cashflows for budgeting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project cashflows day by day and write the table as CSV
    Project {
        #[arg(short = 'f', long)]
        cashflows: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// First projected date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Number of days to project
        #[arg(long)]
        days: Option<u32>,
        /// Balance before the first projected day
        #[arg(long, allow_negative_numbers = true)]
        balance: Option<f64>,
        /// CSV output path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a plain-text description of the cashflows
    Describe {
        #[arg(short = 'f', long)]
        cashflows: PathBuf,
    },
    /// Check that a cashflow file decodes
    Validate {
        #[arg(short = 'f', long)]
        cashflows: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Re-encode a cashflow file in canonical form on stdout
    Normalize {
        #[arg(short = 'f', long)]
        cashflows: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Project {
            cashflows,
            config,
            start,
            days,
            balance,
            output,
        } => {
            let overrides = SettingsOverrides {
                start_date: start,
                duration_days: days,
                starting_balance: balance,
            };
            run_project(&cashflows, config.as_deref(), &overrides, output.as_deref())
        }
        Command::Describe { cashflows } => run_describe(&cashflows),
        Command::Validate { cashflows, config } => run_validate(&cashflows, config.as_deref()),
        Command::Normalize { cashflows, config } => run_normalize(&cashflows, config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load an INI file, or an empty configuration when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, CashflowError> {
    match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn load_cashflows(path: &Path, options: &DecodeOptions) -> Result<Vec<Cashflow>, CashflowError> {
    log::info!("Loading cashflows from {}", path.display());
    let documents = JsonFileAdapter::new(path.to_path_buf()).load()?;
    decode_all(&documents, options)
}

pub fn build_projection(
    cashflows_path: &Path,
    config_path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<Projection, CashflowError> {
    let config = load_config(config_path)?;
    let settings = ProjectionSettings::from_config(&config, overrides)?;
    let cashflows = load_cashflows(cashflows_path, &settings.decode_options())?;

    if let Some(end) = settings.end_date() {
        log::info!(
            "Projecting {} cashflows: {} to {} ({} days)",
            cashflows.len(),
            settings.start_date,
            end,
            settings.duration_days
        );
    }
    let projection = project(
        &cashflows,
        settings.start_date,
        settings.duration_days,
        settings.starting_balance,
    );

    if let Some((date, balance)) = projection.lowest_balance() {
        if balance < 0.0 {
            log::warn!("Balance falls to {balance:.2} on {date}");
        } else {
            log::info!("Lowest balance {balance:.2} on {date}");
        }
    }
    Ok(projection)
}

fn run_project(
    cashflows_path: &Path,
    config_path: Option<&Path>,
    overrides: &SettingsOverrides,
    output_path: Option<&Path>,
) -> Result<(), CashflowError> {
    let projection = build_projection(cashflows_path, config_path, overrides)?;
    let writer = CsvProjectionAdapter::new();

    match output_path {
        Some(path) => {
            writer.write(&projection, path)?;
            log::info!("Projection written to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writer.write_to(&projection, &mut out)?;
        }
    }
    Ok(())
}

fn run_describe(cashflows_path: &Path) -> Result<(), CashflowError> {
    let documents = JsonFileAdapter::new(cashflows_path.to_path_buf()).load()?;
    println!("{}", describe_all(&documents));
    Ok(())
}

/// Names of the decoded top-level cashflows.
pub fn validate_cashflows(
    cashflows_path: &Path,
    config_path: Option<&Path>,
) -> Result<Vec<String>, CashflowError> {
    let config = load_config(config_path)?;
    let options = decode_options_from_config(&config)?;
    let cashflows = load_cashflows(cashflows_path, &options)?;
    Ok(cashflows.iter().map(|c| c.name().to_string()).collect())
}

fn run_validate(cashflows_path: &Path, config_path: Option<&Path>) -> Result<(), CashflowError> {
    let names = validate_cashflows(cashflows_path, config_path)?;
    for name in &names {
        println!("  {name}");
    }
    println!("{} cashflows OK", names.len());
    Ok(())
}

/// Decode and re-encode, returning canonical pretty-printed JSON.
pub fn normalize_cashflows(
    cashflows_path: &Path,
    config_path: Option<&Path>,
) -> Result<String, CashflowError> {
    let config = load_config(config_path)?;
    let options = decode_options_from_config(&config)?;
    let cashflows = load_cashflows(cashflows_path, &options)?;
    Ok(serde_json::to_string_pretty(&encode_all(&cashflows))?)
}

fn run_normalize(cashflows_path: &Path, config_path: Option<&Path>) -> Result<(), CashflowError> {
    let json = normalize_cashflows(cashflows_path, config_path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{json}")?;
    Ok(())
}
