// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod commands;
mod errors;

use clap::{error::ErrorKind, Parser, Subcommand};
use errors::{CliError, ExitCode, MachineError};
use hdviz_model::LayoutMode;
use hdviz_store::CacheConfig;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const CRATE_NAME: &str = "hdviz-cli";
pub const LOG_LEVEL_ENV: &str = "HDVIZ_LOG_LEVEL";

#[derive(Parser)]
#[command(name = "hdviz", version)]
#[command(about = "Inspect and validate Morse-Smale level datasets")]
#[command(
    after_help = "Environment:\n  HDVIZ_LOG_LEVEL   Log filter override (falls back to RUST_LOG, then warn)"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long = "log-json", global = true, default_value_t = false)]
    log_json: bool,
    /// Dataset directory; overrides the root of `--config`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// JSON cache configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize one level bundle.
    Inspect {
        #[arg(long, allow_negative_numbers = true)]
        level: Option<i32>,
        #[arg(long, value_parser = LayoutMode::parse)]
        layout: Option<LayoutMode>,
    },
    /// Load every level under every layout mode.
    Validate,
    /// Print the effective cache configuration.
    Config,
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub(crate) json: bool,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            err.emit(wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    init_tracing(cli.log_json);
    let output_mode = OutputMode { json: cli.json };

    let command = cli.command.ok_or_else(|| CliError {
        exit_code: ExitCode::Usage,
        machine: MachineError::new("usage_error", "missing command; see --help"),
    })?;
    let config = resolve_config(cli.config, cli.root)?;

    match command {
        Commands::Inspect { level, layout } => {
            commands::inspect(config, level, layout, output_mode)
        }
        Commands::Validate => commands::validate(config, output_mode),
        Commands::Config => commands::print_config(&config, output_mode),
    }
}

fn resolve_config(path: Option<PathBuf>, root: Option<PathBuf>) -> Result<CacheConfig, CliError> {
    let mut config = match path {
        Some(path) => CacheConfig::from_json_file(&path)?,
        None => CacheConfig::default(),
    };
    if let Some(root) = root {
        config.root = CacheConfig::new(root).root;
    }
    Ok(config)
}

fn init_tracing(log_json: bool) {
    let filter = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    // A subscriber installed by an embedding process wins.
    let _ = if log_json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).try_init()
    };
}

pub(crate) fn emit_json(
    payload: &serde_json::Value,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let text = if output_mode.json {
        serde_json::to_string(payload)
    } else {
        serde_json::to_string_pretty(payload)
    }
    .map_err(|e| CliError::internal(e.to_string()))?;
    println!("{text}");
    Ok(())
}
