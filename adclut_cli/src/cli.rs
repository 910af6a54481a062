//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "adclut", version, about = "ADC linearization lookup-table generator")]
pub struct Cli {
    /// Path to config TOML; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit results and errors as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level; RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL", value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Verbosity accepted by `--log-level`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the correction table from a capture and write it as a C header
    Generate {
        /// Capture file (.csv, .json, or .log/.tsv/.txt serial capture)
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        /// Header file to write
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// Override the array name (table.name in the config)
        #[arg(long, value_name = "IDENT")]
        name: Option<String>,
        /// Use the least-squares polynomial mapper instead of piecewise-linear
        #[arg(long, action = ArgAction::SetTrue)]
        polynomial: bool,
    },
    /// Show how well the generated table linearizes the capture
    Report {
        /// Capture file (.csv, .json, or .log/.tsv/.txt serial capture)
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        /// Use the least-squares polynomial mapper instead of piecewise-linear
        #[arg(long, action = ArgAction::SetTrue)]
        polynomial: bool,
    },
    /// Load and validate the configuration, then exit
    CheckConfig,
}
