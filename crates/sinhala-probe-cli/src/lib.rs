//! sinhala-probe CLI library
//!
//! Command-line front end for the `sinhala-probe` harness: lists the case
//! catalog, runs cases against the live translator and extracts output from
//! saved page text.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ConvertArgs, ExtractArgs, FormatArg, ListArgs, RunArgs,
    Selection, StrategyArg, SuiteArg,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_cases, render_reports, OutputFormat, ProgressReporter};
#[cfg(feature = "browser")]
pub use runner::ChromiumFactory;
pub use runner::{RunSummary, SessionFactory, SuiteRunner};
