//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use sinhala_probe::SuiteKind;
use std::path::PathBuf;

/// sinhala-probe: regression probes for a hosted Singlish-to-Sinhala translator
#[derive(Parser, Debug)]
#[command(name = "sinhala-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Probe configuration file (YAML)
    #[arg(short, long, global = true, env = "SINHALA_PROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog cases
    List(ListArgs),

    /// Run catalog cases against the live translator
    Run(RunArgs),

    /// Convert one input on the live translator and print the output
    Convert(ConvertArgs),

    /// Extract the output from saved page text
    Extract(ExtractArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Which cases to select
#[derive(Args, Debug, Clone, Default)]
pub struct Selection {
    /// Only cases of this suite
    #[arg(short, long)]
    pub suite: Option<SuiteArg>,

    /// Only cases whose id or title contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Only these case ids (repeatable)
    #[arg(long = "case", value_name = "ID")]
    pub cases: Vec<String>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Case selection
    #[command(flatten)]
    pub selection: Selection,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Case selection
    #[command(flatten)]
    pub selection: Selection,

    /// Positive cases must match the expected output exactly
    #[arg(long)]
    pub strict: bool,

    /// Stop at the first failing case
    #[arg(long)]
    pub fail_fast: bool,

    /// Override the translator URL
    #[arg(long)]
    pub url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the convert command
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Singlish input
    pub input: String,

    /// Single read after a short dwell instead of polling
    #[arg(long)]
    pub once: bool,

    /// Override the translator URL
    #[arg(long)]
    pub url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

/// Arguments for the extract command
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// File holding page text (stdin when omitted)
    pub file: Option<PathBuf>,

    /// Extraction strategy
    #[arg(long, default_value = "script-anchored")]
    pub strategy: StrategyArg,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show the effective configuration
    #[arg(long)]
    pub show: bool,

    /// Write the default configuration to this path
    #[arg(long, value_name = "PATH")]
    pub init: Option<PathBuf>,

    /// Overwrite an existing file with --init
    #[arg(long)]
    pub force: bool,
}

/// Suite argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuiteArg {
    /// Positive functional cases
    Positive,
    /// Negative functional cases
    Negative,
    /// UI cases
    Ui,
}

impl From<SuiteArg> for SuiteKind {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Positive => Self::Positive,
            SuiteArg::Negative => Self::Negative,
            SuiteArg::Ui => Self::Ui,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Extraction strategy argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    /// Start at the first Sinhala character
    ScriptAnchored,
    /// Strip leading Copy/Clear/Export/Share
    ChromeStripped,
}

impl From<StrategyArg> for sinhala_probe::Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ScriptAnchored => Self::ScriptAnchored,
            StrategyArg::ChromeStripped => Self::ChromeStripped,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
