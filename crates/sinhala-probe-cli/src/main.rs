//! sinhala-probe: regression probes for a hosted Singlish translator
//!
//! ## Usage
//!
//! ```bash
//! sinhala-probe list --suite ui              # Show the UI cases
//! sinhala-probe run --suite positive         # Run positive cases in Chromium
//! sinhala-probe run --case Neg_UI_Fun_0001   # Run one case
//! sinhala-probe convert "mama gedhara yanavaa"
//! sinhala-probe extract page.txt             # Extract output from saved page text
//! ```

use clap::Parser;
use sinhala_probe::Catalog;
use sinhala_probe_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::io::Read as _;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flags
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli, config: &CliConfig) -> CliResult<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::List(args) => {
            let catalog = Catalog::load()?;
            println!("{}", handlers::list(&catalog, &args)?);
            Ok(())
        }
        Commands::Extract(args) => {
            let page_text = match args.file {
                Some(ref path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let probe_config = handlers::load_probe_config(config_path)?;
            println!("{}", handlers::extract(&probe_config, &args, &page_text));
            Ok(())
        }
        Commands::Config(args) => {
            if let Some(yaml) = handlers::config(config_path, &args)? {
                print!("{yaml}");
            }
            if let Some(ref path) = args.init {
                eprintln!("wrote {}", path.display());
            }
            Ok(())
        }
        Commands::Run(args) => {
            run_cases(handlers::load_probe_config(config_path)?, config, &args)
        }
        Commands::Convert(args) => convert(handlers::load_probe_config(config_path)?, &args),
    }
}

#[cfg(feature = "browser")]
fn run_cases(
    probe_config: sinhala_probe::ProbeConfig,
    config: &CliConfig,
    args: &sinhala_probe_cli::RunArgs,
) -> CliResult<()> {
    let catalog = Catalog::load()?;
    let mut reporter = sinhala_probe_cli::ProgressReporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet(),
    );
    let runtime = tokio::runtime::Runtime::new()?;
    let (rendered, summary) = runtime.block_on(handlers::run(
        sinhala_probe_cli::ChromiumFactory,
        probe_config,
        &catalog,
        args,
        &mut reporter,
    ))?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }

    let failed = summary.failed();
    if failed > 0 {
        return Err(sinhala_probe_cli::CliError::CaseFailures {
            failed,
            total: summary.reports.len(),
        });
    }
    Ok(())
}

#[cfg(feature = "browser")]
fn convert(
    probe_config: sinhala_probe::ProbeConfig,
    args: &sinhala_probe_cli::ConvertArgs,
) -> CliResult<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(handlers::convert(
        sinhala_probe_cli::ChromiumFactory,
        probe_config,
        args,
    ))?;
    println!("{output}");
    Ok(())
}

#[cfg(not(feature = "browser"))]
fn run_cases(
    _probe_config: sinhala_probe::ProbeConfig,
    _config: &CliConfig,
    _args: &sinhala_probe_cli::RunArgs,
) -> CliResult<()> {
    Err(sinhala_probe::ProbeError::BrowserFeatureDisabled.into())
}

#[cfg(not(feature = "browser"))]
fn convert(
    _probe_config: sinhala_probe::ProbeConfig,
    _args: &sinhala_probe_cli::ConvertArgs,
) -> CliResult<()> {
    Err(sinhala_probe::ProbeError::BrowserFeatureDisabled.into())
}
