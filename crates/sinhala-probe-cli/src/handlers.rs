//! Command handlers
//!
//! Everything that does not need a browser is a plain function over the
//! catalog or configuration so it can be tested without launching one.

use crate::commands::{ConfigArgs, ConvertArgs, ExtractArgs, ListArgs, RunArgs, Selection};
use crate::error::{CliError, CliResult};
use crate::output::{render_cases, render_reports, OutputFormat, ProgressReporter};
use crate::runner::{RunSummary, SessionFactory, SuiteRunner};
use sinhala_probe::{Catalog, OutputExtractor, ProbeConfig, Sample, SuiteKind};
use std::path::Path;
use tracing::{debug, info};

/// Load the probe configuration from `path` (or defaults), then apply the environment
pub fn load_probe_config(path: Option<&Path>) -> CliResult<ProbeConfig> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            ProbeConfig::load(path)?
        }
        None => ProbeConfig::default(),
    };
    let config = config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Apply the run-time flags shared by `run` and `convert`
pub fn apply_flags(mut config: ProbeConfig, url: Option<&str>, headed: bool) -> CliResult<ProbeConfig> {
    if let Some(url) = url {
        config = config.with_base_url(url);
    }
    if headed {
        config.browser = config.browser.with_headless(false);
    }
    config.validate()?;
    Ok(config)
}

/// Resolve a selection against the catalog, in catalog order
///
/// Explicit case ids must all exist.
pub fn select<'a>(catalog: &'a Catalog, selection: &Selection) -> CliResult<Vec<&'a Sample>> {
    for id in &selection.cases {
        if catalog.by_id(id).is_none() {
            return Err(CliError::invalid_argument(format!("unknown case id '{id}'")));
        }
    }

    let suite: Option<SuiteKind> = selection.suite.map(Into::into);
    let pattern = selection.filter.as_deref().map(str::to_lowercase);

    Ok(catalog
        .iter()
        .filter(|s| suite.map_or(true, |kind| s.kind == Some(kind)))
        .filter(|s| {
            pattern.as_deref().map_or(true, |p| {
                s.id.to_lowercase().contains(p) || s.title.to_lowercase().contains(p)
            })
        })
        .filter(|s| selection.cases.is_empty() || selection.cases.contains(&s.id))
        .collect())
}

/// `list`: render the selected cases
pub fn list(catalog: &Catalog, args: &ListArgs) -> CliResult<String> {
    let samples = select(catalog, &args.selection)?;
    render_cases(samples, args.format.into())
}

/// `extract`: run the extractor over saved page text
#[must_use]
pub fn extract(config: &ProbeConfig, args: &ExtractArgs, page_text: &str) -> String {
    OutputExtractor::with_strategy(config.anchors.clone(), args.strategy.into()).extract(page_text)
}

/// `config --show`: the effective configuration as YAML
pub fn show_config(config: &ProbeConfig) -> CliResult<String> {
    Ok(config.to_yaml()?)
}

/// `config --init`: write the default configuration
pub fn init_config(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    std::fs::write(path, ProbeConfig::default().to_yaml()?)?;
    Ok(())
}

/// `config`: dispatch on the flags; no flags means `--show`
///
/// `--init` alone never reads `config_path`, so it works while the
/// existing file is broken.
pub fn config(config_path: Option<&Path>, args: &ConfigArgs) -> CliResult<Option<String>> {
    if let Some(ref path) = args.init {
        init_config(path, args.force)?;
        if !args.show {
            return Ok(None);
        }
    }
    show_config(&load_probe_config(config_path)?).map(Some)
}

/// `run`: execute the selected cases and render the reports
///
/// Returns the rendered reports and the summary; failing cases are reported
/// through [`CliError::CaseFailures`] by the caller.
pub async fn run<F: SessionFactory>(
    factory: F,
    config: ProbeConfig,
    catalog: &Catalog,
    args: &RunArgs,
    reporter: &mut ProgressReporter,
) -> CliResult<(String, RunSummary)> {
    let samples = select(catalog, &args.selection)?;
    if samples.is_empty() {
        return Err(CliError::invalid_argument("no cases match the selection"));
    }

    let config = apply_flags(config, args.url.as_deref(), args.headed)?.with_strict(args.strict);
    reporter.header(&format!("{} cases against {}", samples.len(), config.base_url));

    let runner = SuiteRunner::new(factory, config).with_fail_fast(args.fail_fast);
    let summary = runner.run(&samples, reporter).await;
    reporter.summary(
        summary.passed(),
        summary.failed(),
        summary.skipped,
        summary.duration,
    );

    let format: OutputFormat = args.format.into();
    let rendered = match format {
        // Text verdicts already went to the reporter
        OutputFormat::Text => String::new(),
        OutputFormat::Json => render_reports(&summary.reports, format)?,
    };
    Ok((rendered, summary))
}

/// `convert`: type one input and return what the page shows
pub async fn convert<F: SessionFactory>(
    factory: F,
    config: ProbeConfig,
    args: &ConvertArgs,
) -> CliResult<String> {
    let config = apply_flags(config, args.url.as_deref(), args.headed)?;
    let mut session = factory.open(&config).await?;
    let result = if args.once {
        session.convert_once(&args.input).await
    } else {
        session.convert_and_read(&args.input).await
    };
    if let Err(e) = session.close().await {
        debug!(error = %e, "session close failed");
    }
    Ok(result?)
}
