use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use iris_triage::cli::{Args, Commands};
use iris_triage::config::{load_or_create_config, ReportConfig};
use iris_triage::constants::{FALLBACK_HOST_LABEL, RUN_SUMMARY_FILE};
use iris_triage::models::ReportArtifact;
use iris_triage::platform::Platform;
use iris_triage::privileges;
use iris_triage::render::{BrowserPreference, ReportRenderer};
use iris_triage::reports::{run_batch, ReportKind};
use iris_triage::runner::{runner_for, ExecutionMode};
use iris_triage::utils::summary::create_run_summary;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    match &args.command {
        Some(Commands::List) => {
            list_reports();
            Ok(())
        }
        Some(Commands::InitConfig { path }) => init_config(path),
        Some(Commands::Run { all, report }) => run_reports(&args, *all, report),
        None => run_reports(&args, false, &[]),
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

fn list_reports() {
    for kind in ReportKind::all() {
        println!("{:<22} {:<36} {}", kind.to_string(), kind.file_name(), kind.title());
    }
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        warn!("Overwriting existing configuration at {}", path.display());
    }
    info!("Creating default configuration file at {}", path.display());
    ReportConfig::create_default_config_file(path)?;
    info!("Configuration created successfully");
    Ok(())
}

/// Everything a run needs once CLI flags and configuration are merged
#[derive(Debug)]
struct RunSettings {
    output_dir: PathBuf,
    host_label: String,
    browser: BrowserPreference,
    mode: ExecutionMode,
    platform: Platform,
    reports: Vec<ReportKind>,
}

impl RunSettings {
    /// CLI flags win over the configuration, which wins over the defaults
    fn resolve(args: &Args, config: &ReportConfig, all: bool, selected: &[ReportKind]) -> Self {
        let reports = if all {
            ReportKind::all().to_vec()
        } else if !selected.is_empty() {
            let mut reports = Vec::with_capacity(selected.len());
            for kind in selected {
                if !reports.contains(kind) {
                    reports.push(*kind);
                }
            }
            reports
        } else {
            config.enabled_reports()
        };

        RunSettings {
            output_dir: args.output.clone().unwrap_or_else(|| config.resolved_output_directory()),
            host_label: args.host_label.clone()
                .or_else(|| config.host_label.clone())
                .unwrap_or_else(default_host_label),
            browser: args.browser.unwrap_or(config.browser),
            mode: if args.mock { ExecutionMode::Mock } else { config.mode },
            platform: args.target_os.or(config.target_os).unwrap_or_else(Platform::current),
            reports,
        }
    }
}

/// Machine hostname, or the fallback label when it cannot be read
fn default_host_label() -> String {
    hostname::get()
        .ok()
        .map(|name| name.to_string_lossy().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_HOST_LABEL.to_string())
}

fn run_reports(args: &Args, all: bool, selected: &[ReportKind]) -> Result<()> {
    let config = load_or_create_config(args.config.as_deref())?;
    let settings = RunSettings::resolve(args, &config, all, selected);

    info!("Starting IRIS triage report run");
    info!(
        "Host: {} | Platform: {} | Mode: {} | Output: {}",
        settings.host_label,
        settings.platform,
        settings.mode,
        settings.output_dir.display()
    );

    if settings.mode == ExecutionMode::Live {
        if settings.platform != Platform::current() {
            warn!(
                "Rendering {} reports in live mode; commands still run on this {} host",
                settings.platform,
                Platform::current()
            );
        }
        privileges::warn_if_not_elevated(settings.platform);
    }

    let started_at = Utc::now().to_rfc3339();
    let runner = runner_for(settings.mode);
    let renderer = ReportRenderer::new(&settings.output_dir, &settings.host_label, settings.browser);

    let artifacts = run_batch(&settings.reports, runner.as_ref(), settings.platform, &renderer);

    if let Err(e) = write_run_summary(&settings, &started_at, &artifacts) {
        error!("Failed to write run summary: {:#}", e);
    }

    info!("Reports saved to {}", settings.output_dir.display());
    Ok(())
}

fn write_run_summary(settings: &RunSettings, started_at: &str, artifacts: &[ReportArtifact]) -> Result<()> {
    let summary = create_run_summary(
        &settings.host_label,
        started_at,
        settings.platform,
        settings.mode,
        artifacts,
    )?;

    fs::create_dir_all(&settings.output_dir)
        .context(format!("Failed to create output directory {}", settings.output_dir.display()))?;

    let summary_path = settings.output_dir.join(RUN_SUMMARY_FILE);
    fs::write(&summary_path, summary)
        .context(format!("Failed to write run summary to {}", summary_path.display()))?;

    info!("Run summary written to {}", summary_path.display());
    Ok(())
}
