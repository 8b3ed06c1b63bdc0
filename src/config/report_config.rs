use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::env_vars::{expand_env_vars, normalize_path_for_os};
use crate::constants::DEFAULT_OUTPUT_DIR;
use crate::platform::Platform;
use crate::render::BrowserPreference;
use crate::reports::ReportKind;
use crate::runner::ExecutionMode;

/// Settings for one report run.
///
/// Every field has a default so a YAML file only needs the keys it changes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub version: String,
    pub description: String,
    /// Label stamped on every page; the machine hostname when unset
    pub host_label: Option<String>,
    pub output_directory: String,
    pub browser: BrowserPreference,
    pub mode: ExecutionMode,
    /// Render reports for this OS instead of the running one
    pub target_os: Option<Platform>,
    /// Reports a plain `run` generates; empty means all of them
    pub reports: Vec<ReportKind>,
    pub global_options: HashMap<String, String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            version: "1.0".to_string(),
            description: "Default IRIS triage report configuration".to_string(),
            host_label: None,
            output_directory: DEFAULT_OUTPUT_DIR.to_string(),
            browser: BrowserPreference::None,
            mode: ExecutionMode::Live,
            target_os: None,
            reports: Vec::new(),
            global_options: HashMap::new(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: ReportConfig = serde_yaml::from_str(&content)
            .context(format!("Failed to parse YAML config: {}", path.display()))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory {}", parent.display()))?;
        }

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        ReportConfig::default().save_to_yaml_file(path)
    }

    /// Output directory with environment variables expanded
    pub fn resolved_output_directory(&self) -> PathBuf {
        PathBuf::from(normalize_path_for_os(&expand_env_vars(&self.output_directory)))
    }

    /// Reports a run without an explicit selection generates, in batch order
    pub fn enabled_reports(&self) -> Vec<ReportKind> {
        if self.reports.is_empty() {
            return ReportKind::all().to_vec();
        }
        ReportKind::all()
            .iter()
            .copied()
            .filter(|kind| self.reports.contains(kind))
            .collect()
    }
}

/// Load a configuration file or create a default one.
///
/// - `Some(path)` that exists: parsed, and a parse failure is an error
/// - `Some(path)` that does not exist: the default is written there and returned
/// - `None`: the default, nothing written
pub fn load_or_create_config(config_path: Option<&Path>) -> Result<ReportConfig> {
    match config_path {
        Some(path) if path.exists() => ReportConfig::from_yaml_file(path),
        Some(path) => {
            info!("Config {} not found, creating default", path.display());
            let config = ReportConfig::default();
            config.save_to_yaml_file(path)?;
            Ok(config)
        }
        None => {
            debug!("No config path provided, using default configuration");
            Ok(ReportConfig::default())
        }
    }
}
