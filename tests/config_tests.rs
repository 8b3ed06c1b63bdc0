//! Integration tests for the YAML run configuration.

use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use iris_triage::config::{load_or_create_config, ReportConfig};
use iris_triage::platform::Platform;
use iris_triage::render::BrowserPreference;
use iris_triage::reports::ReportKind;
use iris_triage::runner::ExecutionMode;

/// A hand-written file with only some keys set
#[test]
fn test_analyst_written_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("case.yaml");
    fs::write(
        &path,
        r#"
version: "1.0"
description: "Case 2025-041 workstation sweep"
host_label: "FIN-WS-07"
output_directory: "/cases/2025-041/reports"
browser: system-default
mode: mock
target_os: windows
reports:
  - process-persistence
  - local-accounts
global_options:
  analyst: "jdoe"
"#,
    )?;

    let config = load_or_create_config(Some(&path))?;
    assert_eq!(config.host_label.as_deref(), Some("FIN-WS-07"));
    assert_eq!(config.browser, BrowserPreference::SystemDefault);
    assert_eq!(config.mode, ExecutionMode::Mock);
    assert_eq!(config.target_os, Some(Platform::Windows));
    assert_eq!(config.global_options.get("analyst").map(String::as_str), Some("jdoe"));

    // Batch order, not file order
    assert_eq!(
        config.enabled_reports(),
        vec![ReportKind::LocalAccounts, ReportKind::ProcessPersistence]
    );

    Ok(())
}

/// A missing file is created with the defaults and can be read back
#[test]
fn test_init_config_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("iris.yaml");

    ReportConfig::create_default_config_file(&path)?;
    let written = fs::read_to_string(&path)?;
    assert!(written.contains("output_directory: reports"));
    assert!(written.contains("browser: none"));
    assert!(written.contains("mode: live"));

    assert_eq!(load_or_create_config(Some(&path))?, ReportConfig::default());
    Ok(())
}

/// A broken file is an error, not silently replaced
#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("broken.yaml");
    fs::write(&path, "browser: netscape\n")?;

    assert!(load_or_create_config(Some(&path)).is_err());
    assert_eq!(fs::read_to_string(&path)?, "browser: netscape\n");
    Ok(())
}
