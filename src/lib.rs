//! # iris_triage
//!
//! A cross-platform incident response triage reporter written in Rust.
//!
//! ## Overview
//!
//! IRIS runs a fixed set of read-only shell commands on a suspect host,
//! parses their text output and writes one self-contained HTML report per
//! category: hardware, accounts, logons, network, processes, persistence and
//! more. Every page carries a client-side filter box and sortable tables so
//! an analyst can work through it offline in any browser.
//!
//! ## Features
//!
//! - **Cross-platform reports**: Windows, macOS and Linux, each with its own commands
//! - **Mock mode**: canned sample output for every command, for demos and tests
//! - **Run All**: all sixteen reports in order, degraded rather than aborted on failure
//! - **Run record**: `run_summary.json` with a SHA-256 of every written page
//! - **Flexible configuration**: YAML host label, output directory, browser and report set
//!
//! ## Usage
//!
//! ### Generating Reports
//!
//! ```no_run
//! use iris_triage::platform::Platform;
//! use iris_triage::render::{BrowserPreference, ReportRenderer};
//! use iris_triage::reports::{run_batch, ReportKind};
//! use iris_triage::runner::{runner_for, ExecutionMode};
//!
//! let runner = runner_for(ExecutionMode::Mock);
//! let renderer = ReportRenderer::new("/tmp/reports", "Test_Computer", BrowserPreference::None);
//!
//! let artifacts = run_batch(ReportKind::all(), runner.as_ref(), Platform::Linux, &renderer);
//! println!("Wrote {} reports", artifacts.len());
//! ```
//!
//! ### A Single Report Body
//!
//! ```no_run
//! use iris_triage::platform::Platform;
//! use iris_triage::reports::{generator_for, ReportContext, ReportGenerator, ReportKind};
//! use iris_triage::runner::MockRunner;
//!
//! # fn main() -> anyhow::Result<()> {
//! let runner = MockRunner::new();
//! let ctx = ReportContext::new(&runner, Platform::MacOS, "Test_Computer");
//! let body = generator_for(ReportKind::Logon).build_body(&ctx)?;
//! assert!(body.contains("<h2>"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Fact records and report artifacts
//! - [`platform`]: The OS flavour a report renders for
//! - [`runner`]: Live and mock command execution
//! - [`render`]: HTML fragments, page template and browser launch
//! - [`reports`]: The sixteen report generators and the batch driver
//! - [`config`]: YAML run configuration
//! - [`utils`]: Hashing and the run summary
//! - [`privileges`]: Elevation check
//! - [`constants`]: Application-wide constants
//!
//! ## Safety
//!
//! The only `unsafe` code is the elevation check, which calls
//! `geteuid` on Unix and `IsUserAnAdmin` on Windows.

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Operating system a report branches on
pub mod platform;

/// Command execution, live or from canned samples
pub mod runner;

/// HTML page rendering and browser launch
pub mod render;

/// Report generators and the "Run All" batch
pub mod reports;

/// Utility functions for hashing and run summaries
pub mod utils;

/// Configuration management
pub mod config;

/// Platform-specific privilege checks
pub mod privileges;

/// Application constants and configuration values
pub mod constants;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
