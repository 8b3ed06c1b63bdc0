//! Test utilities for the report generators and the batch driver
//!
//! Shared helpers so each generator's tests can focus on the markup they
//! expect rather than on wiring up runners and output directories.

#![cfg(test)]

use tempfile::TempDir;

use crate::constants::FALLBACK_HOST_LABEL;
use crate::platform::Platform;
use crate::render::{BrowserPreference, ReportRenderer};
use crate::reports::{ReportContext, ReportGenerator};
use crate::runner::{MockCommandRunner, MockRunner};

/// Body `generator` produces for `platform` from the canned sample outputs
pub fn mock_body(generator: &dyn ReportGenerator, platform: Platform) -> String {
    let runner = MockRunner::new();
    let ctx = ReportContext::new(&runner, platform, FALLBACK_HOST_LABEL);
    generator.build_body(&ctx).unwrap()
}

/// Runner on which every command fails, i.e. returns nothing
pub fn silent_runner() -> MockCommandRunner {
    let mut runner = MockCommandRunner::new();
    runner.expect_run().returning(|_| String::new());
    runner
}

/// Renderer writing into a fresh temporary directory that never opens a browser
pub fn temp_renderer() -> (TempDir, ReportRenderer) {
    let temp_dir = TempDir::new().unwrap();
    let renderer = ReportRenderer::new(temp_dir.path(), FALLBACK_HOST_LABEL, BrowserPreference::None);
    (temp_dir, renderer)
}

#[test]
fn test_silent_runner_returns_nothing() {
    use crate::runner::CommandRunner;
    assert_eq!(silent_runner().run("uname -a"), "");
}
