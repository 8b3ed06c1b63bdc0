use serde_json::json;
use uuid::Uuid;
use anyhow::{Result, Context};

use crate::models::{ReportArtifact, ReportOutcome};
use crate::platform::Platform;
use crate::runner::ExecutionMode;

/// Create a JSON summary of a report run.
///
/// Lists every artifact the batch produced together with the run's host
/// label, platform and execution mode, so an analyst can tie a report
/// directory back to the run that produced it.
///
/// # Example Output
///
/// ```json
/// {
///   "run_id": "550e8400-e29b-41d4-a716-446655440000",
///   "host_label": "Test_Computer",
///   "started_at": "2025-07-25T10:00:00+00:00",
///   "platform": "linux",
///   "mode": "mock",
///   "report_count": 16,
///   "degraded_count": 0,
///   "reports": [...]
/// }
/// ```
pub fn create_run_summary(
    host_label: &str,
    started_at: &str,
    platform: Platform,
    mode: ExecutionMode,
    artifacts: &[ReportArtifact],
) -> Result<String> {
    let reports: Vec<_> = artifacts.iter()
        .map(|artifact| {
            let (status, reason) = match &artifact.outcome {
                ReportOutcome::Generated => ("generated", None),
                ReportOutcome::Degraded { reason } => ("degraded", Some(reason.as_str())),
            };
            json!({
                "kind": artifact.kind,
                "title": artifact.title,
                "file_name": artifact.file_name,
                "path": artifact.path.display().to_string(),
                "generated_at": artifact.generated_at,
                "sha256": artifact.sha256,
                "status": status,
                "reason": reason,
            })
        })
        .collect();

    let degraded_count = artifacts.iter()
        .filter(|a| matches!(a.outcome, ReportOutcome::Degraded { .. }))
        .count();

    let summary = json!({
        "run_id": Uuid::new_v4().to_string(),
        "host_label": host_label,
        "started_at": started_at,
        "platform": platform.to_string(),
        "mode": mode.to_string(),
        "tool_version": env!("CARGO_PKG_VERSION"),
        "report_count": artifacts.len(),
        "degraded_count": degraded_count,
        "reports": reports,
    });

    serde_json::to_string_pretty(&summary).context("Failed to serialize run summary to JSON")
}
