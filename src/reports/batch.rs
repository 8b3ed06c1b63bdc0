//! Sequential "Run All" driver.
//!
//! Generators run one after another on the calling thread. A generator that
//! errors or panics still yields a page, marked degraded, and a report that
//! cannot be written is logged and skipped. Nothing stops the batch.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use log::{error, info, warn};

use super::{generator_for, ReportContext, ReportKind};
use crate::constants::MAX_HASH_SIZE_MB;
use crate::models::{ReportArtifact, ReportOutcome};
use crate::platform::Platform;
use crate::render::html::{notice, paragraph};
use crate::render::ReportRenderer;
use crate::runner::CommandRunner;
use crate::utils::hash::report_sha256;

/// Generate and write each requested report in order
pub fn run_batch(
    kinds: &[ReportKind],
    runner: &dyn CommandRunner,
    platform: Platform,
    renderer: &ReportRenderer,
) -> Vec<ReportArtifact> {
    let ctx = ReportContext::new(runner, platform, renderer.host_label());
    let mut artifacts = Vec::with_capacity(kinds.len());

    for kind in kinds {
        info!("--- Generating {} ---", kind.title());
        let (body, outcome) = build_body(*kind, &ctx);

        let path = match renderer.write_report(kind.file_name(), kind.title(), &body) {
            Ok(path) => path,
            Err(e) => {
                error!("Failed to write {}: {:#}", kind.file_name(), e);
                continue;
            }
        };

        let sha256 = match report_sha256(&path, MAX_HASH_SIZE_MB) {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Could not hash {}: {}", path.display(), e);
                None
            }
        };

        artifacts.push(ReportArtifact {
            kind: kind.to_string(),
            title: kind.title().to_string(),
            file_name: kind.file_name().to_string(),
            path,
            generated_at: Utc::now().to_rfc3339(),
            sha256,
            outcome,
        });
    }

    let degraded = artifacts
        .iter()
        .filter(|a| matches!(a.outcome, ReportOutcome::Degraded { .. }))
        .count();
    info!(
        "Batch complete: {} of {} reports written ({} degraded)",
        artifacts.len(),
        kinds.len(),
        degraded
    );
    artifacts
}

/// Run one generator, turning an error or panic into a degraded page
fn build_body(kind: ReportKind, ctx: &ReportContext<'_>) -> (String, ReportOutcome) {
    let generator = generator_for(kind);
    let result = panic::catch_unwind(AssertUnwindSafe(|| generator.build_body(ctx)));

    let reason = match result {
        Ok(Ok(body)) => return (body, ReportOutcome::Generated),
        Ok(Err(e)) => {
            warn!("Report {} failed: {:#}", kind, e);
            format!("{:#}", e)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("Report {} panicked: {}", kind, message);
            message
        }
    };

    (degraded_body(&reason), ReportOutcome::Degraded { reason })
}

fn degraded_body(reason: &str) -> String {
    format!(
        "{}{}",
        notice("This report could not be generated completely."),
        paragraph(&format!("Error: {}", reason))
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "generator panicked".to_string()
    }
}
