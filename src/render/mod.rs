//! Report page rendering and output.
//!
//! - [`html`]: escaping, tables and other fragments used by report bodies
//! - [`template`]: the standalone page wrapper with the filter/sort script
//! - [`browser`]: optional launch of a written report

pub mod browser;
pub mod html;
pub mod template;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use log::info;

use crate::constants::REPORT_TIMESTAMP_FORMAT;

pub use browser::{open_report, BrowserPreference};
pub use template::render_page;

/// Writes report pages for one suspect host into one directory
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    output_dir: PathBuf,
    host_label: String,
    browser: BrowserPreference,
}

impl ReportRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, host_label: impl Into<String>, browser: BrowserPreference) -> Self {
        ReportRenderer {
            output_dir: output_dir.into(),
            host_label: host_label.into(),
            browser,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn host_label(&self) -> &str {
        &self.host_label
    }

    /// Render `body` into a full page, write it as `file_name` and open it
    /// if a browser is configured. Returns the path written.
    pub fn write_report(&self, file_name: &str, title: &str, body: &str) -> Result<PathBuf> {
        let generated_at = Local::now().format(REPORT_TIMESTAMP_FORMAT).to_string();
        let page = render_page(title, &self.host_label, body, &generated_at);

        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create report directory {}", self.output_dir.display()))?;

        let path = self.output_dir.join(file_name);
        fs::write(&path, page).context(format!("Failed to write report {}", path.display()))?;

        // Absolute but not canonical: no `\\?\` prefix on Windows, symlinks kept
        let path = std::path::absolute(&path).unwrap_or(path);
        info!("Report '{}' saved to {}", title, path.display());

        open_report(&path, self.browser);
        Ok(path)
    }
}
