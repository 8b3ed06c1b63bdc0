//! Integration tests for page rendering and report output.

use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use iris_triage::render::html::{heading, Table};
use iris_triage::render::{render_page, BrowserPreference, ReportRenderer};

/// Cell text from a command can never inject markup into the page
#[test]
fn test_command_output_is_escaped() {
    let mut table = Table::new(["Name", "Command"]);
    table.add_row(["<script>", "echo \"pwned\" & rm -rf ~"]);

    let page = render_page("Script Check Report", "Test_Computer", &table.render(), "2025-07-25 10:00:00");
    assert!(!page.contains("<td><script>"));
    assert!(page.contains("&lt;script&gt;"));
    assert!(page.contains("&amp; rm -rf ~"));
}

/// A written page is the full document with the body in place
#[test]
fn test_written_page() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("reports");
    let renderer = ReportRenderer::new(&output_dir, "Suspect_Laptop", BrowserPreference::None);

    let mut table = Table::new(["PID", "Command"]);
    table.add_row(["10", "sshd"]);
    table.add_row(["9", "cron"]);
    table.sort_by_column(0);
    let body = format!("{}{}", heading(2, "Processes"), table.render());

    let path = renderer.write_report("Running_Processes_Report.html", "Running Processes Report", &body)?;
    let page = fs::read_to_string(&path)?;

    assert!(path.ends_with("Running_Processes_Report.html"));
    assert!(page.contains("<title>Running Processes Report</title>"));
    assert!(page.contains("Suspect_Laptop"));
    assert!(page.contains("id=\"filterInput\""));
    // Numeric sort: 9 before 10
    assert!(page.find("<td>9</td>") < page.find("<td>10</td>"));

    Ok(())
}

/// Rewriting a report replaces the previous page
#[test]
fn test_rewrite_replaces_page() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let renderer = ReportRenderer::new(temp_dir.path(), "Test_Computer", BrowserPreference::None);

    renderer.write_report("Logon_Report.html", "Logon Report", "<p>first</p>")?;
    let path = renderer.write_report("Logon_Report.html", "Logon Report", "<p>second</p>")?;

    let page = fs::read_to_string(path)?;
    assert!(page.contains("second"));
    assert!(!page.contains("first"));
    Ok(())
}
