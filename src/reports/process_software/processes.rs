use anyhow::Result;
use log::{debug, info};

use crate::platform::Platform;
use crate::render::html::{heading, paragraph, pre_block, pre_or_placeholder, Table};
use crate::reports::parsers::{parse_ps_aux, PsRow};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const PS_COMMAND: &str = "ps aux";
/// The bracket keeps grep from matching itself
pub(crate) const PYTHON_PS_COMMAND: &str = "ps aux | grep '[p]ython'";
const WINDOWS_PROCESSES_COMMAND: &str = "powershell.exe -Command \"Get-Process | Format-Table -AutoSize\"";
const WINDOWS_PYTHON_COMMAND: &str = "powershell.exe -Command \"Get-Process | Where-Object { $_.ProcessName -like '*python*' } | Select-Object ProcessName, Id, Path\"";

const PS_HEADERS: [&str; 11] = [
    "User", "PID", "%CPU", "%MEM", "VSZ", "RSS", "TTY", "Stat", "Started", "Time", "Command",
];
const NO_PYTHON: &str = "No active processes running under a Python interpreter were found.";

/// Full process list plus interpreter-hosted processes
pub struct RunningProcessesReport;

impl ReportGenerator for RunningProcessesReport {
    fn kind(&self) -> ReportKind {
        ReportKind::RunningProcesses
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Collecting running processes");
        let mut body = heading(2, "Running Processes");

        if ctx.platform == Platform::Other {
            body.push_str(&unsupported_platform("Process listing", ctx.platform));
            return Ok(body);
        }

        body.push_str(&heading(3, "Full Process List"));
        if ctx.platform == Platform::Windows {
            body.push_str(&pre_or_placeholder(
                &ctx.run(WINDOWS_PROCESSES_COMMAND),
                "Could not retrieve Windows processes.",
            ));
        } else {
            body.push_str(&ps_section(&ctx.run(PS_COMMAND), "Could not retrieve system processes."));
        }

        body.push_str(&heading(3, "Python Process Analysis"));
        body.push_str(&paragraph(
            "The following processes were launched using a Python interpreter. Review these for unauthorized or suspicious scripts, as Python is a common tool for backdoors and utilities.",
        ));
        if ctx.platform == Platform::Windows {
            let output = ctx.run(WINDOWS_PYTHON_COMMAND);
            // PowerShell echoes the failing pipeline on error
            if output.trim().is_empty() || output.contains("Get-Process") {
                body.push_str(&paragraph(NO_PYTHON));
            } else {
                body.push_str(&pre_block(output.trim_end()));
            }
        } else {
            body.push_str(&ps_section(&ctx.run(PYTHON_PS_COMMAND), NO_PYTHON));
        }
        Ok(body)
    }
}

/// `ps aux` output as a table, raw when it does not parse
fn ps_section(raw: &str, placeholder: &str) -> String {
    if raw.trim().is_empty() {
        return paragraph(placeholder);
    }
    let rows = parse_ps_aux(raw);
    if rows.is_empty() {
        debug!("ps output did not parse, showing raw");
        return pre_block(raw.trim_end());
    }
    ps_table(&rows).render()
}

pub(crate) fn ps_table(rows: &[PsRow]) -> Table {
    let mut table = Table::new(PS_HEADERS);
    for row in rows {
        table.add_row(row.cells());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockCommandRunner;
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&RunningProcessesReport, platform)
    }

    #[test]
    fn test_unix_process_tables() {
        let body = body_for(Platform::MacOS);
        assert!(body.contains("<th onclick=\"sortTable(this)\">%CPU</th>"));
        assert!(body.contains("<td>root</td><td>1</td><td>0.0</td>"));
        assert!(body.contains("<td>/sbin/launchd</td>"));
        assert!(body.contains("pty.spawn"));
        assert!(!body.contains(NO_PYTHON));
    }

    #[test]
    fn test_windows_without_python() {
        let body = body_for(Platform::Windows);
        assert!(body.contains("Could not retrieve Windows processes."));
        assert!(body.contains(NO_PYTHON));
    }

    #[test]
    fn test_windows_powershell_error_means_none_found() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_| "Get-Process : The term is not recognized".to_string());
        let ctx = ReportContext::new(&runner, Platform::Windows, "host");
        let body = RunningProcessesReport.build_body(&ctx).unwrap();
        assert!(body.contains(NO_PYTHON));
    }

    #[test]
    fn test_unparseable_ps_is_raw() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| "ps: illegal option".to_string());
        let ctx = ReportContext::new(&runner, Platform::Linux, "host");
        let body = RunningProcessesReport.build_body(&ctx).unwrap();
        assert!(body.contains("<pre>ps: illegal option</pre>"));
    }
}
