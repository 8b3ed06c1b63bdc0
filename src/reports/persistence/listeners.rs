use std::collections::HashMap;

use anyhow::Result;
use log::{info, warn};

use super::is_interpreter;
use crate::constants::SUSPICIOUS_PORTS;
use crate::platform::Platform;
use crate::render::html::{heading, paragraph, pre_block, Table};
use crate::reports::network::collect_sockets;
use crate::reports::parsers::{parse_ps_aux, parse_tasklist_csv, SocketRow};
use crate::reports::process_software::{ps_table, PYTHON_PS_COMMAND};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const TASKLIST_COMMAND: &str = "tasklist /fo csv /nh";

/// Why a listening socket was flagged, if it was
pub(crate) fn assess_listener(process: &str, port: Option<u16>) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if is_interpreter(process) {
        reasons.push("interpreter or shell owns a listening socket");
    }
    if port.map_or(false, |p| SUSPICIOUS_PORTS.contains(&p)) {
        reasons.push("well-known backdoor port");
    }
    reasons
}

/// Listening sockets correlated with the processes that own them
pub struct ProcessPersistenceReport;

impl ReportGenerator for ProcessPersistenceReport {
    fn kind(&self) -> ReportKind {
        ReportKind::ProcessPersistence
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Correlating listening sockets with owning processes");
        let mut body = heading(2, "Process Persistence");

        let listing = match collect_sockets(ctx) {
            Some(listing) => listing,
            None => {
                body.push_str(&unsupported_platform("Process persistence analysis", ctx.platform));
                return Ok(body);
            }
        };

        let process_names: HashMap<String, String> = if ctx.platform == Platform::Windows {
            parse_tasklist_csv(&ctx.run(TASKLIST_COMMAND))
                .into_iter()
                .map(|(name, pid)| (pid, name))
                .collect()
        } else {
            HashMap::new()
        };

        body.push_str(&heading(3, "Listening Sockets"));
        body.push_str(&paragraph(
            "Listeners owned by script interpreters or shells, or bound to ports favoured by backdoors, are flagged as suspicious.",
        ));
        let (table, flagged) = listener_table(&listing.rows, &process_names);
        if flagged > 0 {
            warn!("{} suspicious listener(s) found", flagged);
        }
        body.push_str(&paragraph(&format!(
            "{} of {} listening socket(s) flagged.",
            flagged,
            table.len()
        )));
        body.push_str(&table.render());

        body.push_str(&heading(3, "Interpreter Processes"));
        body.push_str(&interpreter_processes(ctx, &process_names));
        Ok(body)
    }
}

fn listener_table(rows: &[SocketRow], process_names: &HashMap<String, String>) -> (Table, usize) {
    let mut table = Table::new(["Process", "PID", "Local Address", "Port", "Assessment", "Reason"])
        .with_empty_message("No listening sockets found.");
    let mut flagged = 0;

    for row in rows.iter().filter(|r| r.is_listening()) {
        let process = if row.process.is_empty() {
            process_names.get(&row.pid).map(String::as_str).unwrap_or_default()
        } else {
            row.process.as_str()
        };
        let port = row.local_port();
        let port_text = port.map(|p| p.to_string()).unwrap_or_default();
        let reasons = assess_listener(process, port);

        if reasons.is_empty() {
            table.add_row([process, row.pid.as_str(), row.local.as_str(), port_text.as_str(), "OK", ""]);
        } else {
            flagged += 1;
            let reason = reasons.join("; ");
            table.add_flagged_row([
                process,
                row.pid.as_str(),
                row.local.as_str(),
                port_text.as_str(),
                "Suspicious",
                reason.as_str(),
            ]);
        }
    }
    table.sort_by_column(3);
    (table, flagged)
}

fn interpreter_processes(ctx: &ReportContext<'_>, process_names: &HashMap<String, String>) -> String {
    if ctx.platform == Platform::Windows {
        let mut table = Table::new(["Image Name", "PID"])
            .with_empty_message("No interpreter processes found.");
        for (pid, name) in process_names.iter().filter(|(_, name)| is_interpreter(name)) {
            table.add_row([name.as_str(), pid.as_str()]);
        }
        table.sort_by_column(1);
        return table.render();
    }

    let raw = ctx.run(PYTHON_PS_COMMAND);
    let rows = parse_ps_aux(&raw);
    if rows.is_empty() && !raw.trim().is_empty() {
        pre_block(raw.trim_end())
    } else if rows.is_empty() {
        paragraph("No active processes running under a Python interpreter were found.")
    } else {
        ps_table(&rows).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_body, silent_runner};

    fn body_for(platform: Platform) -> String {
        mock_body(&ProcessPersistenceReport, platform)
    }

    #[test]
    fn test_assess_listener() {
        assert_eq!(assess_listener("sshd", Some(22)), Vec::<&str>::new());
        assert_eq!(assess_listener("python3", Some(8080)).len(), 1);
        assert_eq!(assess_listener("nginx", Some(31337)), vec!["well-known backdoor port"]);
        assert_eq!(assess_listener("nc", Some(4444)).len(), 2);
        assert!(assess_listener("", None).is_empty());
    }

    #[test]
    fn test_linux_flags_python_listener() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("1 of 2 listening socket(s) flagged."));
        assert!(body.contains("<tr class=\"flagged\"><td>python3</td><td>666</td><td>0.0.0.0:4444</td><td>4444</td><td>Suspicious</td>"));
        assert!(body.contains("<tr><td>sshd</td><td>123</td><td>0.0.0.0:22</td><td>22</td><td>OK</td>"));
        assert!(!body.contains("ESTAB"));
        assert!(body.contains("pty.spawn"));
    }

    #[test]
    fn test_macos_lsof_listeners() {
        let body = body_for(Platform::MacOS);
        assert!(body.contains("<td>python3</td><td>666</td><td>*:4444</td>"));
    }

    #[test]
    fn test_windows_joins_tasklist_names() {
        let body = body_for(Platform::Windows);
        assert!(body.contains("<td>python.exe</td><td>666</td><td>0.0.0.0:4444</td><td>4444</td><td>Suspicious</td>"));
        assert!(body.contains("<td>sshd.exe</td><td>1234</td>"));
        assert!(body.contains("<tr><td>python.exe</td><td>666</td></tr>"));
    }

    #[test]
    fn test_no_listeners() {
        let runner = silent_runner();
        let ctx = ReportContext::new(&runner, Platform::Linux, "host");
        let body = ProcessPersistenceReport.build_body(&ctx).unwrap();
        assert!(body.contains("No listening sockets found."));
        assert!(body.contains("0 of 0 listening socket(s) flagged."));
        assert!(body.contains("No active processes running under a Python interpreter were found."));
    }
}
