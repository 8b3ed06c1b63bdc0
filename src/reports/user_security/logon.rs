use anyhow::Result;
use log::{debug, info};

use crate::platform::Platform;
use crate::render::html::{heading, paragraph, pre_block, pre_or_placeholder, Table};
use crate::reports::parsers::{parse_auth_log, AuthEvent};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const AUTH_LOG_COMMAND: &str = "grep -E 'useradd|sshd.*(Accepted|Failed)' /var/log/auth.log";
const LAST_COMMAND: &str = "last -20";
const SECURITY_EVENTS_COMMAND: &str =
    "wevtutil qe Security /q:\"*[System[(EventID=4624 or EventID=4625)]]\" /c:20 /rd:true /f:text";

/// Logon activity and user creation events
pub struct LogonReport;

impl ReportGenerator for LogonReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Logon
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        let mut body = heading(2, "Logon & User Creation Report");

        match ctx.platform {
            Platform::Linux => {
                info!("Searching /var/log/auth.log for user creation and SSH login events");
                body.push_str(&linux_events(&ctx.run(AUTH_LOG_COMMAND)));
            }
            Platform::MacOS => {
                info!("Collecting recent logins via last");
                body.push_str(&heading(3, "Recent Logins (last -20)"));
                body.push_str(&pre_or_placeholder(&ctx.run(LAST_COMMAND), "No login records returned by last."));
            }
            Platform::Windows => {
                info!("Querying the Security event log for logon events");
                body.push_str(&heading(3, "Logon Events (Event IDs 4624 / 4625)"));
                body.push_str(&paragraph(
                    "4624 is a successful logon, 4625 a failed one. Reading the Security log requires administrator rights.",
                ));
                body.push_str(&pre_or_placeholder(
                    &ctx.run(SECURITY_EVENTS_COMMAND),
                    "No logon events could be read from the Security event log.",
                ));
            }
            Platform::Other => body.push_str(&unsupported_platform("Logon activity reporting", ctx.platform)),
        }
        Ok(body)
    }
}

fn count(events: &[AuthEvent], classification: &str) -> usize {
    events.iter().filter(|e| e.classification == classification).count()
}

fn linux_events(raw: &str) -> String {
    let mut out = heading(3, "Linux User Creation & SSH Login Events");
    if raw.trim().is_empty() {
        out.push_str(&paragraph(
            "No recent user creation or SSH login events found in /var/log/auth.log.",
        ));
        return out;
    }

    let events = parse_auth_log(raw);
    if events.is_empty() {
        debug!("auth.log lines did not match the syslog layout, showing raw output");
        out.push_str(&paragraph("The following are relevant raw events from /var/log/auth.log."));
        out.push_str(&pre_block(raw.trim_end()));
        return out;
    }

    out.push_str(&paragraph(&format!(
        "{} events: {} accepted logins, {} failed logins, {} user creations.",
        events.len(),
        count(&events, "Accepted"),
        count(&events, "Failed"),
        count(&events, "User Created"),
    )));

    let mut table = Table::new(["Time", "Host", "Service", "Event", "Classification"]);
    for event in &events {
        let cells = [
            event.time.as_str(),
            event.host.as_str(),
            event.service.as_str(),
            event.message.as_str(),
            event.classification,
        ];
        if event.classification == "Accepted" || event.classification == "Other" {
            table.add_row(cells);
        } else {
            table.add_flagged_row(cells);
        }
    }
    out.push_str(&table.render());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockCommandRunner;
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&LogonReport, platform)
    }

    fn body_with_output(platform: Platform, output: &'static str) -> String {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(move |_| output.to_string());
        let ctx = ReportContext::new(&runner, platform, "host");
        LogonReport.build_body(&ctx).unwrap()
    }

    #[test]
    fn test_linux_events_classified_and_counted() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("3 events: 1 accepted logins, 1 failed logins, 1 user creations."));
        assert!(body.contains("<td>Accepted</td></tr>"));
        assert!(body.contains("<tr class=\"flagged\"><td>Jul 25 11:00:00</td>"));
        assert!(body.contains("<td>User Created</td>"));
    }

    #[test]
    fn test_linux_empty_log() {
        let body = body_with_output(Platform::Linux, "");
        assert!(body.contains("No recent user creation or SSH login events"));
        assert!(!body.contains("<table"));
    }

    #[test]
    fn test_linux_unrecognised_lines_fall_back_to_raw() {
        let body = body_with_output(Platform::Linux, "something <odd> happened\n");
        assert!(body.contains("<pre>something &lt;odd&gt; happened</pre>"));
    }

    #[test]
    fn test_macos_and_windows_raw_sections() {
        assert!(body_for(Platform::MacOS).contains("still logged in"));
        let windows = body_for(Platform::Windows);
        assert!(windows.contains("Event ID: 4624"));
        assert!(body_with_output(Platform::Windows, "").contains("No logon events could be read"));
    }
}
