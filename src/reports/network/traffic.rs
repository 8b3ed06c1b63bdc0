use anyhow::Result;
use log::{info, warn};

use crate::platform::Platform;
use crate::render::html::{heading, notice, paragraph, pre_or_placeholder};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const DISCLAIMER: &str = "Disclaimer: this report provides a brief snapshot of network activity. For deep traffic inspection, continuous monitoring with tools like Suricata, Zeek, or Wireshark is recommended. Running these commands may require administrator (sudo) privileges.";

const NETHOGS_COMMAND: &str = "sudo nethogs -t -c 5";
const TCPDUMP_COMMAND: &str = "sudo tcpdump -c 20 -n";
const NETTOP_COMMAND: &str = "nettop -P -L 1";
const NETSTAT_STATS_COMMAND: &str = "netstat -e";

/// Short traffic snapshot
pub struct NetworkTrafficReport;

impl ReportGenerator for NetworkTrafficReport {
    fn kind(&self) -> ReportKind {
        ReportKind::NetworkTraffic
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Capturing a network traffic snapshot");
        let mut body = heading(2, "Network Traffic Analysis (Snapshot)");
        body.push_str(&notice(DISCLAIMER));

        match ctx.platform {
            Platform::Linux => body.push_str(&linux_snapshot(ctx)),
            Platform::MacOS => {
                body.push_str(&heading(3, "Per-Process Traffic (nettop)"));
                body.push_str(&pre_or_placeholder(
                    &ctx.run(NETTOP_COMMAND),
                    "Could not capture per-process traffic with nettop.",
                ));
            }
            Platform::Windows => {
                body.push_str(&heading(3, "Interface Statistics (netstat -e)"));
                body.push_str(&pre_or_placeholder(
                    &ctx.run(NETSTAT_STATS_COMMAND),
                    "Could not read interface statistics.",
                ));
            }
            Platform::Other => body.push_str(&unsupported_platform("Network traffic snapshot", ctx.platform)),
        }
        Ok(body)
    }
}

fn linux_snapshot(ctx: &ReportContext<'_>) -> String {
    let nethogs = ctx.run(NETHOGS_COMMAND);
    if !nethogs.trim().is_empty() && !nethogs.contains("command not found") {
        return format!(
            "{}{}{}",
            heading(3, "Nethogs Bandwidth Snapshot"),
            paragraph("The following shows the top network-consuming processes over a short period."),
            pre_or_placeholder(&nethogs, "")
        );
    }

    warn!("nethogs not found or failed, falling back to tcpdump");
    format!(
        "{}{}{}",
        heading(3, "TCPDump Packet Snapshot"),
        paragraph("Nethogs was not available. The following is a small sample of network packets captured with tcpdump."),
        pre_or_placeholder(
            &ctx.run(TCPDUMP_COMMAND),
            "Could not capture traffic with tcpdump. Ensure it is installed and the tool has sufficient permissions.",
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{MockCommandRunner, MockRunner};

    #[test]
    fn test_linux_prefers_nethogs() {
        let runner = MockRunner::new();
        let ctx = ReportContext::new(&runner, Platform::Linux, "Test_Computer");
        let body = NetworkTrafficReport.build_body(&ctx).unwrap();
        assert!(body.contains("Nethogs Bandwidth Snapshot"));
        assert!(body.contains("python3[666]"));
        assert!(body.contains("class=\"notice\""));
    }

    #[test]
    fn test_linux_falls_back_to_tcpdump() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.contains("nethogs"))
            .returning(|_| "sh: nethogs: command not found".to_string());
        runner
            .expect_run()
            .withf(|cmd| cmd.contains("tcpdump"))
            .times(1)
            .returning(|_| "10:00:00.000000 IP 10.0.0.5.54321 > 192.168.1.50.4444: Flags [S]".to_string());
        let ctx = ReportContext::new(&runner, Platform::Linux, "host");
        let body = NetworkTrafficReport.build_body(&ctx).unwrap();
        assert!(body.contains("TCPDump Packet Snapshot"));
        assert!(body.contains("192.168.1.50.4444: Flags [S]"));
    }

    #[test]
    fn test_disclaimer_always_present() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| String::new());
        for platform in [Platform::Windows, Platform::MacOS, Platform::Linux, Platform::Other] {
            let ctx = ReportContext::new(&runner, platform, "host");
            let body = NetworkTrafficReport.build_body(&ctx).unwrap();
            assert!(body.contains("Disclaimer:"), "missing on {}", platform);
        }
    }
}
