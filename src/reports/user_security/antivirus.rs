use anyhow::Result;
use log::info;

use crate::constants::NOT_AVAILABLE;
use crate::platform::Platform;
use crate::render::html::{heading, paragraph, Table};
use crate::reports::parsers::parse_colon_pairs;
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const DEFENDER_COMMAND: &str = "powershell.exe -Command \"Get-MpComputerStatus | Format-List AMServiceEnabled,AntivirusEnabled,RealTimeProtectionEnabled,AntivirusSignatureVersion,AntivirusSignatureLastUpdated\"";
const GATEKEEPER_COMMAND: &str = "spctl --status";
const XPROTECT_COMMAND: &str = "defaults read /Library/Apple/System/Library/CoreServices/XProtect.bundle/Contents/Info.plist CFBundleShortVersionString";
const CLAMAV_SERVICE_COMMAND: &str = "systemctl is-active clamav-daemon";
const CLAMAV_VERSION_COMMAND: &str = "freshclam --version";

pub struct AntivirusReport;

impl ReportGenerator for AntivirusReport {
    fn kind(&self) -> ReportKind {
        ReportKind::AntivirusStatus
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Checking antivirus status");
        let mut body = heading(2, "Antivirus Status");

        match ctx.platform {
            Platform::Windows => {
                body.push_str(&heading(3, "Microsoft Defender"));
                let mut table = Table::new(["Setting", "Value"])
                    .with_empty_message("Could not query Microsoft Defender status.");
                for (key, value) in parse_colon_pairs(&ctx.run(DEFENDER_COMMAND)) {
                    table.add_row([key, value]);
                }
                body.push_str(&table.render());
            }
            Platform::MacOS => {
                body.push_str(&heading(3, "Built-in Protections"));
                body.push_str(&component_table(
                    ctx,
                    &[("Gatekeeper", GATEKEEPER_COMMAND), ("XProtect Version", XPROTECT_COMMAND)],
                ));
            }
            Platform::Linux => {
                body.push_str(&heading(3, "ClamAV"));
                body.push_str(&component_table(
                    ctx,
                    &[("clamav-daemon", CLAMAV_SERVICE_COMMAND), ("Signature Version", CLAMAV_VERSION_COMMAND)],
                ));
                body.push_str(&paragraph(
                    "Only ClamAV is checked. Other endpoint products must be inspected with their own tooling.",
                ));
            }
            Platform::Other => body.push_str(&unsupported_platform("Antivirus status reporting", ctx.platform)),
        }
        Ok(body)
    }
}

/// One row per component holding the first non-empty line of its command
fn component_table(ctx: &ReportContext<'_>, components: &[(&str, &str)]) -> String {
    let mut table = Table::new(["Component", "Status"]);
    for (component, command) in components {
        let output = ctx.run(command);
        table.add_row([*component, first_line(&output)]);
    }
    table.render()
}

fn first_line(output: &str) -> &str {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_body, silent_runner};

    fn body_for(platform: Platform) -> String {
        mock_body(&AntivirusReport, platform)
    }

    #[test]
    fn test_windows_defender_settings() {
        let body = body_for(Platform::Windows);
        assert!(body.contains("<td>RealTimeProtectionEnabled</td><td>False</td>"));
        assert!(body.contains("<td>AntivirusSignatureLastUpdated</td><td>7/24/2025 3:12:44 AM</td>"));
    }

    #[test]
    fn test_macos_and_linux_components() {
        let mac = body_for(Platform::MacOS);
        assert!(mac.contains("<td>Gatekeeper</td><td>assessments enabled</td>"));
        assert!(mac.contains("<td>XProtect Version</td><td>2197</td>"));

        let linux = body_for(Platform::Linux);
        assert!(linux.contains("<td>clamav-daemon</td><td>active</td>"));
    }

    #[test]
    fn test_missing_tools_show_placeholder() {
        let runner = silent_runner();
        let ctx = ReportContext::new(&runner, Platform::Linux, "host");
        let body = AntivirusReport.build_body(&ctx).unwrap();
        assert!(body.contains("<td>clamav-daemon</td><td>N/A</td>"));

        let ctx = ReportContext::new(&runner, Platform::Windows, "host");
        let body = AntivirusReport.build_body(&ctx).unwrap();
        assert!(body.contains("Could not query Microsoft Defender status."));
    }
}
