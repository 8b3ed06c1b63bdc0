use anyhow::Result;
use log::info;

use crate::platform::Platform;
use crate::render::html::{heading, paragraph};
use crate::reports::{raw_sections, unsupported_platform, RawSection, ReportContext, ReportGenerator, ReportKind};

const MACOS_SECTIONS: &[RawSection] = &[
    RawSection {
        title: "Application Firewall",
        command: "/usr/libexec/ApplicationFirewall/socketfilterfw --getglobalstate",
        placeholder: "Could not query the application firewall state.",
    },
    RawSection {
        title: "Packet Filter Rules (pfctl -sr)",
        command: "pfctl -sr",
        placeholder: "No pf rules loaded or pfctl requires elevated privileges.",
    },
];

const LINUX_SECTIONS: &[RawSection] = &[
    RawSection {
        title: "iptables Rules (iptables -S)",
        command: "iptables -S",
        placeholder: "No iptables rules returned. iptables may require root privileges.",
    },
    RawSection {
        title: "UFW Status",
        command: "ufw status verbose",
        placeholder: "UFW is not installed or returned no status.",
    },
];

const WINDOWS_SECTIONS: &[RawSection] = &[RawSection {
    title: "Windows Firewall Profiles",
    command: "netsh advfirewall show allprofiles",
    placeholder: "Could not query Windows Firewall profiles.",
}];

pub struct FirewallRulesReport;

impl ReportGenerator for FirewallRulesReport {
    fn kind(&self) -> ReportKind {
        ReportKind::FirewallRules
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Collecting firewall configuration");
        let mut body = heading(2, "Firewall Rules");
        let sections = match ctx.platform {
            Platform::MacOS => MACOS_SECTIONS,
            Platform::Linux => LINUX_SECTIONS,
            Platform::Windows => WINDOWS_SECTIONS,
            Platform::Other => {
                body.push_str(&unsupported_platform("Firewall rules reporting", ctx.platform));
                return Ok(body);
            }
        };
        body.push_str(&paragraph(
            "Look for ACCEPT rules on unexpected ports and for firewalls that have been disabled.",
        ));
        body.push_str(&raw_sections(ctx, sections));
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&FirewallRulesReport, platform)
    }

    #[test]
    fn test_linux_rules() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("-A INPUT -p tcp -m tcp --dport 22 -j ACCEPT"));
        assert!(body.contains("Status: active"));
    }

    #[test]
    fn test_macos_without_output_uses_placeholders() {
        let body = body_for(Platform::MacOS);
        assert!(body.contains("Could not query the application firewall state."));
        assert!(body.contains("No pf rules loaded"));
    }
}
