use anyhow::Result;
use log::info;

use crate::platform::Platform;
use crate::render::html::heading;
use crate::reports::{raw_sections, unsupported_platform, RawSection, ReportContext, ReportGenerator, ReportKind};

const NO_INTERFACES: &str = "Could not retrieve network interface information.";
const NO_DNS: &str = "Could not retrieve DNS information.";

const MACOS_SECTIONS: &[RawSection] = &[
    RawSection { title: "Network Interfaces (ifconfig)", command: "ifconfig -a", placeholder: NO_INTERFACES },
    RawSection { title: "DNS Configuration (scutil --dns)", command: "scutil --dns", placeholder: NO_DNS },
];

const LINUX_SECTIONS: &[RawSection] = &[
    RawSection { title: "Network Interfaces (ip addr)", command: "ip addr", placeholder: NO_INTERFACES },
    RawSection { title: "DNS Resolvers (/etc/resolv.conf)", command: "cat /etc/resolv.conf", placeholder: NO_DNS },
];

const WINDOWS_SECTIONS: &[RawSection] = &[RawSection {
    title: "Network Configuration (ipconfig /all)",
    command: "ipconfig /all",
    placeholder: NO_INTERFACES,
}];

pub struct NetworkConfigReport;

impl ReportGenerator for NetworkConfigReport {
    fn kind(&self) -> ReportKind {
        ReportKind::NetworkConfig
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Collecting network interface configuration");
        let mut body = heading(2, "Network Configuration");
        let sections = match ctx.platform {
            Platform::MacOS => MACOS_SECTIONS,
            Platform::Linux => LINUX_SECTIONS,
            Platform::Windows => WINDOWS_SECTIONS,
            Platform::Other => {
                body.push_str(&unsupported_platform("Network configuration reporting", ctx.platform));
                return Ok(body);
            }
        };
        body.push_str(&raw_sections(ctx, sections));
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&NetworkConfigReport, platform)
    }

    #[test]
    fn test_linux_sections() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("inet 192.168.1.50/24"));
        assert!(body.contains("nameserver 192.168.1.1"));
        assert!(body.contains("&lt;BROADCAST,MULTICAST,UP,LOWER_UP&gt;"));
    }

    #[test]
    fn test_missing_output_placeholders() {
        let mac = body_for(Platform::MacOS);
        assert!(mac.contains("en0: flags=8863"));
        assert!(mac.contains(NO_DNS));

        assert!(body_for(Platform::Windows).contains(NO_INTERFACES));
    }
}
