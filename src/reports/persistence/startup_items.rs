use anyhow::Result;
use log::info;

use super::listing_table;
use crate::platform::Platform;
use crate::render::html::{heading, Table};
use crate::reports::parsers::{parse_list_blocks, parse_ls_la};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const MACOS_LAUNCH_DIRS: &[&str] = &[
    "/Library/LaunchAgents",
    "/Library/LaunchDaemons",
    "~/Library/LaunchAgents",
    "/System/Library/LaunchDaemons",
];

const LINUX_AUTOSTART_DIRS: &[&str] = &["/etc/init.d", "~/.config/autostart"];

/// Programs configured to start with the system or at login
pub struct StartupItemsReport;

impl ReportGenerator for StartupItemsReport {
    fn kind(&self) -> ReportKind {
        ReportKind::StartupItems
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Enumerating startup items");
        let mut body = heading(2, "Startup Items");

        match ctx.platform {
            Platform::MacOS => body.push_str(&directory_sections(ctx, MACOS_LAUNCH_DIRS)),
            Platform::Linux => {
                body.push_str(&enabled_services(ctx));
                body.push_str(&directory_sections(ctx, LINUX_AUTOSTART_DIRS));
            }
            Platform::Windows => body.push_str(&windows_startup(ctx)),
            Platform::Other => body.push_str(&unsupported_platform("Startup item reporting", ctx.platform)),
        }
        Ok(body)
    }
}

fn directory_sections(ctx: &ReportContext<'_>, dirs: &[&str]) -> String {
    let mut out = String::new();
    for dir in dirs {
        out.push_str(&heading(3, dir));
        let entries = parse_ls_la(&ctx.run(&format!("ls -la {}", dir)));
        out.push_str(&listing_table(&entries, &format!("No items found in {}.", dir)).render());
    }
    out
}

fn enabled_services(ctx: &ReportContext<'_>) -> String {
    let output = ctx.run("systemctl list-unit-files --type=service --state=enabled --no-pager");
    let mut table = Table::new(["Unit", "State", "Preset"]).with_empty_message("No enabled services returned.");
    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [unit, state, rest @ ..] if unit.contains('.') && *unit != "UNIT" => {
                table.add_row([*unit, *state, rest.first().copied().unwrap_or_default()]);
            }
            _ => {}
        }
    }
    format!("{}{}", heading(3, "Enabled systemd Services"), table.render())
}

fn windows_startup(ctx: &ReportContext<'_>) -> String {
    let mut table = Table::new(["Caption", "Command", "Location"])
        .with_empty_message("Could not query startup commands.");
    for item in parse_list_blocks(&ctx.run("wmic startup get Caption,Command,Location /format:list")) {
        table.add_row([item.get_or_na("Caption"), item.get_or_na("Command"), item.get_or_na("Location")]);
    }
    format!("{}{}", heading(3, "Startup Commands (wmic startup)"), table.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&StartupItemsReport, platform)
    }

    #[test]
    fn test_macos_launch_directories() {
        let body = body_for(Platform::MacOS);
        assert!(body.contains("<h3>/Library/LaunchDaemons</h3>"));
        assert!(body.contains("<td>com.example.daemon.plist</td><td>root</td>"));
        assert!(body.contains("No items found in ~/Library/LaunchAgents."));
    }

    #[test]
    fn test_linux_enabled_services() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("<td>backdoor.service</td><td>enabled</td><td>enabled</td>"));
        assert!(!body.contains("<td>3</td>"));
        assert!(body.contains("No items found in /etc/init.d."));
    }

    #[test]
    fn test_windows_startup_commands() {
        let body = body_for(Platform::Windows);
        assert!(body.contains("<td>OneDrive</td>"));
        assert!(body.contains("OneDrive.exe&quot; /background"));
    }
}
