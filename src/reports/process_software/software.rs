use anyhow::Result;
use log::{info, warn};

use crate::constants::NOT_AVAILABLE;
use crate::platform::Platform;
use crate::render::html::{heading, paragraph, Table};
use crate::reports::parsers::parse_list_blocks;
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const WMIC_PRODUCTS_COMMAND: &str = "wmic product get Name,Version /format:list";
const DPKG_COMMAND: &str = "dpkg-query -W -f='${Package} ${Version}\\n'";
const RPM_COMMAND: &str = "rpm -qa --queryformat '%{NAME} %{VERSION}-%{RELEASE}\\n'";
const APP_FOLDERS: &[&str] = &["/Applications/", "~/Applications/"];

pub struct InstalledSoftwareReport;

impl ReportGenerator for InstalledSoftwareReport {
    fn kind(&self) -> ReportKind {
        ReportKind::InstalledSoftware
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Collecting installed software");
        let mut body = heading(2, "Installed Software");

        match ctx.platform {
            Platform::Windows => {
                body.push_str(&heading(3, "Windows Installed Programs (via WMIC)"));
                let mut table = Table::new(["Name", "Version"])
                    .with_empty_message("Could not retrieve installed software information.");
                for product in parse_list_blocks(&ctx.run(WMIC_PRODUCTS_COMMAND)) {
                    table.add_row([product.get_or_na("Name"), product.get_or_na("Version")]);
                }
                table.sort_by_column(0);
                body.push_str(&table.render());
            }
            Platform::MacOS => {
                body.push_str(&heading(3, "macOS Installed Applications (Common Locations)"));
                body.push_str(&paragraph(
                    "This is a basic listing of applications found in common directories. A comprehensive list would require parsing receipts or other package management data.",
                ));
                for folder in APP_FOLDERS {
                    body.push_str(&heading(4, folder));
                    let listing = ctx.run(&format!("ls -F {} | grep '/'", folder));
                    let mut table = Table::new(["Application"])
                        .with_empty_message(format!("Could not list applications in {}.", folder));
                    for entry in listing.lines().map(str::trim).filter(|l| l.ends_with('/')) {
                        table.add_row([entry.trim_end_matches('/')]);
                    }
                    body.push_str(&table.render());
                }
            }
            Platform::Linux => {
                let (source, packages) = linux_packages(ctx);
                body.push_str(&heading(3, &format!("Linux Packages (via {})", source)));
                let mut table = Table::new(["Package", "Version"])
                    .with_empty_message("Could not retrieve installed packages.");
                for (name, version) in &packages {
                    table.add_row([name.as_str(), version.as_str()]);
                }
                body.push_str(&table.render());
            }
            Platform::Other => body.push_str(&unsupported_platform("Installed software reporting", ctx.platform)),
        }
        Ok(body)
    }
}

/// `name version` lines from dpkg, falling back to rpm
fn linux_packages(ctx: &ReportContext<'_>) -> (&'static str, Vec<(String, String)>) {
    let dpkg = parse_package_lines(&ctx.run(DPKG_COMMAND));
    if !dpkg.is_empty() {
        return ("dpkg-query", dpkg);
    }
    warn!("dpkg-query returned nothing, trying rpm");
    ("rpm", parse_package_lines(&ctx.run(RPM_COMMAND)))
}

fn parse_package_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.trim().splitn(2, ' ');
            let name = parts.next().filter(|n| !n.is_empty())?;
            let version = parts.next().map(str::trim).filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE);
            Some((name.to_string(), version.to_string()))
        })
        .collect()
}
