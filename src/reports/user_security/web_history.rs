use anyhow::Result;
use log::{debug, info};

use crate::platform::Platform;
use crate::render::html::{heading, paragraph, Table};
use crate::reports::parsers::{parse_dir_listing, parse_ls_la};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

/// (browser, history database location) per platform
const LINUX_LOCATIONS: &[(&str, &str)] = &[
    ("Chrome", "~/.config/google-chrome/Default/History"),
    ("Firefox", "~/.mozilla/firefox/*/places.sqlite"),
    ("Edge", "~/.config/microsoft-edge/Default/History"),
    ("Brave", "~/.config/BraveSoftware/Brave-Browser/Default/History"),
];

const MACOS_LOCATIONS: &[(&str, &str)] = &[
    ("Chrome", "~/Library/Application\\ Support/Google/Chrome/Default/History"),
    ("Firefox", "~/Library/Application\\ Support/Firefox/Profiles/*/places.sqlite"),
    ("Safari", "~/Library/Safari/History.db"),
    ("Edge", "~/Library/Application\\ Support/Microsoft\\ Edge/Default/History"),
];

const WINDOWS_LOCATIONS: &[(&str, &str)] = &[
    ("Chrome", "%LOCALAPPDATA%\\Google\\Chrome\\User Data\\Default\\History"),
    ("Edge", "%LOCALAPPDATA%\\Microsoft\\Edge\\User Data\\Default\\History"),
    // `dir /s` only takes a wildcard in the last component, so the search
    // starts at the profiles root and recurses into every profile
    ("Firefox", "%APPDATA%\\Mozilla\\Firefox\\Profiles\\places.sqlite"),
];

/// Locates browser history databases without reading them
pub struct WebHistoryReport;

impl ReportGenerator for WebHistoryReport {
    fn kind(&self) -> ReportKind {
        ReportKind::WebHistory
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Locating browser history databases");
        let mut body = heading(2, "Web History");

        let mut table = Table::new(["Browser", "Path", "Size (bytes)", "Modified", "Found"]);
        match ctx.platform {
            Platform::Linux => unix_locations(ctx, LINUX_LOCATIONS, &mut table),
            Platform::MacOS => unix_locations(ctx, MACOS_LOCATIONS, &mut table),
            Platform::Windows => windows_locations(ctx, &mut table),
            Platform::Other => {
                body.push_str(&unsupported_platform("Web history discovery", ctx.platform));
                return Ok(body);
            }
        }

        body.push_str(&paragraph(
            "History databases are located but not parsed. Copy them off the host before opening them with a SQLite viewer.",
        ));
        body.push_str(&table.render());
        Ok(body)
    }
}

fn unix_locations(ctx: &ReportContext<'_>, locations: &[(&str, &str)], table: &mut Table) {
    for (browser, location) in locations {
        let entries = parse_ls_la(&ctx.run(&format!("ls -la {} 2>/dev/null", location)));
        if entries.is_empty() {
            debug!("No {} history at {}", browser, location);
            table.add_row([*browser, *location, "", "", "No"]);
        }
        for entry in entries {
            table.add_row([*browser, entry.name.as_str(), entry.size.as_str(), entry.modified.as_str(), "Yes"]);
        }
    }
}

fn windows_locations(ctx: &ReportContext<'_>, table: &mut Table) {
    for (browser, location) in WINDOWS_LOCATIONS {
        let files = located_files(&ctx.run(&format!("dir /s \"{}\"", location)));
        if files.is_empty() {
            debug!("No {} history at {}", browser, location);
            table.add_row([*browser, *location, "", "", "No"]);
        }
        for (path, size, modified) in files {
            table.add_row([*browser, path.as_str(), size.as_str(), modified.as_str(), "Yes"]);
        }
    }
}

/// (full path, size, modified) for each file in a `dir /s` listing.
///
/// Files are joined to the directory of the `Directory of` header above them.
fn located_files(listing: &str) -> Vec<(String, String, String)> {
    let mut directory = String::new();
    let mut files = Vec::new();
    for line in listing.lines() {
        if let Some(dir) = line.trim().strip_prefix("Directory of ") {
            directory = dir.trim().to_string();
            continue;
        }
        for (date, time, size, name) in parse_dir_listing(line) {
            let path = if directory.is_empty() { name } else { format!("{}\\{}", directory, name) };
            files.push((path, size.replace(',', ""), format!("{} {}", date, time)));
        }
    }
    files
}
