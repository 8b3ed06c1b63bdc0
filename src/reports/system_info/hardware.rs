use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use sysinfo::{CpuExt, System, SystemExt};

use crate::constants::{BYTES_PER_GB, DEFAULT_PAGE_SIZE_BYTES, KB_PER_MB, NOT_AVAILABLE};
use crate::platform::Platform;
use crate::render::html::{heading, paragraph, Table};
use crate::reports::parsers::{parse_colon_pairs, parse_df, parse_header_table, parse_list_blocks};
use crate::reports::{ReportContext, ReportGenerator, ReportKind};

const SYSTEMINFO_COMMAND: &str = r#"systeminfo | findstr /B /C:"OS Name" /C:"OS Version" /C:"System Manufacturer" /C:"System Model" /C:"Processor(s)" /C:"Total Physical Memory""#;

lazy_static! {
    static ref MAC_SOFTWARE_FIELDS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"System Version: (.+)").unwrap(), "macOS Version"),
        (Regex::new(r"Build Version: (.+)").unwrap(), "macOS Build"),
        (Regex::new(r"Kernel Version: (.+)").unwrap(), "Kernel Version"),
    ];
    static ref MAC_HARDWARE_FIELDS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"Model Name: (.+)").unwrap(), "Model Name"),
        (Regex::new(r"Processor Name: (.+)").unwrap(), "Processor (Detailed)"),
        (Regex::new(r"Processor Speed: (.+)").unwrap(), "Processor Speed"),
        (Regex::new(r"Total Number of Cores: (.+)").unwrap(), "Number of Cores"),
        (Regex::new(r"Chip: (.+)").unwrap(), "Chip"),
    ];
    static ref PAGE_SIZE: Regex = Regex::new(r"(?i)page size of (\d+) bytes").unwrap();
    static ref VM_STAT_LINE: Regex = Regex::new(r"^\s*Pages\s+(.+?):\s+(\d+)").unwrap();
    static ref SWAP_USAGE: Regex =
        Regex::new(r"total = ([\d.]+[MG]?)\s+used = ([\d.]+[MG]?)\s+free = ([\d.]+[MG]?)").unwrap();
}

/// General system facts, memory and storage
pub struct SystemHardwareReport;

impl ReportGenerator for SystemHardwareReport {
    fn kind(&self) -> ReportKind {
        ReportKind::SystemHardware
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Gathering system, memory and storage information");
        let mut body = String::new();

        body.push_str(&heading(2, "General System Information"));
        body.push_str(&general_table(ctx).render());

        body.push_str(&heading(2, "Memory (RAM) Information"));
        body.push_str(&memory_table(ctx).render());

        body.push_str(&heading(2, "Storage Information"));
        body.push_str(&storage_table(ctx).render());

        body.push_str(&paragraph(
            "For more detailed interpretations or comparisons, specialized benchmarking tools are required.",
        ));
        Ok(body)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn bytes_to_gb(bytes: f64) -> f64 {
    round2(bytes / BYTES_PER_GB)
}

fn general_table(ctx: &ReportContext<'_>) -> Table {
    let mut table = Table::new(["Attribute", "Value"]);

    let mut system = System::new();
    system.refresh_cpu();
    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    table.add_row(["System".to_string(), or_na(system.name())]);
    table.add_row(["OS Version".to_string(), or_na(system.os_version())]);
    table.add_row(["Kernel".to_string(), or_na(system.kernel_version())]);
    table.add_row(["Node Name".to_string(), or_na(system.host_name())]);
    table.add_row(["Machine Architecture", std::env::consts::ARCH]);
    table.add_row([
        "Processor (Generic)".to_string(),
        or_na(system.cpus().first().map(|cpu| cpu.brand().trim().to_string())),
    ]);
    table.add_row(["Logical CPUs".to_string(), system.cpus().len().to_string()]);

    match ctx.platform {
        Platform::Windows => {
            for (attribute, value) in parse_colon_pairs(&ctx.run(SYSTEMINFO_COMMAND)) {
                table.add_row([attribute, value]);
            }
        }
        Platform::MacOS => {
            let software = ctx.run("system_profiler SPSoftwareDataType");
            add_regex_rows(&mut table, &software, &MAC_SOFTWARE_FIELDS);
            let hardware = ctx.run("system_profiler SPHardwareDataType");
            add_regex_rows(&mut table, &hardware, &MAC_HARDWARE_FIELDS);
        }
        _ => {}
    }
    table
}

fn add_regex_rows(table: &mut Table, text: &str, fields: &[(Regex, &'static str)]) {
    for (pattern, label) in fields {
        if let Some(caps) = pattern.captures(text) {
            table.add_row([label.to_string(), caps[1].trim().to_string()]);
        }
    }
}

fn memory_table(ctx: &ReportContext<'_>) -> Table {
    let mut table = Table::new(["Metric", "Value"]).with_empty_message("Memory information unavailable.");
    match ctx.platform {
        Platform::MacOS => macos_memory(ctx, &mut table),
        Platform::Linux => linux_memory(ctx, &mut table),
        Platform::Windows => windows_memory(ctx, &mut table),
        Platform::Other => {}
    }
    table
}

/// GB held by each page category `vm_stat` reports, keyed like `wired_down`
pub(crate) fn parse_vm_stat(text: &str) -> (u64, Vec<(String, f64)>) {
    let page_size = match PAGE_SIZE.captures(text).and_then(|c| c[1].parse::<u64>().ok()) {
        Some(size) => size,
        None => {
            if !text.trim().is_empty() {
                warn!("vm_stat page size not found, defaulting to {} bytes", DEFAULT_PAGE_SIZE_BYTES);
            }
            DEFAULT_PAGE_SIZE_BYTES
        }
    };

    let pages = text
        .lines()
        .filter_map(|line| VM_STAT_LINE.captures(line))
        .filter_map(|caps| {
            let key = caps[1].trim().replace(' ', "_").to_lowercase();
            let count = caps[2].parse::<u64>().ok()?;
            Some((key, bytes_to_gb((count * page_size) as f64)))
        })
        .collect();
    (page_size, pages)
}

fn macos_memory(ctx: &ReportContext<'_>, table: &mut Table) {
    let total_gb = ctx.run("sysctl -n hw.memsize").trim().parse::<u64>().ok().map(|b| bytes_to_gb(b as f64));
    match total_gb {
        Some(total) => table.add_row(["Total Physical Memory".to_string(), format!("{:.2} GB", total)]),
        None => debug!("Could not retrieve total physical memory via sysctl"),
    }

    let vm_stat = ctx.run("vm_stat");
    if !vm_stat.trim().is_empty() {
        let (_, pages) = parse_vm_stat(&vm_stat);
        let gb = |key: &str| pages.iter().find(|(k, _)| k == key).map_or(0.0, |(_, v)| *v);

        let categories = [
            ("Memory Active", gb("active"), true),
            ("Memory Inactive", gb("inactive"), true),
            ("Memory Wired", gb("wired_down"), true),
            ("Memory Compressed", gb("occupied_by_compressor"), true),
            ("Memory Speculative", gb("speculative"), false),
            ("Memory Throttled", gb("throttled"), false),
        ];
        for (label, value, always) in categories {
            if always || value > 0.0 {
                table.add_row([label.to_string(), format!("{:.2} GB", value)]);
            }
        }

        let used: f64 = categories.iter().map(|(_, v, _)| v).sum();
        match total_gb {
            Some(total) => {
                table.add_row(["Memory Used (Approx)".to_string(), format!("{:.2} GB", round2(used))]);
                table.add_row(["Memory Available (Approx)".to_string(), format!("{:.2} GB", round2(total - used))]);
            }
            None => table.add_row([
                "Memory Used/Available",
                "Approximation not possible without Total Memory.",
            ]),
        }
    }

    let swap = ctx.run("sysctl vm.swapusage");
    if !swap.trim().is_empty() {
        match SWAP_USAGE.captures(&swap) {
            Some(caps) => {
                table.add_row(["Swap Total", &caps[1]]);
                table.add_row(["Swap Used", &caps[2]]);
                table.add_row(["Swap Free", &caps[3]]);
            }
            None => {
                debug!("Could not parse swapusage output: {}", swap.trim());
                table.add_row(["Swap", "Could not parse swapusage output."]);
            }
        }
    }
}

fn linux_memory(ctx: &ReportContext<'_>, table: &mut Table) {
    let meminfo = ctx.run("cat /proc/meminfo");
    let labels = [
        ("MemTotal", "Total Physical Memory"),
        ("MemFree", "Free Memory"),
        ("MemAvailable", "Available Memory"),
        ("SwapTotal", "Swap Total"),
        ("SwapFree", "Swap Free"),
    ];
    let pairs = parse_colon_pairs(&meminfo);
    for (key, label) in labels {
        let kb = pairs
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.split_whitespace().next())
            .and_then(|n| n.parse::<f64>().ok());
        if let Some(kb) = kb {
            table.add_row([label.to_string(), format!("{:.2} GB", bytes_to_gb(kb * 1024.0))]);
        }
    }
}

fn windows_memory(ctx: &ReportContext<'_>, table: &mut Table) {
    let total = ctx.run("wmic ComputerSystem get TotalPhysicalMemory");
    let total_bytes = total.lines().nth(1).and_then(|l| l.trim().parse::<f64>().ok());
    if let Some(bytes) = total_bytes {
        table.add_row(["Total Physical Memory".to_string(), format!("{:.2} GB", bytes_to_gb(bytes))]);
    }

    let os = parse_header_table(&ctx.run(
        "wmic OS get FreePhysicalMemory,TotalVisibleMemorySize,FreeVirtualMemory,TotalVirtualMemorySize",
    ));
    if os.is_empty() {
        return;
    }
    for (key, label) in [
        ("FreePhysicalMemory", "Free Physical Memory"),
        ("TotalVisibleMemorySize", "Total Visible Memory"),
        ("FreeVirtualMemory", "Free Virtual Memory"),
        ("TotalVirtualMemorySize", "Total Virtual Memory"),
    ] {
        let kb = os.get(key).and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0);
        table.add_row([label.to_string(), format!("{:.2} MB", round2(kb / KB_PER_MB))]);
    }
}

fn storage_table(ctx: &ReportContext<'_>) -> Table {
    let mut table = Table::new([
        "Drive/Volume", "Size", "Used", "Available", "Filesystem", "Mount Point", "Serial (if available)",
    ])
    .with_empty_message("No storage devices found or processed.");

    match ctx.platform {
        Platform::MacOS | Platform::Linux => {
            for row in parse_df(&ctx.run("df -h")) {
                table.add_row([
                    row.filesystem,
                    row.size,
                    format!("{} ({})", row.used, row.capacity),
                    row.available,
                    NOT_AVAILABLE.to_string(),
                    row.mount_point,
                    NOT_AVAILABLE.to_string(),
                ]);
            }
        }
        Platform::Windows => {
            let size_gb = |v: Option<&str>| v.and_then(|s| s.parse::<f64>().ok()).map_or(0.0, bytes_to_gb);

            for disk in parse_list_blocks(&ctx.run("wmic diskdrive get Caption,SerialNumber,Size /format:list")) {
                table.add_row([
                    format!("{} (Physical Disk)", disk.get_or_na("Caption")),
                    format!("{:.2} GB", size_gb(disk.get("Size"))),
                    NOT_AVAILABLE.to_string(),
                    NOT_AVAILABLE.to_string(),
                    NOT_AVAILABLE.to_string(),
                    NOT_AVAILABLE.to_string(),
                    disk.get_or_na("SerialNumber").to_string(),
                ]);
            }

            for volume in parse_list_blocks(&ctx.run("wmic logicaldisk get Caption,FreeSpace,Size,FileSystem /format:list")) {
                let size = size_gb(volume.get("Size"));
                let free = size_gb(volume.get("FreeSpace"));
                table.add_row([
                    format!("{} (Logical Volume)", volume.get_or_na("Caption")),
                    format!("{:.2} GB", size),
                    format!("{:.2} GB", round2(size - free)),
                    format!("{:.2} GB", free),
                    volume.get_or_na("FileSystem").to_string(),
                    volume.get_or_na("Caption").to_string(),
                    NOT_AVAILABLE.to_string(),
                ]);
            }
        }
        Platform::Other => {}
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{MockCommandRunner, MockRunner};
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&SystemHardwareReport, platform)
    }

    #[test]
    fn test_vm_stat_parsing() {
        let runner = MockRunner::new();
        let (page_size, pages) = parse_vm_stat(&crate::runner::CommandRunner::run(&runner, "vm_stat"));
        assert_eq!(page_size, 4096);
        let compressor = pages.iter().find(|(k, _)| k == "occupied_by_compressor").unwrap();
        assert_eq!(compressor.1, 0.95);
        assert!(pages.iter().any(|(k, v)| k == "throttled" && *v == 0.0));
    }

    #[test]
    fn test_vm_stat_defaults_page_size() {
        let (page_size, pages) = parse_vm_stat("Pages free:   10.\n");
        assert_eq!(page_size, DEFAULT_PAGE_SIZE_BYTES);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_macos_memory_and_storage() {
        let body = body_for(Platform::MacOS);
        assert!(body.contains("<td>Total Physical Memory</td><td>16.00 GB</td>"));
        assert!(body.contains("Memory Compressed"));
        assert!(body.contains("Memory Speculative"));
        assert!(!body.contains("Memory Throttled"));
        assert!(body.contains("Memory Available (Approx)"));
        assert!(body.contains("<td>Swap Used</td><td>1024.25M</td>"));
        assert!(body.contains("<td>macOS Version</td><td>macOS 14.5 (23F79)</td>"));
        assert!(body.contains("/dev/sda1"));
    }

    #[test]
    fn test_windows_memory_and_storage() {
        let body = body_for(Platform::Windows);
        assert!(body.contains("<td>Free Physical Memory</td><td>8192.00 MB</td>"));
        assert!(body.contains("Samsung SSD 970 EVO 1TB (Physical Disk)"));
        assert!(body.contains("S4EWNX0N123456"));
        assert!(body.contains("<td>500.00 GB</td>"));
        assert!(body.contains("<td>NTFS</td>"));
        assert!(body.contains("<td>OS Name</td><td>Microsoft Windows 11 Pro</td>"));
    }

    #[test]
    fn test_linux_meminfo() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("<td>Total Physical Memory</td><td>15.56 GB</td>"));
        assert!(body.contains("<td>Swap Free</td><td>2.00 GB</td>"));
    }

    #[test]
    fn test_failed_commands_degrade_to_placeholders() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| String::new());
        let ctx = ReportContext::new(&runner, Platform::MacOS, "host");

        let body = SystemHardwareReport.build_body(&ctx).unwrap();
        assert!(body.contains("Memory information unavailable."));
        assert!(body.contains("No storage devices found or processed."));
        assert!(body.contains("General System Information"));
    }
}
