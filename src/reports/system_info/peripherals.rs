use anyhow::Result;
use log::info;

use crate::constants::NOT_AVAILABLE;
use crate::platform::Platform;
use crate::render::html::{heading, paragraph, Table};
use crate::reports::parsers::{parse_list_blocks, parse_lsusb, parse_profiler_sections, ProfilerNode};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

/// Bluetooth vendor ids worth naming without a network lookup
const KNOWN_VENDORS: &[(&str, &str)] = &[
    ("0x004C", "Apple, Inc."),
    ("0x046D", "Logitech"),
    ("0x0006", "Microsoft"),
];

/// USB, camera and Bluetooth inventory
pub struct PeripheralsReport;

impl ReportGenerator for PeripheralsReport {
    fn kind(&self) -> ReportKind {
        ReportKind::UsbCameraBluetooth
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Gathering USB, camera and Bluetooth devices");
        let mut body = heading(2, "Connected Peripheral Devices");

        match ctx.platform {
            Platform::MacOS => macos_devices(ctx, &mut body),
            Platform::Linux => linux_devices(ctx, &mut body),
            Platform::Windows => windows_devices(ctx, &mut body),
            Platform::Other => body.push_str(&unsupported_platform("Peripheral device reporting", ctx.platform)),
        }
        Ok(body)
    }
}

pub(crate) fn vendor_name(vendor_id: &str) -> &'static str {
    KNOWN_VENDORS
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(vendor_id.trim()))
        .map(|(_, name)| *name)
        .unwrap_or(NOT_AVAILABLE)
}

fn field(node: &ProfilerNode, key: &str) -> String {
    node.fields.get_or_na(key).to_string()
}

fn macos_devices(ctx: &ReportContext<'_>, body: &mut String) {
    body.push_str(&heading(3, "USB Devices"));
    let mut usb = Table::new(["Name", "Manufacturer", "Vendor ID", "Product ID", "Serial #"])
        .with_empty_message("No USB devices found.");
    for node in parse_profiler_sections(&ctx.run("system_profiler SPUSBDataType")) {
        if node.fields.contains("Vendor ID") {
            usb.add_row([
                node.name.clone(),
                field(&node, "Manufacturer"),
                field(&node, "Vendor ID"),
                field(&node, "Product ID"),
                field(&node, "Serial Number"),
            ]);
        }
    }
    body.push_str(&usb.render());

    body.push_str(&heading(3, "Camera Devices"));
    let mut cameras = Table::new(["Name", "Model ID (Vendor/Product)"]).with_empty_message("No camera devices found.");
    for node in parse_profiler_sections(&ctx.run("system_profiler SPCameraDataType")) {
        if node.fields.contains("Model ID") || node.fields.contains("Unique ID") {
            cameras.add_row([node.name.clone(), field(&node, "Model ID")]);
        }
    }
    body.push_str(&cameras.render());

    body.push_str(&heading(3, "Bluetooth Devices"));
    let mut bluetooth = Table::new(["Name", "Status", "Vendor ID", "Vendor", "Product ID", "Device Address"])
        .with_empty_message("No Bluetooth devices found.");
    for node in parse_profiler_sections(&ctx.run("system_profiler SPBluetoothDataType")) {
        let status = if node.parents.iter().any(|p| p == "Not Connected") {
            "Not Connected"
        } else if node.parents.iter().any(|p| p == "Connected") {
            "Connected"
        } else {
            continue;
        };
        let vendor_id = field(&node, "Vendor ID");
        bluetooth.add_row([
            node.name.clone(),
            status.to_string(),
            vendor_id.clone(),
            vendor_name(&vendor_id).to_string(),
            field(&node, "Product ID"),
            field(&node, "Address"),
        ]);
    }
    body.push_str(&bluetooth.render());
}

fn linux_devices(ctx: &ReportContext<'_>, body: &mut String) {
    body.push_str(&heading(3, "USB Devices"));
    let mut usb = Table::new(["Bus", "Device", "Vendor ID", "Product ID", "Description"])
        .with_empty_message("No USB devices found.");
    for device in parse_lsusb(&ctx.run("lsusb")) {
        usb.add_row(device);
    }
    body.push_str(&usb.render());

    body.push_str(&heading(3, "Camera Devices"));
    let mut cameras = Table::new(["Device Node"]).with_empty_message("No video devices found.");
    for node in ctx.run("ls /dev/video*").split_whitespace() {
        cameras.add_row([node]);
    }
    body.push_str(&cameras.render());

    body.push_str(&heading(3, "Bluetooth Devices"));
    let mut bluetooth = Table::new(["Name", "Device Address"]).with_empty_message("No Bluetooth devices found.");
    for line in ctx.run("bluetoothctl devices").lines() {
        let mut parts = line.trim().splitn(3, ' ');
        if let (Some("Device"), Some(address), Some(name)) = (parts.next(), parts.next(), parts.next()) {
            bluetooth.add_row([name, address]);
        }
    }
    body.push_str(&bluetooth.render());
}

fn windows_devices(ctx: &ReportContext<'_>, body: &mut String) {
    let output = ctx.run(
        "wmic path Win32_PnPEntity where \"PNPClass='USB' or PNPClass='Camera' or PNPClass='Image' or PNPClass='Bluetooth'\" get Name,Manufacturer,PNPClass,DeviceID /format:list",
    );
    let devices = parse_list_blocks(&output);

    for (title, classes) in [
        ("USB Devices", &["USB"][..]),
        ("Camera Devices", &["Camera", "Image"][..]),
        ("Bluetooth Devices", &["Bluetooth"][..]),
    ] {
        body.push_str(&heading(3, title));
        let mut table = Table::new(["Name", "Manufacturer", "Class", "Device ID"])
            .with_empty_message(format!("No {} found.", title.to_lowercase()));
        for device in devices.iter().filter(|d| classes.iter().any(|c| *c == d.get_or_na("PNPClass"))) {
            table.add_row([
                device.get_or_na("Name"),
                device.get_or_na("Manufacturer"),
                device.get_or_na("PNPClass"),
                device.get_or_na("DeviceID"),
            ]);
        }
        body.push_str(&table.render());
    }

    if devices.is_empty() {
        body.push_str(&paragraph("Could not query Plug and Play devices via WMIC."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&PeripheralsReport, platform)
    }

    #[test]
    fn test_vendor_name_lookup() {
        assert_eq!(vendor_name("0x004C"), "Apple, Inc.");
        assert_eq!(vendor_name("0x046d"), "Logitech");
        assert_eq!(vendor_name("0xFFFF"), "N/A");
    }

    #[test]
    fn test_macos_sections() {
        let body = body_for(Platform::MacOS);
        assert!(body.contains("<td>Unifying Receiver</td><td>Logitech</td>"));
        assert!(body.contains("<td>FaceTime HD Camera</td>"));
        assert!(body.contains("<td>Magic Keyboard</td><td>Connected</td><td>0x004C</td><td>Apple, Inc.</td>"));
        assert!(body.contains("<td>MX Master 3</td><td>Not Connected</td>"));
        assert!(!body.contains("<td>Bluetooth Controller</td>"));
    }

    #[test]
    fn test_linux_sections() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("<td>046d</td><td>c52b</td>"));
        assert!(body.contains("<td>/dev/video0</td>"));
        assert!(body.contains("<td>MX Master 3</td><td>00:1B:66:AA:BB:CC</td>"));
    }

    #[test]
    fn test_windows_sections_split_by_class() {
        let body = body_for(Platform::Windows);
        assert!(body.contains("<td>Logitech USB Input Device</td>"));
        assert!(body.contains("<td>Integrated Webcam</td><td>Realtek</td><td>Camera</td>"));
        assert!(body.contains("No bluetooth devices found."));
    }

    #[test]
    fn test_other_platform_is_unsupported() {
        assert!(body_for(Platform::Other).contains("not supported on other"));
    }
}
