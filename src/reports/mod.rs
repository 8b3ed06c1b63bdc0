//! Report generators.
//!
//! Each generator gathers one category of host data through a
//! [`CommandRunner`] and returns an HTML body fragment. Generators never
//! touch the file system; the batch driver hands their output to the
//! [`ReportRenderer`](crate::render::ReportRenderer).
//!
//! Generators are grouped the way an analyst works through a host:
//!
//! - [`system_info`]: hardware, memory, storage and peripherals
//! - [`user_security`]: accounts, logons, antivirus and browser history
//! - [`network`]: sockets, interface configuration, firewall and traffic
//! - [`process_software`]: running processes and installed software
//! - [`persistence`]: scheduled tasks, startup items, script and listener checks

pub mod batch;
pub mod network;
pub mod parsers;
pub mod persistence;
pub mod process_software;
pub mod system_info;
pub mod user_security;

use std::fmt;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::runner::CommandRunner;

pub use batch::run_batch;

/// The sixteen report categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    SystemHardware,
    UsbCameraBluetooth,
    LocalAccounts,
    Logon,
    AntivirusStatus,
    WebHistory,
    TcpConnections,
    NetworkConfig,
    FirewallRules,
    NetworkTraffic,
    RunningProcesses,
    InstalledSoftware,
    ScheduledTasks,
    StartupItems,
    ScriptCheck,
    ProcessPersistence,
}

impl ReportKind {
    /// Every kind, in "Run All" order
    pub fn all() -> &'static [ReportKind] {
        use ReportKind::*;
        &[
            SystemHardware,
            UsbCameraBluetooth,
            LocalAccounts,
            Logon,
            AntivirusStatus,
            WebHistory,
            TcpConnections,
            NetworkConfig,
            FirewallRules,
            NetworkTraffic,
            RunningProcesses,
            InstalledSoftware,
            ScheduledTasks,
            StartupItems,
            ScriptCheck,
            ProcessPersistence,
        ]
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::SystemHardware => "System_Hardware_Report.html",
            ReportKind::UsbCameraBluetooth => "USB_Camera_Bluetooth_Report.html",
            ReportKind::LocalAccounts => "Local_Accounts_Report.html",
            ReportKind::Logon => "Logon_Report.html",
            ReportKind::AntivirusStatus => "Antivirus_Status_Report.html",
            ReportKind::WebHistory => "Web_History_Report.html",
            ReportKind::TcpConnections => "TCP_Connections_Report.html",
            ReportKind::NetworkConfig => "Network_Config_Report.html",
            ReportKind::FirewallRules => "Firewall_Rules_Report.html",
            ReportKind::NetworkTraffic => "Network_Traffic_Report.html",
            ReportKind::RunningProcesses => "Running_Processes_Report.html",
            ReportKind::InstalledSoftware => "Installed_Software_Report.html",
            ReportKind::ScheduledTasks => "Scheduled_Tasks_Report.html",
            ReportKind::StartupItems => "Startup_Items_Report.html",
            ReportKind::ScriptCheck => "Script_Check_Report.html",
            ReportKind::ProcessPersistence => "Process_Persistence_Report.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::SystemHardware => "System & Hardware Information Report",
            ReportKind::UsbCameraBluetooth => "USB, Camera & Bluetooth Devices Report",
            ReportKind::LocalAccounts => "Local User Accounts Report",
            ReportKind::Logon => "Logon Report",
            ReportKind::AntivirusStatus => "Antivirus Status Report",
            ReportKind::WebHistory => "Web History Report",
            ReportKind::TcpConnections => "TCP-UDP Connections Report",
            ReportKind::NetworkConfig => "Network Configuration Report",
            ReportKind::FirewallRules => "Firewall Rules Report",
            ReportKind::NetworkTraffic => "Network Traffic Report",
            ReportKind::RunningProcesses => "Running Processes Report",
            ReportKind::InstalledSoftware => "Installed Software Report",
            ReportKind::ScheduledTasks => "Scheduled Tasks Report",
            ReportKind::StartupItems => "Startup Items Report",
            ReportKind::ScriptCheck => "Script Check Report",
            ReportKind::ProcessPersistence => "Process Persistence Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => write!(f, "{}", value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

/// Everything a generator may consult while it runs
pub struct ReportContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub platform: Platform,
    pub host_label: &'a str,
}

impl<'a> ReportContext<'a> {
    pub fn new(runner: &'a dyn CommandRunner, platform: Platform, host_label: &'a str) -> Self {
        ReportContext { runner, platform, host_label }
    }

    /// Shorthand for `self.runner.run(command)`
    pub fn run(&self, command: &str) -> String {
        self.runner.run(command)
    }
}

/// One report category's data gathering and formatting
pub trait ReportGenerator {
    fn kind(&self) -> ReportKind;

    /// Gather data and format the HTML body fragment
    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String>;
}

/// Get the generator for a report kind
pub fn generator_for(kind: ReportKind) -> Box<dyn ReportGenerator> {
    match kind {
        ReportKind::SystemHardware => Box::new(system_info::SystemHardwareReport),
        ReportKind::UsbCameraBluetooth => Box::new(system_info::PeripheralsReport),
        ReportKind::LocalAccounts => Box::new(user_security::LocalAccountsReport),
        ReportKind::Logon => Box::new(user_security::LogonReport),
        ReportKind::AntivirusStatus => Box::new(user_security::AntivirusReport),
        ReportKind::WebHistory => Box::new(user_security::WebHistoryReport),
        ReportKind::TcpConnections => Box::new(network::TcpConnectionsReport),
        ReportKind::NetworkConfig => Box::new(network::NetworkConfigReport),
        ReportKind::FirewallRules => Box::new(network::FirewallRulesReport),
        ReportKind::NetworkTraffic => Box::new(network::NetworkTrafficReport),
        ReportKind::RunningProcesses => Box::new(process_software::RunningProcessesReport),
        ReportKind::InstalledSoftware => Box::new(process_software::InstalledSoftwareReport),
        ReportKind::ScheduledTasks => Box::new(persistence::ScheduledTasksReport),
        ReportKind::StartupItems => Box::new(persistence::StartupItemsReport),
        ReportKind::ScriptCheck => Box::new(persistence::ScriptCheckReport),
        ReportKind::ProcessPersistence => Box::new(persistence::ProcessPersistenceReport),
    }
}

/// Paragraph used by every generator for platforms it has no commands for
pub(crate) fn unsupported_platform(what: &str, platform: Platform) -> String {
    crate::render::html::paragraph(&format!("{} is not supported on {}.", what, platform))
}

/// A titled command whose output is shown verbatim
pub(crate) struct RawSection {
    pub title: &'static str,
    pub command: &'static str,
    pub placeholder: &'static str,
}

/// Run each section's command and render it as a heading plus `<pre>` block
pub(crate) fn raw_sections(ctx: &ReportContext<'_>, sections: &[RawSection]) -> String {
    use crate::render::html::{heading, pre_or_placeholder};

    let mut out = String::new();
    for section in sections {
        out.push_str(&heading(3, section.title));
        out.push_str(&pre_or_placeholder(&ctx.run(section.command), section.placeholder));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockRunner;
    use std::collections::HashSet;

    #[test]
    fn test_file_names_are_unique() {
        let names: HashSet<&str> = ReportKind::all().iter().map(|k| k.file_name()).collect();
        assert_eq!(names.len(), ReportKind::all().len());
        assert_eq!(ReportKind::all().len(), 16);
    }

    #[test]
    fn test_generator_for_matches_kind() {
        for kind in ReportKind::all() {
            assert_eq!(generator_for(*kind).kind(), *kind);
        }
    }

    #[test]
    fn test_kind_display_is_cli_name() {
        assert_eq!(ReportKind::SystemHardware.to_string(), "system-hardware");
        assert_eq!(ReportKind::UsbCameraBluetooth.to_string(), "usb-camera-bluetooth");
        let parsed: ReportKind = serde_yaml::from_str("tcp-connections").unwrap();
        assert_eq!(parsed, ReportKind::TcpConnections);
    }

    #[test]
    fn test_every_generator_runs_against_mock_on_every_platform() {
        let runner = MockRunner::new();
        for platform in [Platform::Windows, Platform::Linux, Platform::MacOS, Platform::Other] {
            let ctx = ReportContext::new(&runner, platform, "Test_Computer");
            for kind in ReportKind::all() {
                let body = generator_for(*kind).build_body(&ctx).unwrap();
                assert!(!body.is_empty(), "{} on {} produced an empty body", kind, platform);
            }
        }
    }
}
