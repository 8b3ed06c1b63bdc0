//! Global constants for the IRIS triage reporter.
//!
//! This module centralizes hardcoded values shared by the renderer, the
//! report generators and the batch driver.

// Output constants
/// Default directory reports are written into (relative to the working directory)
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// File name of the JSON run summary written next to the reports
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// Default configuration file created by `init-config`
pub const DEFAULT_CONFIG_FILE: &str = "iris.yaml";

/// Host label used when the hostname cannot be determined
pub const FALLBACK_HOST_LABEL: &str = "Test_Computer";

// Rendering constants
/// Placeholder for any attribute a command did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// Footer line stamped on every report page
pub const REPORT_FOOTER: &str = "IRIS Incident Response Report";

/// Timestamp format shown on report pages
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Size conversion constants
/// Bytes per gibibyte
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Kibibytes per mebibyte
pub const KB_PER_MB: f64 = 1024.0;

/// Page size assumed when `vm_stat` does not report one
pub const DEFAULT_PAGE_SIZE_BYTES: u64 = 4096;

/// Sort key for macOS accounts that report no UniqueID
pub const MISSING_UID_SORT_KEY: i64 = 9999;

// Hashing
/// Largest report file hashed for the run summary (MB)
pub const MAX_HASH_SIZE_MB: u64 = 64;

// Persistence heuristics
/// Ports commonly bound by off-the-shelf backdoors and reverse shells
pub const SUSPICIOUS_PORTS: &[u16] = &[1337, 4444, 5555, 6666, 6667, 31337];

/// Process names that should rarely own a listening socket
pub const INTERPRETER_NAMES: &[&str] = &[
    "python", "python2", "python3", "perl", "ruby", "nc", "ncat", "netcat",
    "bash", "sh", "zsh", "powershell", "pwsh",
];
