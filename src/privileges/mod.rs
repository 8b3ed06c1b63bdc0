//! Elevation check for the running process.
//!
//! Many report commands (`ss -p`, `nethogs`, `pfctl`, the Security event
//! log) return less without root or Administrator rights. A run never
//! aborts over this; it only warns.

use log::{info, warn};

use crate::platform::Platform;

/// Check if the process is running with elevated privileges
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(windows)]
    {
        use winapi::um::shellapi::IsUserAnAdmin;
        unsafe { IsUserAnAdmin() != 0 }
    }
    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

/// Get instructions for elevating privileges on `platform`
pub fn get_elevation_instructions(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => {
            "Run from a terminal opened with 'Run as administrator'"
        }
        Platform::Linux | Platform::MacOS => "Run with sudo: 'sudo iris run --all'",
        Platform::Other => "Run with elevated privileges appropriate for your operating system",
    }
}

/// Log whether the run is elevated, with a hint when it is not
pub fn warn_if_not_elevated(platform: Platform) -> bool {
    let elevated = is_elevated();
    if elevated {
        info!("Running with elevated privileges");
    } else {
        warn!("Running without elevated privileges - some report sections may be empty");
        warn!("{}", get_elevation_instructions(platform));
    }
    elevated
}
