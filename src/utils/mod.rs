//! Utility functions for report runs.
//!
//! - **Hashing**: SHA-256 of each written report for the run record
//! - **Summary**: the `run_summary.json` written next to the reports
//!
//! ### Hashing a Report
//!
//! ```no_run
//! use iris_triage::utils::hash::{report_sha256, report_unchanged};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let report = Path::new("reports/Logon_Report.html");
//!
//! match report_sha256(report, 64)? {
//!     Some(hash) => {
//!         println!("SHA-256: {}", hash);
//!         assert!(report_unchanged(report, &hash, 64)?);
//!     }
//!     None => println!("File exceeds size limit"),
//! }
//! # Ok(())
//! # }
//! ```

/// Run summary generation
pub mod summary;

/// Cryptographic hash calculation utilities
pub mod hash;
