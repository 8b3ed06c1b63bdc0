//! User and security posture reports.

mod accounts;
mod antivirus;
mod logon;
mod web_history;

pub use accounts::LocalAccountsReport;
pub use antivirus::AntivirusReport;
pub use logon::LogonReport;
pub use web_history::WebHistoryReport;
