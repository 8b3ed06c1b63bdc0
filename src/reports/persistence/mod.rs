//! Persistence and malware-hunting reports.

mod listeners;
mod scheduled_tasks;
mod script_check;
mod startup_items;

pub use listeners::ProcessPersistenceReport;
pub use scheduled_tasks::ScheduledTasksReport;
pub use script_check::ScriptCheckReport;
pub use startup_items::StartupItemsReport;

use crate::constants::INTERPRETER_NAMES;
use crate::render::html::Table;
use crate::reports::parsers::LsEntry;

/// True when a process name or path names a script interpreter or shell.
///
/// Matches `python3`, `/usr/bin/python3.12` and `python.exe` alike.
pub(crate) fn is_interpreter(process: &str) -> bool {
    let base = process
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(process)
        .to_ascii_lowercase();
    let base = base.strip_suffix(".exe").unwrap_or(&base);

    INTERPRETER_NAMES
        .iter()
        .any(|name| base == *name || base.starts_with(&format!("{}.", name)))
}

/// Directory listing with executables highlighted
pub(crate) fn listing_table(entries: &[LsEntry], empty_message: &str) -> Table {
    let mut table = Table::new(["Name", "Owner", "Permissions", "Size", "Modified"])
        .with_empty_message(empty_message);
    for entry in entries.iter().filter(|e| !e.is_directory()) {
        let cells = [
            entry.name.as_str(),
            entry.owner.as_str(),
            entry.permissions.as_str(),
            entry.size.as_str(),
            entry.modified.as_str(),
        ];
        if entry.is_executable_file() {
            table.add_flagged_row(cells);
        } else {
            table.add_row(cells);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::parsers::parse_ls_la;
    use crate::runner::{CommandRunner, MockRunner};

    #[test]
    fn test_is_interpreter() {
        assert!(is_interpreter("python3"));
        assert!(is_interpreter("/usr/bin/python3.12"));
        assert!(is_interpreter("python.exe"));
        assert!(is_interpreter("C:\\Windows\\System32\\WindowsPowerShell\\v1.0\\powershell.exe"));
        assert!(!is_interpreter("sshd"));
        assert!(!is_interpreter("shell-helper"));
        assert!(!is_interpreter(""));
    }

    #[test]
    fn test_listing_table_flags_executables() {
        let entries = parse_ls_la(&MockRunner::new().run("ls -la /tmp"));
        let html = listing_table(&entries, "empty").render();
        assert!(html.contains("<tr class=\"flagged\"><td>payload.sh</td><td>hax0r</td>"));
        assert!(!html.contains("<td>.</td>"));
    }
}
