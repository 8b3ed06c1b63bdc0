use anyhow::Result;
use log::{debug, info};

use crate::constants::{MISSING_UID_SORT_KEY, NOT_AVAILABLE};
use crate::models::FactRecord;
use crate::platform::Platform;
use crate::render::html::{bullet_list, heading, paragraph, Table};
use crate::reports::parsers::{parse_colon_pairs, parse_list_blocks};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const ANALYST_NOTES: &[&str] = &[
    "Unexpected Administrators: accounts with admin privileges that are not documented or expected.",
    "Anomalous Shells: users with interactive login shells (e.g., /bin/bash) that shouldn't have them (like service accounts).",
    "Unusual Home Directories: home directories in unexpected locations like /tmp or /var/tmp.",
    "Low UIDs: on Linux/macOS, a non-root user with a low UID (e.g., < 500) can be suspicious.",
];

/// Local user accounts and administrator membership
pub struct LocalAccountsReport;

impl ReportGenerator for LocalAccountsReport {
    fn kind(&self) -> ReportKind {
        ReportKind::LocalAccounts
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        let mut body = heading(2, "Local User Accounts");

        match ctx.platform {
            Platform::Windows => {
                info!("Gathering Windows local accounts via WMIC");
                body.push_str(&windows_accounts(ctx));
            }
            Platform::Linux => {
                info!("Gathering Linux local accounts from /etc/passwd");
                body.push_str(&linux_accounts(ctx));
            }
            Platform::MacOS => {
                info!("Gathering macOS local accounts via dscl");
                body.push_str(&macos_accounts(ctx));
            }
            Platform::Other => body.push_str(&unsupported_platform("Local account reporting", ctx.platform)),
        }

        body.push_str(&heading(3, "Analyst Notes"));
        body.push_str(&paragraph("To identify potentially compromised accounts, analysts should look for:"));
        body.push_str(&bullet_list(ANALYST_NOTES));
        Ok(body)
    }
}

/// Member names listed after the dashed separator of `net localgroup`
pub(crate) fn parse_admin_members(text: &str) -> Vec<String> {
    if !text.contains("Members") {
        return Vec::new();
    }
    text.lines()
        .skip_while(|line| !line.trim_start().starts_with("---"))
        .skip(1)
        .take_while(|line| !line.starts_with("The command completed"))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn windows_accounts(ctx: &ReportContext<'_>) -> String {
    let users = parse_list_blocks(&ctx.run("wmic useraccount get Name,SID,Status,Disabled /format:list"));
    let admins = parse_admin_members(&ctx.run("net localgroup Administrators"));
    if admins.is_empty() {
        debug!("Could not parse administrator list");
    }

    let mut table = Table::new(["Name", "SID", "Status", "Disabled", "Is Admin"])
        .with_empty_message("Could not enumerate local accounts.");
    for user in &users {
        let name = user.get_or_na("Name");
        table.add_row([
            name,
            user.get_or_na("SID"),
            user.get_or_na("Status"),
            user.get_or_na("Disabled"),
            yes_no(admins.iter().any(|a| a == name)),
        ]);
    }
    table.sort_by_column(0);

    format!("{}{}", heading(3, "All Local User Accounts"), table.render())
}

fn linux_accounts(ctx: &ReportContext<'_>) -> String {
    let passwd = ctx.run("awk -F: '{print $1, $3, $6, $7}' /etc/passwd");

    let mut table = Table::new(["Username", "UID", "Home Directory", "Shell"])
        .with_empty_message("Could not read /etc/passwd.");
    for line in passwd.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        let part = |i: usize| parts.get(i).copied().unwrap_or(NOT_AVAILABLE);
        table.add_row([part(0), part(1), part(2), part(3)]);
    }

    format!("{}{}", heading(3, "Linux User Accounts (from /etc/passwd)"), table.render())
}

fn macos_accounts(ctx: &ReportContext<'_>) -> String {
    let mut standard: Vec<FactRecord> = Vec::new();
    let mut system: Vec<FactRecord> = Vec::new();

    for username in ctx.run("dscl . -list /Users").lines().map(str::trim).filter(|u| !u.is_empty()) {
        let details = ctx.run(&format!(
            "dscl . -read /Users/{} UniqueID NFSHomeDirectory UserShell RealName",
            username
        ));
        let mut user = FactRecord::new().with("Name", username);
        for (key, value) in parse_colon_pairs(&details) {
            user.insert(key, value);
        }
        if username.starts_with('_') {
            system.push(user);
        } else {
            standard.push(user);
        }
    }

    let membership = ctx.run("dscl . -read /Groups/admin GroupMembership");
    let admins: Vec<&str> = membership
        .split_once("GroupMembership:")
        .map(|(_, members)| members.split_whitespace().collect())
        .unwrap_or_default();

    let uid_key = |user: &FactRecord| {
        user.get("UniqueID")
            .and_then(|uid| uid.parse::<i64>().ok())
            .unwrap_or(MISSING_UID_SORT_KEY)
    };
    standard.sort_by_key(uid_key);
    system.sort_by(|a, b| a.get_or_na("Name").cmp(b.get_or_na("Name")));

    let mut standard_table = Table::new(["Name", "Real Name", "Is Admin", "UniqueID", "Home Directory", "Login Shell"])
        .with_empty_message("No standard accounts found.");
    for user in &standard {
        let name = user.get_or_na("Name");
        standard_table.add_row([
            name,
            user.get_or_na("RealName"),
            yes_no(admins.contains(&name)),
            user.get_or_na("UniqueID"),
            user.get_or_na("NFSHomeDirectory"),
            user.get_or_na("UserShell"),
        ]);
    }

    let mut system_table = Table::new(["Name", "Real Name", "UniqueID", "Home Directory", "Login Shell"])
        .with_empty_message("No system accounts found.");
    for user in &system {
        system_table.add_row([
            user.get_or_na("Name"),
            user.get_or_na("RealName"),
            user.get_or_na("UniqueID"),
            user.get_or_na("NFSHomeDirectory"),
            user.get_or_na("UserShell"),
        ]);
    }

    format!(
        "{}{}{}{}",
        heading(3, "Standard & Administrator Accounts"),
        standard_table.render(),
        heading(3, "System Accounts"),
        system_table.render()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockCommandRunner;
    use crate::test_utils::{mock_body, silent_runner};

    fn body_for(platform: Platform) -> String {
        mock_body(&LocalAccountsReport, platform)
    }

    #[test]
    fn test_parse_admin_members() {
        let text = "Alias name     Administrators\nMembers\n\n-------------------------------------------------------------------------------\nAdministrator\nspencer\nThe command completed successfully.\n";
        assert_eq!(parse_admin_members(text), vec!["Administrator", "spencer"]);
        assert!(parse_admin_members("Access is denied.").is_empty());
    }

    #[test]
    fn test_windows_accounts_sorted_with_admin_flag() {
        let body = body_for(Platform::Windows);
        let admin = body.find("<td>Administrator</td>").unwrap();
        let guest = body.find("<td>Guest</td>").unwrap();
        let hax0r = body.find("<td>hax0r</td>").unwrap();
        let spencer = body.find("<td>spencer</td>").unwrap();
        assert!(admin < guest && guest < hax0r && hax0r < spencer);

        assert!(body.contains("<td>Degraded</td><td>FALSE</td><td>Yes</td>"));
        assert!(body.contains("<td>TRUE</td><td>No</td>"));
    }

    #[test]
    fn test_linux_accounts() {
        let body = body_for(Platform::Linux);
        assert!(body.contains("<td>hax0r</td><td>1001</td><td>/home/hax0r</td><td>/bin/bash</td>"));
    }

    #[test]
    fn test_linux_unreadable_passwd_placeholder() {
        let runner = silent_runner();
        let ctx = ReportContext::new(&runner, Platform::Linux, "host");
        let body = LocalAccountsReport.build_body(&ctx).unwrap();
        assert!(body.contains("<td colspan=\"4\">Could not read /etc/passwd.</td>"));
        assert!(body.contains("Analyst Notes"));
    }

    #[test]
    fn test_linux_short_lines_fill_placeholders() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| "ghost 1234\n".to_string());
        let ctx = ReportContext::new(&runner, Platform::Linux, "host");
        let body = LocalAccountsReport.build_body(&ctx).unwrap();
        assert!(body.contains("<td>ghost</td><td>1234</td><td>N/A</td><td>N/A</td>"));
    }

    #[test]
    fn test_macos_accounts_split_and_sorted() {
        let body = body_for(Platform::MacOS);
        let standard_start = body.find("Standard &amp; Administrator Accounts").unwrap();
        let system_start = body.find("System Accounts</h3>").unwrap();

        let root = body.find("<td>root</td>").unwrap();
        let spencer = body.find("<td>spencer</td>").unwrap();
        assert!(standard_start < root && root < spencer && spencer < system_start);
        assert!(body.contains("<td>spencer</td><td>Spencer</td><td>Yes</td><td>501</td>"));

        let spotlight = body.find("<td>_spotlight</td>").unwrap();
        let sshd = body.find("<td>_sshd</td>").unwrap();
        assert!(system_start < spotlight && spotlight < sshd);
    }

    #[test]
    fn test_macos_missing_uid_sorts_last() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|cmd| {
            if cmd == "dscl . -list /Users" {
                "mystery\nroot\n".to_string()
            } else if cmd.starts_with("dscl . -read /Users/root") {
                "UniqueID: 0".to_string()
            } else {
                String::new()
            }
        });
        let ctx = ReportContext::new(&runner, Platform::MacOS, "host");
        let body = LocalAccountsReport.build_body(&ctx).unwrap();
        assert!(body.find("<td>root</td>").unwrap() < body.find("<td>mystery</td>").unwrap());
    }
}
