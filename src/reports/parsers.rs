//! Text parsers for the command outputs reports consume.
//!
//! Every parser is total: empty or unrecognised input yields an empty result,
//! never an error. Callers decide whether to fall back to a raw `<pre>` block.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::FactRecord;

lazy_static! {
    static ref LS_LINE: Regex = Regex::new(
        r"^([\-dlbcps][\w\-@+.]{9,})\s+\d+\s+(\S+)\s+(\S+)\s+(\d+)\s+(\w{3}\s+\d{1,2}\s+[\d:]+)\s+(.+)$"
    ).unwrap();
    static ref DIR_LINE: Regex = Regex::new(
        r"^(\d{2}/\d{2}/\d{4})\s+(\d{1,2}:\d{2}(?:\s*[AP]M)?)\s+([\d,]+)\s+(.+)$"
    ).unwrap();
    static ref DF_LINE: Regex = Regex::new(
        r"^(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\d+%)\s+(?:\S+\s+\S+\s+\d+%\s+)?(.+)$"
    ).unwrap();
    static ref SS_PROCESS: Regex = Regex::new(r#""([^"]+)",pid=(\d+)"#).unwrap();
    static ref PS_LINE: Regex = Regex::new(
        r"^(\S+)\s+(\d+)\s+([\d.]+)\s+([\d.]+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(.*)$"
    ).unwrap();
    static ref AUTH_LINE: Regex = Regex::new(
        r"^(\S+T\S+|\w{3}\s+\d+\s+[\d:]+)\s+(\S+)\s+([\w\-]+)(?:\[\d+\])?:\s+(.*)$"
    ).unwrap();
    static ref LSUSB_LINE: Regex = Regex::new(r"Bus (\d+) Device (\d+): ID (\w+):(\w+) (.*)").unwrap();
    static ref CRON_ENV: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*=").unwrap();
}

/// Split `key=value` list output (wmic `/format:list`) into one record per
/// blank-line separated block
pub fn parse_list_blocks(text: &str) -> Vec<FactRecord> {
    let mut records = Vec::new();
    let mut current = FactRecord::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            current.insert(key.trim(), value.trim());
        }
    }

    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// Blank-line separated blocks of `Key: value` lines (`schtasks /fo LIST`)
pub fn parse_colon_blocks(text: &str) -> Vec<FactRecord> {
    let mut records = Vec::new();
    let mut current = FactRecord::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            current.insert(key.trim(), value.trim());
        }
    }

    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// `Key: value` lines in output order. Lines without a colon are skipped.
pub fn parse_colon_pairs(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Header line followed by one value line, both whitespace separated
pub fn parse_header_table(text: &str) -> FactRecord {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let mut record = FactRecord::new();
    if let (Some(headers), Some(values)) = (lines.next(), lines.next()) {
        for (header, value) in headers.split_whitespace().zip(values.split_whitespace()) {
            record.insert(header, value);
        }
    }
    record
}

/// One entry of an `ls -la` listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsEntry {
    pub permissions: String,
    pub owner: String,
    pub group: String,
    pub size: String,
    pub modified: String,
    pub name: String,
}

impl LsEntry {
    pub fn is_directory(&self) -> bool {
        self.permissions.starts_with('d')
    }

    /// Regular file with any execute bit set
    pub fn is_executable_file(&self) -> bool {
        self.permissions.starts_with('-')
            && self.permissions.chars().skip(1).take(9).any(|c| matches!(c, 'x' | 's' | 't'))
    }
}

/// Parse `ls -la`, dropping the `total` line and the `.`/`..` entries
pub fn parse_ls_la(text: &str) -> Vec<LsEntry> {
    text.lines()
        .filter_map(|line| LS_LINE.captures(line.trim_end()))
        .map(|caps| LsEntry {
            permissions: caps[1].to_string(),
            owner: caps[2].to_string(),
            group: caps[3].to_string(),
            size: caps[4].to_string(),
            modified: caps[5].to_string(),
            name: caps[6].to_string(),
        })
        .filter(|entry| entry.name != "." && entry.name != "..")
        .collect()
}

/// File line of a Windows `dir` listing: (date, time, size, name)
pub fn parse_dir_listing(text: &str) -> Vec<(String, String, String, String)> {
    text.lines()
        .filter_map(|line| DIR_LINE.captures(line.trim()))
        .map(|caps| (caps[1].to_string(), caps[2].to_string(), caps[3].to_string(), caps[4].to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfRow {
    pub filesystem: String,
    pub size: String,
    pub used: String,
    pub available: String,
    pub capacity: String,
    pub mount_point: String,
}

/// Parse `df -h`; handles both the Linux layout and the macOS one with inode columns
pub fn parse_df(text: &str) -> Vec<DfRow> {
    text.lines()
        .skip_while(|line| !line.starts_with("Filesystem"))
        .skip(1)
        .filter_map(|line| DF_LINE.captures(line.trim()))
        .map(|caps| DfRow {
            filesystem: caps[1].to_string(),
            size: caps[2].to_string(),
            used: caps[3].to_string(),
            available: caps[4].to_string(),
            capacity: caps[5].to_string(),
            mount_point: caps[6].trim().to_string(),
        })
        .collect()
}

/// A socket from any of the per-OS connection listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocketRow {
    pub protocol: String,
    pub state: String,
    pub local: String,
    pub peer: String,
    pub process: String,
    pub pid: String,
    pub user: String,
}

impl SocketRow {
    pub fn is_listening(&self) -> bool {
        self.state.starts_with("LISTEN")
    }

    /// Port number of the local address, if it has one
    pub fn local_port(&self) -> Option<u16> {
        self.local.rsplit(':').next().and_then(|p| p.parse().ok())
    }
}

/// Parse `ss -tulpn`, with or without the leading Netid column
pub fn parse_ss(text: &str) -> Vec<SocketRow> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || tokens[0] == "State" || tokens[0] == "Netid" {
            continue;
        }
        let protocol = if matches!(tokens[0], "tcp" | "udp" | "raw" | "u_str" | "u_dgr") {
            tokens.remove(0).to_string()
        } else {
            String::new()
        };
        if tokens.len() < 5 {
            continue;
        }

        let process_field = tokens[5..].join(" ");
        let (process, pid) = SS_PROCESS
            .captures(&process_field)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .unwrap_or_default();

        rows.push(SocketRow {
            protocol,
            state: tokens[0].to_string(),
            local: tokens[3].to_string(),
            peer: tokens[4].to_string(),
            process,
            pid,
            user: String::new(),
        });
    }
    rows
}

/// Parse `lsof -i -P -n` lines; the state is lifted out of the trailing `(LISTEN)`
pub fn parse_lsof(text: &str) -> Vec<SocketRow> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 9 || tokens[0] == "COMMAND" || tokens[1].parse::<u32>().is_err() {
            continue;
        }

        let mut name = tokens[8..].join(" ");
        let mut state = String::new();
        if let Some(start) = name.rfind(" (") {
            if name.ends_with(')') {
                state = name[start + 2..name.len() - 1].to_string();
                name.truncate(start);
            }
        }
        let (local, peer) = match name.split_once("->") {
            Some((l, p)) => (l.to_string(), p.to_string()),
            None => (name.clone(), String::new()),
        };

        rows.push(SocketRow {
            protocol: tokens[7].to_string(),
            state,
            local,
            peer,
            process: tokens[0].to_string(),
            pid: tokens[1].to_string(),
            user: tokens[2].to_string(),
        });
    }
    rows
}

/// Parse `netstat -ano`; UDP rows have no state column
pub fn parse_netstat(text: &str) -> Vec<SocketRow> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [proto, local, foreign, state, pid] if proto.eq_ignore_ascii_case("TCP") => rows.push(SocketRow {
                protocol: proto.to_string(),
                state: state.to_string(),
                local: local.to_string(),
                peer: foreign.to_string(),
                pid: pid.to_string(),
                ..Default::default()
            }),
            [proto, local, foreign, pid] if proto.eq_ignore_ascii_case("UDP") => rows.push(SocketRow {
                protocol: proto.to_string(),
                local: local.to_string(),
                peer: foreign.to_string(),
                pid: pid.to_string(),
                ..Default::default()
            }),
            _ => {}
        }
    }
    rows
}

/// One row of `ps aux`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsRow {
    pub user: String,
    pub pid: String,
    pub cpu: String,
    pub mem: String,
    pub vsz: String,
    pub rss: String,
    pub tty: String,
    pub stat: String,
    pub started: String,
    pub time: String,
    pub command: String,
}

impl PsRow {
    pub fn cells(&self) -> [&str; 11] {
        [
            &self.user, &self.pid, &self.cpu, &self.mem, &self.vsz, &self.rss,
            &self.tty, &self.stat, &self.started, &self.time, &self.command,
        ]
    }
}

pub fn parse_ps_aux(text: &str) -> Vec<PsRow> {
    text.lines()
        .filter_map(|line| PS_LINE.captures(line.trim()))
        .map(|c| PsRow {
            user: c[1].to_string(),
            pid: c[2].to_string(),
            cpu: c[3].to_string(),
            mem: c[4].to_string(),
            vsz: c[5].to_string(),
            rss: c[6].to_string(),
            tty: c[7].to_string(),
            stat: c[8].to_string(),
            started: c[9].to_string(),
            time: c[10].to_string(),
            command: c[11].trim().to_string(),
        })
        .collect()
}

/// Section of `system_profiler` text output holding `key: value` fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilerNode {
    pub name: String,
    /// Names of the enclosing sections, outermost first
    pub parents: Vec<String>,
    pub fields: FactRecord,
}

/// Parse the indented text form of `system_profiler`.
///
/// A line ending in `:` opens a section nested under every open section with
/// smaller indentation. `key: value` lines belong to the innermost open
/// section. Sections without fields are omitted.
pub fn parse_profiler_sections(text: &str) -> Vec<ProfilerNode> {
    let mut stack: Vec<(usize, String)> = Vec::new();
    let mut nodes: Vec<ProfilerNode> = Vec::new();
    let mut open: Option<usize> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();

        if let Some(name) = trimmed.strip_suffix(':').filter(|n| !n.contains(": ")) {
            while stack.last().map_or(false, |(depth, _)| *depth >= indent) {
                stack.pop();
            }
            let parents = stack.iter().map(|(_, n)| n.clone()).collect();
            stack.push((indent, name.to_string()));
            nodes.push(ProfilerNode {
                name: name.to_string(),
                parents,
                fields: FactRecord::new(),
            });
            open = Some(nodes.len() - 1);
        } else if let Some((key, value)) = trimmed.split_once(": ") {
            if let Some(idx) = open {
                nodes[idx].fields.insert(key.trim(), value.trim());
            }
        }
    }

    nodes.into_iter().filter(|node| !node.fields.is_empty()).collect()
}

/// Classified line of `/var/log/auth.log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub time: String,
    pub host: String,
    pub service: String,
    pub message: String,
    pub classification: &'static str,
}

pub fn parse_auth_log(text: &str) -> Vec<AuthEvent> {
    text.lines()
        .filter_map(|line| AUTH_LINE.captures(line.trim()))
        .map(|caps| {
            let message = caps[4].to_string();
            let classification = if message.contains("Accepted") {
                "Accepted"
            } else if message.contains("Failed") {
                "Failed"
            } else if message.contains("new user") || &caps[3] == "useradd" {
                "User Created"
            } else {
                "Other"
            };
            AuthEvent {
                time: caps[1].to_string(),
                host: caps[2].to_string(),
                service: caps[3].to_string(),
                message,
                classification,
            }
        })
        .collect()
}

/// (bus, device, vendor id, product id, description)
pub fn parse_lsusb(text: &str) -> Vec<[String; 5]> {
    text.lines()
        .filter_map(|line| LSUSB_LINE.captures(line))
        .map(|c| [c[1].to_string(), c[2].to_string(), c[3].to_string(), c[4].to_string(), c[5].trim().to_string()])
        .collect()
}

/// (image name, pid) from `tasklist /fo csv /nh`
pub fn parse_tasklist_csv(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.trim().split("\",\"").map(|f| f.trim_matches('"'));
            let name = fields.next().filter(|n| !n.is_empty())?;
            let pid = fields.next().filter(|p| p.chars().all(|c| c.is_ascii_digit()) && !p.is_empty())?;
            Some((name.to_string(), pid.to_string()))
        })
        .collect()
}

/// (schedule, command) for every job line of a crontab
pub fn parse_crontab(text: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || CRON_ENV.is_match(line) {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let fields = if line.starts_with('@') { 1 } else { 5 };
        if tokens.len() <= fields {
            continue;
        }
        entries.push((tokens[..fields].join(" "), tokens[fields..].join(" ")));
    }
    entries
}
