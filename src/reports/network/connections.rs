use anyhow::Result;
use log::{debug, info};

use crate::platform::Platform;
use crate::render::html::{heading, paragraph, pre_block, Table};
use crate::reports::parsers::{parse_lsof, parse_netstat, parse_ss, SocketRow};
use crate::reports::{unsupported_platform, ReportContext, ReportGenerator, ReportKind};

const SS_COMMAND: &str = "ss -tulpn";
const LSOF_COMMAND: &str = "lsof -i -P -n | grep -E 'LISTEN|ESTABLISHED'";
const NETSTAT_COMMAND: &str = "netstat -ano";

/// Sockets as reported by the platform's listing tool
pub(crate) struct SocketListing {
    pub command: &'static str,
    pub raw: String,
    pub rows: Vec<SocketRow>,
}

/// Run the platform's socket listing and parse it. `None` when the platform
/// has no known tool.
pub(crate) fn collect_sockets(ctx: &ReportContext<'_>) -> Option<SocketListing> {
    let command = match ctx.platform {
        Platform::Linux => SS_COMMAND,
        Platform::MacOS => LSOF_COMMAND,
        Platform::Windows => NETSTAT_COMMAND,
        Platform::Other => return None,
    };

    info!("Gathering network connections with: {}", command);
    let raw = ctx.run(command);
    let rows = match ctx.platform {
        Platform::MacOS => parse_lsof(&raw),
        Platform::Windows => parse_netstat(&raw),
        _ => parse_ss(&raw),
    };
    debug!("Parsed {} sockets", rows.len());
    Some(SocketListing { command, raw, rows })
}

/// Active connections and listening ports
pub struct TcpConnectionsReport;

impl ReportGenerator for TcpConnectionsReport {
    fn kind(&self) -> ReportKind {
        ReportKind::TcpConnections
    }

    fn build_body(&self, ctx: &ReportContext<'_>) -> Result<String> {
        let mut body = heading(2, "Active Network Connections & Listening Ports");

        let listing = match collect_sockets(ctx) {
            Some(listing) => listing,
            None => {
                body.push_str(&unsupported_platform("Network connection reporting", ctx.platform));
                return Ok(body);
            }
        };

        body.push_str(&heading(3, &format!("Connections (via '{}')", listing.command)));
        if listing.raw.trim().is_empty() {
            body.push_str(&paragraph("Could not retrieve network connection information."));
        } else if listing.rows.is_empty() {
            body.push_str(&pre_block(listing.raw.trim_end()));
        } else {
            body.push_str(&socket_table(ctx.platform, &listing.rows).render());
        }
        Ok(body)
    }
}

fn socket_table(platform: Platform, rows: &[SocketRow]) -> Table {
    let mut table = match platform {
        Platform::MacOS => Table::new(["Command", "PID", "User", "Protocol", "Name", "State"]),
        Platform::Windows => Table::new(["Proto", "Local Address", "Foreign Address", "State", "PID"]),
        _ => Table::new(["State", "Local Address", "Peer Address", "Process", "PID"]),
    };

    for row in rows {
        match platform {
            Platform::MacOS => {
                let name = if row.peer.is_empty() {
                    row.local.clone()
                } else {
                    format!("{}->{}", row.local, row.peer)
                };
                table.add_row([
                    row.process.as_str(),
                    row.pid.as_str(),
                    row.user.as_str(),
                    row.protocol.as_str(),
                    name.as_str(),
                    row.state.as_str(),
                ]);
            }
            Platform::Windows => {
                table.add_row([
                    row.protocol.as_str(),
                    row.local.as_str(),
                    row.peer.as_str(),
                    row.state.as_str(),
                    row.pid.as_str(),
                ]);
            }
            _ => {
                table.add_row([
                    row.state.as_str(),
                    row.local.as_str(),
                    row.peer.as_str(),
                    row.process.as_str(),
                    row.pid.as_str(),
                ]);
            }
        }
    }
    table
}
