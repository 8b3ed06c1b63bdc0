//! Network reports: sockets, interface configuration, firewall and traffic.

mod connections;
mod firewall;
mod interfaces;
mod traffic;

pub use connections::TcpConnectionsReport;
pub use firewall::FirewallRulesReport;
pub use interfaces::NetworkConfigReport;
pub use traffic::NetworkTrafficReport;

pub(crate) use connections::collect_sockets;
