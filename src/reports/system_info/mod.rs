//! Core system and hardware reports.

mod hardware;
mod peripherals;

pub use hardware::SystemHardwareReport;
pub use peripherals::PeripheralsReport;
