//! Process and software inventory reports.

mod processes;
mod software;

pub use processes::RunningProcessesReport;
pub use software::InstalledSoftwareReport;

pub(crate) use processes::{ps_table, PYTHON_PS_COMMAND};
