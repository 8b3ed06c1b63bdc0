//! Command execution facade.
//!
//! Every report gathers its data through a [`CommandRunner`]. The contract is
//! deliberately lossy: a runner returns the command's standard output, or an
//! empty string when the command is missing, exits non-zero or cannot be
//! spawned. Failures are logged here and surface in reports only as absent
//! data.
//!
//! ## Runners
//!
//! - [`LiveRunner`]: runs the command through the host shell
//! - [`MockRunner`]: answers from a table of canned outputs, for demos and tests
//!
//! ```no_run
//! use iris_triage::runner::{runner_for, ExecutionMode};
//!
//! let runner = runner_for(ExecutionMode::Mock);
//! let accounts = runner.run("wmic useraccount get Name,SID,Status,Disabled /format:list");
//! assert!(accounts.contains("Administrator"));
//! ```

mod live;
mod mock;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use live::LiveRunner;
pub use mock::MockRunner;

/// Source of command output for report generators
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `command` and return its standard output, or `""` on any failure
    fn run(&self, command: &str) -> String;
}

/// Whether commands hit the real host or the canned table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Live,
    Mock,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Live => write!(f, "live"),
            ExecutionMode::Mock => write!(f, "mock"),
        }
    }
}

/// Get the runner for the requested execution mode
pub fn runner_for(mode: ExecutionMode) -> Box<dyn CommandRunner> {
    match mode {
        ExecutionMode::Live => Box::new(LiveRunner::new()),
        ExecutionMode::Mock => Box::new(MockRunner::new()),
    }
}
