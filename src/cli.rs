use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::DEFAULT_CONFIG_FILE;
use crate::platform::Platform;
use crate::render::BrowserPreference;
use crate::reports::ReportKind;

/// Command-line arguments for the IRIS triage reporter.
///
/// Global options override the matching keys of the YAML configuration;
/// anything left unset falls back to the configuration and then to the
/// built-in defaults.
#[derive(Parser, Debug)]
#[clap(name = "iris", version, about = "Cross-platform incident response triage reporter")]
pub struct Args {
    /// Directory the HTML reports are written into
    #[clap(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Host label stamped on every report (default: machine hostname)
    #[clap(long = "host", global = true)]
    pub host_label: Option<String>,

    /// Browser that opens each report once written
    #[clap(short, long, value_enum, global = true)]
    pub browser: Option<BrowserPreference>,

    /// Answer commands from canned sample output instead of the live host
    #[clap(long, global = true)]
    pub mock: bool,

    /// Render reports for this OS instead of the running one
    #[clap(long, value_enum, global = true)]
    pub target_os: Option<Platform>,

    /// Path to configuration YAML file
    #[clap(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate reports
    Run {
        /// Generate all sixteen reports in order
        #[clap(long, conflicts_with = "report")]
        all: bool,

        /// Generate only these reports (repeatable)
        #[clap(short, long, value_enum)]
        report: Vec<ReportKind>,
    },

    /// List every report with its file name and title
    List,

    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}
