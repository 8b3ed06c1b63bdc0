// Re-export all items from the submodules
mod env_vars;
mod report_config;

// Re-export report config
pub use report_config::{
    ReportConfig,
    load_or_create_config,
};

// Re-export environment variable functions
pub use env_vars::{
    expand_env_vars,
    normalize_path_for_os,
};
