use std::io::ErrorKind;
use std::process::{Command, Output};

use log::{debug, warn};

use super::CommandRunner;

/// Runs commands through the host shell.
///
/// Commands are passed whole to `sh -c` (or `cmd /C` on Windows) because
/// the report commands rely on pipes, globs and `~` expansion.
pub struct LiveRunner;

impl LiveRunner {
    pub fn new() -> Self {
        LiveRunner
    }

    fn spawn(command: &str) -> std::io::Result<Output> {
        if cfg!(target_os = "windows") {
            Command::new("cmd").arg("/C").arg(command).output()
        } else {
            Command::new("sh").arg("-c").arg(command).output()
        }
    }
}

impl Default for LiveRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for LiveRunner {
    fn run(&self, command: &str) -> String {
        debug!("[LIVE] Running command: {}", command);

        let output = match Self::spawn(command) {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Command not found: '{}'", first_word(command));
                return String::new();
            }
            Err(e) => {
                warn!("An unexpected error occurred while running command '{}': {}", command, e);
                return String::new();
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            match output.status.code() {
                Some(code) => warn!("Command '{}' failed with exit code {}", command, code),
                None => warn!("Command '{}' was terminated by a signal", command),
            }
            if !stdout.trim().is_empty() {
                debug!("STDOUT: {}", stdout.trim());
            }
            if !stderr.trim().is_empty() {
                debug!("STDERR: {}", stderr.trim());
            }
            return String::new();
        }

        if !stderr.trim().is_empty() {
            debug!("Command '{}' produced stderr output: {}", command, stderr.trim());
        }

        stdout
    }
}

fn first_word(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or(command)
}
