use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Which browser, if any, opens a report once it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserPreference {
    SystemDefault,
    Chrome,
    Firefox,
    Safari,
    Edge,
    Brave,
    /// Write reports without opening anything
    #[default]
    None,
}

impl fmt::Display for BrowserPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserPreference::SystemDefault => "System Default",
            BrowserPreference::Chrome => "Chrome",
            BrowserPreference::Firefox => "Firefox",
            BrowserPreference::Safari => "Safari",
            BrowserPreference::Edge => "Edge",
            BrowserPreference::Brave => "Brave",
            BrowserPreference::None => "None",
        };
        write!(f, "{}", name)
    }
}

/// Program and arguments that open `path` with `preference` on `platform`.
///
/// Returns `None` when nothing should be launched, either because the
/// preference is `None` or because the browser does not exist on that OS.
pub fn launch_command(
    preference: BrowserPreference,
    platform: Platform,
    path: &Path,
) -> Option<(String, Vec<String>)> {
    let target = path.display().to_string();

    let (program, args): (&str, Vec<String>) = match (platform, preference) {
        (_, BrowserPreference::None) => return None,

        (Platform::MacOS, BrowserPreference::SystemDefault) => ("open", vec![target]),
        (Platform::MacOS, named) => {
            let app = match named {
                BrowserPreference::Chrome => "Google Chrome",
                BrowserPreference::Firefox => "Firefox",
                BrowserPreference::Safari => "Safari",
                BrowserPreference::Edge => "Microsoft Edge",
                BrowserPreference::Brave => "Brave Browser",
                _ => return None,
            };
            ("open", vec!["-a".to_string(), app.to_string(), target])
        }

        (Platform::Windows, named) => {
            let exe = match named {
                BrowserPreference::SystemDefault => None,
                BrowserPreference::Chrome => Some("chrome"),
                BrowserPreference::Firefox => Some("firefox"),
                BrowserPreference::Edge => Some("msedge"),
                BrowserPreference::Brave => Some("brave"),
                _ => return None,
            };
            // `start` takes its first argument as the window title
            let mut args = vec!["/C".to_string(), "start".to_string(), String::new()];
            args.extend(exe.map(str::to_string));
            args.push(target);
            ("cmd", args)
        }

        (_, named) => {
            let program = match named {
                BrowserPreference::SystemDefault => "xdg-open",
                BrowserPreference::Chrome => "google-chrome",
                BrowserPreference::Firefox => "firefox",
                BrowserPreference::Edge => "microsoft-edge",
                BrowserPreference::Brave => "brave-browser",
                _ => return None,
            };
            (program, vec![target])
        }
    };

    Some((program.to_string(), args))
}

/// Open a written report. Launch failures are logged and swallowed.
pub fn open_report(path: &Path, preference: BrowserPreference) {
    let platform = Platform::current();
    let Some((program, args)) = launch_command(preference, platform, path) else {
        if preference != BrowserPreference::None {
            warn!("{} is not available on {}; report left at {}", preference, platform, path.display());
        }
        return;
    };

    debug!("Opening report with: {} {}", program, args.join(" "));
    match spawn_detached(&program, &args) {
        Ok(_) => info!("Opened {} in {}", path.display(), preference),
        Err(e) => warn!("Could not open report in browser: {}", e),
    }
}

/// Start `program` without waiting for it.
///
/// A background thread waits on the child so it is reaped as soon as it
/// exits; the run never blocks on the browser. Dropping the returned handle
/// detaches that thread.
fn spawn_detached(program: &str, args: &[String]) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = Command::new(program).args(args).spawn()?;
    thread::Builder::new()
        .name(format!("reap-{}", program))
        .spawn(move || child.wait())
}
