//! Logging bootstrap over `tracing-subscriber`

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file used when an empty template is given
pub const DEFAULT_LOG_TEMPLATE: &str = "logs/$DATE$-$CONF$.log";

/// Where and how much to log
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Log file template; `None` logs to stderr only
    pub file: Option<String>,
    /// Value substituted for `$CONF$`; defaults to the executable name
    pub conf: Option<String>,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_directive: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            file: None,
            conf: None,
            default_directive: "info".to_string(),
        }
    }
}

impl LogOptions {
    pub fn with_file(mut self, template: impl Into<String>) -> Self {
        self.file = Some(template.into());
        self
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }
}

/// Install the global subscriber: stderr always, plus a file when configured.
///
/// A stale log file of the same name is deleted first. Problems are reported
/// on stderr and never abort the caller. Returns false if a subscriber was
/// already installed.
pub fn init(options: &LogOptions) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_directive));

    let file_layer = options
        .file
        .as_deref()
        .map(|template| resolve_log_path(template, options.conf.as_deref(), Local::now()))
        .and_then(|path| open_log_file(&path))
        .map(|file| fmt::layer().with_ansi(false).with_writer(Mutex::new(file)));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
}

fn open_log_file(path: &Path) -> Option<File> {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            eprintln!("Cannot delete log file {}: {}", path.display(), e);
        }
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Cannot create log directory {}: {}", parent.display(), e);
            return None;
        }
    }
    match File::create(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Cannot create log file {}: {}", path.display(), e);
            None
        }
    }
}

/// Expand `$CONF$`, `$TIME$` (HHMM) and `$DATE$` (YYYYMMDD) in the file name
/// part of `template`. The directory part is kept as written.
pub fn resolve_log_path(template: &str, conf: Option<&str>, now: DateTime<Local>) -> PathBuf {
    let template = if template.trim().is_empty() {
        DEFAULT_LOG_TEMPLATE
    } else {
        template
    };
    let template = Path::new(template);

    let conf = conf.map(str::to_string).unwrap_or_else(executable_name);
    let file_name = template
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
        .replace("$CONF$", &conf)
        .replace("$TIME$", &now.format("%H%M").to_string())
        .replace("$DATE$", &now.format("%Y%m%d").to_string());

    match template.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn executable_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
