//! Logging setup for the overlay, with file output and optional stdout.
//!
//! Logs always go to a file at `warn` level, or at the user's level when one of the
//! environment variables below is set. Stdout logging is enabled when either variable
//! is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`EMACS_OVERLAY_LOG`** (highest priority) - overlay-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for overlay crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/emacs-overlay/logs/emacs-overlay-<pid>.log`
//! - macOS: `~/Library/Application Support/emacs-overlay/logs/emacs-overlay-12345.log`
//! - Linux: `~/.local/share/emacs-overlay/logs/emacs-overlay-12345.log`

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

const ENV_VAR: &str = "EMACS_OVERLAY_LOG";
const CRATES: &[&str] = &["emacs_overlay", "emacs_overlay_log"];

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default)]
pub struct LogConfig {
    /// A file path (has an extension) or a directory to place the default file name in.
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// Respects the environment variable priority described in the module docs. The
/// returned [`LogGuard`] must be held for as long as the overlay is active; dropping it
/// flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter());

    let stdout_layer = if user_filter_set() || cfg!(debug_assertions) {
        Some(fmt::layer().with_filter(create_filter()))
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize stdout-only logging for tests.
///
/// Will not fail if called more than once or if another test already installed a
/// subscriber.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

fn user_filter_set() -> bool {
    env::var(ENV_VAR).is_ok() || env::var("RUST_LOG").is_ok()
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("emacs-overlay-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("emacs-overlay")
        .join("logs");

    (dir, filename)
}

/// File filter: the user's level if one is set, otherwise `warn`.
fn create_file_filter() -> EnvFilter {
    if user_filter_set() {
        return create_filter();
    }
    EnvFilter::new("warn")
}

fn create_filter() -> EnvFilter {
    if let Ok(value) = env::var(ENV_VAR) {
        return expand_filter(&value);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    expand_filter("info")
}

/// Expand a bare level such as `debug` into `warn,emacs_overlay=debug,...`.
///
/// Values that already use directive syntax (`=`, `:` or `,`) are passed through.
fn expand_filter(value: &str) -> EnvFilter {
    EnvFilter::new(directives(value))
}

fn directives(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_string();
    }

    let mut out = String::from("warn");
    for krate in CRATES {
        out.push(',');
        out.push_str(krate);
        out.push('=');
        out.push_str(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_expands_to_crate_directives() {
        assert_eq!(
            directives("debug"),
            "warn,emacs_overlay=debug,emacs_overlay_log=debug"
        );
    }

    #[test]
    fn directive_syntax_passes_through() {
        assert_eq!(directives("emacs_overlay=trace"), "emacs_overlay=trace");
        assert_eq!(directives("info,smol=warn"), "info,smol=warn");
    }

    #[test]
    fn override_with_extension_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("custom.log");
        let (dir, name) = resolve_log_path(Some(file));
        assert_eq!(dir, tmp.path());
        assert_eq!(name, "custom.log");
    }

    #[test]
    fn override_without_extension_is_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let (dir, name) = resolve_log_path(Some(tmp.path().to_path_buf()));
        assert_eq!(dir, tmp.path());
        assert!(name.starts_with("emacs-overlay-"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn default_path_lives_under_overlay_logs() {
        let (dir, _) = resolve_log_path(None);
        assert!(dir.ends_with(Path::new("emacs-overlay").join("logs")));
    }

    #[test]
    fn test_init_is_repeatable() {
        test();
        test();
    }
}
