//! Locating the overlay's `config.toml`.
//!
//! The nearest `.emacs-overlay/` directory above the start directory wins; otherwise
//! `<config_dir>/emacs-overlay/` is used when it exists.

use std::path::{Path, PathBuf};

pub const DIR_NAME: &str = ".emacs-overlay";
pub const SYSTEM_DIR_NAME: &str = "emacs-overlay";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayPaths {
    pub config_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

pub fn discover(start_dir: &Path) -> OverlayPaths {
    match walk_ancestors(start_dir).or_else(system_config_dir) {
        Some(dir) => {
            tracing::info!("using overlay config directory: {}", dir.display());
            paths_from_dir(&dir)
        },
        None => {
            tracing::debug!("no {DIR_NAME} directory found");
            OverlayPaths::default()
        },
    }
}

fn walk_ancestors(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

fn system_config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join(SYSTEM_DIR_NAME);
    dir.is_dir().then_some(dir)
}

fn paths_from_dir(dir: &Path) -> OverlayPaths {
    let config = dir.join(CONFIG_FILE);
    OverlayPaths {
        config_dir: Some(dir.to_path_buf()),
        config_path: config.is_file().then_some(config),
    }
}
