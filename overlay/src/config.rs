//! Configuration loaded from `config.toml`.
//!
//! [`Config::load_with_overrides`] picks the file: explicit override > path found by
//! [`crate::paths::discover`] > built-in defaults. Every field is optional.
//!
//! ```toml
//! indicator_duration_ms = 800
//! unset_prefixes = ["ctrl-x", "ctrl-c"]
//!
//! [commands.move-up]
//! column = "editor:add-selection-above"
//!
//! [bindings.atom-text-editor]
//! "ctrl-x u" = "core:undo"
//! ```

use crate::{
    dispatch_table::{DispatchTable, ModeOverrides},
    indicator::{TransientIndicator, DEFAULT_DURATION, DEFAULT_PREFIX},
    keymap::{default_keymap, Chord, KeymapTable},
};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::{path::Path, time::Duration};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How long the mode indicator stays visible.
    pub indicator_duration_ms: u64,

    /// Text before the mode name in the indicator, e.g. `emacs mode: line`.
    pub indicator_prefix: String,

    /// Host default bindings starting with one of these chords are disabled.
    pub unset_prefixes: Vec<String>,

    /// Per-action replacements for the dispatch table, keyed by action name.
    pub commands: FxHashMap<String, ModeOverrides>,

    /// Extra bindings: selector -> chord -> command.
    pub bindings: FxHashMap<String, FxHashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indicator_duration_ms: DEFAULT_DURATION.as_millis() as u64,
            indicator_prefix: DEFAULT_PREFIX.to_string(),
            unset_prefixes: ["ctrl-x", "ctrl-c", "ctrl-k"]
                .map(String::from)
                .to_vec(),
            commands: FxHashMap::default(),
            bindings: FxHashMap::default(),
        }
    }
}

impl Config {
    /// Read and deserialize a TOML config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration with priority: explicit override > discovered path > defaults.
    pub fn load_with_overrides(
        explicit: Option<&Path>,
        discovered_path: Option<&Path>,
    ) -> Result<Self> {
        match explicit.or(discovered_path) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn indicator(&self) -> TransientIndicator {
        TransientIndicator::new(
            self.indicator_prefix.clone(),
            Duration::from_millis(self.indicator_duration_ms),
        )
    }

    /// Built-in dispatch table with [`Self::commands`] applied.
    pub fn dispatch_table(&self) -> Result<DispatchTable> {
        DispatchTable::with_overrides(&self.commands).context("Invalid [commands] table")
    }

    /// Default keymap with [`Self::bindings`] appended.
    pub fn keymap(&self) -> Result<KeymapTable> {
        let mut table = default_keymap();
        table
            .extend_from_config(&self.bindings)
            .context("Invalid [bindings] table")?;
        Ok(table)
    }

    pub fn unset_prefixes(&self) -> Result<Vec<Chord>> {
        self.unset_prefixes
            .iter()
            .map(|prefix| {
                prefix
                    .parse::<Chord>()
                    .with_context(|| format!("Invalid unset prefix `{prefix}`"))
            })
            .collect()
    }
}
