//! Mode-aware lookup from logical action to host command.
//!
//! The built-in table is written as an exhaustive `match` over [`ActionKey`] and
//! [`Mode`], so a missing row is a compile error rather than a dispatch-time surprise.
//! User overrides from [`crate::Config`] are validated once in
//! [`DispatchTable::with_overrides`]; after construction every lookup succeeds.

use crate::{action::ActionKey, mode::Mode};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

/// Host commands that are dispatched outside the table.
pub mod commands {
    pub const COPY: &str = "core:copy";
    pub const CUT: &str = "core:cut";
    pub const CONSOLIDATE_SELECTIONS: &str = "editor:consolidate-selections";
    pub const FIND_SHOW: &str = "find-and-replace:show";
    pub const FIND_NEXT: &str = "find-and-replace:find-next";
    pub const FIND_PREVIOUS: &str = "find-and-replace:find-previous";
    /// Panel tag identifying the host's find/replace panel.
    pub const FIND_PANEL: &str = "find-and-replace";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("unknown action `{0}` in command overrides")]
    UnknownAction(String),
    #[error("command override for `{action}` in mode `{mode}` is empty")]
    EmptyCommand { action: ActionKey, mode: Mode },
}

/// Per-mode replacement commands for one action, as written in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeOverrides {
    pub none: Option<String>,
    pub line: Option<String>,
    pub column: Option<String>,
}

impl ModeOverrides {
    fn get(&self, mode: Mode) -> Option<&str> {
        match mode {
            Mode::None => self.none.as_deref(),
            Mode::Line => self.line.as_deref(),
            Mode::Column => self.column.as_deref(),
        }
    }
}

/// Immutable `(ActionKey, Mode) -> command` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    rows: [[String; 3]; ActionKey::COUNT],
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self {
            rows: std::array::from_fn(|row| {
                let action = ActionKey::ALL[row];
                Mode::ALL.map(|mode| builtin(action, mode).to_string())
            }),
        }
    }
}

impl DispatchTable {
    /// Build the default table with `overrides` applied on top.
    ///
    /// Keys of `overrides` are [`ActionKey`] names. Fails on unknown actions or empty
    /// commands so a bad config is rejected before any key is handled.
    pub fn with_overrides(
        overrides: &FxHashMap<String, ModeOverrides>,
    ) -> Result<Self, TableError> {
        let mut table = Self::default();

        for (name, modes) in overrides {
            let action =
                ActionKey::from_name(name).ok_or_else(|| TableError::UnknownAction(name.clone()))?;
            for mode in Mode::ALL {
                let Some(command) = modes.get(mode) else {
                    continue;
                };
                let command = command.trim();
                if command.is_empty() {
                    return Err(TableError::EmptyCommand { action, mode });
                }
                table.rows[row_index(action)][mode_index(mode)] = command.to_string();
            }
        }

        Ok(table)
    }

    pub fn command(&self, action: ActionKey, mode: Mode) -> &str {
        &self.rows[row_index(action)][mode_index(mode)]
    }
}

fn row_index(action: ActionKey) -> usize {
    action as usize
}

fn mode_index(mode: Mode) -> usize {
    match mode {
        Mode::None => 0,
        Mode::Line => 1,
        Mode::Column => 2,
    }
}

/// Built-in commands. Column mode grows extra cursors vertically and otherwise behaves
/// like line mode.
fn builtin(action: ActionKey, mode: Mode) -> &'static str {
    use ActionKey::*;

    match (action, mode) {
        (MoveUp, Mode::None) => "core:move-up",
        (MoveUp, Mode::Line) => "core:select-up",
        (MoveUp, Mode::Column) => "editor:add-selection-above",

        (MoveDown, Mode::None) => "core:move-down",
        (MoveDown, Mode::Line) => "core:select-down",
        (MoveDown, Mode::Column) => "editor:add-selection-below",

        (MoveLeft, Mode::None) => "core:move-left",
        (MoveLeft, Mode::Line | Mode::Column) => "core:select-left",

        (MoveRight, Mode::None) => "core:move-right",
        (MoveRight, Mode::Line | Mode::Column) => "core:select-right",

        (PageUp, Mode::None) => "core:page-up",
        (PageUp, Mode::Line | Mode::Column) => "core:select-page-up",

        (PageDown, Mode::None) => "core:page-down",
        (PageDown, Mode::Line | Mode::Column) => "core:select-page-down",

        (MoveToTop, Mode::None) => "core:move-to-top",
        (MoveToTop, Mode::Line | Mode::Column) => "core:select-to-top",

        (MoveToBottom, Mode::None) => "core:move-to-bottom",
        (MoveToBottom, Mode::Line | Mode::Column) => "core:select-to-bottom",

        (MoveToPreviousSubwordBoundary, Mode::None) => "editor:move-to-previous-subword-boundary",
        (MoveToPreviousSubwordBoundary, Mode::Line | Mode::Column) => {
            "editor:select-to-previous-subword-boundary"
        },

        (MoveToNextSubwordBoundary, Mode::None) => "editor:move-to-next-subword-boundary",
        (MoveToNextSubwordBoundary, Mode::Line | Mode::Column) => {
            "editor:select-to-next-subword-boundary"
        },

        (MoveToFirstCharacterOfLine, Mode::None) => "editor:move-to-first-character-of-line",
        (MoveToFirstCharacterOfLine, Mode::Line | Mode::Column) => {
            "editor:select-to-first-character-of-line"
        },

        (MoveToEndOfLine, Mode::None) => "editor:move-to-end-of-line",
        (MoveToEndOfLine, Mode::Line | Mode::Column) => "editor:select-to-end-of-line",
    }
}
