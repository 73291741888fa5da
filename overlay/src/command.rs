//! Named commands the overlay registers with the host.

use crate::action::ActionKey;
use std::fmt;

/// Prefix shared by every command the overlay registers.
pub const NAMESPACE: &str = "emacs-overlay";

/// Host-level cancel gesture (escape). The overlay listens for it to leave the mode.
pub const HOST_CANCEL: &str = "core:cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayCommand {
    Move(ActionKey),
    ToggleModeLine,
    ToggleModeColumn,
    ClearMode,
    Cancel,
    FindFile,
    Copy,
    Cut,
    SearchForward,
    SearchBackward,
}

impl OverlayCommand {
    const FIXED: [OverlayCommand; 9] = [
        OverlayCommand::ToggleModeLine,
        OverlayCommand::ToggleModeColumn,
        OverlayCommand::ClearMode,
        OverlayCommand::Cancel,
        OverlayCommand::FindFile,
        OverlayCommand::Copy,
        OverlayCommand::Cut,
        OverlayCommand::SearchForward,
        OverlayCommand::SearchBackward,
    ];

    /// Every command, movement first.
    pub fn all() -> impl Iterator<Item = OverlayCommand> {
        ActionKey::ALL
            .into_iter()
            .map(OverlayCommand::Move)
            .chain(Self::FIXED)
    }

    /// Full host name, e.g. `emacs-overlay:move-up`.
    pub fn name(self) -> String {
        match self {
            OverlayCommand::Cancel => HOST_CANCEL.to_string(),
            other => format!("{NAMESPACE}:{}", other.suffix()),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        if name == HOST_CANCEL {
            return Some(OverlayCommand::Cancel);
        }
        let suffix = name.strip_prefix(NAMESPACE)?.strip_prefix(':')?;
        if let Some(action) = ActionKey::from_name(suffix) {
            return Some(OverlayCommand::Move(action));
        }
        Self::FIXED
            .into_iter()
            .find(|command| *command != OverlayCommand::Cancel && command.suffix() == suffix)
    }

    fn suffix(self) -> &'static str {
        match self {
            OverlayCommand::Move(action) => action.name(),
            OverlayCommand::ToggleModeLine => "toggle-mode-line",
            OverlayCommand::ToggleModeColumn => "toggle-mode-column",
            OverlayCommand::ClearMode => "clear-mode",
            OverlayCommand::Cancel => "cancel",
            OverlayCommand::FindFile => "find-file",
            OverlayCommand::Copy => "copy",
            OverlayCommand::Cut => "cut",
            OverlayCommand::SearchForward => "search-forward",
            OverlayCommand::SearchBackward => "search-backward",
        }
    }
}

impl fmt::Display for OverlayCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
