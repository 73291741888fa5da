use std::fmt;

/// Selection mode controlling whether movement also extends the selection.
///
/// Exactly one mode is active at a time. [`Mode::Line`] turns movement into
/// selection extension, [`Mode::Column`] additionally grows vertical movement into
/// extra cursors above or below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    None,
    Line,
    Column,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::None, Mode::Line, Mode::Column];

    pub fn name(self) -> &'static str {
        match self {
            Mode::None => "none",
            Mode::Line => "line",
            Mode::Column => "column",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }

    /// Mode after toggling `target` from `self`.
    ///
    /// Toggling the active mode turns it off; toggling any other mode switches to it.
    pub fn toggled(self, target: Mode) -> Mode {
        if self == target {
            Mode::None
        } else {
            target
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
