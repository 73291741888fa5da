//! Logical movement actions.
//!
//! An [`ActionKey`] names what the user asked for ("move up") independent of the active
//! [`crate::Mode`]. The [`crate::DispatchTable`] resolves it to a concrete host command.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKey {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    MoveToTop,
    MoveToBottom,
    MoveToPreviousSubwordBoundary,
    MoveToNextSubwordBoundary,
    MoveToFirstCharacterOfLine,
    MoveToEndOfLine,
}

impl ActionKey {
    pub const COUNT: usize = 12;

    pub const ALL: [ActionKey; Self::COUNT] = [
        ActionKey::MoveUp,
        ActionKey::MoveDown,
        ActionKey::MoveLeft,
        ActionKey::MoveRight,
        ActionKey::PageUp,
        ActionKey::PageDown,
        ActionKey::MoveToTop,
        ActionKey::MoveToBottom,
        ActionKey::MoveToPreviousSubwordBoundary,
        ActionKey::MoveToNextSubwordBoundary,
        ActionKey::MoveToFirstCharacterOfLine,
        ActionKey::MoveToEndOfLine,
    ];

    /// Kebab-case name, also used as the suffix of the registered host command.
    pub fn name(self) -> &'static str {
        match self {
            ActionKey::MoveUp => "move-up",
            ActionKey::MoveDown => "move-down",
            ActionKey::MoveLeft => "move-left",
            ActionKey::MoveRight => "move-right",
            ActionKey::PageUp => "page-up",
            ActionKey::PageDown => "page-down",
            ActionKey::MoveToTop => "move-to-top",
            ActionKey::MoveToBottom => "move-to-bottom",
            ActionKey::MoveToPreviousSubwordBoundary => "move-to-previous-subword-boundary",
            ActionKey::MoveToNextSubwordBoundary => "move-to-next-subword-boundary",
            ActionKey::MoveToFirstCharacterOfLine => "move-to-first-character-of-line",
            ActionKey::MoveToEndOfLine => "move-to-end-of-line",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = ActionKey::ALL.iter().map(|a| a.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ActionKey::ALL.len());
    }

    #[test]
    fn parses_known_names() {
        assert_eq!(ActionKey::from_name("page-down"), Some(ActionKey::PageDown));
        assert_eq!(
            ActionKey::from_name("move-to-end-of-line"),
            Some(ActionKey::MoveToEndOfLine)
        );
        assert_eq!(ActionKey::from_name("move-sideways"), None);
    }
}
