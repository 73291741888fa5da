//! Default Emacs-style bindings.

use super::{Chord, KeymapTable, Keystroke};
use crate::{action::ActionKey, command::OverlayCommand};

const BODY: &str = "body";
const EDITOR: &str = "atom-text-editor";
const PANEL: &str = "atom-panel";
const WORKSPACE: &str = "atom-workspace";

fn ctrl(key: &str) -> Keystroke {
    Keystroke::new(key).ctrl()
}

fn alt(key: &str) -> Keystroke {
    Keystroke::new(key).alt()
}

fn ctrl_x(next: Keystroke) -> Chord {
    Chord::from(ctrl("x")).then(next)
}

fn movement(action: ActionKey) -> String {
    OverlayCommand::Move(action).name()
}

/// Creates the default keymap with Emacs movement, search, kill/yank and file bindings.
pub fn default_keymap() -> KeymapTable {
    let mut table = KeymapTable::default();

    // Changing the location of point
    table.bind(BODY, ctrl("p"), movement(ActionKey::MoveUp));
    table.bind(BODY, ctrl("n"), movement(ActionKey::MoveDown));
    table.bind(BODY, ctrl("b"), movement(ActionKey::MoveLeft));
    table.bind(BODY, ctrl("f"), movement(ActionKey::MoveRight));
    table.bind(BODY, alt("v"), movement(ActionKey::PageUp));
    table.bind(BODY, ctrl("v"), movement(ActionKey::PageDown));
    table.bind(BODY, alt("<"), movement(ActionKey::MoveToTop));
    table.bind(BODY, alt(">"), movement(ActionKey::MoveToBottom));

    table.bind(EDITOR, alt("b"), movement(ActionKey::MoveToPreviousSubwordBoundary));
    table.bind(EDITOR, alt("f"), movement(ActionKey::MoveToNextSubwordBoundary));
    table.bind(EDITOR, ctrl("a"), movement(ActionKey::MoveToFirstCharacterOfLine));
    table.bind(EDITOR, ctrl("e"), movement(ActionKey::MoveToEndOfLine));
    table.bind(
        EDITOR,
        Chord::from(alt("g")).then(Keystroke::new("g")),
        "go-to-line:toggle",
    );
    table.bind(EDITOR, ctrl("space"), OverlayCommand::ToggleModeLine.name());
    table.bind(EDITOR, ctrl("enter"), OverlayCommand::ToggleModeColumn.name());
    table.bind(EDITOR, ctrl("g"), OverlayCommand::ClearMode.name());

    // Searching; the panel group keeps stepping once focus is in the find panel
    for selector in [EDITOR, PANEL] {
        table.bind(selector, ctrl("s"), OverlayCommand::SearchForward.name());
        table.bind(selector, ctrl("r"), OverlayCommand::SearchBackward.name());
    }

    // Killing and yanking text
    table.bind(EDITOR, ctrl("d"), "core:delete");
    table.bind(EDITOR, ctrl("w"), OverlayCommand::Cut.name());
    table.bind(EDITOR, ctrl("k"), "editor:cut-to-end-of-line");
    table.bind(EDITOR, alt("w"), OverlayCommand::Copy.name());
    table.bind(EDITOR, ctrl("y"), "core:paste");

    // Files
    table.bind(WORKSPACE, ctrl_x(ctrl("f")), OverlayCommand::FindFile.name());
    table.bind(WORKSPACE, ctrl_x(ctrl("s")), "core:save");

    // Running commands by name
    table.bind(WORKSPACE, alt("x"), "command-palette:toggle");

    // Buffers and windows
    table.bind(WORKSPACE, ctrl_x(Keystroke::new("k")), "core:close");
    table.bind(
        WORKSPACE,
        ctrl_x(Keystroke::new("b")),
        "pane:show-next-recently-used-item",
    );
    table.bind(WORKSPACE, ctrl_x(ctrl("c")), "core:quit");

    // Undo and comments
    table.bind(EDITOR, ctrl("/"), "core:undo");
    table.bind(EDITOR, ctrl_x(ctrl(";")), "editor:toggle-line-comments");

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(s: &str) -> Chord {
        s.parse().unwrap()
    }

    #[test]
    fn movement_is_bound_on_body() {
        let table = default_keymap();
        assert_eq!(
            table.lookup(BODY, &chord("ctrl-p")),
            Some("emacs-overlay:move-up")
        );
        assert_eq!(
            table.lookup(BODY, &chord("alt->")),
            Some("emacs-overlay:move-to-bottom")
        );
    }

    #[test]
    fn mode_toggles_are_bound_in_editor() {
        let table = default_keymap();
        assert_eq!(
            table.lookup(EDITOR, &chord("ctrl-space")),
            Some("emacs-overlay:toggle-mode-line")
        );
        assert_eq!(
            table.lookup(EDITOR, &chord("ctrl-enter")),
            Some("emacs-overlay:toggle-mode-column")
        );
    }

    #[test]
    fn find_file_is_a_two_stroke_chord() {
        let table = default_keymap();
        assert_eq!(
            table.lookup(WORKSPACE, &chord("ctrl-x ctrl-f")),
            Some("emacs-overlay:find-file")
        );
        assert_eq!(table.lookup(WORKSPACE, &chord("ctrl-f")), None);
    }

    #[test]
    fn search_follows_focus_into_panel() {
        let table = default_keymap();
        for selector in [EDITOR, PANEL] {
            assert_eq!(
                table.lookup(selector, &chord("ctrl-s")),
                Some("emacs-overlay:search-forward")
            );
        }
    }

    #[test]
    fn every_movement_action_has_a_key() {
        let table = default_keymap();
        let bound: Vec<_> = table
            .groups()
            .iter()
            .flat_map(|g| g.bindings.iter().map(|b| b.command.clone()))
            .collect();
        for action in ActionKey::ALL {
            assert!(bound.contains(&movement(action)), "{action} is unbound");
        }
    }
}
