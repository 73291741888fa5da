//! Emacs-style editing overlay for a host text editor.
//!
//! The overlay keeps a small selection-mode state machine ([`Mode`]) and translates
//! logical cursor actions into host commands through a [`DispatchTable`], so one key
//! moves the cursor in [`Mode::None`] and extends a selection in [`Mode::Line`] or
//! [`Mode::Column`]. It also ships a keymap, a transient status indicator and a
//! find-file widget that walks directories as you type.
//!
//! Everything host-specific goes through the traits in [`host`]. A host builds one
//! [`Overlay`], calls [`Overlay::activate`] once, forwards invoked command names to
//! [`Overlay::handle`] and elapsed timers to [`Overlay::timer_fired`].

pub mod action;
pub mod command;
pub mod config;
pub mod controller;
pub mod dispatch_table;
pub mod find_file;
pub mod host;
pub mod indicator;
pub mod keymap;
pub mod mode;
pub mod navigator;
pub mod paths;

pub use action::ActionKey;
pub use command::OverlayCommand;
pub use config::Config;
pub use controller::ModeController;
pub use dispatch_table::DispatchTable;
pub use find_file::FindFileWidget;
pub use host::Host;
pub use indicator::TransientIndicator;
pub use mode::Mode;
pub use navigator::{DirectoryNavigator, FileSystem, RealFileSystem};

use crate::{host::TimerId, keymap::Chord, keymap::KeymapTable};
use tracing::{debug, info};

/// Selector every overlay command is registered under.
pub const COMMAND_SELECTOR: &str = "atom-workspace";

/// Composition root tying the mode controller, keymap and find-file widget to a host.
pub struct Overlay<F = RealFileSystem> {
    controller: ModeController,
    find_file: FindFileWidget<F>,
    keymap: KeymapTable,
    unset_prefixes: Vec<Chord>,
    active: bool,
}

impl Overlay<RealFileSystem> {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_navigator(config, DirectoryNavigator::default())
    }
}

impl<F: FileSystem> Overlay<F> {
    /// Build from `config`, listing directories through `navigator`.
    pub fn with_navigator(
        config: &Config,
        navigator: DirectoryNavigator<F>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            controller: ModeController::new(config.dispatch_table()?, config.indicator()),
            find_file: FindFileWidget::new(navigator),
            keymap: config.keymap()?,
            unset_prefixes: config.unset_prefixes()?,
            active: false,
        })
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    pub fn find_file(&self) -> &FindFileWidget<F> {
        &self.find_file
    }

    /// The widget, for forwarding query edits and list navigation from the host UI.
    pub fn find_file_mut(&mut self) -> &mut FindFileWidget<F> {
        &mut self.find_file
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Register commands, install key bindings and start in [`Mode::None`].
    pub fn activate<H: Host>(&mut self, cx: &mut H) {
        if self.active {
            return;
        }
        for command in OverlayCommand::all() {
            cx.add_command(COMMAND_SELECTOR, &command.name());
        }
        keymap::install(cx, &self.keymap, &self.unset_prefixes);
        self.controller.initialize();
        self.active = true;
        info!("emacs overlay activated");
    }

    /// Undo everything [`Self::activate`] did and drop the widget's host resources.
    pub fn deactivate<H: Host>(&mut self, cx: &mut H) {
        if !self.active {
            return;
        }
        self.controller.teardown(cx);
        self.find_file.destroy(cx);
        keymap::uninstall(cx);
        for command in OverlayCommand::all() {
            cx.remove_command(COMMAND_SELECTOR, &command.name());
        }
        self.active = false;
        info!("emacs overlay deactivated");
    }

    /// Route an invoked host command. Returns `false` for names the overlay does not own
    /// or while it is inactive.
    pub fn handle<H: Host>(&mut self, name: &str, cx: &mut H) -> bool {
        if !self.active {
            return false;
        }
        let Some(command) = OverlayCommand::from_name(name) else {
            return false;
        };
        self.run(command, cx);
        true
    }

    pub fn run<H: Host>(&mut self, command: OverlayCommand, cx: &mut H) {
        debug!(%command, mode = %self.controller.mode(), "run");
        match command {
            OverlayCommand::Move(action) => self.controller.move_cursor(action, cx),
            OverlayCommand::ToggleModeLine => self.controller.toggle_mode(Mode::Line, cx),
            OverlayCommand::ToggleModeColumn => self.controller.toggle_mode(Mode::Column, cx),
            OverlayCommand::ClearMode => self.controller.toggle_mode(Mode::None, cx),
            OverlayCommand::Cancel => {
                if self.find_file.is_visible() {
                    self.find_file.hide(cx);
                }
                self.controller.cancel(cx);
            },
            OverlayCommand::FindFile => self.find_file.show(cx),
            OverlayCommand::Copy => self.controller.copy(cx),
            OverlayCommand::Cut => self.controller.cut(cx),
            OverlayCommand::SearchForward => self.controller.search(true, cx),
            OverlayCommand::SearchBackward => self.controller.search(false, cx),
        }
    }

    /// Forward an elapsed host timer. Returns `false` if the overlay does not own it.
    pub fn timer_fired<H: Host>(&mut self, timer: TimerId, cx: &mut H) -> bool {
        self.controller.timer_fired(timer, cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dispatch_table::commands,
        keymap::{SOURCE, UNSET_SOURCE},
        test::{FakeFileSystem, FakeHost},
    };
    use std::path::PathBuf;

    fn overlay() -> Overlay<FakeFileSystem> {
        let fs = FakeFileSystem::new().with_dir("/proj", &[("main.rs", false)]);
        Overlay::with_navigator(
            &Config::default(),
            DirectoryNavigator::new(fs).with_home(None),
        )
        .unwrap()
    }

    #[test]
    fn inactive_overlay_ignores_commands() {
        let mut cx = FakeHost::new().with_editor();
        let mut overlay = overlay();

        assert!(!overlay.handle("emacs-overlay:toggle-mode-line", &mut cx));
        assert_eq!(overlay.mode(), Mode::None);
    }

    #[test]
    fn activate_registers_every_command() {
        let mut cx = FakeHost::new();
        let mut overlay = overlay();

        overlay.activate(&mut cx);

        let registered = cx.registered_commands();
        for command in OverlayCommand::all() {
            assert!(registered.contains(&(COMMAND_SELECTOR.to_string(), command.name())));
        }
        assert!(!cx.bindings_from(SOURCE).is_empty());
    }

    #[test]
    fn activating_twice_registers_once() {
        let mut cx = FakeHost::new();
        let mut overlay = overlay();

        overlay.activate(&mut cx);
        overlay.activate(&mut cx);

        assert_eq!(
            cx.registered_commands().len(),
            OverlayCommand::all().count()
        );
    }

    #[test]
    fn foreign_names_are_not_handled() {
        let mut cx = FakeHost::new().with_editor();
        let mut overlay = overlay();
        overlay.activate(&mut cx);

        assert!(!overlay.handle("core:move-up", &mut cx));
        assert!(cx.dispatched_commands().is_empty());
    }

    #[test]
    fn clear_mode_consolidates_but_cancel_does_not() {
        let mut cx = FakeHost::new().with_editor();
        let mut overlay = overlay();
        overlay.activate(&mut cx);

        overlay.handle("emacs-overlay:clear-mode", &mut cx);
        assert_eq!(
            cx.dispatched_commands(),
            vec![commands::CONSOLIDATE_SELECTIONS]
        );
        assert_eq!(overlay.controller().indicator().visible_text(), Some("emacs mode: none"));

        let mut cx = FakeHost::new().with_editor();
        overlay.handle("core:cancel", &mut cx);
        assert!(cx.dispatched_commands().is_empty());
        assert_eq!(cx.selection_clears(), 0);
    }

    #[test]
    fn cancel_hides_find_file() {
        let mut cx = FakeHost::new().with_project_paths(vec![PathBuf::from("/proj")]);
        let mut overlay = overlay();
        overlay.activate(&mut cx);

        overlay.handle("emacs-overlay:find-file", &mut cx);
        assert!(overlay.find_file().is_visible());

        overlay.handle("core:cancel", &mut cx);
        assert!(!overlay.find_file().is_visible());
    }

    #[test]
    fn timer_reaches_indicator() {
        let mut cx = FakeHost::new().with_editor();
        let mut overlay = overlay();
        overlay.activate(&mut cx);
        overlay.handle("emacs-overlay:toggle-mode-column", &mut cx);

        let (timer, _) = cx.pending_timers()[0];
        assert!(overlay.timer_fired(timer, &mut cx));
        assert!(cx.status_tiles().is_empty());
        assert!(!overlay.timer_fired(timer, &mut cx));
    }

    #[test]
    fn deactivate_removes_everything() {
        let mut cx = FakeHost::new()
            .with_editor()
            .with_project_paths(vec![PathBuf::from("/proj")]);
        let mut overlay = overlay();
        overlay.activate(&mut cx);
        overlay.handle("emacs-overlay:toggle-mode-line", &mut cx);
        overlay.handle("emacs-overlay:find-file", &mut cx);

        overlay.deactivate(&mut cx);

        assert_eq!(overlay.mode(), Mode::None);
        assert!(cx.registered_commands().is_empty());
        assert!(cx.bindings_from(SOURCE).is_empty());
        assert!(cx.bindings_from(UNSET_SOURCE).is_empty());
        assert!(cx.pending_timers().is_empty());
        assert!(cx.status_tiles().is_empty());
        assert_eq!(cx.live_panels(), 0);
        assert!(!overlay.handle("emacs-overlay:toggle-mode-line", &mut cx));
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = Config {
            unset_prefixes: vec!["ctrl-".to_string()],
            ..Config::default()
        };
        assert!(Overlay::new(&config).is_err());
    }
}
