//! Boundary to the host editor.
//!
//! The overlay never edits text itself. Everything it does ends in one of these calls:
//! dispatching a named command to a view, showing a status tile, scheduling a timer,
//! opening a path, or registering commands and key bindings. Hosts implement the traits
//! on whatever context object they pass into [`crate::Overlay`]'s handlers.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

macro_rules! host_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub u64);
        )*
    };
}

host_id!(
    /// A dispatch target: an editor or any other pane item.
    ViewId,
    /// A focusable UI element.
    ElementId,
    /// A tile added to the status bar.
    TileId,
    /// A pending one-shot timer.
    TimerId,
    /// A modal panel.
    PanelId,
    /// An icon decoration that must be disposed.
    DecorationId,
);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("command `{command}` failed: {reason}")]
    DispatchFailed { command: String, reason: String },
    #[error("view {0:?} is gone")]
    ViewGone(ViewId),
    #[error("cannot open {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },
    #[error("icon decoration failed: {0}")]
    Decoration(String),
}

/// Summary of an auxiliary panel as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelInfo {
    /// Host-specific tag, e.g. `find-and-replace`.
    pub tag: String,
    pub visible: bool,
}

/// Views, dispatch and file opening.
pub trait Workspace {
    /// The focused text editor, if any.
    fn active_text_editor(&self) -> Option<ViewId>;

    /// The item in the active pane, which need not be a text editor.
    fn active_pane_item(&self) -> Option<ViewId>;

    /// Send `command` to `target` synchronously.
    fn dispatch(&mut self, target: ViewId, command: &str) -> Result<(), HostError>;

    /// Drop every selection in `editor`, leaving bare cursors.
    fn clear_selections(&mut self, editor: ViewId) -> Result<(), HostError>;

    /// Auxiliary panels currently attached to the workspace.
    fn panels(&self) -> Vec<PanelInfo>;

    fn project_paths(&self) -> Vec<PathBuf>;

    /// Path of the file in the focused editor, if it has one.
    fn active_file_path(&self) -> Option<PathBuf>;

    fn open(&mut self, path: &Path, new_window: bool) -> Result<(), HostError>;
}

/// Keyboard focus.
pub trait Focus {
    fn focused_element(&self) -> Option<ElementId>;
    fn focus(&mut self, element: ElementId);
}

/// Modal panels that host the find-file list.
pub trait ModalPanels {
    fn add_modal_panel(&mut self) -> PanelId;
    fn show_panel(&mut self, panel: PanelId);
    fn hide_panel(&mut self, panel: PanelId);
    /// Move keyboard focus into the panel's query input.
    fn focus_panel(&mut self, panel: PanelId);
    fn destroy_panel(&mut self, panel: PanelId);
}

/// Transient status bar tiles.
pub trait StatusBar {
    /// Add a left-aligned tile showing `text`. Returns `None` when no status bar is
    /// available.
    fn add_status_tile(&mut self, text: &str) -> Option<TileId>;
    fn destroy_status_tile(&mut self, tile: TileId);
}

/// One-shot timers. The host calls [`crate::Overlay::timer_fired`] when one elapses.
pub trait Scheduler {
    fn set_timeout(&mut self, after: Duration) -> TimerId;
    fn clear_timeout(&mut self, timer: TimerId);
}

/// Named command registration.
pub trait CommandRegistry {
    fn add_command(&mut self, selector: &str, name: &str);
    fn remove_command(&mut self, selector: &str, name: &str);
}

/// A binding already present in the host keymap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBinding {
    pub source: String,
    pub selector: String,
    pub keystrokes: String,
    pub command: String,
}

/// Context-scoped key bindings.
pub trait Keymaps {
    fn key_bindings(&self) -> Vec<HostBinding>;

    /// Add `bindings` (keystrokes, command) for `selector` under `source`. Higher
    /// `priority` wins over host defaults with the same specificity.
    fn add_bindings(
        &mut self,
        source: &str,
        selector: &str,
        bindings: &[(String, String)],
        priority: i32,
    );

    fn remove_bindings(&mut self, source: &str);
}

/// A type-specific icon supplied by an icon provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub id: DecorationId,
    /// CSS-like class list the renderer applies to the icon element.
    pub class_name: String,
}

/// Optional icon provider for find-file rows.
pub trait IconDecorator {
    fn decorate(&mut self, path: &Path) -> Result<Option<Decoration>, HostError>;
    fn dispose(&mut self, decoration: DecorationId);
}

/// Everything the overlay needs from its host, in one bound.
pub trait Host:
    Workspace + Focus + ModalPanels + StatusBar + Scheduler + CommandRegistry + Keymaps
{
}

impl<T> Host for T where
    T: Workspace + Focus + ModalPanels + StatusBar + Scheduler + CommandRegistry + Keymaps
{
}
