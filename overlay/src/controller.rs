//! Mode state machine and mode-aware dispatch.
//!
//! [`ModeController`] owns the single active [`Mode`] and turns logical actions into host
//! commands through the [`DispatchTable`]. Transitions:
//!
//! - `toggle_mode(X)`: `S -> None` if `S == X`, else `S -> X`
//! - `cancel`, `copy`, `cut`: `S -> None`
//! - `move_cursor`, `search`: no change
//!
//! Actions with no focused view are dropped silently. Host failures are logged and
//! never abort a transition.

use crate::{
    action::ActionKey,
    dispatch_table::{commands, DispatchTable},
    host::{Scheduler, StatusBar, TimerId, ViewId, Workspace},
    indicator::TransientIndicator,
    mode::Mode,
};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct ModeController {
    mode: Mode,
    table: DispatchTable,
    indicator: TransientIndicator,
}

impl ModeController {
    pub fn new(table: DispatchTable, indicator: TransientIndicator) -> Self {
        Self {
            mode: Mode::None,
            table,
            indicator,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn indicator(&self) -> &TransientIndicator {
        &self.indicator
    }

    pub fn initialize(&mut self) {
        self.mode = Mode::None;
    }

    /// Reset to [`Mode::None`] and remove any indicator, cancelling its timer.
    pub fn teardown<H: StatusBar + Scheduler>(&mut self, cx: &mut H) {
        self.mode = Mode::None;
        self.indicator.clear(cx);
    }

    /// Toggle `target` on or off.
    ///
    /// The focused editor's selections are consolidated into a single bare cursor before
    /// the mode changes, in either direction. The indicator always shows the result.
    pub fn toggle_mode<H>(&mut self, target: Mode, cx: &mut H)
    where
        H: Workspace + StatusBar + Scheduler,
    {
        if let Some(editor) = cx.active_text_editor() {
            dispatch(cx, editor, commands::CONSOLIDATE_SELECTIONS);
            if let Err(err) = cx.clear_selections(editor) {
                warn!(%err, "failed to clear selections");
            }
        }

        let next = self.mode.toggled(target);
        debug!(from = %self.mode, to = %next, "toggle mode");
        self.mode = next;
        self.indicator.show(next, cx);
    }

    /// Force [`Mode::None`] without touching selections.
    pub fn cancel<H: StatusBar + Scheduler>(&mut self, cx: &mut H) {
        self.reset(cx);
    }

    /// Run `action` as resolved for the current mode on the focused view.
    pub fn move_cursor<H: Workspace>(&mut self, action: ActionKey, cx: &mut H) {
        let command = self.table.command(action, self.mode);
        let Some(view) = cx.active_pane_item() else {
            debug!(%action, "no focused view, dropping");
            return;
        };
        dispatch(cx, view, command);
    }

    /// Copy the selection and leave the current mode.
    pub fn copy<H>(&mut self, cx: &mut H)
    where
        H: Workspace + StatusBar + Scheduler,
    {
        self.act_then_reset(commands::COPY, cx);
    }

    /// Cut the selection and leave the current mode.
    pub fn cut<H>(&mut self, cx: &mut H)
    where
        H: Workspace + StatusBar + Scheduler,
    {
        self.act_then_reset(commands::CUT, cx);
    }

    /// Open the find panel, or step through matches when it is already visible.
    pub fn search<H: Workspace>(&mut self, forward: bool, cx: &mut H) {
        let Some(view) = cx.active_pane_item() else {
            return;
        };

        let command = if !find_panel_visible(cx) {
            commands::FIND_SHOW
        } else if forward {
            commands::FIND_NEXT
        } else {
            commands::FIND_PREVIOUS
        };
        dispatch(cx, view, command);
    }

    pub fn timer_fired<H: StatusBar>(&mut self, timer: TimerId, cx: &mut H) -> bool {
        self.indicator.timer_fired(timer, cx)
    }

    fn act_then_reset<H>(&mut self, command: &str, cx: &mut H)
    where
        H: Workspace + StatusBar + Scheduler,
    {
        if let Some(view) = cx.active_pane_item() {
            dispatch(cx, view, command);
        }
        self.reset(cx);
    }

    fn reset<H: StatusBar + Scheduler>(&mut self, cx: &mut H) {
        if self.mode == Mode::None {
            return;
        }
        debug!(from = %self.mode, "reset mode");
        self.mode = Mode::None;
        self.indicator.show(Mode::None, cx);
    }
}

fn dispatch<H: Workspace + ?Sized>(cx: &mut H, view: ViewId, command: &str) {
    debug!(?view, command, "dispatch");
    if let Err(err) = cx.dispatch(view, command) {
        warn!(%err, command, "host dispatch failed");
    }
}

fn find_panel_visible<H: Workspace + ?Sized>(cx: &H) -> bool {
    cx.panels()
        .iter()
        .any(|panel| panel.visible && panel.tag == commands::FIND_PANEL)
}
