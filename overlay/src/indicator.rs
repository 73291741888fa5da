//! Short-lived "emacs mode: line" status tile.

use crate::{
    host::{Scheduler, StatusBar, TileId, TimerId},
    mode::Mode,
};
use std::time::Duration;
use tracing::trace;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);
pub const DEFAULT_PREFIX: &str = "emacs mode";

/// Shows the active mode in the status bar for a fixed duration.
///
/// At most one tile exists at a time. Showing a new one destroys the previous tile and
/// cancels its pending auto-hide before starting a fresh timer.
#[derive(Debug)]
pub struct TransientIndicator {
    prefix: String,
    duration: Duration,
    tile: Option<TileId>,
    timer: Option<TimerId>,
    text: Option<String>,
}

impl Default for TransientIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_DURATION)
    }
}

impl TransientIndicator {
    pub fn new(prefix: impl Into<String>, duration: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            duration,
            tile: None,
            timer: None,
            text: None,
        }
    }

    pub fn show<H: StatusBar + Scheduler>(&mut self, mode: Mode, cx: &mut H) {
        self.clear(cx);

        let text = format!("{}: {}", self.prefix, mode);
        let Some(tile) = cx.add_status_tile(&text) else {
            trace!("no status bar, skipping mode indicator");
            return;
        };

        self.tile = Some(tile);
        self.timer = Some(cx.set_timeout(self.duration));
        self.text = Some(text);
    }

    /// Handle an elapsed timer. Returns `false` for timers this indicator does not own,
    /// including ones it already cancelled.
    pub fn timer_fired<H: StatusBar>(&mut self, timer: TimerId, cx: &mut H) -> bool {
        if self.timer != Some(timer) {
            return false;
        }
        self.timer = None;
        self.remove_tile(cx);
        true
    }

    /// Cancel the pending timer and remove the visible tile, if any.
    pub fn clear<H: StatusBar + Scheduler>(&mut self, cx: &mut H) {
        if let Some(timer) = self.timer.take() {
            cx.clear_timeout(timer);
        }
        self.remove_tile(cx);
    }

    /// Text of the tile currently on screen.
    pub fn visible_text(&self) -> Option<&str> {
        self.tile.and(self.text.as_deref())
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    fn remove_tile<H: StatusBar>(&mut self, cx: &mut H) {
        if let Some(tile) = self.tile.take() {
            cx.destroy_status_tile(tile);
        }
        self.text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::FakeHost;

    #[test]
    fn shows_mode_name_and_starts_timer() {
        let mut cx = FakeHost::new();
        let mut indicator = TransientIndicator::default();

        indicator.show(Mode::Line, &mut cx);

        assert_eq!(indicator.visible_text(), Some("emacs mode: line"));
        assert_eq!(cx.status_tiles(), vec!["emacs mode: line".to_string()]);
        assert_eq!(cx.pending_timers().len(), 1);
        assert_eq!(cx.pending_timers()[0].1, DEFAULT_DURATION);
    }

    #[test]
    fn new_indicator_replaces_pending_one() {
        let mut cx = FakeHost::new();
        let mut indicator = TransientIndicator::default();

        indicator.show(Mode::Line, &mut cx);
        let first_timer = cx.pending_timers()[0].0;
        indicator.show(Mode::Column, &mut cx);

        assert_eq!(cx.status_tiles(), vec!["emacs mode: column".to_string()]);
        assert_eq!(cx.pending_timers().len(), 1);
        assert!(!indicator.timer_fired(first_timer, &mut cx));
        assert_eq!(indicator.visible_text(), Some("emacs mode: column"));
    }

    #[test]
    fn timer_hides_tile() {
        let mut cx = FakeHost::new();
        let mut indicator = TransientIndicator::default();

        indicator.show(Mode::None, &mut cx);
        let timer = cx.pending_timers()[0].0;

        assert!(indicator.timer_fired(timer, &mut cx));
        assert!(cx.status_tiles().is_empty());
        assert_eq!(indicator.visible_text(), None);
        assert!(!indicator.is_pending());
    }

    #[test]
    fn clear_cancels_timer_and_tile() {
        let mut cx = FakeHost::new();
        let mut indicator = TransientIndicator::default();

        indicator.show(Mode::Line, &mut cx);
        indicator.clear(&mut cx);

        assert!(cx.status_tiles().is_empty());
        assert!(cx.pending_timers().is_empty());
    }

    #[test]
    fn without_status_bar_nothing_is_scheduled() {
        let mut cx = FakeHost::new().without_status_bar();
        let mut indicator = TransientIndicator::default();

        indicator.show(Mode::Line, &mut cx);

        assert_eq!(indicator.visible_text(), None);
        assert!(cx.pending_timers().is_empty());
    }
}
