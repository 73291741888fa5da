//! Find-file widget: a filterable list over [`DirectoryNavigator`].
//!
//! The widget is created once and shown or hidden per invocation. Showing it seeds the
//! navigator from the workspace and remembers which element had focus; hiding it hands
//! focus back.

use crate::{
    host::{
        Decoration, DecorationId, ElementId, Focus, IconDecorator, ModalPanels, PanelId, Workspace,
    },
    navigator::{
        initial_directory, DirectoryEntry, DirectoryNavigator, FileSystem, Listing,
        QueryOutcome, RealFileSystem, Selection,
    },
};
use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};
use std::{future::Future, path::Path};
use tracing::{debug, warn};

/// Icon shown at the start of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIcon {
    /// Supplied by the icon provider.
    Decorated(Decoration),
    Directory,
    File,
}

impl RowIcon {
    /// Class list for the built-in glyphs.
    pub fn class_name(&self) -> &str {
        match self {
            RowIcon::Decorated(decoration) => &decoration.class_name,
            RowIcon::Directory => "icon icon-file-directory",
            RowIcon::File => "icon icon-file-text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub icon: RowIcon,
    pub name: String,
    pub selected: bool,
}

pub struct FindFileWidget<F = RealFileSystem> {
    navigator: DirectoryNavigator<F>,
    matcher: Matcher,
    /// Indices into the navigator's items that pass the current query.
    filtered: Vec<usize>,
    selected: usize,
    panel: Option<PanelId>,
    visible: bool,
    previous_focus: Option<ElementId>,
    icons: Option<Box<dyn IconDecorator>>,
    decorations: Vec<DecorationId>,
}

impl Default for FindFileWidget<RealFileSystem> {
    fn default() -> Self {
        Self::new(DirectoryNavigator::default())
    }
}

impl<F: FileSystem> FindFileWidget<F> {
    pub fn new(navigator: DirectoryNavigator<F>) -> Self {
        Self {
            navigator,
            matcher: Matcher::new(Config::DEFAULT),
            filtered: Vec::new(),
            selected: 0,
            panel: None,
            visible: false,
            previous_focus: None,
            icons: None,
            decorations: Vec::new(),
        }
    }

    pub fn navigator(&self) -> &DirectoryNavigator<F> {
        &self.navigator
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Install or remove the icon provider used for rows.
    pub fn set_icon_decorator(&mut self, icons: Option<Box<dyn IconDecorator>>) {
        self.dispose_decorations();
        self.icons = icons;
    }

    pub fn show<H: Workspace + Focus + ModalPanels>(&mut self, cx: &mut H) {
        let panel = *self.panel.get_or_insert_with(|| cx.add_modal_panel());

        let directory = initial_directory(
            &cx.project_paths(),
            cx.active_file_path().as_deref(),
            self.navigator.home(),
        );
        debug!(directory = %directory.display(), "showing find-file");
        self.navigator.open(&directory);
        self.refilter();

        // Showing again while open must not record the panel as the element to restore.
        if !self.visible {
            self.previous_focus = cx.focused_element();
        }
        cx.show_panel(panel);
        cx.focus_panel(panel);
        self.visible = true;
    }

    /// Hide the panel and give focus back to whatever held it before [`Self::show`].
    pub fn hide<H: Focus + ModalPanels>(&mut self, cx: &mut H) {
        if let Some(panel) = self.panel {
            cx.hide_panel(panel);
        }
        if let Some(previous) = self.previous_focus.take() {
            cx.focus(previous);
        }
        self.visible = false;
    }

    pub fn destroy<H: Focus + ModalPanels>(&mut self, cx: &mut H) {
        self.hide(cx);
        self.dispose_decorations();
        self.icons = None;
        if let Some(panel) = self.panel.take() {
            cx.destroy_panel(panel);
        }
    }

    /// Forward a change of the query input. Returns whether the input must be cleared.
    ///
    /// Navigation re-reads the new directory inline. Hosts that want the read off their
    /// UI thread can follow up with [`Self::refresh_task`] and [`Self::apply_listing`].
    pub fn query_changed(&mut self, text: &str) -> QueryOutcome {
        let outcome = self.navigator.on_query_changed(text);
        if outcome == QueryOutcome::Navigated {
            self.dispose_decorations();
        }
        self.refilter();
        outcome
    }

    /// Start re-reading the current directory on a blocking thread.
    pub fn refresh_task(&mut self) -> impl Future<Output = Listing> + Send + 'static {
        self.navigator.refresh_task()
    }

    /// Install a listing from [`Self::refresh_task`]. Stale listings are dropped and
    /// leave the rows untouched.
    pub fn apply_listing(&mut self, listing: Listing) -> bool {
        if !self.navigator.apply(listing) {
            return false;
        }
        self.dispose_decorations();
        self.refilter();
        true
    }

    pub fn select_next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1) % self.filtered.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.filtered.len() - 1);
        }
    }

    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        let index = *self.filtered.get(self.selected)?;
        self.navigator.items().get(index)
    }

    /// Confirm the selected row, or the typed text when no row matches.
    pub fn confirm<H: Workspace + Focus + ModalPanels>(&mut self, cx: &mut H) {
        match self.selected_entry().cloned() {
            Some(entry) => self.confirm_selection(&entry, cx),
            None => self.confirm_empty(cx),
        }
    }

    pub fn confirm_selection<H: Workspace + Focus + ModalPanels>(
        &mut self,
        entry: &DirectoryEntry,
        cx: &mut H,
    ) {
        let selection = self.navigator.select_entry(entry);
        self.finish(selection, cx);
    }

    pub fn confirm_empty<H: Workspace + Focus + ModalPanels>(&mut self, cx: &mut H) {
        let selection = self.navigator.confirm_empty_query(self.navigator.query());
        self.finish(selection, cx);
    }

    /// Visible rows for the current query.
    ///
    /// Decorations handed out by a previous call are disposed first.
    pub fn rows(&mut self) -> Vec<Row> {
        self.dispose_decorations();

        let directory = self.navigator.current_directory().to_path_buf();
        let mut rows = Vec::with_capacity(self.filtered.len());
        for (position, &index) in self.filtered.iter().enumerate() {
            let entry = &self.navigator.items()[index];
            let icon = match decorate(self.icons.as_deref_mut(), &directory.join(&entry.name)) {
                Some(decoration) => {
                    self.decorations.push(decoration.id);
                    RowIcon::Decorated(decoration)
                },
                None if entry.is_dir => RowIcon::Directory,
                None => RowIcon::File,
            };
            rows.push(Row {
                icon,
                name: entry.name.clone(),
                selected: position == self.selected,
            });
        }
        rows
    }

    /// Line under the list: the current directory, or why it could not be read.
    pub fn info_message(&self) -> String {
        match self.navigator.error() {
            Some(err) => err.to_string(),
            None => self.navigator.current_directory().display().to_string(),
        }
    }

    fn finish<H: Workspace + Focus + ModalPanels>(&mut self, selection: Selection, cx: &mut H) {
        match selection {
            Selection::Descended => {
                self.dispose_decorations();
                self.refilter();
            },
            Selection::Open { path, new_window } => self.open(&path, new_window, cx),
        }
    }

    fn open<H: Workspace + Focus + ModalPanels>(
        &mut self,
        path: &Path,
        new_window: bool,
        cx: &mut H,
    ) {
        self.hide(cx);
        debug!(path = %path.display(), new_window, "opening");
        if let Err(err) = cx.open(path, new_window) {
            warn!(%err, "open failed");
        }
    }

    fn refilter(&mut self) {
        let items = self.navigator.items();
        let query = self.navigator.query();

        self.filtered = if query.is_empty() {
            (0..items.len()).collect()
        } else {
            let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
            let mut buf = Vec::new();
            let mut scored: Vec<(usize, u32)> = items
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    let haystack = Utf32Str::new(&entry.name, &mut buf);
                    pattern
                        .score(haystack, &mut self.matcher)
                        .map(|score| (index, score))
                })
                .collect();
            // Best score first; ties keep listing order.
            scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            scored.into_iter().map(|(index, _)| index).collect()
        };
        self.selected = 0;
    }

    fn dispose_decorations(&mut self) {
        let Some(icons) = self.icons.as_deref_mut() else {
            self.decorations.clear();
            return;
        };
        for id in self.decorations.drain(..) {
            icons.dispose(id);
        }
    }
}

fn decorate(
    icons: Option<&mut (dyn IconDecorator + 'static)>,
    path: &Path,
) -> Option<Decoration> {
    match icons?.decorate(path) {
        Ok(decoration) => decoration,
        Err(err) => {
            warn!(%err, path = %path.display(), "icon decoration failed");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        navigator::{PARENT_ENTRY, SELF_ENTRY},
        test::{FakeFileSystem, FakeHost, FakeIcons},
    };
    use std::path::PathBuf;

    fn widget() -> FindFileWidget<FakeFileSystem> {
        let fs = FakeFileSystem::new()
            .with_dir("/proj", &[("src", true), ("Cargo.toml", false), ("README.md", false)])
            .with_dir("/proj/src", &[("lib.rs", false), ("main.rs", false)])
            .with_dir("/home/me", &[]);
        FindFileWidget::new(
            DirectoryNavigator::new(fs).with_home(Some(PathBuf::from("/home/me"))),
        )
    }

    fn host() -> FakeHost {
        FakeHost::new()
            .with_project_paths(vec![PathBuf::from("/proj")])
            .with_focused_element(ElementId(7))
    }

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn show_seeds_from_project_root_and_focuses_panel() {
        let mut cx = host();
        let mut w = widget();

        w.show(&mut cx);

        assert!(w.is_visible());
        assert_eq!(w.navigator().current_directory(), Path::new("/proj"));
        assert_eq!(
            names(&w.rows()),
            vec![".", "..", "src", "Cargo.toml", "README.md"]
        );
        assert_eq!(cx.visible_panels().len(), 1);
        assert_eq!(w.info_message(), "/proj");
    }

    #[test]
    fn panel_is_created_once() {
        let mut cx = host();
        let mut w = widget();

        w.show(&mut cx);
        w.hide(&mut cx);
        w.show(&mut cx);

        assert_eq!(cx.panels_created(), 1);
    }

    #[test]
    fn hide_restores_previous_focus() {
        let mut cx = host();
        let mut w = widget();

        w.show(&mut cx);
        cx.set_focused_element(Some(ElementId(99)));
        w.hide(&mut cx);

        assert_eq!(cx.focused_element(), Some(ElementId(7)));
        assert!(cx.visible_panels().is_empty());
        assert!(!w.is_visible());
    }

    #[test]
    fn repeated_show_keeps_original_focus() {
        let mut cx = host();
        let mut w = widget();

        w.show(&mut cx);
        w.show(&mut cx);
        w.hide(&mut cx);

        assert_eq!(cx.focused_element(), Some(ElementId(7)));
        assert_eq!(cx.panels_created(), 1);
    }

    #[test]
    fn background_refresh_updates_rows() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "").unwrap();
        let mut cx = FakeHost::new().with_project_paths(vec![tmp.path().to_path_buf()]);
        let mut w = FindFileWidget::new(DirectoryNavigator::new(RealFileSystem).with_home(None));
        w.show(&mut cx);
        assert_eq!(names(&w.rows()), vec![".", "..", "a.txt"]);

        std::fs::write(tmp.path().join("b.txt"), "").unwrap();
        let listing = smol::block_on(w.refresh_task());

        assert!(w.apply_listing(listing));
        assert_eq!(names(&w.rows()), vec![".", "..", "a.txt", "b.txt"]);
    }

    #[test]
    fn stale_background_refresh_is_ignored() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);

        let slow = smol::block_on(w.refresh_task());
        w.query_changed("src/");

        assert!(!w.apply_listing(slow));
        assert_eq!(names(&w.rows()), vec![".", "..", "lib.rs", "main.rs"]);
    }

    #[test]
    fn falls_back_to_active_file_directory() {
        let mut cx = FakeHost::new()
            .with_editor()
            .with_active_file(PathBuf::from("/proj/src/lib.rs"));
        let mut w = widget();

        w.show(&mut cx);

        assert_eq!(w.navigator().current_directory(), Path::new("/proj/src"));
    }

    #[test]
    fn query_filters_rows() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);

        assert_eq!(w.query_changed("read"), QueryOutcome::Filter);

        assert_eq!(names(&w.rows()), vec!["README.md"]);
    }

    #[test]
    fn typing_directory_descends_and_resets_filter() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);

        assert_eq!(w.query_changed("src/"), QueryOutcome::Navigated);

        assert_eq!(names(&w.rows()), vec![".", "..", "lib.rs", "main.rs"]);
        assert_eq!(w.info_message(), "/proj/src");
    }

    #[test]
    fn confirming_file_opens_and_hides() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);
        w.query_changed("cargo");

        w.confirm(&mut cx);

        assert_eq!(cx.opened(), vec![(PathBuf::from("/proj/Cargo.toml"), false)]);
        assert!(!w.is_visible());
        assert_eq!(cx.focused_element(), Some(ElementId(7)));
    }

    #[test]
    fn confirming_self_opens_new_window() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);

        w.confirm_selection(&DirectoryEntry::dir(SELF_ENTRY), &mut cx);

        assert_eq!(cx.opened(), vec![(PathBuf::from("/proj"), true)]);
        assert!(!w.is_visible());
    }

    #[test]
    fn confirming_directory_keeps_widget_open() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);
        w.select_next();
        w.select_next();
        assert_eq!(w.selected_entry(), Some(&DirectoryEntry::dir("src")));

        w.confirm(&mut cx);

        assert!(w.is_visible());
        assert!(cx.opened().is_empty());
        assert_eq!(w.navigator().current_directory(), Path::new("/proj/src"));

        w.confirm_selection(&DirectoryEntry::dir(PARENT_ENTRY), &mut cx);
        assert_eq!(w.navigator().current_directory(), Path::new("/proj"));
    }

    #[test]
    fn no_match_confirms_typed_text() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);
        w.query_changed("notes.txt");
        assert!(w.rows().is_empty());

        w.confirm(&mut cx);

        assert_eq!(cx.opened(), vec![(PathBuf::from("/proj/notes.txt"), false)]);
    }

    #[test]
    fn selection_wraps() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);

        w.select_prev();
        assert_eq!(w.selected_entry(), Some(&DirectoryEntry::file("README.md")));
        w.select_next();
        assert_eq!(w.selected_entry(), Some(&DirectoryEntry::dir(SELF_ENTRY)));
    }

    #[test]
    fn unreadable_directory_shows_error_line() {
        let mut cx = host();
        let mut w = widget();
        w.show(&mut cx);

        w.query_changed("missing/");

        assert!(w.rows().is_empty());
        assert!(w.info_message().contains("/proj/missing"));
    }

    #[test]
    fn icon_provider_decorates_rows_and_is_disposed() {
        let mut cx = host();
        let icons = FakeIcons::default();
        let mut w = widget();
        w.set_icon_decorator(Some(Box::new(icons.clone())));
        w.show(&mut cx);

        let rows = w.rows();
        assert!(rows
            .iter()
            .all(|row| matches!(row.icon, RowIcon::Decorated(_))));
        assert_eq!(icons.live(), rows.len());

        w.query_changed("src/");
        assert_eq!(icons.live(), 0);

        w.rows();
        w.destroy(&mut cx);
        assert_eq!(icons.live(), 0);
    }

    #[test]
    fn failing_icon_provider_falls_back_to_glyphs() {
        let mut cx = host();
        let mut w = widget();
        w.set_icon_decorator(Some(Box::new(FakeIcons::failing())));
        w.show(&mut cx);

        let rows = w.rows();
        assert_eq!(rows[0].icon, RowIcon::Directory);
        assert_eq!(rows.last().map(|r| &r.icon), Some(&RowIcon::File));
    }

    #[test]
    fn failed_open_still_hides() {
        let mut cx = host().failing_open();
        let mut w = widget();
        w.show(&mut cx);

        w.confirm_empty(&mut cx);

        assert!(!w.is_visible());
        assert!(cx.opened().is_empty());
    }
}
