//! Incremental directory navigation behind the find-file widget.
//!
//! [`DirectoryNavigator`] tracks one current directory and a sorted snapshot of its
//! entries. Typed query text either filters that snapshot or, when it ends in a path
//! separator (or is exactly `~`), moves to another directory.
//!
//! # Refresh pipeline
//!
//! Every refresh is three steps: [`DirectoryNavigator::begin_refresh`] hands out a
//! [`RefreshTicket`], the directory is read (inline, or on a blocking thread through
//! [`DirectoryNavigator::refresh_task`]), and [`DirectoryNavigator::apply`] installs the
//! result only if its ticket is still the latest one for the current directory. A slow
//! read that finishes after the user has moved on is discarded.

use std::{
    future::Future,
    io,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

pub const SELF_ENTRY: &str = ".";
pub const PARENT_ENTRY: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirectoryEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directory listing primitive.
///
/// Implementations must be cheap to clone; [`DirectoryNavigator::refresh_task`] moves a
/// clone onto a blocking thread.
pub trait FileSystem: Clone + Send + 'static {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>> {
        std::fs::read_dir(path)?
            .map(|entry| {
                let entry = entry?;
                Ok(DirectoryEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir: entry.file_type()?.is_dir(),
                })
            })
            .collect()
    }
}

/// Identifies one requested refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    directory: PathBuf,
}

impl RefreshTicket {
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Result of reading the directory named by a [`RefreshTicket`].
#[derive(Debug)]
pub struct Listing {
    ticket: RefreshTicket,
    entries: Result<Vec<DirectoryEntry>, NavigatorError>,
}

impl Listing {
    /// Read `ticket`'s directory with `fs` and sort the result.
    pub fn read<F: FileSystem>(fs: &F, ticket: RefreshTicket) -> Self {
        let entries = fs
            .read_dir(&ticket.directory)
            .map(|mut entries| {
                sort_entries(&mut entries);
                entries
            })
            .map_err(|source| NavigatorError::Unreadable {
                path: ticket.directory.clone(),
                source,
            });
        Self { ticket, entries }
    }

    pub fn ticket(&self) -> &RefreshTicket {
        &self.ticket
    }
}

/// What the widget should do after a query change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The text only filters the current listing.
    Filter,
    /// The navigator moved; the query input should be cleared.
    Navigated,
}

/// What the widget should do after an entry is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Moved into a directory; keep the widget open.
    Descended,
    /// Open `path` and close the widget.
    Open { path: PathBuf, new_window: bool },
}

#[derive(Debug)]
pub struct DirectoryNavigator<F = RealFileSystem> {
    fs: F,
    home: Option<PathBuf>,
    current: PathBuf,
    last_readable: Option<PathBuf>,
    items: Vec<DirectoryEntry>,
    query: String,
    error: Option<NavigatorError>,
    generation: u64,
}

impl Default for DirectoryNavigator<RealFileSystem> {
    fn default() -> Self {
        Self::new(RealFileSystem)
    }
}

impl<F: FileSystem> DirectoryNavigator<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            home: dirs::home_dir(),
            current: PathBuf::new(),
            last_readable: None,
            items: Vec::new(),
            query: String::new(),
            error: None,
            generation: 0,
        }
    }

    /// Override the directory `~` navigates to.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn current_directory(&self) -> &Path {
        &self.current
    }

    /// Synthetic `.` and `..` followed by the sorted directory entries.
    pub fn items(&self) -> &[DirectoryEntry] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The error from the last applied refresh, if it failed.
    pub fn error(&self) -> Option<&NavigatorError> {
        self.error.as_ref()
    }

    pub fn open(&mut self, directory: impl AsRef<Path>) {
        self.current = normalize(directory.as_ref());
        self.query.clear();
        self.refresh();
    }

    /// Re-read the current directory inline.
    pub fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let listing = Listing::read(&self.fs, ticket);
        self.apply(listing);
    }

    /// Start a refresh of the current directory, superseding any earlier ticket.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket {
            generation: self.generation,
            directory: self.current.clone(),
        }
    }

    /// Start a refresh whose read runs on a blocking thread.
    ///
    /// Pass the finished [`Listing`] to [`Self::apply`].
    pub fn refresh_task(&mut self) -> impl Future<Output = Listing> + Send + 'static {
        let ticket = self.begin_refresh();
        let fs = self.fs.clone();
        smol::unblock(move || Listing::read(&fs, ticket))
    }

    /// Install `listing` if it answers the latest refresh of the current directory.
    ///
    /// Returns `false` when the listing was stale and dropped.
    pub fn apply(&mut self, listing: Listing) -> bool {
        let Listing { ticket, entries } = listing;
        if ticket.generation != self.generation || ticket.directory != self.current {
            debug!(directory = %ticket.directory.display(), "discarding stale listing");
            return false;
        }

        match entries {
            Ok(entries) => {
                debug!(
                    directory = %self.current.display(),
                    count = entries.len(),
                    "listing applied"
                );
                let mut items = Vec::with_capacity(entries.len() + 2);
                items.push(DirectoryEntry::dir(SELF_ENTRY));
                items.push(DirectoryEntry::dir(PARENT_ENTRY));
                items.extend(entries);
                self.items = items;
                self.error = None;
                self.last_readable = Some(self.current.clone());
            },
            Err(err) => {
                warn!(%err, "directory unreadable");
                self.items.clear();
                self.error = Some(err);
                // Stay anchored to a directory that could actually be listed.
                if let Some(previous) = &self.last_readable {
                    self.current = previous.clone();
                }
            },
        }
        true
    }

    /// Interpret one keystroke's worth of query text.
    ///
    /// `~` jumps home, text ending in `/` or `\` descends relative to the current
    /// directory, anything else only filters.
    pub fn on_query_changed(&mut self, text: &str) -> QueryOutcome {
        self.query = text.to_string();

        let target = if text == "~" {
            match &self.home {
                Some(home) => home.clone(),
                None => return QueryOutcome::Filter,
            }
        } else if text.ends_with(['/', '\\']) {
            self.resolve_fragment(text)
        } else {
            return QueryOutcome::Filter;
        };

        debug!(from = %self.current.display(), to = %target.display(), "navigate");
        self.current = target;
        self.query.clear();
        self.refresh();
        QueryOutcome::Navigated
    }

    pub fn select_entry(&mut self, entry: &DirectoryEntry) -> Selection {
        if !entry.is_dir {
            return Selection::Open {
                path: self.current.join(&entry.name),
                new_window: false,
            };
        }

        if entry.name == SELF_ENTRY {
            return Selection::Open {
                path: self.current.clone(),
                new_window: true,
            };
        }

        self.current = normalize(&self.current.join(&entry.name));
        self.query.clear();
        self.refresh();
        Selection::Descended
    }

    /// Confirm with nothing selected: open `text` as a path relative to the current
    /// directory.
    pub fn confirm_empty_query(&self, text: &str) -> Selection {
        Selection::Open {
            path: normalize(&self.current.join(text)),
            new_window: false,
        }
    }

    fn resolve_fragment(&self, text: &str) -> PathBuf {
        let trimmed = text.trim_end_matches(['/', '\\']);
        if trimmed.is_empty() {
            // Only separators were typed: the filesystem root.
            return normalize(Path::new(&text[..1]));
        }

        if let (Some(rest), Some(home)) = (home_relative(trimmed), &self.home) {
            return normalize(&home.join(rest));
        }

        normalize(&self.current.join(trimmed))
    }
}

/// The part of `fragment` after a leading `~` and separator, or `""` for a bare `~`.
fn home_relative(fragment: &str) -> Option<&str> {
    let rest = fragment.strip_prefix('~')?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(['/', '\\'])
}

/// Directories before files, then byte-wise (case-sensitive) by name.
pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
}

/// Collapse `.` and `..` lexically. `..` never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => out.push(Component::ParentDir),
            },
            other => out.push(other),
        }
    }
    out
}

/// Where the find-file widget starts: the first project root, else the focused file's
/// directory, else home, else the filesystem root.
pub fn initial_directory(
    project_paths: &[PathBuf],
    active_file: Option<&Path>,
    home: Option<&Path>,
) -> PathBuf {
    if let Some(root) = project_paths.first() {
        return root.clone();
    }
    if let Some(parent) = active_file.and_then(Path::parent) {
        return parent.to_path_buf();
    }
    if let Some(home) = home {
        return home.to_path_buf();
    }
    PathBuf::from(std::path::MAIN_SEPARATOR_STR)
}
