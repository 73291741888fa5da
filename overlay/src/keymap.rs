//! Key binding tables and their installation into the host keymap.
//!
//! A [`KeymapTable`] is an ordered list of context-scoped groups, each mapping a
//! [`Chord`] to a host command name. [`install`] pushes the table into the host with a
//! raised priority and disables conflicting host defaults with the `unset!` marker;
//! [`uninstall`] removes both again.

mod default;
mod key;

pub use default::default_keymap;
pub use key::{Chord, ChordError, Keystroke, Modifiers};

use crate::host::Keymaps;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Keymap source for the overlay's own bindings.
pub const SOURCE: &str = "emacs-overlay";
/// Keymap source for the `unset!` overrides of host defaults.
pub const UNSET_SOURCE: &str = "emacs-overlay-unset";
/// Host marker that disables a binding.
pub const UNSET: &str = "unset!";
/// Priority of the overlay's bindings relative to host defaults at 0.
pub const PRIORITY: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub chord: Chord,
    pub command: String,
}

/// Bindings active under one UI context selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapGroup {
    pub selector: String,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeymapTable {
    groups: Vec<KeymapGroup>,
}

impl KeymapTable {
    pub fn groups(&self) -> &[KeymapGroup] {
        &self.groups
    }

    /// Append a binding to the group for `selector`, creating the group if needed.
    pub fn bind(&mut self, selector: &str, chord: impl Into<Chord>, command: impl Into<String>) {
        let binding = Binding {
            chord: chord.into(),
            command: command.into(),
        };
        match self.groups.iter_mut().find(|g| g.selector == selector) {
            Some(group) => group.bindings.push(binding),
            None => self.groups.push(KeymapGroup {
                selector: selector.to_string(),
                bindings: vec![binding],
            }),
        }
    }

    /// Add user bindings written as `selector -> { chord -> command }`.
    pub fn extend_from_config(
        &mut self,
        extra: &FxHashMap<String, FxHashMap<String, String>>,
    ) -> Result<(), ChordError> {
        // Sorted so the resulting table does not depend on hash order.
        let mut selectors: Vec<_> = extra.iter().collect();
        selectors.sort_by_key(|(selector, _)| selector.as_str());

        for (selector, bindings) in selectors {
            let mut bindings: Vec<_> = bindings.iter().collect();
            bindings.sort_by_key(|(chord, _)| chord.as_str());
            for (chord, command) in bindings {
                let chord: Chord = chord.parse()?;
                self.bind(selector, chord, command.clone());
            }
        }
        Ok(())
    }

    /// Command bound to `chord` under `selector`, last binding winning.
    pub fn lookup(&self, selector: &str, chord: &Chord) -> Option<&str> {
        self.groups
            .iter()
            .filter(|g| g.selector == selector)
            .flat_map(|g| g.bindings.iter())
            .filter(|b| &b.chord == chord)
            .last()
            .map(|b| b.command.as_str())
    }
}

/// Install `table` into the host keymap.
///
/// Host bindings whose keystrokes begin with one of `unset_prefixes` are overridden with
/// [`UNSET`] in their own selector, so e.g. every `ctrl-x ...` default stops shadowing
/// the overlay's `ctrl-x` sequences.
pub fn install<K: Keymaps + ?Sized>(
    keymaps: &mut K,
    table: &KeymapTable,
    unset_prefixes: &[Chord],
) {
    let mut unset: FxHashMap<String, Vec<(String, String)>> = FxHashMap::default();
    for binding in keymaps.key_bindings() {
        if binding.source == SOURCE || binding.source == UNSET_SOURCE {
            continue;
        }
        let Ok(chord) = binding.keystrokes.parse::<Chord>() else {
            continue;
        };
        if unset_prefixes.iter().any(|prefix| chord.starts_with(prefix)) {
            unset
                .entry(binding.selector)
                .or_default()
                .push((binding.keystrokes, UNSET.to_string()));
        }
    }

    let mut unset: Vec<_> = unset.into_iter().collect();
    unset.sort_by(|a, b| a.0.cmp(&b.0));
    for (selector, bindings) in unset {
        debug!(%selector, count = bindings.len(), "unsetting host bindings");
        keymaps.add_bindings(UNSET_SOURCE, &selector, &bindings, PRIORITY);
    }

    for group in &table.groups {
        let bindings: Vec<_> = group
            .bindings
            .iter()
            .map(|b| (b.chord.to_string(), b.command.clone()))
            .collect();
        keymaps.add_bindings(SOURCE, &group.selector, &bindings, PRIORITY);
    }
}

pub fn uninstall<K: Keymaps + ?Sized>(keymaps: &mut K) {
    keymaps.remove_bindings(SOURCE);
    keymaps.remove_bindings(UNSET_SOURCE);
}
