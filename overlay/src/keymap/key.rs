use smallvec::SmallVec;
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordError {
    #[error("empty key binding")]
    Empty,
    #[error("keystroke `{0}` has modifiers but no key")]
    MissingKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub cmd: bool,
}

/// One key press with modifiers, written `ctrl-alt-x` in host notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Keystroke {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            modifiers: Modifiers::default(),
            key: key.into(),
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn cmd(mut self) -> Self {
        self.modifiers.cmd = true;
        self
    }
}

impl FromStr for Keystroke {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::default();
        let mut rest = s;

        // The key itself may be `-`, so only strip known modifier prefixes.
        loop {
            let flag = if let Some(r) = rest.strip_prefix("ctrl-") {
                rest = r;
                &mut modifiers.ctrl
            } else if let Some(r) = rest.strip_prefix("alt-") {
                rest = r;
                &mut modifiers.alt
            } else if let Some(r) = rest.strip_prefix("shift-") {
                rest = r;
                &mut modifiers.shift
            } else if let Some(r) = rest.strip_prefix("cmd-") {
                rest = r;
                &mut modifiers.cmd
            } else {
                break;
            };
            *flag = true;
        }

        if rest.is_empty() {
            return Err(ChordError::MissingKey(s.to_string()));
        }

        Ok(Self {
            modifiers,
            key: rest.to_string(),
        })
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Modifiers {
            ctrl,
            alt,
            shift,
            cmd,
        } = self.modifiers;
        if ctrl {
            f.write_str("ctrl-")?;
        }
        if alt {
            f.write_str("alt-")?;
        }
        if shift {
            f.write_str("shift-")?;
        }
        if cmd {
            f.write_str("cmd-")?;
        }
        f.write_str(&self.key)
    }
}

/// A sequence of keystrokes, e.g. `ctrl-x ctrl-f`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord(SmallVec<[Keystroke; 2]>);

impl Chord {
    pub fn keystrokes(&self) -> &[Keystroke] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &Chord) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn then(mut self, next: Keystroke) -> Self {
        self.0.push(next);
        self
    }
}

impl From<Keystroke> for Chord {
    fn from(keystroke: Keystroke) -> Self {
        let mut keys = SmallVec::new();
        keys.push(keystroke);
        Self(keys)
    }
}

impl FromStr for Chord {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keys = s
            .split_whitespace()
            .map(Keystroke::from_str)
            .collect::<Result<SmallVec<_>, _>>()?;
        if keys.is_empty() {
            return Err(ChordError::Empty);
        }
        Ok(Self(keys))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, keystroke) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{keystroke}")?;
        }
        Ok(())
    }
}
