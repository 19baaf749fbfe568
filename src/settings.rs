//! Process-level prompt configuration and the key → action resolver.
//!
//! A [`Settings`] value is built once and passed into every query; there is
//! no hidden global. Custom key aliases merge over the defaults, they never
//! replace them.

use std::collections::HashMap;
use std::env;
use std::io::{self, IsTerminal};
use std::time::Duration;

use log::debug;

use crate::key::Key;

/// A semantic input action resolved from a [`Key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Cancel,
}

/// Interactivity mode: explicit, or detected from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CiMode {
    On,
    Off,
    #[default]
    Auto,
}

#[derive(Debug, Clone)]
pub struct Settings {
    aliases: HashMap<Key, Action>,
    ci_mode: CiMode,
    unicode: Option<bool>,
    color: Option<bool>,
    escape_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aliases: default_aliases(),
            ci_mode: CiMode::Auto,
            unicode: None,
            color: None,
            escape_timeout: Duration::from_millis(50),
        }
    }
}

fn default_aliases() -> HashMap<Key, Action> {
    let mut map = HashMap::new();
    map.insert(Key::Up, Action::Up);
    map.insert(Key::Down, Action::Down);
    map.insert(Key::Left, Action::Left);
    map.insert(Key::Right, Action::Right);
    map.insert(Key::Char('k'), Action::Up);
    map.insert(Key::Char('j'), Action::Down);
    map.insert(Key::Char('h'), Action::Left);
    map.insert(Key::Char('l'), Action::Right);
    map.insert(Key::Enter, Action::Enter);
    map.insert(Key::Char(' '), Action::Space);
    map.insert(Key::Escape, Action::Cancel);
    map.insert(Key::Ctrl('c'), Action::Cancel);
    map
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `aliases` over the default table. Existing defaults that are
    /// not overridden stay in effect.
    pub fn with_aliases(mut self, aliases: impl IntoIterator<Item = (Key, Action)>) -> Self {
        self.aliases.extend(aliases);
        self
    }

    pub fn with_ci_mode(mut self, mode: CiMode) -> Self {
        self.ci_mode = mode;
        self
    }

    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = Some(unicode);
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_escape_timeout(mut self, timeout: Duration) -> Self {
        self.escape_timeout = timeout;
        self
    }

    /// Resolves a key to its semantic action, if it has one.
    pub fn action_for(&self, key: &Key) -> Option<Action> {
        self.aliases.get(key).copied()
    }

    /// Whether the process should skip interactive read loops entirely.
    pub fn non_interactive(&self) -> bool {
        match self.ci_mode {
            CiMode::On => true,
            CiMode::Off => false,
            CiMode::Auto => {
                let detected = !io::stdin().is_terminal() || env::var_os("CI").is_some();
                if detected {
                    debug!("non-interactive mode auto-detected");
                }
                detected
            }
        }
    }

    /// Whether rendered output may use Unicode glyphs.
    pub fn unicode(&self) -> bool {
        self.unicode.unwrap_or_else(|| {
            env::var("LANG")
                .or_else(|_| env::var("LC_ALL"))
                .map(|v| v.to_uppercase().contains("UTF"))
                .unwrap_or(false)
        })
    }

    /// Whether rendered output may use SGR color, honoring the `NO_COLOR`
    /// and `FORCE_COLOR` conventions.
    pub fn color(&self) -> bool {
        if let Some(color) = self.color {
            return color;
        }
        if env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return false;
        }
        if env::var_os("FORCE_COLOR").is_some_and(|v| !v.is_empty()) {
            return true;
        }
        io::stderr().is_terminal()
    }

    pub fn escape_timeout(&self) -> Duration {
        self.escape_timeout
    }
}

/// Whether a key inserts a character when a free-text widget has focus.
pub fn is_printable(key: &Key) -> bool {
    matches!(key, Key::Char(c) if !c.is_control())
}

pub fn is_backspace(key: &Key) -> bool {
    matches!(key, Key::Backspace)
}
