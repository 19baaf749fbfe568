//! Terminal capability layer: state glyphs, color, and Unicode fallbacks.
//!
//! Widgets never emit escape codes themselves; they ask the [`Theme`] for
//! styled fragments and assemble plain frame strings. On terminals without
//! color or Unicode support everything degrades silently to plain ASCII.

use crossterm::style::{Color, Stylize};

use crate::query::State;
use crate::settings::Settings;

/// Glyph set, selected once per theme.
#[derive(Debug)]
pub struct Glyphs {
    pub active: &'static str,
    pub submit: &'static str,
    pub cancel: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub pointer: &'static str,
    pub checked: &'static str,
    pub unchecked: &'static str,
    pub bar: &'static str,
    pub ellipsis: &'static str,
    pub spinner: &'static [&'static str],
    pub bar_filled: &'static str,
    pub bar_empty: &'static str,
}

static UNICODE: Glyphs = Glyphs {
    active: "?",
    submit: "✔",
    cancel: "✖",
    error: "✗",
    warning: "⚠",
    pointer: "❯",
    checked: "◉",
    unchecked: "◯",
    bar: "│",
    ellipsis: "…",
    spinner: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
    bar_filled: "█",
    bar_empty: "░",
};

static ASCII: Glyphs = Glyphs {
    active: "?",
    submit: "v",
    cancel: "x",
    error: "x",
    warning: "!",
    pointer: ">",
    checked: "[x]",
    unchecked: "[ ]",
    bar: "|",
    ellipsis: "...",
    spinner: &["-", "\\", "|", "/"],
    bar_filled: "#",
    bar_empty: "-",
};

/// Rendering capabilities resolved from [`Settings`] and the environment.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    color: bool,
    unicode: bool,
}

impl Theme {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            color: settings.color(),
            unicode: settings.unicode(),
        }
    }

    pub fn plain() -> Self {
        Self {
            color: false,
            unicode: false,
        }
    }

    pub fn glyphs(&self) -> &'static Glyphs {
        if self.unicode {
            &UNICODE
        } else {
            &ASCII
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// The state marker shown in front of the message line.
    pub fn state_glyph(&self, state: State) -> String {
        let g = self.glyphs();
        match state {
            State::Initial | State::Active => self.paint(g.active, Color::Green),
            State::Submit => self.paint(g.submit, Color::Green),
            State::Cancel => self.paint(g.cancel, Color::Red),
            State::Error => self.paint(g.error, Color::Red),
            State::Warning => self.paint(g.warning, Color::Yellow),
        }
    }

    pub fn message(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn pointer(&self) -> String {
        self.paint(self.glyphs().pointer, Color::Cyan)
    }

    pub fn bar(&self) -> String {
        self.paint(self.glyphs().bar, Color::DarkGrey)
    }

    pub fn input(&self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    pub fn error_text(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    pub fn warning_text(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn muted(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }

    /// Cancelled input is rendered struck through before control returns.
    pub fn struck(&self, text: &str) -> String {
        if self.color {
            text.crossed_out().dark_grey().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success_text(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    /// Reverse-video caret; the terminal cursor is hidden while a prompt
    /// is live, so the caret is drawn into the frame instead.
    pub fn caret(&self, text: &str) -> String {
        if self.color {
            text.reverse().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_theme_emits_no_escape_codes() {
        let theme = Theme::plain();
        assert_eq!(theme.state_glyph(State::Submit), "v");
        assert_eq!(theme.error_text("boom"), "boom");
        assert_eq!(theme.struck("old"), "old");
        assert!(!theme.message("hi").contains('\x1b'));
    }

    #[test]
    fn colored_theme_wraps_in_sgr() {
        let theme = Theme {
            color: true,
            unicode: true,
        };
        let glyph = theme.state_glyph(State::Error);
        assert!(glyph.contains('\x1b'));
        assert!(glyph.contains('✗'));
    }

    #[test]
    fn glyphs_follow_unicode_flag() {
        let unicode = Theme {
            color: false,
            unicode: true,
        };
        assert_eq!(unicode.glyphs().pointer, "❯");
        assert_eq!(Theme::plain().glyphs().pointer, ">");
    }
}
