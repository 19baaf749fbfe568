//! Free-text entry, plain or masked.

use std::io::{stderr, Write};
use std::io::IsTerminal;

use unicode_segmentation::UnicodeSegmentation;

use crate::key::Key;
use crate::query::{FrameCtx, Handler, Outcome, Query, Session, State, Validation};
use crate::settings::{is_printable, Action, Settings};
use crate::text::EditBuffer;
use crate::Result;

pub(crate) struct TextHandler {
    buf: EditBuffer,
    placeholder: Option<String>,
    default: Option<String>,
    /// Replaces every grapheme in the echo with this character (secrets).
    mask: Option<char>,
}

impl TextHandler {
    fn display_parts(&self) -> (String, String) {
        let (before, after) = self.buf.parts();
        match self.mask {
            Some(mask) => (
                mask.to_string().repeat(before.graphemes(true).count()),
                mask.to_string().repeat(after.graphemes(true).count()),
            ),
            None => (before.to_string(), after.to_string()),
        }
    }

    fn display_text(&self) -> String {
        let (before, after) = self.display_parts();
        before + &after
    }
}

impl Handler for TextHandler {
    type Value = String;

    fn on_key(&mut self, key: &Key, _action: Option<Action>) {
        // Raw keys, not aliases: `h`/`l` must insert, arrows must move.
        match key {
            Key::Backspace => {
                self.buf.backspace();
            }
            Key::Delete => {
                self.buf.delete();
            }
            Key::Left => {
                self.buf.move_left();
            }
            Key::Right => {
                self.buf.move_right();
            }
            Key::Home => self.buf.move_home(),
            Key::End => self.buf.move_end(),
            Key::Char(c) if is_printable(key) => self.buf.insert(*c),
            _ => {}
        }
    }

    fn frame(&self, ctx: &FrameCtx<'_>) -> String {
        let theme = ctx.theme;
        let mut frame = ctx.title_line();
        frame.push('\n');
        let line = if self.buf.is_empty() {
            let ghost = self
                .placeholder
                .as_deref()
                .or(self.default.as_deref())
                .unwrap_or("");
            format!("{} {}{}", theme.bar(), theme.caret(" "), theme.muted(ghost))
        } else {
            let (before, after) = self.display_parts();
            // The caret sits on the grapheme under the cursor, or one past
            // the end of the text.
            let mut rest = after.graphemes(true);
            let under = rest.next().unwrap_or(" ");
            let tail: String = rest.collect();
            format!(
                "{} {}{}{}",
                theme.bar(),
                theme.input(&before),
                theme.caret(under),
                theme.input(&tail)
            )
        };
        frame.push_str(&line);
        if let Some(footer) = ctx.footer_line() {
            frame.push('\n');
            frame.push_str(&footer);
        }
        frame
    }

    fn final_frame(&self, ctx: &FrameCtx<'_>) -> String {
        let theme = ctx.theme;
        let text = self.display_text();
        let rendered = match ctx.state {
            State::Cancel => theme.struck(&text),
            _ => theme.muted(&self.value_text()),
        };
        format!("{} {}", ctx.title_line(), rendered)
    }

    fn value(&self) -> String {
        self.value_impl()
    }
}

impl TextHandler {
    fn value_impl(&self) -> String {
        if self.buf.is_empty() {
            if let Some(default) = &self.default {
                return default.clone();
            }
        }
        self.buf.text().to_string()
    }

    fn value_text(&self) -> String {
        match self.mask {
            Some(mask) => mask
                .to_string()
                .repeat(self.value_impl().graphemes(true).count()),
            None => self.value_impl(),
        }
    }
}

/// Asks for one line of text.
pub struct TextQuery<'a> {
    message: String,
    settings: Settings,
    help: Option<String>,
    placeholder: Option<String>,
    initial: Option<String>,
    default: Option<String>,
    mask: Option<char>,
    validate: Option<Box<dyn Fn(&String) -> Validation + 'a>>,
    transform: Option<Box<dyn Fn(String) -> String + 'a>>,
}

impl<'a> TextQuery<'a> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            settings: Settings::default(),
            help: None,
            placeholder: None,
            initial: None,
            default: None,
            mask: None,
            validate: None,
            transform: None,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Ghost text shown while the buffer is empty; never part of the value.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Pre-filled, editable text.
    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Value used when the buffer is submitted empty, and in
    /// non-interactive mode.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Echo every typed grapheme as `mask` instead of the real text.
    pub fn masked(mut self, mask: char) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_validate(mut self, validate: impl Fn(&String) -> Validation + 'a) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    pub fn with_transform(mut self, transform: impl Fn(String) -> String + 'a) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    fn into_session(self) -> Session<'a, TextHandler> {
        let handler = TextHandler {
            buf: EditBuffer::new(self.initial.unwrap_or_default()),
            placeholder: self.placeholder,
            default: self.default,
            mask: self.mask,
        };
        let mut session = Session::new(self.message, handler).with_settings(self.settings);
        if let Some(help) = self.help {
            session = session.with_help(help);
        }
        if let Some(validate) = self.validate {
            session = session.with_validate(move |v| validate(v));
        }
        if let Some(transform) = self.transform {
            session = session.with_transform(move |v| transform(v));
        }
        session
    }
}

impl Query for TextQuery<'_> {
    type Result = String;

    fn show(self) -> Result<Outcome<String>> {
        let tty = stderr().is_terminal();
        self.into_session().run(&mut stderr(), tty)
    }

    fn show_on(self, f: &mut impl Write) -> Result<Outcome<String>> {
        self.into_session().run(f, true)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::key::script::ScriptedSource;
    use crate::settings::CiMode;

    fn run(query: TextQuery<'_>, bytes: &[u8]) -> (Outcome<String>, String) {
        let session = query
            .with_settings(
                Settings::default()
                    .with_ci_mode(CiMode::Off)
                    .with_unicode(false)
                    .with_color(false),
            )
            .into_session();
        let mut source = ScriptedSource::immediate(bytes);
        let mut sink: Vec<u8> = Vec::new();
        let outcome = session.run_with(&mut source, &mut sink, true).unwrap();
        (outcome, String::from_utf8(sink).unwrap())
    }

    #[test]
    fn types_and_submits() {
        let (outcome, _) = run(TextQuery::new("name?"), b"ada\r");
        assert_eq!(outcome, Outcome::Submitted("ada".to_string()));
    }

    #[test]
    fn vim_letters_are_text_not_navigation() {
        let (outcome, _) = run(TextQuery::new("word?"), b"hjkl\r");
        assert_eq!(outcome, Outcome::Submitted("hjkl".to_string()));
    }

    #[test]
    fn arrows_edit_mid_string() {
        // Type "ad", move left onto the "d", insert "bc".
        let (outcome, _) = run(TextQuery::new("word?"), b"ad\x1b[Dbc\r");
        assert_eq!(outcome, Outcome::Submitted("abcd".to_string()));
    }

    #[test]
    fn backspace_edits_by_grapheme() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice("ca".as_bytes());
        bytes.extend_from_slice("fe\u{301}".as_bytes()); // e + combining acute
        bytes.push(0x7f);
        bytes.push(b'\r');
        let (outcome, _) = run(TextQuery::new("word?"), &bytes);
        assert_eq!(outcome, Outcome::Submitted("caf".to_string()));
    }

    #[test]
    fn empty_submit_takes_default() {
        let (outcome, _) = run(TextQuery::new("branch?").with_default("main"), b"\r");
        assert_eq!(outcome, Outcome::Submitted("main".to_string()));
    }

    #[test]
    fn typed_text_overrides_default() {
        let (outcome, _) = run(TextQuery::new("branch?").with_default("main"), b"dev\r");
        assert_eq!(outcome, Outcome::Submitted("dev".to_string()));
    }

    #[test]
    fn masked_echo_never_shows_the_secret() {
        let (outcome, painted) =
            run(TextQuery::new("password?").masked('*'), b"hunter2\r");
        assert_eq!(outcome, Outcome::Submitted("hunter2".to_string()));
        assert!(!painted.contains("hunter2"));
        assert!(painted.contains("*******"));
    }

    #[test]
    fn placeholder_is_not_part_of_the_value() {
        let (outcome, painted) = run(
            TextQuery::new("name?").with_placeholder("e.g. ada"),
            b"\r",
        );
        assert_eq!(outcome, Outcome::Submitted(String::new()));
        assert!(painted.contains("e.g. ada"));
    }

    #[test]
    fn cancel_discards_typed_text() {
        let (outcome, _) = run(TextQuery::new("name?"), b"secret\x1b");
        assert!(outcome.is_cancelled());
    }
}
