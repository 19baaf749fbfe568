//! Single and multi select over a list of choices, with cursor-follow
//! scrolling and optional fuzzy filtering.

use std::fmt::Display;
use std::io::IsTerminal;
use std::io::{stderr, Write};

use crate::choice::Choice;
use crate::fuzzy;
use crate::key::Key;
use crate::query::{FrameCtx, Handler, Outcome, Query, Session, State};
use crate::scroll::Viewport;
use crate::settings::{is_printable, Action, Settings};
use crate::style::Theme;
use crate::text::EditBuffer;
use crate::Result;

pub(crate) struct SelectHandler<T> {
    all: Vec<Choice<T>>,
    /// Current view, re-derived from `all` whenever the filter changes.
    visible: Vec<Choice<T>>,
    viewport: Viewport,
    /// Selected values (multi mode); membership is value equality.
    selected: Vec<T>,
    many: bool,
    /// `Some` enables type-to-filter; printable keys then edit the filter
    /// and navigation happens through arrow keys only.
    filter: Option<EditBuffer>,
}

impl<T: Clone + PartialEq> SelectHandler<T> {
    fn new(all: Vec<Choice<T>>, many: bool, window: Option<usize>, filterable: bool) -> Self {
        let visible = all.clone();
        let mut handler = Self {
            all,
            visible,
            viewport: Viewport::new(window),
            selected: Vec::new(),
            many,
            filter: filterable.then(EditBuffer::default),
        };
        handler.settle_cursor(0);
        handler
    }

    fn settle_cursor(&mut self, at: usize) {
        let disabled: Vec<bool> = self.visible.iter().map(|c| c.disabled).collect();
        let len = self.visible.len();
        self.viewport.reset_to(at, |i| disabled[i], len);
    }

    fn refilter(&mut self) {
        let query = self.filter.as_ref().map(EditBuffer::text).unwrap_or("");
        self.visible = fuzzy::filter(self.all.clone(), query);
        self.settle_cursor(0);
    }

    fn move_cursor(&mut self, delta: isize) {
        let disabled: Vec<bool> = self.visible.iter().map(|c| c.disabled).collect();
        let len = self.visible.len();
        self.viewport.move_by(delta, |i| disabled[i], len);
    }

    fn under_cursor(&self) -> Option<&Choice<T>> {
        self.visible.get(self.viewport.cursor)
    }

    fn toggle_current(&mut self) {
        let Some(choice) = self.under_cursor() else {
            return;
        };
        if choice.disabled {
            return;
        }
        let value = choice.value.clone();
        match self.selected.iter().position(|v| *v == value) {
            Some(at) => {
                self.selected.remove(at);
            }
            None => self.selected.push(value),
        }
    }

    fn is_selected(&self, choice: &Choice<T>) -> bool {
        self.selected.contains(&choice.value)
    }

    fn row(&self, index: usize, theme: &Theme) -> String {
        let choice = &self.visible[index];
        let g = theme.glyphs();
        let cursor = index == self.viewport.cursor;
        let marker = if cursor {
            theme.pointer()
        } else {
            " ".to_string()
        };
        let mut line = format!("{} ", marker);
        if self.many {
            let box_glyph = if self.is_selected(choice) {
                theme.success_text(g.checked)
            } else {
                theme.muted(g.unchecked)
            };
            line.push_str(&box_glyph);
            line.push(' ');
        }
        let label = if choice.disabled {
            theme.muted(&choice.label)
        } else if cursor {
            theme.input(&choice.label)
        } else {
            choice.label.clone()
        };
        line.push_str(&label);
        if let Some(hint) = &choice.hint {
            line.push(' ');
            line.push_str(&theme.muted(&format!("({hint})")));
        }
        line
    }
}

impl<T: Clone + PartialEq> Handler for SelectHandler<T> {
    type Value = Vec<T>;

    fn on_key(&mut self, key: &Key, action: Option<Action>) {
        let filtering = self.filter.is_some();
        match key {
            // Arrow keys always navigate, even while filtering.
            Key::Up => return self.move_cursor(-1),
            Key::Down => return self.move_cursor(1),
            _ => {}
        }
        if filtering {
            match key {
                Key::Backspace => {
                    if let Some(filter) = &mut self.filter {
                        if filter.backspace() {
                            self.refilter();
                        }
                    }
                }
                // Space toggles in multi mode even while filtering; the
                // filter text never needs literal spaces.
                Key::Char(' ') | Key::Tab if self.many => self.toggle_current(),
                key if is_printable(key) => {
                    if let (Some(filter), Key::Char(c)) = (&mut self.filter, key) {
                        filter.insert(*c);
                    }
                    self.refilter();
                }
                _ => {}
            }
            return;
        }
        match action {
            Some(Action::Up) => self.move_cursor(-1),
            Some(Action::Down) => self.move_cursor(1),
            Some(Action::Space) if self.many => self.toggle_current(),
            _ => {}
        }
    }

    fn frame(&self, ctx: &FrameCtx<'_>) -> String {
        let theme = ctx.theme;
        let mut frame = ctx.title_line();
        if let Some(filter) = &self.filter {
            frame.push('\n');
            if filter.is_empty() {
                frame.push_str(&format!(
                    "{} {}",
                    theme.bar(),
                    theme.muted("type to filter")
                ));
            } else {
                frame.push_str(&format!("{} {}", theme.bar(), theme.input(filter.text())));
            }
        }
        if self.visible.is_empty() {
            frame.push('\n');
            frame.push_str(&format!("{} {}", theme.bar(), theme.muted("no matches")));
        }
        let len = self.visible.len();
        for index in self.viewport.visible(len) {
            frame.push('\n');
            frame.push_str(&self.row(index, theme));
        }
        // Overflow indicator when the window cuts the list off below.
        let shown = self.viewport.visible(len);
        if shown.end < len {
            frame.push('\n');
            frame.push_str(&theme.muted(ctx.theme.glyphs().ellipsis));
        }
        if let Some(footer) = ctx.footer_line() {
            frame.push('\n');
            frame.push_str(&footer);
        }
        frame
    }

    fn final_frame(&self, ctx: &FrameCtx<'_>) -> String {
        let theme = ctx.theme;
        let text = if self.many {
            let labels: Vec<&str> = self
                .all
                .iter()
                .filter(|c| self.is_selected(c))
                .map(|c| c.label.as_str())
                .collect();
            labels.join(", ")
        } else {
            self.under_cursor()
                .map(|c| c.label.clone())
                .unwrap_or_default()
        };
        let rendered = match ctx.state {
            State::Cancel => theme.struck(&text),
            _ => theme.muted(&text),
        };
        format!("{} {}", ctx.title_line(), rendered)
    }

    fn value(&self) -> Vec<T> {
        if self.many {
            // Listing order, not toggle order.
            self.all
                .iter()
                .filter(|c| self.is_selected(c))
                .map(|c| c.value.clone())
                .collect()
        } else {
            self.under_cursor()
                .filter(|c| !c.disabled)
                .map(|c| vec![c.value.clone()])
                .unwrap_or_default()
        }
    }

    fn check_submit(&mut self) -> Option<String> {
        if !self.many && self.value().is_empty() {
            return Some("nothing to select here".to_string());
        }
        None
    }
}

/// Picks one value out of a list.
pub struct SelectQuery<T> {
    message: String,
    settings: Settings,
    help: Option<String>,
    choices: Vec<Choice<T>>,
    window: Option<usize>,
    filterable: bool,
}

impl<T: Clone + PartialEq> SelectQuery<T> {
    pub fn new(message: impl Into<String>, choices: Vec<Choice<T>>) -> Self {
        Self {
            message: message.into(),
            settings: Settings::default(),
            help: None,
            choices,
            window: None,
            filterable: false,
        }
    }

    /// Builds the choice list from plain displayable values.
    pub fn from_values(
        message: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self
    where
        T: Display,
    {
        Self::new(message, crate::choice::normalize(values))
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Caps the number of rows shown at once; the viewport follows the
    /// cursor through longer lists.
    pub fn with_window(mut self, rows: usize) -> Self {
        self.window = Some(rows);
        self
    }

    /// Type-to-filter with fuzzy matching over label, value, and hint.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Switches to multi-select: Space toggles, Enter submits the set.
    pub fn many(self) -> MultiSelectQuery<T> {
        MultiSelectQuery { inner: self }
    }

    fn into_session<'a>(self) -> Session<'a, SelectHandler<T>>
    where
        T: 'a,
    {
        let handler =
            SelectHandler::new(self.choices, false, self.window, self.filterable);
        let mut session = Session::new(self.message, handler).with_settings(self.settings);
        if let Some(help) = self.help {
            session = session.with_help(help);
        }
        session
    }
}

impl<T: Clone + PartialEq> Query for SelectQuery<T> {
    type Result = T;

    fn show(self) -> Result<Outcome<T>> {
        let tty = stderr().is_terminal();
        let outcome = self.into_session().run(&mut stderr(), tty)?;
        Ok(first_of(outcome))
    }

    fn show_on(self, f: &mut impl Write) -> Result<Outcome<T>> {
        let outcome = self.into_session().run(f, true)?;
        Ok(first_of(outcome))
    }
}

/// Single select submits exactly one value; the submit gate guarantees the
/// vec is non-empty.
fn first_of<T>(outcome: Outcome<Vec<T>>) -> Outcome<T> {
    match outcome {
        Outcome::Submitted(mut values) if !values.is_empty() => {
            Outcome::Submitted(values.remove(0))
        }
        _ => Outcome::Cancelled,
    }
}

/// Picks any number of values out of a list.
pub struct MultiSelectQuery<T> {
    inner: SelectQuery<T>,
}

impl<T: Clone + PartialEq> MultiSelectQuery<T> {
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.inner.settings = settings;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.help = Some(help.into());
        self
    }

    pub fn with_window(mut self, rows: usize) -> Self {
        self.inner.window = Some(rows);
        self
    }

    pub fn filterable(mut self) -> Self {
        self.inner.filterable = true;
        self
    }

    fn into_session<'a>(self) -> Session<'a, SelectHandler<T>>
    where
        T: 'a,
    {
        let inner = self.inner;
        let handler = SelectHandler::new(inner.choices, true, inner.window, inner.filterable);
        let mut session = Session::new(inner.message, handler).with_settings(inner.settings);
        if let Some(help) = inner.help {
            session = session.with_help(help);
        }
        session
    }
}

impl<T: Clone + PartialEq> Query for MultiSelectQuery<T> {
    type Result = Vec<T>;

    fn show(self) -> Result<Outcome<Vec<T>>> {
        let tty = stderr().is_terminal();
        self.into_session().run(&mut stderr(), tty)
    }

    fn show_on(self, f: &mut impl Write) -> Result<Outcome<Vec<T>>> {
        self.into_session().run(f, true)
    }
}
