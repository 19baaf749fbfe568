//! Yes/no confirmation.

use std::io::IsTerminal;
use std::io::{stderr, Write};

use crate::key::Key;
use crate::query::{FrameCtx, Handler, Outcome, Query, Session, State};
use crate::settings::{Action, Settings};
use crate::Result;

pub(crate) struct ConfirmHandler {
    value: bool,
    yes_label: String,
    no_label: String,
}

impl Handler for ConfirmHandler {
    type Value = bool;

    fn on_key(&mut self, key: &Key, action: Option<Action>) {
        match (key, action) {
            (Key::Char('y') | Key::Char('Y'), _) => self.value = true,
            (Key::Char('n') | Key::Char('N'), _) => self.value = false,
            // Arrows and vim keys flip between the two answers.
            (_, Some(Action::Left | Action::Right | Action::Up | Action::Down)) => {
                self.value = !self.value;
            }
            (_, Some(Action::Space)) => self.value = !self.value,
            _ => {}
        }
    }

    fn frame(&self, ctx: &FrameCtx<'_>) -> String {
        let theme = ctx.theme;
        let (yes, no) = if self.value {
            (
                format!("{} {}", theme.pointer(), theme.input(&self.yes_label)),
                theme.muted(&self.no_label),
            )
        } else {
            (
                theme.muted(&self.yes_label),
                format!("{} {}", theme.pointer(), theme.input(&self.no_label)),
            )
        };
        let mut frame = format!("{}\n{} {} / {}", ctx.title_line(), theme.bar(), yes, no);
        if let Some(footer) = ctx.footer_line() {
            frame.push('\n');
            frame.push_str(&footer);
        }
        frame
    }

    fn final_frame(&self, ctx: &FrameCtx<'_>) -> String {
        let theme = ctx.theme;
        let label = if self.value {
            &self.yes_label
        } else {
            &self.no_label
        };
        let rendered = match ctx.state {
            State::Cancel => theme.struck(label),
            _ => theme.muted(label),
        };
        format!("{} {}", ctx.title_line(), rendered)
    }

    fn value(&self) -> bool {
        self.value
    }
}

/// Asks a yes/no question, answered with `y`/`n`, arrows, or Enter on the
/// highlighted default.
pub struct ConfirmQuery {
    message: String,
    settings: Settings,
    help: Option<String>,
    default: bool,
    yes_label: String,
    no_label: String,
}

impl ConfirmQuery {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            settings: Settings::default(),
            help: None,
            default: true,
            yes_label: "Yes".into(),
            no_label: "No".into(),
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

    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    pub fn with_labels(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
        self.yes_label = yes.into();
        self.no_label = no.into();
        self
    }

    fn into_session(self) -> Session<'static, ConfirmHandler> {
        let handler = ConfirmHandler {
            value: self.default,
            yes_label: self.yes_label,
            no_label: self.no_label,
        };
        let mut session = Session::new(self.message, handler).with_settings(self.settings);
        if let Some(help) = self.help {
            session = session.with_help(help);
        }
        session
    }
}

impl Query for ConfirmQuery {
    type Result = bool;

    fn show(self) -> Result<Outcome<bool>> {
        let tty = stderr().is_terminal();
        self.into_session().run(&mut stderr(), tty)
    }

    fn show_on(self, f: &mut impl Write) -> Result<Outcome<bool>> {
        self.into_session().run(f, true)
    }
}
