//! The generic prompt engine and the queries built on it.
//!
//! A [`Query`] is one interactive question. Concrete queries (text, confirm,
//! select) supply a [`Handler`], the widget half of the contract, and the
//! shared [`Session`](engine::Session) drives the read/render loop.

use std::io::{stderr, Write};

use crate::style::Theme;
use crate::Result;

mod confirm;
mod engine;
mod input;
mod select;

pub use confirm::*;
pub use engine::*;
pub use input::*;
pub use select::*;

/// Prompt lifecycle state. `Submit` and `Cancel` are terminal; only
/// `Error` and `Warning` return to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Initial,
    Active,
    Error,
    Warning,
    Cancel,
    Submit,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Submit | State::Cancel)
    }
}

/// Validator verdict: pass, hard failure, or a soft warning the user can
/// override with a second Enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Pass,
    Error(String),
    Warning(String),
}

/// The result contract. `Cancelled` is the cancel sentinel: a distinct
/// variant that can never compare equal to any submitted value, tested by
/// variant match rather than by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Submitted(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn submitted(self) -> Option<T> {
        match self {
            Outcome::Submitted(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }
}

/// Outcome of running a value through a validator and transform, exposed so
/// widget collaborators can reuse the engine's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checked<T> {
    Pass(T),
    Error(String),
    Warning(String),
}

pub fn validate_and_transform<T>(
    value: T,
    validate: Option<&(dyn Fn(&T) -> Validation + '_)>,
    transform: Option<&(dyn Fn(T) -> T + '_)>,
) -> Checked<T> {
    match validate.map_or(Validation::Pass, |v| v(&value)) {
        Validation::Pass => Checked::Pass(match transform {
            Some(t) => t(value),
            None => value,
        }),
        Validation::Error(msg) => Checked::Error(msg),
        Validation::Warning(msg) => Checked::Warning(msg),
    }
}

/// Context handed to a widget when it builds a frame.
pub struct FrameCtx<'a> {
    pub state: State,
    pub theme: &'a Theme,
    pub message: &'a str,
    /// Pending error or warning text, rendered inline under the input line.
    pub notice: Option<&'a str>,
    pub help: Option<&'a str>,
}

impl FrameCtx<'_> {
    /// Standard first line: state glyph plus the message.
    pub fn title_line(&self) -> String {
        format!(
            "{} {}",
            self.theme.state_glyph(self.state),
            self.theme.message(self.message)
        )
    }

    /// Inline notice (error/warning) or help line, replacing the plain
    /// continuation marker under the active line. Empty when neither
    /// applies.
    pub fn footer_line(&self) -> Option<String> {
        match (self.state, self.notice) {
            (State::Error, Some(text)) => Some(format!(
                "{} {}",
                self.theme.bar(),
                self.theme.error_text(text)
            )),
            (State::Warning, Some(text)) => Some(format!(
                "{} {}",
                self.theme.bar(),
                self.theme.warning_text(text)
            )),
            _ => self
                .help
                .map(|help| format!("{} {}", self.theme.bar(), self.theme.muted(help))),
        }
    }
}

/// The widget half of the engine contract.
pub trait Handler {
    type Value;

    /// Reacts to one decoded key and its resolved action. Enter, Escape
    /// and Ctrl-C never reach this method; the engine owns them.
    fn on_key(&mut self, key: &crate::key::Key, action: Option<crate::settings::Action>);

    /// Renders the widget while the prompt is live.
    fn frame(&self, ctx: &FrameCtx<'_>) -> String;

    /// Renders the one-line residue left behind once the prompt ends.
    fn final_frame(&self, ctx: &FrameCtx<'_>) -> String;

    /// Current value, also used as the default in non-interactive mode.
    fn value(&self) -> Self::Value;

    /// Widget-specific submit gate, run before the validator. A message
    /// blocks submission the same way a validation error does.
    fn check_submit(&mut self) -> Option<String> {
        None
    }
}

/// One interactive question, shown on stderr by default like every query
/// in this crate.
pub trait Query: Sized {
    type Result;

    fn show(self) -> Result<Outcome<Self::Result>> {
        self.show_on(&mut stderr())
    }

    fn show_on(self, f: &mut impl Write) -> Result<Outcome<Self::Result>>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cancel_sentinel_is_distinct_from_any_value() {
        let cancelled: Outcome<String> = Outcome::Cancelled;
        assert!(cancelled.is_cancelled());
        // Not even an empty string compares equal to the sentinel.
        assert_ne!(cancelled, Outcome::Submitted(String::new()));
        assert_eq!(cancelled.submitted(), None);
    }

    #[test]
    fn only_submit_and_cancel_are_terminal() {
        assert!(State::Submit.is_terminal());
        assert!(State::Cancel.is_terminal());
        assert!(!State::Error.is_terminal());
        assert!(!State::Warning.is_terminal());
        assert!(!State::Active.is_terminal());
        assert!(!State::Initial.is_terminal());
    }

    #[test]
    fn validate_and_transform_pipeline() {
        let validate = |v: &String| {
            if v.is_empty() {
                Validation::Error("required".into())
            } else {
                Validation::Pass
            }
        };
        let transform = |v: String| v.to_uppercase();

        let checked = validate_and_transform(
            "ok".to_string(),
            Some(&validate),
            Some(&transform),
        );
        assert_eq!(checked, Checked::Pass("OK".into()));

        let checked =
            validate_and_transform(String::new(), Some(&validate), Some(&transform));
        assert_eq!(checked, Checked::Error("required".into()));
    }

    #[test]
    fn transform_is_skipped_on_failure() {
        let validate = |_: &i32| Validation::Warning("odd".into());
        let transform = |v: i32| v * 100;
        let checked = validate_and_transform(3, Some(&validate), Some(&transform));
        assert_eq!(checked, Checked::Warning("odd".into()));
    }
}
