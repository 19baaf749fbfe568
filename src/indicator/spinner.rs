//! Animated one-line spinner.

use std::io::{stderr, IsTerminal, Stderr, Write};
use std::time::Duration;

use crate::indicator::{FinishState, Runner, Shared};
use crate::settings::Settings;
use crate::style::{Glyphs, Theme};
use crate::Result;

const FRAME_INTERVAL: Duration = Duration::from_millis(80);

fn render(shared: &Shared<()>, glyphs: &Glyphs) -> String {
    let frame = glyphs.spinner[shared.frame_index % glyphs.spinner.len()];
    format!("{frame} {}", shared.message)
}

/// A spinner on stderr. Start it, optionally swap the message while work
/// happens, then end it with exactly one of [`success`](Self::success),
/// [`error`](Self::error) or [`cancel`](Self::cancel).
pub struct Spinner<W: Write + Send + 'static = Stderr> {
    runner: Runner<(), W>,
}

impl Spinner<Stderr> {
    pub fn start(message: impl Into<String>) -> Self {
        Self::start_with(&Settings::default(), message)
    }

    pub fn start_with(settings: &Settings, message: impl Into<String>) -> Self {
        let tty = stderr().is_terminal() && !settings.non_interactive();
        Self::start_on(stderr(), tty, Theme::from_settings(settings), message)
    }
}

impl<W: Write + Send + 'static> Spinner<W> {
    /// Explicit-sink constructor, the seam the tests drive.
    pub fn start_on(out: W, tty: bool, theme: Theme, message: impl Into<String>) -> Self {
        Self {
            runner: Runner::start(message, (), out, tty, theme, FRAME_INTERVAL, render),
        }
    }

    /// Replaces the animated message without stopping the spinner.
    pub fn message(&self, message: impl Into<String>) {
        self.runner.set_message(message);
    }

    /// True once the spinner ended with [`cancel`](Self::cancel).
    pub fn is_cancelled(&self) -> bool {
        self.runner.is_cancelled()
    }

    pub fn success(mut self, message: impl Into<String>) -> Result<()> {
        self.runner.finish(FinishState::Success, message)
    }

    pub fn error(mut self, message: impl Into<String>) -> Result<()> {
        self.runner.finish(FinishState::Error, message)
    }

    pub fn cancel(mut self, message: impl Into<String>) -> Result<()> {
        self.runner.finish(FinishState::Cancelled, message)
    }

    /// Non-consuming finish for owners that keep the spinner around.
    pub fn finish(&mut self, state: FinishState, message: impl Into<String>) -> Result<()> {
        self.runner.finish(state, message)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::indicator::test_sink::SharedSink;

    #[test]
    fn finish_writes_one_line_even_when_called_twice() {
        let sink = SharedSink::default();
        let mut spinner =
            Spinner::start_on(sink.clone(), true, Theme::plain(), "X");
        spinner.finish(FinishState::Success, "Y").unwrap();
        spinner.finish(FinishState::Success, "Y").unwrap();
        assert_eq!(sink.contents().matches("v Y").count(), 1);
    }

    #[test]
    fn worker_animates_until_finished() {
        let sink = SharedSink::default();
        let spinner = Spinner::start_on(sink.clone(), true, Theme::plain(), "loading");
        // Give the worker a few ticks.
        std::thread::sleep(Duration::from_millis(200));
        spinner.success("done").unwrap();
        let written = sink.contents();
        assert!(written.contains("loading"));
        assert!(written.contains("v done"));
    }

    #[test]
    fn message_swap_mid_animation() {
        let sink = SharedSink::default();
        let spinner = Spinner::start_on(sink.clone(), true, Theme::plain(), "step 1");
        std::thread::sleep(Duration::from_millis(120));
        spinner.message("step 2");
        std::thread::sleep(Duration::from_millis(120));
        spinner.cancel("stopped").unwrap();
        let written = sink.contents();
        assert!(written.contains("step 1"));
        assert!(written.contains("step 2"));
        assert!(written.contains("x stopped"));
    }

    #[test]
    fn cancel_is_observable_after_finish() {
        let sink = SharedSink::default();
        let mut spinner = Spinner::start_on(sink.clone(), true, Theme::plain(), "slow");
        assert!(!spinner.is_cancelled());
        spinner.finish(FinishState::Cancelled, "aborted").unwrap();
        assert!(spinner.is_cancelled());
        assert!(sink.contents().contains("x aborted"));
    }

    #[test]
    fn plain_sink_degrades_to_two_lines() {
        let sink = SharedSink::default();
        let spinner = Spinner::start_on(sink.clone(), false, Theme::plain(), "sync");
        spinner.success("synced").unwrap();
        assert_eq!(sink.contents(), "sync\nv synced\n");
    }
}
