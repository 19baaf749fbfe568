//! Animated progress bar.

use std::io::{stderr, IsTerminal, Stderr, Write};
use std::time::{Duration, Instant};

use crate::indicator::{FinishState, Runner, Shared};
use crate::settings::Settings;
use crate::style::{Glyphs, Theme};
use crate::Result;

const FRAME_INTERVAL: Duration = Duration::from_millis(100);
const BAR_WIDTH: usize = 30;

pub(crate) struct ProgressState {
    current: u64,
    total: u64,
    started: Instant,
}

pub(crate) fn render_bar(current: u64, total: u64, width: usize, glyphs: &Glyphs) -> String {
    let total = total.max(1);
    let done = current.min(total);
    let filled = (done as usize * width) / total as usize;
    let mut bar = String::new();
    for _ in 0..filled {
        bar.push_str(glyphs.bar_filled);
    }
    for _ in filled..width {
        bar.push_str(glyphs.bar_empty);
    }
    bar
}

fn render(shared: &Shared<ProgressState>, glyphs: &Glyphs) -> String {
    let state = &shared.extra;
    let total = state.total.max(1);
    let percent = (state.current.min(total) * 100) / total;
    let elapsed = state.started.elapsed().as_secs();
    format!(
        "{} {percent:>3}% {} ({elapsed}s)",
        render_bar(state.current, state.total, BAR_WIDTH, glyphs),
        shared.message
    )
}

/// A bar that fills from 0 to `total` units, redrawn on one stderr line.
pub struct ProgressBar<W: Write + Send + 'static = Stderr> {
    runner: Runner<ProgressState, W>,
    total: u64,
}

impl ProgressBar<Stderr> {
    pub fn start(total: u64, message: impl Into<String>) -> Self {
        Self::start_with(&Settings::default(), total, message)
    }

    pub fn start_with(settings: &Settings, total: u64, message: impl Into<String>) -> Self {
        let tty = stderr().is_terminal() && !settings.non_interactive();
        Self::start_on(stderr(), tty, Theme::from_settings(settings), total, message)
    }
}

impl<W: Write + Send + 'static> ProgressBar<W> {
    pub fn start_on(
        out: W,
        tty: bool,
        theme: Theme,
        total: u64,
        message: impl Into<String>,
    ) -> Self {
        let state = ProgressState {
            current: 0,
            total,
            started: Instant::now(),
        };
        Self {
            runner: Runner::start(message, state, out, tty, theme, FRAME_INTERVAL, render),
            total,
        }
    }

    /// Adds `units` of completed work, saturating at the total.
    pub fn advance(&self, units: u64) {
        let mut shared = self.runner.shared.lock().unwrap_or_else(|p| p.into_inner());
        shared.extra.current = shared.extra.current.saturating_add(units).min(self.total);
    }

    pub fn set(&self, units: u64) {
        let mut shared = self.runner.shared.lock().unwrap_or_else(|p| p.into_inner());
        shared.extra.current = units.min(self.total);
    }

    pub fn position(&self) -> u64 {
        self.runner
            .shared
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extra
            .current
    }

    pub fn message(&self, message: impl Into<String>) {
        self.runner.set_message(message);
    }

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
}
