//! Background-thread animation shared by the spinner, the progress bar,
//! and the task runner.
//!
//! Each live indicator owns exactly one worker thread. Foreground and
//! worker communicate only through one mutex-guarded [`Shared`] struct;
//! stopping is cooperative: `finish` flips `running` and joins, it never
//! kills the thread.

use std::io::{Stderr, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use log::trace;

use crate::style::{Glyphs, Theme};
use crate::Result;

mod progress;
mod spinner;
mod tasks;

pub use progress::*;
pub use spinner::*;
pub use tasks::*;

/// How an indicator ended, selecting the glyph on its final line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishState {
    Success,
    Error,
    Cancelled,
}

/// State shared between the foreground owner and the worker. `extra` is
/// the indicator-specific payload (progress counters and the like).
pub(crate) struct Shared<X> {
    pub running: bool,
    pub cancelled: bool,
    pub message: String,
    pub frame_index: usize,
    /// Last line actually written; identical lines are not rewritten.
    last_line: String,
    pub extra: X,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A worker that panicked mid-render leaves consistent-enough state.
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Renders one animation frame and writes it if it changed. Returns the
/// worker's keep-going verdict.
pub(crate) fn tick<X, W: Write>(
    shared: &Mutex<Shared<X>>,
    out: &Mutex<W>,
    render: &(dyn Fn(&Shared<X>, &Glyphs) -> String + Send + Sync),
    glyphs: &Glyphs,
) -> bool {
    let line = {
        let mut state = lock(shared);
        if !state.running {
            return false;
        }
        let line = render(&state, glyphs);
        state.frame_index += 1;
        if line == state.last_line {
            None
        } else {
            state.last_line.clone_from(&line);
            Some(line)
        }
    };
    if let Some(line) = line {
        // Cap at the terminal width so the animation never wraps; off a
        // real terminal the size probe fails and the line goes out as is.
        let line = match crossterm::terminal::size() {
            Ok((cols, _)) => crate::util::fit_width(&line, cols as usize, glyphs.ellipsis),
            Err(_) => line,
        };
        let mut out = lock(out);
        let _ = queue!(out, Print("\r"), Clear(ClearType::CurrentLine), Print(&line));
        let _ = out.flush();
    }
    true
}

/// The owner half of one indicator: shared state, sink, and worker handle.
pub(crate) struct Runner<X: Send + 'static, W: Write + Send + 'static = Stderr> {
    pub shared: Arc<Mutex<Shared<X>>>,
    out: Arc<Mutex<W>>,
    worker: Option<JoinHandle<()>>,
    finished: bool,
    pub theme: Theme,
    tty: bool,
}

impl<X: Send + 'static, W: Write + Send + 'static> Runner<X, W> {
    /// Spawns the worker (on a TTY) or writes the message once (plain
    /// sink) and returns the running indicator.
    pub fn start(
        message: impl Into<String>,
        extra: X,
        out: W,
        tty: bool,
        theme: Theme,
        interval: Duration,
        render: impl Fn(&Shared<X>, &Glyphs) -> String + Send + Sync + 'static,
    ) -> Self {
        let message = message.into();
        let shared = Arc::new(Mutex::new(Shared {
            running: true,
            cancelled: false,
            message: message.clone(),
            frame_index: 0,
            last_line: String::new(),
            extra,
        }));
        let out = Arc::new(Mutex::new(out));
        let worker = if tty {
            let shared = Arc::clone(&shared);
            let sink = Arc::clone(&out);
            let glyphs = theme.glyphs();
            Some(thread::spawn(move || {
                trace!("indicator worker started");
                while tick(&shared, &sink, &render, glyphs) {
                    thread::sleep(interval);
                }
                trace!("indicator worker stopped");
            }))
        } else {
            let _ = writeln!(lock(&out), "{message}");
            None
        };
        Self {
            shared,
            out,
            worker,
            finished: false,
            theme,
            tty,
        }
    }

    /// Swaps the animated message mid-flight; safe from the foreground
    /// while the worker renders.
    pub fn set_message(&self, message: impl Into<String>) {
        lock(&self.shared).message = message.into();
    }

    pub fn is_cancelled(&self) -> bool {
        lock(&self.shared).cancelled
    }

    /// Stops the worker, joins it, and writes exactly one final line.
    /// A second call does nothing.
    pub fn finish(&mut self, state: FinishState, message: impl Into<String>) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        {
            let mut shared = lock(&self.shared);
            shared.running = false;
            if state == FinishState::Cancelled {
                shared.cancelled = true;
            }
        }
        if let Some(worker) = self.worker.take() {
            // The worker observes `running` on its next tick.
            let _ = worker.join();
        }
        let glyphs = self.theme.glyphs();
        let styled = match state {
            FinishState::Success => self.theme.success_text(glyphs.submit),
            FinishState::Error => self.theme.error_text(glyphs.error),
            FinishState::Cancelled => self.theme.muted(glyphs.cancel),
        };
        let message = message.into();
        let mut out = lock(&self.out);
        if self.tty {
            queue!(
                out,
                Print("\r"),
                Clear(ClearType::CurrentLine),
                Print(format!("{styled} {message}\r\n"))
            )?;
        } else {
            writeln!(out, "{styled} {message}")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl<X: Send + 'static, W: Write + Send + 'static> Drop for Runner<X, W> {
    fn drop(&mut self) {
        // A dropped-but-unfinished indicator must not leak its worker.
        if !self.finished {
            lock(&self.shared).running = false;
            if let Some(worker) = self.worker.take() {
                let _ = worker.join();
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::test_sink::SharedSink;
    use super::*;

    fn render_static(shared: &Shared<()>, _glyphs: &Glyphs) -> String {
        format!("* {}", shared.message)
    }

    #[test]
    fn tick_suppresses_identical_lines() {
        let shared = Mutex::new(Shared {
            running: true,
            cancelled: false,
            message: "working".into(),
            frame_index: 0,
            last_line: String::new(),
            extra: (),
        });
        let out = Mutex::new(Vec::<u8>::new());
        assert!(tick(&shared, &out, &render_static, Theme::plain().glyphs()));
        let after_first = out.lock().unwrap().len();
        assert!(tick(&shared, &out, &render_static, Theme::plain().glyphs()));
        // Same line, no second write.
        assert_eq!(out.lock().unwrap().len(), after_first);
        assert_eq!(lock(&shared).frame_index, 2);
    }

    #[test]
    fn tick_stops_when_running_clears() {
        let shared = Mutex::new(Shared {
            running: false,
            cancelled: false,
            message: String::new(),
            frame_index: 0,
            last_line: String::new(),
            extra: (),
        });
        let out = Mutex::new(Vec::<u8>::new());
        assert!(!tick(&shared, &out, &render_static, Theme::plain().glyphs()));
        assert!(out.lock().unwrap().is_empty());
    }

    #[test]
    fn finish_is_idempotent() {
        let sink = SharedSink::default();
        let mut runner = Runner::start(
            "X",
            (),
            sink.clone(),
            true,
            Theme::plain(),
            Duration::from_millis(5),
            render_static,
        );
        runner.finish(FinishState::Success, "Y").unwrap();
        let after_first = sink.contents();
        runner.finish(FinishState::Success, "Y").unwrap();
        runner.finish(FinishState::Error, "Z").unwrap();
        assert_eq!(sink.contents(), after_first);
        // Exactly one final line carrying the success glyph and message.
        assert_eq!(after_first.matches("v Y").count(), 1);
    }

    #[test]
    fn plain_sink_writes_start_and_finish_lines_only() {
        let sink = SharedSink::default();
        let mut runner = Runner::start(
            "uploading",
            (),
            sink.clone(),
            false,
            Theme::plain(),
            Duration::from_millis(5),
            render_static,
        );
        runner.set_message("still uploading");
        runner.finish(FinishState::Error, "failed").unwrap();
        assert_eq!(sink.contents(), "uploading\nx failed\n");
    }

    #[test]
    fn message_swap_is_visible_to_the_renderer() {
        let shared = Mutex::new(Shared {
            running: true,
            cancelled: false,
            message: "one".into(),
            frame_index: 0,
            last_line: String::new(),
            extra: (),
        });
        let out = Mutex::new(Vec::<u8>::new());
        tick(&shared, &out, &render_static, Theme::plain().glyphs());
        lock(&shared).message = "two".into();
        tick(&shared, &out, &render_static, Theme::plain().glyphs());
        let written = String::from_utf8(out.lock().unwrap().clone()).unwrap();
        assert!(written.contains("* one"));
        assert!(written.contains("* two"));
    }
}
