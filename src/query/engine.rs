//! The interactive session: read one key, resolve its action, let the
//! widget react, rebuild the frame, diff, repaint.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use crossterm::cursor::{Hide, MoveToPreviousLine, Show};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use log::{debug, trace};

use crate::key::{read_key, ByteSource, Key, RawModeGuard, TtySource};
use crate::query::{validate_and_transform, Checked, FrameCtx, Handler, Outcome, State, Validation};
use crate::settings::{Action, Settings};
use crate::style::Theme;
use crate::util::frame_rows;
use crate::{Error, Result};

static RESIZED: AtomicBool = AtomicBool::new(false);
static INSTALL_RESIZE: Once = Once::new();

extern "C" fn on_sigwinch(_: libc::c_int) {
    // Only a flag store is signal-safe here. The render loop polls it.
    RESIZED.store(true, Ordering::Relaxed);
}

fn install_resize_handler() {
    INSTALL_RESIZE.call_once(|| unsafe {
        libc::signal(
            libc::SIGWINCH,
            on_sigwinch as extern "C" fn(libc::c_int) as libc::sighandler_t,
        );
    });
}

fn take_resize() -> bool {
    RESIZED.swap(false, Ordering::Relaxed)
}

/// Differential frame writer. Keeps the previous frame and row count;
/// identical frames are not rewritten, everything else is repainted by
/// moving to the top of the old frame and clearing downward.
pub(crate) struct Renderer<'a, W: Write> {
    out: &'a mut W,
    /// When false the sink gets plain sequential writes only: no cursor
    /// repositioning, no live repaints.
    tty: bool,
    prev: String,
    prev_rows: u16,
}

impl<'a, W: Write> Renderer<'a, W> {
    pub(crate) fn new(out: &'a mut W, tty: bool) -> Self {
        Self {
            out,
            tty,
            prev: String::new(),
            prev_rows: 0,
        }
    }

    pub(crate) fn hide_cursor(&mut self) -> Result<()> {
        if self.tty {
            queue!(self.out, Hide)?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub(crate) fn show_cursor(&mut self) -> Result<()> {
        if self.tty {
            queue!(self.out, Show)?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub(crate) fn draw(&mut self, frame: &str, force: bool) -> Result<()> {
        if !self.tty {
            return Ok(());
        }
        if !force && frame == self.prev {
            trace!("frame unchanged; skipping repaint");
            return Ok(());
        }
        if self.prev_rows > 0 {
            queue!(
                self.out,
                MoveToPreviousLine(self.prev_rows),
                Clear(ClearType::FromCursorDown)
            )?;
        }
        // The terminal is in raw mode: "\n" alone does not return the
        // carriage.
        for line in frame.split('\n') {
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        self.prev_rows = frame_rows(frame);
        self.prev.clear();
        self.prev.push_str(frame);
        self.out.flush()?;
        Ok(())
    }

    /// Writes the terminal-state frame. On a non-TTY sink this is the only
    /// write the whole session makes.
    pub(crate) fn draw_final(&mut self, frame: &str) -> Result<()> {
        if self.tty {
            self.draw(frame, true)
        } else {
            writeln!(self.out, "{frame}")?;
            self.out.flush()?;
            Ok(())
        }
    }
}

/// One prompt invocation: message, widget, hooks, and the run loop.
/// Created per question and consumed by `run`.
pub struct Session<'a, H: Handler> {
    message: String,
    help: Option<String>,
    handler: H,
    settings: Settings,
    validate: Option<Box<dyn Fn(&H::Value) -> Validation + 'a>>,
    transform: Option<Box<dyn Fn(H::Value) -> H::Value + 'a>>,
}

impl<'a, H: Handler> Session<'a, H> {
    pub fn new(message: impl Into<String>, handler: H) -> Self {
        Self {
            message: message.into(),
            help: None,
            handler,
            settings: Settings::default(),
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

    pub fn with_validate(
        mut self,
        validate: impl Fn(&H::Value) -> Validation + 'a,
    ) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    pub fn with_transform(mut self, transform: impl Fn(H::Value) -> H::Value + 'a) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Runs the interactive loop against the real terminal, or falls back
    /// to the non-interactive path when the settings say so.
    pub fn run(self, out: &mut impl Write, tty: bool) -> Result<Outcome<H::Value>> {
        if self.settings.non_interactive() {
            return self.run_non_interactive(out);
        }
        install_resize_handler();
        let mut source = TtySource::open()?;
        let _raw = RawModeGuard::enable()?;
        self.run_with(&mut source, out, tty)
    }

    /// Loop body, separated from terminal acquisition so tests can drive
    /// it with a scripted byte source and an in-memory sink.
    pub(crate) fn run_with(
        self,
        source: &mut impl ByteSource,
        out: &mut impl Write,
        tty: bool,
    ) -> Result<Outcome<H::Value>> {
        let mut renderer = Renderer::new(out, tty);
        renderer.hide_cursor()?;
        let result = self.drive(source, &mut renderer);
        // The cursor comes back on every exit path, error or not.
        let shown = renderer.show_cursor();
        let outcome = result?;
        shown?;
        Ok(outcome)
    }

    fn drive(
        mut self,
        source: &mut impl ByteSource,
        renderer: &mut Renderer<'_, impl Write>,
    ) -> Result<Outcome<H::Value>> {
        let theme = Theme::from_settings(&self.settings);
        let mut state = State::Initial;
        let mut notice: Option<String> = None;
        let mut accepted: Option<H::Value> = None;

        loop {
            if state.is_terminal() {
                let ctx = FrameCtx {
                    state,
                    theme: &theme,
                    message: &self.message,
                    notice: None,
                    help: None,
                };
                renderer.draw_final(&self.handler.final_frame(&ctx))?;
                return Ok(match accepted {
                    Some(value) if state == State::Submit => Outcome::Submitted(value),
                    _ => Outcome::Cancelled,
                });
            }

            let ctx = FrameCtx {
                state,
                theme: &theme,
                message: &self.message,
                notice: notice.as_deref(),
                help: self.help.as_deref(),
            };
            renderer.draw(&self.handler.frame(&ctx), take_resize())?;

            let key = match read_key(source, self.settings.escape_timeout()) {
                Ok(Some(key)) => key,
                // End of input acts like a cancel; there is nobody to ask.
                Ok(None) => {
                    state = State::Cancel;
                    continue;
                }
                Err(Error::Io(err)) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            let action = self.settings.action_for(&key);
            trace!("key {key:?} resolved to {action:?} in {state:?}");

            match (state, action) {
                (_, Some(Action::Cancel)) => state = State::Cancel,
                (State::Warning, Some(Action::Enter)) => {
                    // The second consecutive Enter confirms the warning;
                    // the value is accepted without a fresh validation.
                    notice = None;
                    let value = self.handler.value();
                    accepted = Some(match &self.transform {
                        Some(transform) => transform(value),
                        None => value,
                    });
                    state = State::Submit;
                }
                (_, Some(Action::Enter)) => {
                    notice = None;
                    if let Some(msg) = self.handler.check_submit() {
                        state = State::Error;
                        notice = Some(msg);
                        continue;
                    }
                    match validate_and_transform(
                        self.handler.value(),
                        self.validate.as_deref(),
                        self.transform.as_deref(),
                    ) {
                        Checked::Pass(value) => {
                            accepted = Some(value);
                            state = State::Submit;
                        }
                        Checked::Error(msg) => {
                            state = State::Error;
                            notice = Some(msg);
                        }
                        Checked::Warning(msg) => {
                            state = State::Warning;
                            notice = Some(msg);
                        }
                    }
                }
                (_, action) => {
                    // Any other key clears a pending error or warning and
                    // is then processed as ordinary input, not dropped.
                    notice = None;
                    state = State::Active;
                    self.handler.on_key(&key, action);
                }
            }
        }
    }

    /// Non-interactive mode: accept the widget's current (default) value,
    /// still run validate + transform, never touch the terminal.
    fn run_non_interactive(mut self, out: &mut impl Write) -> Result<Outcome<H::Value>> {
        debug!("non-interactive run for prompt {:?}", self.message);
        let theme = Theme::from_settings(&self.settings);
        let checked = validate_and_transform(
            self.handler.value(),
            self.validate.as_deref(),
            self.transform.as_deref(),
        );
        let (state, outcome) = match checked {
            Checked::Pass(value) => (State::Submit, Outcome::Submitted(value)),
            // A warning has nobody to confirm it, so it passes through.
            Checked::Warning(_) => {
                let value = self.handler.value();
                let value = match &self.transform {
                    Some(transform) => transform(value),
                    None => value,
                };
                (State::Submit, Outcome::Submitted(value))
            }
            Checked::Error(msg) => {
                writeln!(out, "{} {}", theme.glyphs().error, msg)?;
                (State::Cancel, Outcome::Cancelled)
            }
        };
        let ctx = FrameCtx {
            state,
            theme: &theme,
            message: &self.message,
            notice: None,
            help: None,
        };
        writeln!(out, "{}", self.handler.final_frame(&ctx))?;
        out.flush()?;
        Ok(outcome)
    }
}
