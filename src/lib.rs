//! Interactive terminal prompts.
//!
//! `mureo` renders questions directly in the terminal with raw-mode input
//! and ANSI escapes: free-text entry, confirmations, single/multi select
//! with fuzzy filtering, plus spinners, progress bars and a task runner.
//!
//! ```no_run
//! use mureo::{Query, TextQuery};
//!
//! let name = TextQuery::new("What is your name?")
//!     .with_placeholder("world")
//!     .show()?;
//! if let Some(name) = name.submitted() {
//!     println!("Hello, {name}!");
//! }
//! # Ok::<(), mureo::Error>(())
//! ```
//!
//! Every query returns an [`Outcome`]: either `Submitted(value)` or the
//! `Cancelled` sentinel when the user hits Escape or Ctrl-C. Prompts are
//! drawn on stderr and degrade to plain output on non-terminals; in CI
//! (or with [`CiMode::On`](settings::CiMode)) the read loop is skipped and
//! defaults are accepted.

pub mod choice;
mod error;
pub mod fuzzy;
pub mod indicator;
pub mod key;
pub mod query;
pub mod scroll;
pub mod settings;
pub mod style;
pub mod text;
mod util;

pub use choice::Choice;
pub use error::{Error, Result};
pub use indicator::{FinishState, ProgressBar, Spinner, TaskReport, Tasks};
pub use key::Key;
pub use query::{
    ConfirmQuery, MultiSelectQuery, Outcome, Query, SelectQuery, TextQuery, Validation,
};
pub use settings::{Action, CiMode, Settings};
