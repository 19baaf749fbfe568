use std::io;

use thiserror::Error;

/// Errors surfaced by prompt and indicator APIs.
///
/// Almost everything here is terminal I/O. Validation failures and user
/// cancellation are *not* errors; they travel through the prompt state
/// machine and [`Outcome`](crate::Outcome) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The process has no usable terminal and the query cannot fall back
    /// to non-interactive mode.
    #[error("stdin is not a terminal and /dev/tty could not be opened")]
    NoTerminal,
}

pub type Result<T> = std::result::Result<T, Error>;
