//! Raw-terminal key decoding.
//!
//! The decoder turns a raw byte stream into one logical [`Key`] per call.
//! A lone `ESC` is ambiguous: it may be the Escape key or the start of a
//! CSI sequence (arrow keys and friends). The decoder waits a short,
//! configurable timeout for continuation bytes before deciding.
//!
//! Decoding is written against the [`ByteSource`] trait so tests can feed
//! scripted bytes; [`TtySource`] is the real implementation, reading the
//! controlling terminal in raw mode.

use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

use log::trace;

use crate::{Error, Result};

/// One decoded logical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    /// A control-key chord, e.g. `Ctrl('c')`. The char is lowercase.
    Ctrl(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// A recognized-but-unmapped escape sequence, kept verbatim.
    Unknown(String),
}

/// Blocking byte supplier with a single timed-read primitive.
pub trait ByteSource {
    /// Blocks until one byte is available. `Ok(None)` means end of input.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Waits up to `timeout` for one byte; `Ok(None)` on timeout or EOF.
    fn read_byte_timeout(&mut self, timeout: Duration) -> Result<Option<u8>>;
}

/// Reads one logical key from `source`.
///
/// Returns `Ok(None)` only when the source is exhausted before a full key
/// is formed.
pub fn read_key(source: &mut impl ByteSource, escape_timeout: Duration) -> Result<Option<Key>> {
    let Some(byte) = source.read_byte()? else {
        return Ok(None);
    };
    match byte {
        0x1b => read_escape(source, escape_timeout),
        b'\r' | b'\n' => Ok(Some(Key::Enter)),
        b'\t' => Ok(Some(Key::Tab)),
        // DEL is what most terminals send for Backspace; BS (0x08) is Ctrl-H.
        0x7f => Ok(Some(Key::Backspace)),
        0x08 => Ok(Some(Key::Backspace)),
        // Remaining C0 controls map to Ctrl-letter chords.
        0x01..=0x1a => Ok(Some(Key::Ctrl((b'a' + byte - 0x01) as char))),
        _ if byte < 0x80 => Ok(Some(Key::Char(byte as char))),
        _ => read_utf8_tail(source, byte),
    }
}

/// Continuation bytes of a multi-byte UTF-8 scalar follow the lead byte
/// immediately, so they are read without a timeout.
fn read_utf8_tail(source: &mut impl ByteSource, lead: u8) -> Result<Option<Key>> {
    let want = match lead {
        0xc0..=0xdf => 1,
        0xe0..=0xef => 2,
        0xf0..=0xf7 => 3,
        // Stray continuation or invalid lead byte; drop it.
        _ => return Ok(Some(Key::Unknown(format!("\\x{lead:02x}")))),
    };
    let mut buf = vec![lead];
    for _ in 0..want {
        match source.read_byte()? {
            Some(b) => buf.push(b),
            None => return Ok(None),
        }
    }
    match std::str::from_utf8(&buf) {
        Ok(s) => Ok(s.chars().next().map(Key::Char)),
        Err(_) => Ok(Some(Key::Unknown(
            buf.iter().map(|b| format!("\\x{b:02x}")).collect(),
        ))),
    }
}

fn read_escape(source: &mut impl ByteSource, timeout: Duration) -> Result<Option<Key>> {
    let Some(second) = source.read_byte_timeout(timeout)? else {
        trace!("escape disambiguation timed out; bare Escape");
        return Ok(Some(Key::Escape));
    };
    match second {
        b'[' => read_csi(source, timeout),
        b'O' => {
            // SS3 sequences (application cursor keys).
            match source.read_byte_timeout(timeout)? {
                Some(b'A') => Ok(Some(Key::Up)),
                Some(b'B') => Ok(Some(Key::Down)),
                Some(b'C') => Ok(Some(Key::Right)),
                Some(b'D') => Ok(Some(Key::Left)),
                Some(b'H') => Ok(Some(Key::Home)),
                Some(b'F') => Ok(Some(Key::End)),
                Some(other) => Ok(Some(Key::Unknown(format!("\\eO{}", other as char)))),
                None => Ok(Some(Key::Escape)),
            }
        }
        other => Ok(Some(Key::Unknown(format!("\\e{}", other as char)))),
    }
}

/// Parses the body of a CSI sequence: parameter bytes (`0-9;`) followed by
/// one final byte in `@`..`~`.
fn read_csi(source: &mut impl ByteSource, timeout: Duration) -> Result<Option<Key>> {
    let mut params = String::new();
    loop {
        let Some(byte) = source.read_byte_timeout(timeout)? else {
            // Truncated sequence; treat the prefix as a bare Escape.
            return Ok(Some(Key::Escape));
        };
        match byte {
            b'0'..=b'9' | b';' => params.push(byte as char),
            final_byte @ 0x40..=0x7e => {
                return Ok(Some(compose_csi(&params, final_byte)));
            }
            other => {
                return Ok(Some(Key::Unknown(format!(
                    "\\e[{}{}",
                    params, other as char
                ))));
            }
        }
    }
}

fn compose_csi(params: &str, final_byte: u8) -> Key {
    match (params, final_byte) {
        ("", b'A') => Key::Up,
        ("", b'B') => Key::Down,
        ("", b'C') => Key::Right,
        ("", b'D') => Key::Left,
        ("", b'H') | ("1", b'~') | ("7", b'~') => Key::Home,
        ("", b'F') | ("4", b'~') | ("8", b'~') => Key::End,
        ("3", b'~') => Key::Delete,
        ("", b'Z') => Key::BackTab,
        _ => Key::Unknown(format!("\\e[{}{}", params, final_byte as char)),
    }
}

/// Restores the terminal's cooked mode when dropped, so every exit path
/// out of a read loop puts the terminal back.
pub struct RawModeGuard(());

impl RawModeGuard {
    pub fn enable() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        trace!("raw mode enabled");
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Nothing sensible to do with a failure during unwinding.
        let _ = crossterm::terminal::disable_raw_mode();
        trace!("raw mode restored");
    }
}

enum TtyFd {
    Stdin(io::Stdin),
    DevTty(File),
}

/// Byte source backed by the controlling terminal: stdin when it is a TTY,
/// otherwise `/dev/tty` (stdin may be a pipe while the user still has a
/// terminal attached).
pub struct TtySource {
    fd: TtyFd,
}

impl TtySource {
    pub fn open() -> Result<Self> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return Ok(Self {
                fd: TtyFd::Stdin(stdin),
            });
        }
        match File::options().read(true).write(true).open("/dev/tty") {
            Ok(file) => Ok(Self {
                fd: TtyFd::DevTty(file),
            }),
            Err(_) => Err(Error::NoTerminal),
        }
    }

    fn raw_fd(&self) -> RawFd {
        match &self.fd {
            TtyFd::Stdin(stdin) => stdin.as_raw_fd(),
            TtyFd::DevTty(file) => file.as_raw_fd(),
        }
    }

    fn read_one(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        let n = match &mut self.fd {
            TtyFd::Stdin(stdin) => stdin.read(&mut buf)?,
            TtyFd::DevTty(file) => file.read(&mut buf)?,
        };
        Ok((n == 1).then(|| buf[0]))
    }
}

impl ByteSource for TtySource {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.read_one()
    }

    fn read_byte_timeout(&mut self, timeout: Duration) -> Result<Option<u8>> {
        let mut pfd = libc::pollfd {
            fd: self.raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
        let ready = loop {
            let rc = unsafe { libc::poll(&mut pfd, 1, millis) };
            if rc >= 0 {
                break rc;
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err.into());
            }
        };
        if ready == 0 {
            return Ok(None);
        }
        self.read_one()
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::script::ScriptedSource;
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(50);

    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut source = ScriptedSource::immediate(bytes);
        let mut keys = Vec::new();
        while let Some(key) = read_key(&mut source, TIMEOUT).unwrap() {
            keys.push(key);
        }
        keys
    }

    #[test]
    fn plain_bytes_decode_immediately() {
        assert_eq!(
            decode_all(b"ab \r\t"),
            vec![
                Key::Char('a'),
                Key::Char('b'),
                Key::Char(' '),
                Key::Enter,
                Key::Tab,
            ]
        );
    }

    #[test]
    fn control_chords() {
        assert_eq!(decode_all(&[0x03]), vec![Key::Ctrl('c')]);
        assert_eq!(decode_all(&[0x01]), vec![Key::Ctrl('a')]);
        assert_eq!(decode_all(&[0x7f, 0x08]), vec![Key::Backspace, Key::Backspace]);
    }

    #[test]
    fn csi_arrow_keys_compose() {
        assert_eq!(decode_all(b"\x1b[A"), vec![Key::Up]);
        assert_eq!(decode_all(b"\x1b[B"), vec![Key::Down]);
        assert_eq!(decode_all(b"\x1b[C"), vec![Key::Right]);
        assert_eq!(decode_all(b"\x1b[D"), vec![Key::Left]);
        assert_eq!(decode_all(b"\x1b[Z"), vec![Key::BackTab]);
        assert_eq!(decode_all(b"\x1b[3~"), vec![Key::Delete]);
        assert_eq!(decode_all(b"\x1bOH"), vec![Key::Home]);
    }

    #[test]
    fn lone_escape_resolves_after_timeout() {
        let mut source = ScriptedSource::with_pause_after(&[0x1b], b"x");
        assert_eq!(read_key(&mut source, TIMEOUT).unwrap(), Some(Key::Escape));
        // The byte after the pause is an ordinary key, not a continuation.
        assert_eq!(read_key(&mut source, TIMEOUT).unwrap(), Some(Key::Char('x')));
    }

    #[test]
    fn truncated_csi_degrades_to_escape() {
        let mut source = ScriptedSource::immediate(b"\x1b[");
        assert_eq!(read_key(&mut source, TIMEOUT).unwrap(), Some(Key::Escape));
    }

    #[test]
    fn multibyte_utf8_is_one_key() {
        assert_eq!(decode_all("é".as_bytes()), vec![Key::Char('é')]);
        assert_eq!(decode_all("한".as_bytes()), vec![Key::Char('한')]);
        assert_eq!(decode_all("🦀".as_bytes()), vec![Key::Char('🦀')]);
    }

    #[test]
    fn unrecognized_csi_is_kept_verbatim() {
        assert_eq!(
            decode_all(b"\x1b[5~"),
            vec![Key::Unknown("\\e[5~".into())]
        );
    }
}
