use core::fmt::{self, Write};

use defmt::Format;
use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;

use crate::{Arbiter, LightSink, Player};

/// Length of the `"Button1"` / `"Button2"` payload handed to a reader.
pub const WINNER_PAYLOAD_LEN: usize = 7;

/// Capacity of the diagnostic message kept by [`Session::write`].
pub const MESSAGE_CAPACITY: usize = 256;

#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The winner could not be copied into the caller's buffer. Nothing was
    /// written.
    Fault,
}

impl SessionError {
    /// Errno-style status, negative like the rest of the device interface.
    pub fn status(self) -> i32 {
        match self {
            SessionError::Fault => -14,
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Fault => f.write_str("bad address"),
        }
    }
}

impl core::error::Error for SessionError {}

fn winner_payload(winner: Player) -> [u8; WINNER_PAYLOAD_LEN] {
    let mut payload = *b"Button0";
    payload[WINNER_PAYLOAD_LEN - 1] += winner.id();
    payload
}

/// A game session on top of an [`Arbiter`], shaped like a character device:
/// open, read the winner, write diagnostics, close.
///
/// Closing (or dropping) the session switches all lights off.
pub struct Session<'a, M: RawMutex, S: LightSink> {
    arbiter: &'a Arbiter<M, S>,
    undelivered: Option<Player>,
    message: String<MESSAGE_CAPACITY>,
}

impl<'a, M: RawMutex, S: LightSink> Session<'a, M, S> {
    /// Puts both players in standby and drops any stale waiter.
    pub fn open(arbiter: &'a Arbiter<M, S>) -> Self {
        arbiter.arm();

        Self {
            arbiter,
            undelivered: None,
            message: String::new(),
        }
    }

    /// Re-arms the round, waits for the first press and copies its payload
    /// into `buf`. Returns the number of bytes written.
    ///
    /// If `buf` is too short the call fails with [`SessionError::Fault`] and
    /// the winner is kept. The next `read` then delivers it straight away
    /// instead of re-arming, since the round is already decided.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SessionError> {
        let winner = match self.undelivered.take() {
            Some(winner) => winner,
            None => self.arbiter.await_winner().await,
        };

        let payload = winner_payload(winner);
        let Some(dest) = buf.get_mut(..payload.len()) else {
            self.undelivered = Some(winner);
            return Err(SessionError::Fault);
        };

        dest.copy_from_slice(&payload);
        Ok(payload.len())
    }

    /// Stores `"<payload>(<len> letters)"` for later inspection and reports
    /// the whole payload as accepted. Overlong messages are cut at the
    /// buffer's capacity.
    pub fn write(&mut self, payload: &[u8]) -> usize {
        self.message.clear();
        write!(
            Truncating {
                buf: &mut self.message,
                full: false,
            },
            "{}({} letters)",
            Lossy(payload),
            payload.len()
        )
        .ok();

        payload.len()
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn undelivered(&self) -> Option<Player> {
        self.undelivered
    }

    pub fn arbiter(&self) -> &'a Arbiter<M, S> {
        self.arbiter
    }

    pub fn close(self) {}
}

impl<M: RawMutex, S: LightSink> Drop for Session<'_, M, S> {
    fn drop(&mut self) {
        self.arbiter.blank();
    }
}

struct Truncating<'s> {
    buf: &'s mut String<MESSAGE_CAPACITY>,
    full: bool,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full {
                break;
            }
            self.full = self.buf.push(c).is_err();
        }
        Ok(())
    }
}

struct Lossy<'b>(&'b [u8]);

impl fmt::Display for Lossy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.0.utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}
