// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Silencing the process's standard output and error while the engine runs.
//!
//! Redirection is process-wide, so it is reference counted: the first [`SilencedOutput`] points
//! stdout and stderr at the null device, and dropping the last one restores the originals. Drop
//! also runs during unwinding, so a panicking engine doesn't leave the streams redirected.

use crate::errors::DisplayErrorChain;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

static STATE: Mutex<SilenceState> = Mutex::new(SilenceState {
    count: 0,
    saved: None,
});

#[derive(Debug)]
struct SilenceState {
    count: usize,
    saved: Option<imp::SavedStreams>,
}

/// A guard that keeps stdout and stderr silenced while it is alive.
#[derive(Debug)]
pub(crate) struct SilencedOutput {
    _priv: (),
}

impl SilencedOutput {
    /// Silences stdout and stderr until the returned guard is dropped.
    ///
    /// Returns `None`, after logging a warning, if the streams could not be redirected.
    pub(crate) fn acquire() -> Option<Self> {
        let mut state = STATE.lock().unwrap_or_else(PoisonError::into_inner);
        if state.count == 0 {
            match imp::redirect_to_null() {
                Ok(saved) => state.saved = Some(saved),
                Err(error) => {
                    warn!(
                        "failed to silence output, running tests with output enabled: {}",
                        DisplayErrorChain::new(error)
                    );
                    return None;
                }
            }
        }
        state.count += 1;
        Some(Self { _priv: () })
    }
}

impl Drop for SilencedOutput {
    fn drop(&mut self) {
        let mut state = STATE.lock().unwrap_or_else(PoisonError::into_inner);
        state.count -= 1;
        if state.count > 0 {
            return;
        }
        if let Some(saved) = state.saved.take() {
            if let Err(error) = imp::restore(saved) {
                warn!(
                    "failed to restore output streams: {}",
                    DisplayErrorChain::new(error)
                );
            }
        }
    }
}

#[cfg(unix)]
mod imp {
    use std::{
        fs::OpenOptions,
        io::{self, Write},
        os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd},
    };

    /// Duplicates of the original stdout and stderr.
    #[derive(Debug)]
    pub(super) struct SavedStreams {
        stdout: OwnedFd,
        stderr: OwnedFd,
    }

    pub(super) fn redirect_to_null() -> io::Result<SavedStreams> {
        flush_std();
        let null = OpenOptions::new().write(true).open("/dev/null")?;
        let saved = SavedStreams {
            stdout: dup(libc::STDOUT_FILENO)?,
            stderr: dup(libc::STDERR_FILENO)?,
        };

        dup2(null.as_raw_fd(), libc::STDOUT_FILENO)?;
        if let Err(error) = dup2(null.as_raw_fd(), libc::STDERR_FILENO) {
            // Put stdout back so we don't leave the process half-silenced.
            let _ = dup2(saved.stdout.as_raw_fd(), libc::STDOUT_FILENO);
            return Err(error);
        }
        Ok(saved)
    }

    pub(super) fn restore(saved: SavedStreams) -> io::Result<()> {
        flush_std();
        let stdout_res = dup2(saved.stdout.as_raw_fd(), libc::STDOUT_FILENO);
        let stderr_res = dup2(saved.stderr.as_raw_fd(), libc::STDERR_FILENO);
        stdout_res.and(stderr_res)
    }

    fn flush_std() {
        // Buffered output written before (or during) the redirection belongs to that period.
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }

    fn dup(fd: RawFd) -> io::Result<OwnedFd> {
        // SAFETY: dup has no memory-safety preconditions.
        let new_fd = unsafe { libc::dup(fd) };
        if new_fd == -1 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: new_fd was just returned by dup and is owned by nothing else.
        Ok(unsafe { OwnedFd::from_raw_fd(new_fd) })
    }

    fn dup2(src: RawFd, dst: RawFd) -> io::Result<()> {
        loop {
            // SAFETY: dup2 has no memory-safety preconditions.
            if unsafe { libc::dup2(src, dst) } != -1 {
                return Ok(());
            }
            let error = io::Error::last_os_error();
            if error.kind() != io::ErrorKind::Interrupted {
                return Err(error);
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::io;

    #[derive(Debug)]
    pub(super) struct SavedStreams;

    pub(super) fn redirect_to_null() -> io::Result<SavedStreams> {
        Ok(SavedStreams)
    }

    pub(super) fn restore(_saved: SavedStreams) -> io::Result<()> {
        Ok(())
    }
}
