//! Counter handle owning one kernel eventfd descriptor.
//!
//! The counter value lives in the kernel; the handle never caches it.
//! All mutation goes through read/write on the descriptor, so increments and
//! reads from any number of threads or processes are serialized by the
//! kernel without user-space locks.
//!
//! # Lifecycle
//!
//! ```text
//! open --close()--> closed
//! ```
//!
//! `closed` is terminal. Every other operation requires `open` and fails
//! with [`CounterError::ClosedHandle`] afterwards; a second `close()` fails
//! with [`CounterError::AlreadyClosed`].

use crate::codec;
use crate::error::{CounterError, Result};
use crate::flags::FlagSet;
use crate::sys;
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use tracing::{debug, trace, warn};

/// Open/closed tag; the descriptor exists only while open.
#[derive(Debug)]
enum State {
    Open(OwnedFd),
    Closed,
}

/// Handle to a kernel-maintained 64-bit event counter.
///
/// `increment` and `consume` take `&self` and may be called concurrently
/// (e.g. through an `Arc`). `close` takes `&mut self`, so it cannot race an
/// in-flight operation on the same handle.
///
/// # Examples
///
/// ```no_run
/// use eventfd_counter::{CounterHandle, FlagSet};
///
/// let mut counter = CounterHandle::new(30, FlagSet::empty())?;
/// assert_eq!(counter.consume()?, 30);
/// counter.increment(30)?;
/// assert_eq!(counter.as_integer()?, 30);
/// counter.close()?;
/// assert!(counter.close().is_err());
/// # Ok::<(), eventfd_counter::CounterError>(())
/// ```
#[derive(Debug)]
pub struct CounterHandle {
    state: State,
    flags: FlagSet,
}

impl CounterHandle {
    /// Creates a new kernel counter set to `initial_value`.
    ///
    /// Unrecognized flag bits fail with `InvalidArgument` before the kernel
    /// is called. The kernel creation call takes a 32-bit initial value, so
    /// anything above `u32::MAX` fails with `Creation`.
    pub fn new(initial_value: u64, flags: FlagSet) -> Result<Self> {
        let flags = codec::validate_flags(flags)?;

        let initial = u32::try_from(initial_value).map_err(|_| CounterError::Creation {
            initial_value,
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("initial value exceeds creation limit {}", u32::MAX),
            ),
        })?;

        let fd = sys::create(initial, flags).map_err(|source| CounterError::Creation {
            initial_value,
            source,
        })?;

        debug!(
            fd = fd.as_raw_fd(),
            initial_value,
            flags = %flags,
            "Created eventfd counter"
        );

        Ok(Self {
            state: State::Open(fd),
            flags,
        })
    }

    fn fd(&self) -> Result<BorrowedFd<'_>> {
        match &self.state {
            State::Open(fd) => Ok(fd.as_fd()),
            State::Closed => Err(CounterError::ClosedHandle),
        }
    }

    /// Atomically adds `amount` to the counter.
    ///
    /// Blocks while the addition would overflow the counter, unless the
    /// handle is non-blocking, in which case it fails with `WouldBlock`.
    /// Zero and `u64::MAX` are rejected with `InvalidArgument`.
    pub fn increment(&self, amount: u64) -> Result<()> {
        let fd = self.fd()?;
        let amount = codec::validate_increment(amount)?;
        sys::write_value(fd, amount)?;
        trace!(fd = fd.as_raw_fd(), amount, "Incremented counter");
        Ok(())
    }

    /// Increments the counter by one.
    pub fn signal(&self) -> Result<()> {
        self.increment(1)
    }

    /// Reads the counter.
    ///
    /// Default mode returns the whole value and resets the counter to 0.
    /// Semaphore mode returns 1 and decrements the counter by 1. A zero
    /// counter blocks the caller, or fails with `WouldBlock` when the handle
    /// is non-blocking.
    pub fn consume(&self) -> Result<u64> {
        let fd = self.fd()?;
        let value = sys::read_value(fd)?;
        trace!(fd = fd.as_raw_fd(), value, "Consumed counter");
        Ok(value)
    }

    /// Reads the current signal count; same as [`consume`](Self::consume).
    pub fn as_integer(&self) -> Result<u64> {
        self.consume()
    }

    /// Releases the descriptor.
    ///
    /// The handle is `closed` afterwards even if the kernel reports an error.
    pub fn close(&mut self) -> Result<()> {
        let fd = match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(fd) => fd,
            State::Closed => return Err(CounterError::AlreadyClosed),
        };

        let raw = fd.as_raw_fd();
        if let Err(e) = sys::close(fd) {
            warn!(fd = raw, error = %e, "Failed to release eventfd counter");
            return Err(e);
        }

        debug!(fd = raw, "Closed eventfd counter");
        Ok(())
    }

    /// Returns true once `close()` has been called.
    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Returns the pollable descriptor for an external readiness poller.
    ///
    /// The descriptor is readable while the counter is non-zero and writable
    /// while an increment of 1 would not overflow.
    pub fn descriptor(&self) -> Result<RawFd> {
        self.fd().map(|fd| fd.as_raw_fd())
    }

    /// Flags the counter was created with.
    pub fn flags(&self) -> FlagSet {
        self.flags
    }

    /// Returns true if reads use semaphore semantics.
    pub fn is_semaphore(&self) -> bool {
        self.flags.contains(FlagSet::SEMAPHORE)
    }

    /// Returns true if reads and writes never suspend.
    pub fn is_nonblocking(&self) -> bool {
        self.flags.contains(FlagSet::NONBLOCK)
    }
}

impl Drop for CounterHandle {
    fn drop(&mut self) {
        if let State::Open(fd) = std::mem::replace(&mut self.state, State::Closed) {
            let raw = fd.as_raw_fd();
            debug!(fd = raw, "Releasing open eventfd counter on drop");
            if let Err(e) = sys::close(fd) {
                warn!(fd = raw, error = %e, "Failed to release eventfd counter");
            }
        }
    }
}
