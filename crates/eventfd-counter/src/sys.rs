//! Kernel calls behind a counter handle.
//!
//! Linux: eventfd(2) plus plain read(2)/write(2)/close(2) on the descriptor.
//! Other Unix platforms: creation fails with ENOSYS so callers see a
//! `Creation` error instead of a build failure.

use crate::codec::{self, WIRE_SIZE};
use crate::error::{CounterError, Result};
use crate::flags::FlagSet;
use nix::errno::Errno;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, IntoRawFd, OwnedFd};

/// Creates a fresh kernel counter.
#[cfg(target_os = "linux")]
pub(crate) fn create(initial_value: u32, flags: FlagSet) -> io::Result<OwnedFd> {
    use std::os::fd::FromRawFd;

    // SAFETY: eventfd takes no pointers; the flags were validated by the codec.
    let fd = Errno::result(unsafe { libc::eventfd(initial_value, flags.bits() as libc::c_int) })?;
    // SAFETY: a successful eventfd returns a new descriptor nobody else owns.
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Creates a fresh kernel counter (unsupported outside Linux).
#[cfg(not(target_os = "linux"))]
pub(crate) fn create(_initial_value: u32, _flags: FlagSet) -> io::Result<OwnedFd> {
    Err(Errno::ENOSYS.into())
}

/// Reads the eight-byte counter value.
pub(crate) fn read_value(fd: BorrowedFd<'_>) -> Result<u64> {
    let mut buf = [0u8; WIRE_SIZE];
    loop {
        // SAFETY: buf is valid for WIRE_SIZE bytes of writes.
        let res = unsafe { libc::read(fd.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len()) };
        match Errno::result(res) {
            Ok(n) => return codec::decode_slice(&buf[..n as usize]),
            Err(Errno::EINTR) => continue,
            Err(Errno::EAGAIN) => return Err(CounterError::WouldBlock),
            Err(e) => return Err(CounterError::system("read", e)),
        }
    }
}

/// Writes an eight-byte increment.
pub(crate) fn write_value(fd: BorrowedFd<'_>, amount: u64) -> Result<()> {
    let buf = codec::encode(amount);
    loop {
        // SAFETY: buf is valid for WIRE_SIZE bytes of reads.
        let res = unsafe { libc::write(fd.as_raw_fd(), buf.as_ptr().cast(), buf.len()) };
        match Errno::result(res) {
            Ok(n) if n as usize == WIRE_SIZE => return Ok(()),
            Ok(n) => {
                return Err(CounterError::system(
                    "write",
                    io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("short write: expected {WIRE_SIZE} bytes, wrote {n}"),
                    ),
                ));
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::EAGAIN) => return Err(CounterError::WouldBlock),
            Err(e) => return Err(CounterError::system("write", e)),
        }
    }
}

/// Releases the descriptor, reporting the kernel's verdict.
///
/// The descriptor is gone afterwards even when an error is returned.
pub(crate) fn close(fd: OwnedFd) -> Result<()> {
    let raw = fd.into_raw_fd();
    // SAFETY: raw came from an OwnedFd and is released exactly once here.
    Errno::result(unsafe { libc::close(raw) })
        .map(drop)
        .map_err(|e| CounterError::system("close", e))
}
