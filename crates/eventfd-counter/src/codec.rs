//! Wire codec for the value exchanged with the kernel.
//!
//! The kernel reads and writes the counter as exactly eight bytes in host
//! byte order. This module owns that encoding and the argument checks that
//! must pass before any kernel call is issued.

use crate::error::{CounterError, Result};
use crate::flags::FlagSet;
use std::io;

/// Size of every counter read or write, in bytes.
pub const WIRE_SIZE: usize = std::mem::size_of::<u64>();

/// Largest value the counter can hold (2^64 - 2).
pub const MAX_COUNTER_VALUE: u64 = u64::MAX - 1;

/// Reserved increment amount (all bits set), always rejected.
pub const RESERVED_AMOUNT: u64 = u64::MAX;

/// Encodes a counter value in host byte order.
pub const fn encode(value: u64) -> [u8; WIRE_SIZE] {
    value.to_ne_bytes()
}

/// Decodes a counter value from host byte order.
pub const fn decode(bytes: [u8; WIRE_SIZE]) -> u64 {
    u64::from_ne_bytes(bytes)
}

/// Decodes the bytes transferred by a kernel read.
///
/// Anything other than a full eight-byte transfer is a protocol violation.
pub fn decode_slice(buf: &[u8]) -> Result<u64> {
    let bytes: [u8; WIRE_SIZE] = buf.try_into().map_err(|_| {
        CounterError::system(
            "read",
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short read: expected {WIRE_SIZE} bytes, got {}", buf.len()),
            ),
        )
    })?;
    Ok(decode(bytes))
}

/// Rejects flag sets carrying bits outside CLOEXEC, NONBLOCK and SEMAPHORE.
pub fn validate_flags(flags: FlagSet) -> Result<FlagSet> {
    let unknown = flags.bits() & !FlagSet::all().bits();
    if unknown != 0 {
        return Err(CounterError::InvalidArgument(format!(
            "unrecognized flag bits {unknown:#x}"
        )));
    }
    Ok(flags)
}

/// Rejects increment amounts the kernel would refuse.
pub fn validate_increment(amount: u64) -> Result<u64> {
    match amount {
        0 => Err(CounterError::InvalidArgument(
            "increment amount must be non-zero".to_string(),
        )),
        RESERVED_AMOUNT => Err(CounterError::InvalidArgument(format!(
            "increment amount {RESERVED_AMOUNT:#x} is reserved"
        ))),
        _ => Ok(amount),
    }
}
