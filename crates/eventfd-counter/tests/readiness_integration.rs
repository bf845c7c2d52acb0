//! Readiness polling on the exposed descriptor
//!
//! An external poller sees the descriptor readable while the counter is
//! non-zero and writable while there is room for another increment.

#![cfg(target_os = "linux")]

use eventfd_counter::{CounterHandle, FlagSet};
use std::os::fd::RawFd;

fn poll_events(fd: RawFd) -> libc::c_short {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN | libc::POLLOUT,
        revents: 0,
    };
    // SAFETY: pfd is a single valid pollfd for the duration of the call.
    let res = unsafe { libc::poll(&mut pfd, 1, 0) };
    assert!(res >= 0, "poll failed: {}", std::io::Error::last_os_error());
    pfd.revents
}

#[test]
fn test_empty_counter_is_writable_not_readable() {
    let counter = CounterHandle::new(0, FlagSet::NONBLOCK).unwrap();
    let revents = poll_events(counter.descriptor().unwrap());
    assert_eq!(revents & libc::POLLIN, 0);
    assert_ne!(revents & libc::POLLOUT, 0);
}

#[test]
fn test_nonzero_counter_is_readable() {
    let counter = CounterHandle::new(0, FlagSet::NONBLOCK).unwrap();
    counter.signal().unwrap();
    let revents = poll_events(counter.descriptor().unwrap());
    assert_ne!(revents & libc::POLLIN, 0);

    counter.consume().unwrap();
    let revents = poll_events(counter.descriptor().unwrap());
    assert_eq!(revents & libc::POLLIN, 0);
}

#[test]
fn test_full_counter_is_not_writable() {
    let counter = CounterHandle::new(0, FlagSet::NONBLOCK).unwrap();
    counter.increment(u64::MAX - 1).unwrap();
    let revents = poll_events(counter.descriptor().unwrap());
    assert_ne!(revents & libc::POLLIN, 0);
    assert_eq!(revents & libc::POLLOUT, 0);
}
