//! Kernel-maintained 64-bit event counter behind a pollable descriptor.
//!
//! A [`CounterHandle`] owns one Linux eventfd. Threads or processes holding
//! the descriptor signal each other by incrementing the counter and wait by
//! reading it; the kernel does all blocking and serialization.
//!
//! - [`CounterHandle`]: create, increment, consume, close
//! - [`FlagSet`]: CLOEXEC / NONBLOCK / SEMAPHORE creation flags
//! - [`codec`]: the eight-byte host-order value exchanged with the kernel
//! - [`CounterConfig`]: TOML-loadable construction parameters
//!
//! This is a counting/signaling primitive only, not a mutual-exclusion lock.

pub mod codec;
pub mod config;
pub mod error;
mod flags;
mod handle;
mod sys;

pub use config::CounterConfig;
pub use error::{CounterError, Result};
pub use flags::FlagSet;
pub use handle::CounterHandle;
