//! Creation flags for an eventfd counter.

use crate::error::CounterError;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

#[cfg(target_os = "linux")]
mod abi {
    pub const CLOEXEC: u32 = libc::EFD_CLOEXEC as u32;
    pub const NONBLOCK: u32 = libc::EFD_NONBLOCK as u32;
    pub const SEMAPHORE: u32 = libc::EFD_SEMAPHORE as u32;
}

// Generic Linux values, used only so the crate builds elsewhere.
#[cfg(not(target_os = "linux"))]
mod abi {
    pub const CLOEXEC: u32 = 0o2000000;
    pub const NONBLOCK: u32 = 0o4000;
    pub const SEMAPHORE: u32 = 0o1;
}

bitflags! {
    /// Flag set chosen once at construction time.
    ///
    /// Bit values are the kernel eventfd ABI values; any subset is valid.
    ///
    /// ```
    /// use eventfd_counter::FlagSet;
    ///
    /// let flags: FlagSet = "nonblock|semaphore".parse().unwrap();
    /// assert!(flags.contains(FlagSet::SEMAPHORE));
    /// assert_eq!(flags.to_string(), "NONBLOCK|SEMAPHORE");
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FlagSet: u32 {
        /// Descriptor is not inherited across exec.
        const CLOEXEC = abi::CLOEXEC;
        /// Reads and writes fail with `WouldBlock` instead of suspending.
        const NONBLOCK = abi::NONBLOCK;
        /// Each read decrements the counter by one.
        const SEMAPHORE = abi::SEMAPHORE;
    }
}

impl FlagSet {
    /// Returns the flag matching a single name, if any.
    ///
    /// Names are case-insensitive and may carry the `EFD_` prefix.
    pub fn from_flag_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("EFD_").unwrap_or(&upper);
        match bare {
            "CLOEXEC" => Some(FlagSet::CLOEXEC),
            "NONBLOCK" => Some(FlagSet::NONBLOCK),
            "SEMAPHORE" => Some(FlagSet::SEMAPHORE),
            _ => None,
        }
    }

    /// Builds a flag set from a list of names.
    pub fn from_names<I, S>(names: I) -> Result<Self, CounterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(FlagSet::empty(), |acc, name| {
            let name = name.as_ref();
            FlagSet::from_flag_name(name)
                .map(|flag| acc | flag)
                .ok_or_else(|| CounterError::InvalidArgument(format!("unknown flag '{name}'")))
        })
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(name)?;
            first = false;
        }
        let unknown = self.bits() & !FlagSet::all().bits();
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{unknown:#x}")?;
        }
        Ok(())
    }
}

impl FromStr for FlagSet {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(FlagSet::empty());
        }
        FlagSet::from_names(s.split(['|', ',']))
    }
}
