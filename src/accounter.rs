//! Resource accounting for untrusted input.
//!
//! Every decode step charges an [`Accounter`] with the estimated heap cost of
//! what it is about to build, and pushes a nesting level before descending into
//! a list or compound. Either budget running out aborts the decode.

use crate::{Error, Result};

/// Maximum nesting depth shared by every accounter preset.
pub const MAX_DEPTH: usize = 512;

/// Byte quota for input from an untrusted source (2 MiB).
pub const UNTRUSTED_QUOTA: u64 = 2 * 1024 * 1024;

/// Byte quota for input from a trusted local source (100 MiB).
pub const TRUSTED_QUOTA: u64 = 100 * 1024 * 1024;

/// Tracks bytes charged and nesting depth during one decode.
///
/// # Examples
///
/// ```rust
/// use serde_nbt::{Accounter, Error};
///
/// let mut acc = Accounter::new(16);
/// acc.account_bytes(12).unwrap();
/// assert!(matches!(acc.account_bytes(8), Err(Error::QuotaExceeded { .. })));
/// assert_eq!(acc.usage(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accounter {
    quota: u64,
    usage: u64,
    max_depth: usize,
    depth: usize,
}

impl Accounter {
    /// Creates an accounter with the given byte quota and the default depth limit.
    #[must_use]
    pub const fn new(quota: u64) -> Self {
        Accounter {
            quota,
            usage: 0,
            max_depth: MAX_DEPTH,
            depth: 0,
        }
    }

    /// Creates an accounter with an explicit depth limit.
    #[must_use]
    pub const fn with_max_depth(quota: u64, max_depth: usize) -> Self {
        Accounter {
            quota,
            usage: 0,
            max_depth,
            depth: 0,
        }
    }

    /// Preset for network or otherwise untrusted input.
    #[must_use]
    pub const fn untrusted() -> Self {
        Self::new(UNTRUSTED_QUOTA)
    }

    /// Preset for local files.
    #[must_use]
    pub const fn trusted() -> Self {
        Self::new(TRUSTED_QUOTA)
    }

    /// No byte quota. The depth limit still applies.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self::new(u64::MAX)
    }

    #[must_use]
    pub const fn quota(&self) -> u64 {
        self.quota
    }

    /// Bytes charged so far.
    #[must_use]
    pub const fn usage(&self) -> u64 {
        self.usage
    }

    /// Current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Charges `bytes` against the quota.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QuotaExceeded`] if the total would exceed the quota.
    /// Usage is unchanged on failure.
    pub fn account_bytes(&mut self, bytes: u64) -> Result<()> {
        match self.usage.checked_add(bytes) {
            Some(total) if total <= self.quota => {
                self.usage = total;
                Ok(())
            }
            _ => Err(Error::QuotaExceeded {
                used: self.usage,
                attempted: bytes,
                quota: self.quota,
            }),
        }
    }

    /// Charges `per_item * count` bytes; an overflowing product counts as
    /// exceeding the quota.
    pub fn account_bytes_each(&mut self, per_item: u64, count: u64) -> Result<()> {
        let total = per_item.checked_mul(count).ok_or(Error::QuotaExceeded {
            used: self.usage,
            attempted: u64::MAX,
            quota: self.quota,
        })?;
        self.account_bytes(total)
    }

    /// Charges a string of `utf16_len` code units.
    pub(crate) fn account_string(&mut self, utf16_len: u64) -> Result<()> {
        self.account_bytes(36)?;
        self.account_bytes_each(2, utf16_len)
    }

    /// Enters one nesting level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthExceeded`] when the current depth has reached the limit.
    pub fn push_depth(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthExceeded {
                max: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves one nesting level.
    pub fn pop_depth(&mut self) {
        debug_assert!(self.depth > 0, "pop_depth without matching push_depth");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Runs `f` one nesting level deeper. The level is popped whether `f`
    /// succeeds or fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_nbt::{Accounter, Error, Result};
    ///
    /// let mut acc = Accounter::unlimited();
    /// let result: Result<()> = acc.with_depth(|acc| {
    ///     assert_eq!(acc.depth(), 1);
    ///     Err(Error::custom("boom"))
    /// });
    /// assert!(result.is_err());
    /// assert_eq!(acc.depth(), 0);
    /// ```
    pub fn with_depth<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.push_depth()?;
        let result = f(self);
        self.pop_depth();
        result
    }
}

impl Default for Accounter {
    fn default() -> Self {
        Self::trusted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_boundary_is_inclusive() {
        let mut acc = Accounter::new(10);
        acc.account_bytes(10).unwrap();
        let err = acc.account_bytes(1).unwrap_err();
        assert!(matches!(
            err,
            Error::QuotaExceeded {
                used: 10,
                attempted: 1,
                quota: 10
            }
        ));
    }

    #[test]
    fn test_account_each_overflow_fails() {
        let mut acc = Accounter::unlimited();
        assert!(acc.account_bytes_each(8, u64::MAX).is_err());
        assert_eq!(acc.usage(), 0);
    }

    #[test]
    fn test_account_string() {
        let mut acc = Accounter::new(40);
        acc.account_string(2).unwrap();
        assert_eq!(acc.usage(), 40);
        assert!(acc.account_string(0).is_err());
    }

    #[test]
    fn test_depth_limit() {
        let mut acc = Accounter::with_max_depth(u64::MAX, 2);
        acc.push_depth().unwrap();
        acc.push_depth().unwrap();
        assert!(matches!(
            acc.push_depth(),
            Err(Error::DepthExceeded { max: 2 })
        ));
        acc.pop_depth();
        acc.pop_depth();
        assert_eq!(acc.depth(), 0);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Accounter::untrusted().quota(), 2_097_152);
        assert_eq!(Accounter::trusted().quota(), 104_857_600);
        assert_eq!(Accounter::unlimited().max_depth(), MAX_DEPTH);
    }
}
