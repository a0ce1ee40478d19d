//! Arena link index with a sentinel "none" value.
//!
//! Waitlist nodes link to each other through [`Slot`]s rather than pointers
//! or `Option<usize>`. A reserved sentinel (`usize::MAX`) marks the end of
//! the chain, which keeps every node link a single word.

/// Index of a node in the waitlist arena.
///
/// `Slot::NONE` is the null link. Any other value is a key handed out by the
/// backing `slab::Slab`.
///
/// Crate-private: nothing outside the waitlist hands out or accepts slots.
///
/// ```compile_fail
/// use nexus_waitlist::Slot;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Slot(usize);

impl Slot {
    /// Sentinel value representing "no node".
    pub const NONE: Self = Slot(usize::MAX);

    /// Returns `true` if this is the sentinel value.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == usize::MAX
    }

    /// Returns `true` if this is NOT the sentinel value.
    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Returns the arena key, or `None` for the sentinel.
    #[inline]
    pub const fn get(self) -> Option<usize> {
        if self.is_none() { None } else { Some(self.0) }
    }

    /// Returns the raw arena key.
    ///
    /// Only meaningful when [`is_some`](Self::is_some) holds.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for Slot {
    #[inline]
    fn from(key: usize) -> Self {
        Slot(key)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_none() {
        assert!(Slot::NONE.is_none());
        assert!(!Slot::NONE.is_some());
        assert_eq!(Slot::NONE.get(), None);
        assert_eq!(Slot::default(), Slot::NONE);
    }

    #[test]
    fn arena_keys_are_some() {
        for key in [0usize, 1, 100, usize::MAX - 1] {
            let slot = Slot::from(key);
            assert!(slot.is_some());
            assert_eq!(slot.get(), Some(key));
            assert_eq!(slot.index(), key);
        }
    }
}
