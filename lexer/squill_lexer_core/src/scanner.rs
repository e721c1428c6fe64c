//! Growing window of units not yet resolved into a token.
//!
//! The scanner separates two offsets: `base`, the absolute position of the
//! window start (units already emitted in completed tokens), and `commit`,
//! the number of window units speculatively consumed by the current attempt.
//! A rule can consume arbitrarily far, discover a mismatch, and rewind
//! without re-decoding anything: rewinding just resets `commit`, making the
//! same units offerable again.
//!
//! # Invariant
//!
//! `commit <= pending.len()`. After a completed token the window holds
//! exactly the unconsumed tail and `commit` is zero.

use std::collections::VecDeque;

/// Buffer of pending units with commit/rewind bookkeeping.
#[derive(Debug, Clone)]
pub struct Scanner<U> {
    /// Units fed but not yet part of a completed token.
    pending: VecDeque<U>,
    /// Window units committed to the current attempt.
    commit: usize,
    /// Absolute offset of `pending[0]` in the overall stream.
    base: u32,
    /// Total units accepted from the source. Monotone; diagnostics only.
    fed: u64,
    /// End-of-source has been signaled (distinct from an empty chunk).
    ended: bool,
}

impl<U> Scanner<U> {
    pub fn new() -> Self {
        Scanner {
            pending: VecDeque::new(),
            commit: 0,
            base: 0,
            fed: 0,
            ended: false,
        }
    }

    /// Append one unit to the window. Does not drive matching.
    pub fn push(&mut self, unit: U) {
        debug_assert!(!self.ended, "push after end of source");
        self.pending.push_back(unit);
        self.fed += 1;
    }

    /// Append a chunk of units to the window.
    pub fn feed<I>(&mut self, units: I)
    where
        I: IntoIterator<Item = U>,
    {
        for unit in units {
            self.push(unit);
        }
    }

    /// Signal end-of-source. No further units may be fed.
    pub fn end(&mut self) {
        self.ended = true;
    }

    /// Whether end-of-source has been signaled.
    #[inline]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The unit currently offered to the active rule, if any.
    #[inline]
    pub fn offered(&self) -> Option<&U> {
        self.pending.get(self.commit)
    }

    /// Commit the offered unit to the current attempt.
    pub fn consume(&mut self) {
        debug_assert!(self.commit < self.pending.len(), "consume past window");
        self.commit += 1;
    }

    /// Reset the attempt to its start, re-offering every committed unit.
    pub fn rewind(&mut self) {
        self.rewind_to(0);
    }

    /// Reset the commit offset to `offset` units into the attempt.
    pub fn rewind_to(&mut self, offset: usize) {
        debug_assert!(offset <= self.commit, "rewind forward");
        self.commit = offset;
    }

    /// Remove and return the committed prefix, advancing the window base.
    ///
    /// Called on completion: the returned units become the token, the
    /// window keeps exactly the unconsumed tail.
    pub fn take_committed(&mut self) -> Vec<U> {
        let units: Vec<U> = self.pending.drain(..self.commit).collect();
        self.base = self
            .base
            .saturating_add(u32::try_from(self.commit).unwrap_or(u32::MAX));
        self.commit = 0;
        units
    }

    /// Units committed to the current attempt.
    #[inline]
    pub fn committed(&self) -> usize {
        self.commit
    }

    /// Absolute offset of the current attempt start.
    #[inline]
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Absolute offset just past the last committed unit.
    ///
    /// Equals units emitted in completed tokens plus currently committed
    /// attempt units. Dips on rewind; see [`fed`](Self::fed) for the
    /// monotone source-side counter.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.base
            .saturating_add(u32::try_from(self.commit).unwrap_or(u32::MAX))
    }

    /// Total units accepted from the source so far.
    #[inline]
    pub fn fed(&self) -> u64 {
        self.fed
    }
}

impl<U> Default for Scanner<U> {
    fn default() -> Self {
        Self::new()
    }
}
