//! Generic incremental matching engine.
//!
//! One engine, two instantiations: the character layer matches decoded
//! `char` units into leaf tokens, and the token layer re-matches those
//! tokens — the same protocol with a different unit type. A grammar is
//! data: an ordered rule list plus a transition function over explicit
//! per-rule states, not a trait object per rule.
//!
//! The engine never blocks on input. When the window drains mid-attempt it
//! suspends the attempt and hands control back to the caller; feeding the
//! next chunk resumes the identical attempt. Backtracking is explicit:
//! `Reject` retries the next rule from the attempt start, `Revert` replays
//! already-committed units through the other rules.
//!
//! # Observability
//!
//! Every protocol step (begin/resume/reject/complete/revert, chunk and
//! source boundaries) emits a TRACE-level `tracing` event carrying the
//! layer, rule name, unit, and offsets. Without a subscriber these are
//! no-ops; with one, the full protocol conversation can be watched without
//! touching control flow.

mod error;
mod grammar;
mod matcher;
mod scanner;

pub use error::LexError;
pub use grammar::{Grammar, OnChunkEnd, OnSourceEnd, Part, Retag, Step};
pub use matcher::{Matcher, Progress};
pub use scanner::Scanner;
