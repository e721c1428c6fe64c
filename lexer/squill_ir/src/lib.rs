//! Squill IR - shared lexer data model
//!
//! This crate contains the types exchanged between the two lexer layers and
//! handed to downstream consumers:
//! - [`Span`] for source locations (character offsets)
//! - [`TokenName`] for the closed set of rule/token names across both layers
//! - [`Token`] for completed tokens, including composite tokens that keep
//!   their sub-tokens
//!
//! Tokens are immutable once assembled; construction goes through the
//! [`Token`] constructors, which maintain the text/value invariants.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod span;
mod token;

pub use span::Span;
pub use token::{Token, TokenName};
