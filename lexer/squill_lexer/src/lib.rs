//! SQL-92 grammars for the squill matching engine.
//!
//! Two grammars over the same protocol: [`L0Grammar`] matches decoded
//! characters into leaf tokens (whitespace, comments, quoted literals,
//! letter and digit runs, symbols), and [`L1Grammar`] re-matches that token
//! stream into the shapes a SQL parser consumes (typed string literals,
//! signed/unsigned exact and approximate numeric literals, barewords).
//! [`Pipeline`] wires them together for streaming use.
//!
//! ```
//! use squill_lexer::{tokenize, TokenName};
//!
//! let tokens = tokenize("SELECT x'FF' FROM t WHERE n = -1.5e+10").unwrap();
//! let names: Vec<TokenName> = tokens.iter().map(|t| t.name).collect();
//! assert!(names.contains(&TokenName::XString));
//! assert!(names.contains(&TokenName::ApproximateSignedNumber));
//! ```

mod l0;
mod l1;
mod pipeline;

pub use l0::L0Grammar;
pub use l1::L1Grammar;
pub use pipeline::{tokenize, Pipeline};

pub use squill_ir::{Span, Token, TokenName};
pub use squill_lexer_core::{LexError, Progress};
