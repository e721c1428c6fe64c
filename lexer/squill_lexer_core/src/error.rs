//! Fatal lexer errors.
//!
//! A fatal error terminates the owning layer immediately; no partial token
//! is emitted for the failed attempt, and retry/resync is the consumer's
//! decision. Each variant carries the offending unit (debug-rendered, since
//! units are generic), the stream offset in engine units, and the last rule
//! that was active or tried.

use squill_ir::TokenName;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// Every rule rejected the first unit of a new attempt.
    #[error("no rule matched {unit} at offset {offset} (last rule tried: {rule})")]
    NoRuleMatched {
        unit: String,
        offset: u32,
        rule: TokenName,
    },

    /// The source ended inside an attempt that cannot complete.
    #[error("input ended inside {rule} at offset {offset}")]
    UnterminatedAtEof { rule: TokenName, offset: u32 },

    /// Reverting excluded every candidate rule without progress. Rules are
    /// written so this cannot happen; reported instead of looping.
    #[error("revert made no progress on {unit} at offset {offset} (last rule: {rule})")]
    RevertExhausted {
        unit: String,
        offset: u32,
        rule: TokenName,
    },
}

impl LexError {
    /// Stream offset of the failure, in the failing layer's units.
    pub fn offset(&self) -> u32 {
        match self {
            LexError::NoRuleMatched { offset, .. }
            | LexError::UnterminatedAtEof { offset, .. }
            | LexError::RevertExhausted { offset, .. } => *offset,
        }
    }

    /// The last rule active or tried when the layer failed.
    pub fn rule(&self) -> TokenName {
        match self {
            LexError::NoRuleMatched { rule, .. }
            | LexError::UnterminatedAtEof { rule, .. }
            | LexError::RevertExhausted { rule, .. } => *rule,
        }
    }
}
