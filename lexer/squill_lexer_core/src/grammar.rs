//! The matcher protocol: how a grammar talks to the engine.
//!
//! A grammar is an ordered rule list plus transition functions. Each rule
//! is a finite state machine with explicit, named states — the active
//! continuation the engine holds across chunk boundaries is a plain state
//! value, so a suspended attempt is inspectable and resumable.
//!
//! Rules only influence the outcome through the [`Step`] they return;
//! they never touch the window themselves.

use std::fmt;

use squill_ir::{Span, Token, TokenName};

/// One committed unit of an attempt, with whether it contributes to the
/// token's cooked value (`false` for delimiters and markers the rule
/// consumed but dropped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<U> {
    pub unit: U,
    pub kept: bool,
}

/// Completion override: the committed units become a token of a different
/// name with a rule-supplied value. Used for reclassification, e.g. a lone
/// `-` consumed by the comment rule completing as a `$symbol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retag {
    pub name: TokenName,
    pub value: String,
}

/// A rule's answer to one offered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<S> {
    /// Consume the unit into the token, keep it in the cooked value.
    Take(S),
    /// Consume the unit into the token, but drop it from the cooked value.
    Discard(S),
    /// Consume the unit, then complete the token.
    TakeFinish,
    /// Complete the token; the offered unit is left to start the next
    /// attempt.
    Finish,
    /// Complete the committed units as a different token.
    Retag(Retag),
    /// This rule does not match. On the first unit the engine tries the
    /// next rule from the same start; mid-attempt it abandons the whole
    /// attempt (with no fallback rule this surfaces as a fatal error).
    Reject,
    /// Undo the attempt: committed units are replayed through the rule
    /// list with this rule excluded.
    Revert,
}

/// A suspended rule's answer to the window draining mid-attempt while more
/// input may still arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnChunkEnd {
    /// The token ends exactly at the boundary (whitespace).
    Finish,
    /// Hold the attempt; resume when the next chunk arrives.
    Wait,
}

/// A suspended rule's answer to the true end of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnSourceEnd {
    /// The committed units form a complete token.
    Finish,
    /// Replay the committed units through the other rules.
    Revert,
    /// The token cannot complete: fatal, unterminated at end of input.
    Error,
}

/// An ordered rule list with its transition functions, driven by a
/// [`Matcher`](crate::Matcher).
pub trait Grammar {
    /// What the rules match over: `char` for the character layer, `Token`
    /// for the token layer.
    type Unit: Clone + fmt::Debug;
    /// Per-rule machine state. Cheap to clone; held across suspensions.
    type State: Clone + fmt::Debug;

    /// Rules in priority order. First accepting rule wins; there is no
    /// longest-match election among candidates.
    fn rules(&self) -> &'static [TokenName];

    /// Offer the first unit of a new attempt to `rule`.
    fn begin(&self, rule: TokenName, unit: &Self::Unit) -> Step<Self::State>;

    /// Offer a subsequent unit to the active rule in `state`.
    fn resume(&self, rule: TokenName, state: Self::State, unit: &Self::Unit) -> Step<Self::State>;

    /// The window drained mid-attempt and more input may arrive.
    fn at_chunk_end(&self, rule: TokenName, state: &Self::State) -> OnChunkEnd {
        let _ = (rule, state);
        OnChunkEnd::Wait
    }

    /// The window drained mid-attempt at the true end of the source.
    fn at_source_end(&self, rule: TokenName, state: &Self::State) -> OnSourceEnd;

    /// Build the completed token from the committed parts.
    ///
    /// `span` is in engine units (characters for the character layer,
    /// token ordinals for the token layer); grammars whose tokens span
    /// source characters derive the final span from the parts instead.
    fn assemble(
        &self,
        rule: TokenName,
        parts: Vec<Part<Self::Unit>>,
        retag: Option<Retag>,
        span: Span,
    ) -> Token;
}
