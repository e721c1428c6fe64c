//! Rule dispatch over a [`Scanner`] window.
//!
//! One attempt is live at a time. The matcher offers units to rules in
//! priority order, holds the accepting rule's state machine across units
//! (and across chunk boundaries), and resolves the three ways an attempt
//! can end: completion, rejection into the next rule, or revert — undoing
//! a partially-committed composite and replaying its units through the
//! rule list from the top with the reverting rule excluded.
//!
//! # Invariant
//!
//! The revert exclusion set only grows between completed tokens, so each
//! replay dispatches over strictly fewer candidates and replay terminates.
//! An empty candidate set is reported as [`LexError::RevertExhausted`]
//! rather than looping.

use squill_ir::{Span, Token, TokenName};
use tracing::trace;

use crate::grammar::{Grammar, OnChunkEnd, OnSourceEnd, Part, Retag, Step};
use crate::scanner::Scanner;
use crate::LexError;

/// Progress report from [`Matcher::next_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A token completed.
    Token(Token),
    /// The window drained mid-stream; feed more input or signal the end.
    NeedInput,
    /// The source ended and every unit has been resolved.
    Done,
}

/// One rule's in-progress recognition of a token.
#[derive(Debug, Clone)]
struct Attempt<S> {
    /// Index of the owning rule in the grammar's rule list.
    rule: usize,
    /// The rule's current machine state.
    state: S,
    /// Per committed unit: does it contribute to the cooked value?
    kept: Vec<bool>,
}

/// What the driving loop should do after one protocol step.
enum Flow {
    Emit(Token),
    NeedInput,
    Done,
    Continue,
}

/// Dispatch engine for one layer.
pub struct Matcher<G: Grammar> {
    /// Layer label for trace events (`"l0"`, `"l1"`).
    layer: &'static str,
    grammar: G,
    scanner: Scanner<G::Unit>,
    attempt: Option<Attempt<G::State>>,
    /// Rule index to resume dispatch at; nonzero only right after a
    /// mid-attempt rejection.
    next_rule: usize,
    /// Bitmask of rules excluded at the current attempt start by reverts.
    skipped: u16,
    /// Last rule tried or active, reported in fatal errors.
    last_tried: TokenName,
}

impl<G: Grammar> Matcher<G> {
    pub fn new(layer: &'static str, grammar: G) -> Self {
        debug_assert!(!grammar.rules().is_empty(), "grammar has no rules");
        debug_assert!(
            grammar.rules().len() <= 16,
            "rule list exceeds the exclusion mask"
        );
        let last_tried = grammar.rules()[0];
        Matcher {
            layer,
            grammar,
            scanner: Scanner::new(),
            attempt: None,
            next_rule: 0,
            skipped: 0,
            last_tried,
        }
    }

    /// Append a chunk of units to the window. Does not drive matching.
    pub fn feed<I>(&mut self, units: I)
    where
        I: IntoIterator<Item = G::Unit>,
    {
        self.scanner.feed(units);
    }

    /// Signal end-of-source.
    pub fn end(&mut self) {
        trace!(layer = self.layer, "source end signaled");
        self.scanner.end();
    }

    /// The underlying window, for diagnostics.
    pub fn scanner(&self) -> &Scanner<G::Unit> {
        &self.scanner
    }

    /// Drive matching until a token completes, the window drains, or the
    /// stream is done. Fatal errors abandon the layer: the failed attempt
    /// emits nothing and subsequent calls keep failing.
    pub fn next_token(&mut self) -> Result<Progress, LexError> {
        loop {
            let flow = if self.attempt.is_some() {
                self.step_attempt()?
            } else {
                self.dispatch()?
            };
            match flow {
                Flow::Emit(token) => return Ok(Progress::Token(token)),
                Flow::NeedInput => return Ok(Progress::NeedInput),
                Flow::Done => return Ok(Progress::Done),
                Flow::Continue => {}
            }
        }
    }

    /// Idle: offer the next unit to the rules in order, starting at
    /// `next_rule` and skipping revert-excluded rules.
    fn dispatch(&mut self) -> Result<Flow, LexError> {
        let rules = self.grammar.rules();

        let found = {
            let Some(unit) = self.scanner.offered() else {
                if self.scanner.is_ended() {
                    trace!(layer = self.layer, pos = self.scanner.pos(), "stream done");
                    return Ok(Flow::Done);
                }
                return Ok(Flow::NeedInput);
            };

            let mut found = None;
            let mut index = self.next_rule;
            while index < rules.len() {
                if (self.skipped & (1 << index)) != 0 {
                    index += 1;
                    continue;
                }
                self.last_tried = rules[index];
                let step = self.grammar.begin(rules[index], unit);
                trace!(
                    layer = self.layer,
                    rule = %rules[index],
                    unit = ?unit,
                    step = ?step,
                    "begin"
                );
                match step {
                    Step::Reject => index += 1,
                    step => {
                        found = Some((index, step));
                        break;
                    }
                }
            }
            found
        };

        match found {
            Some((rule, step)) => Ok(self.apply(rule, step)),
            None => {
                let unit = self
                    .scanner
                    .offered()
                    .map_or_else(String::new, |u| format!("{u:?}"));
                let offset = self.scanner.pos();
                Err(if self.skipped == 0 {
                    LexError::NoRuleMatched {
                        unit,
                        offset,
                        rule: self.last_tried,
                    }
                } else {
                    LexError::RevertExhausted {
                        unit,
                        offset,
                        rule: self.last_tried,
                    }
                })
            }
        }
    }

    /// Active: offer the next unit to the attempt's rule, or resolve a
    /// boundary if the window has drained.
    fn step_attempt(&mut self) -> Result<Flow, LexError> {
        let rules = self.grammar.rules();
        let (rule, name, state) = match &self.attempt {
            Some(attempt) => (attempt.rule, rules[attempt.rule], attempt.state.clone()),
            None => return Ok(Flow::Continue),
        };

        let step = match self.scanner.offered() {
            Some(unit) => {
                let step = self.grammar.resume(name, state, unit);
                trace!(
                    layer = self.layer,
                    rule = %name,
                    unit = ?unit,
                    step = ?step,
                    "resume"
                );
                step
            }
            None if !self.scanner.is_ended() => match self.grammar.at_chunk_end(name, &state) {
                OnChunkEnd::Finish => {
                    trace!(layer = self.layer, rule = %name, "chunk end: finish");
                    Step::Finish
                }
                OnChunkEnd::Wait => {
                    trace!(layer = self.layer, rule = %name, "chunk end: suspend");
                    return Ok(Flow::NeedInput);
                }
            },
            None => match self.grammar.at_source_end(name, &state) {
                OnSourceEnd::Finish => {
                    trace!(layer = self.layer, rule = %name, "source end: finish");
                    Step::Finish
                }
                OnSourceEnd::Revert => {
                    trace!(layer = self.layer, rule = %name, "source end: revert");
                    Step::Revert
                }
                OnSourceEnd::Error => {
                    return Err(LexError::UnterminatedAtEof {
                        rule: name,
                        offset: self.scanner.pos(),
                    });
                }
            },
        };

        Ok(self.apply(rule, step))
    }

    /// Apply a rule's step to the window and the attempt.
    fn apply(&mut self, rule: usize, step: Step<G::State>) -> Flow {
        match step {
            Step::Take(state) => {
                self.advance(rule, state, true);
                Flow::Continue
            }
            Step::Discard(state) => {
                self.advance(rule, state, false);
                Flow::Continue
            }
            Step::TakeFinish => {
                self.scanner.consume();
                let mut kept = self.attempt.take().map_or_else(Vec::new, |a| a.kept);
                kept.push(true);
                Flow::Emit(self.finish(rule, kept, None))
            }
            Step::Finish => {
                let kept = self.attempt.take().map_or_else(Vec::new, |a| a.kept);
                debug_assert!(!kept.is_empty(), "completing an empty attempt");
                Flow::Emit(self.finish(rule, kept, None))
            }
            Step::Retag(retag) => {
                let kept = self.attempt.take().map_or_else(Vec::new, |a| a.kept);
                debug_assert!(!kept.is_empty(), "retagging an empty attempt");
                Flow::Emit(self.finish(rule, kept, Some(retag)))
            }
            Step::Reject => {
                // Mid-attempt rejection: abandon the whole attempt and
                // re-offer its first unit to the rules after this one.
                trace!(
                    layer = self.layer,
                    rule = %self.grammar.rules()[rule],
                    pos = self.scanner.base(),
                    "reject"
                );
                self.scanner.rewind();
                self.attempt = None;
                self.next_rule = rule + 1;
                Flow::Continue
            }
            Step::Revert => {
                trace!(
                    layer = self.layer,
                    rule = %self.grammar.rules()[rule],
                    committed = self.scanner.committed(),
                    pos = self.scanner.base(),
                    "revert"
                );
                self.scanner.rewind();
                self.attempt = None;
                self.skipped |= 1 << rule;
                self.next_rule = 0;
                Flow::Continue
            }
        }
    }

    /// Consume the offered unit into the attempt, creating it on the first
    /// unit.
    fn advance(&mut self, rule: usize, state: G::State, keep: bool) {
        self.scanner.consume();
        match &mut self.attempt {
            Some(attempt) => {
                attempt.state = state;
                attempt.kept.push(keep);
            }
            None => {
                self.attempt = Some(Attempt {
                    rule,
                    state,
                    kept: vec![keep],
                });
            }
        }
    }

    /// Assemble the committed units into a token and reset for the next
    /// attempt.
    fn finish(&mut self, rule: usize, kept: Vec<bool>, retag: Option<Retag>) -> Token {
        let name = self.grammar.rules()[rule];
        let start = self.scanner.base();
        let end = self.scanner.pos();
        let units = self.scanner.take_committed();
        debug_assert_eq!(units.len(), kept.len(), "kept flags out of step");
        let parts = units
            .into_iter()
            .zip(kept)
            .map(|(unit, kept)| Part { unit, kept })
            .collect();
        let token = self
            .grammar
            .assemble(name, parts, retag, Span::new(start, end));
        trace!(layer = self.layer, rule = %name, token = ?token, "complete");
        self.next_rule = 0;
        self.skipped = 0;
        token
    }
}

#[cfg(test)]
mod tests;
