//! The two layers wired together.
//!
//! A fixed producer→consumer arrangement: the character layer only advances
//! when polled, the token layer only advances when the character layer has
//! completed a token. Backpressure is structural — at most the one-token
//! lookahead window the composite rules need is ever buffered between the
//! layers. Suspension is just `NeedInput` bubbling out with all attempt
//! state retained.

use squill_ir::Token;
use squill_lexer_core::{LexError, Matcher, Progress};

use crate::{L0Grammar, L1Grammar};

/// Streaming SQL-92 lexer: characters in, re-matched tokens out.
pub struct Pipeline {
    l0: Matcher<L0Grammar>,
    l1: Matcher<L1Grammar>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            l0: Matcher::new("l0", L0Grammar),
            l1: Matcher::new("l1", L1Grammar),
        }
    }

    /// Feed a chunk of decoded characters. Does not drive matching.
    pub fn feed(&mut self, chunk: &str) {
        self.l0.feed(chunk.chars());
    }

    /// Signal end-of-source (distinct from an empty chunk).
    pub fn end(&mut self) {
        self.l0.end();
    }

    /// Advance both layers until a token completes, more input is needed,
    /// or the stream is done. A fatal error from either layer terminates
    /// the pipeline; tokens are emitted strictly in input order.
    pub fn poll(&mut self) -> Result<Progress, LexError> {
        loop {
            match self.l1.next_token()? {
                Progress::Token(token) => return Ok(Progress::Token(token)),
                Progress::Done => return Ok(Progress::Done),
                Progress::NeedInput => {}
            }
            match self.l0.next_token()? {
                Progress::Token(token) => self.l1.feed([token]),
                Progress::NeedInput => return Ok(Progress::NeedInput),
                Progress::Done => self.l1.end(),
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience: lex a complete input to a token list.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut pipeline = Pipeline::new();
    pipeline.feed(input);
    pipeline.end();
    let mut tokens = Vec::new();
    loop {
        match pipeline.poll()? {
            Progress::Token(token) => tokens.push(token),
            Progress::Done => return Ok(tokens),
            Progress::NeedInput => unreachable!("pipeline starved after end of source"),
        }
    }
}
