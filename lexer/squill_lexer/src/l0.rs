//! Character-layer grammar.
//!
//! Rules in priority order: space, comment, string, quoted identifier,
//! letters, digits, symbol. The first rule to accept a character owns the
//! attempt; there is no longest-match election.
//!
//! Two places need more than one character of commitment:
//! - the comment rule consumes a `-` before knowing whether a second `-`
//!   follows; if it does not, the consumed dash is reclassified as a
//!   `$symbol` token rather than rejected (rejection would re-offer the
//!   dash, losing the lookahead decision);
//! - the quoted-literal rule treats a doubled delimiter as an escaped
//!   delimiter, so it only knows a quote was the closing one when it sees
//!   the character after it.

use squill_ir::{Span, Token, TokenName};
use squill_lexer_core::{Grammar, OnChunkEnd, OnSourceEnd, Part, Retag, Step};

/// SQL-92 whitespace: space, tab, newline, carriage return.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Characters that complete as a one-character `$symbol` on their own.
fn is_single_symbol(c: char) -> bool {
    matches!(c, '(' | ')' | '*' | '+' | ',' | '-' | '/' | ';' | '=' | '.')
}

/// Character-layer rule state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L0State {
    /// Inside a whitespace run.
    Space,
    /// Consumed one `-`; a second makes it a comment.
    CommentDash,
    /// Inside a `--` comment body, through the newline.
    CommentBody,
    /// Inside a quoted literal body; the delimiter parameterizes the rule.
    QuotedBody(char),
    /// Saw the delimiter inside a quoted literal: doubled delimiter means
    /// an escaped one, anything else means the literal already closed.
    QuoteEscape(char),
    /// Inside a letter run.
    Letters,
    /// Inside a digit run.
    Digits,
    /// Consumed `<`; expects `>` or `=`.
    SymbolLess,
    /// Consumed `>`; expects `=`.
    SymbolGreater,
    /// Consumed `|`; expects `|`.
    SymbolPipe,
}

const RULES: &[TokenName] = &[
    TokenName::Space,
    TokenName::Comment,
    TokenName::String,
    TokenName::IdentifierQuoted,
    TokenName::Letters,
    TokenName::Digits,
    TokenName::Symbol,
];

/// Character-layer grammar instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct L0Grammar;

impl Grammar for L0Grammar {
    type Unit = char;
    type State = L0State;

    fn rules(&self) -> &'static [TokenName] {
        RULES
    }

    fn begin(&self, rule: TokenName, unit: &char) -> Step<L0State> {
        let c = *unit;
        match rule {
            TokenName::Space if is_space(c) => Step::Take(L0State::Space),
            TokenName::Comment if c == '-' => Step::Discard(L0State::CommentDash),
            TokenName::String if c == '\'' => Step::Discard(L0State::QuotedBody('\'')),
            TokenName::IdentifierQuoted if c == '"' => Step::Discard(L0State::QuotedBody('"')),
            TokenName::Letters if c.is_alphabetic() => Step::Take(L0State::Letters),
            TokenName::Digits if c.is_ascii_digit() => Step::Take(L0State::Digits),
            TokenName::Symbol => match c {
                _ if is_single_symbol(c) => Step::TakeFinish,
                '<' => Step::Take(L0State::SymbolLess),
                '>' => Step::Take(L0State::SymbolGreater),
                '|' => Step::Take(L0State::SymbolPipe),
                _ => Step::Reject,
            },
            _ => Step::Reject,
        }
    }

    fn resume(&self, _rule: TokenName, state: L0State, unit: &char) -> Step<L0State> {
        let c = *unit;
        match state {
            L0State::Space => {
                if is_space(c) {
                    Step::Take(L0State::Space)
                } else {
                    Step::Finish
                }
            }
            L0State::CommentDash => {
                if c == '-' {
                    Step::Discard(L0State::CommentBody)
                } else {
                    // Not a comment after all: the consumed dash becomes a
                    // symbol token and `c` starts the next attempt.
                    Step::Retag(Retag {
                        name: TokenName::Symbol,
                        value: "-".into(),
                    })
                }
            }
            L0State::CommentBody => {
                if c == '\n' {
                    Step::TakeFinish
                } else {
                    Step::Take(L0State::CommentBody)
                }
            }
            L0State::QuotedBody(delim) => {
                if c == delim {
                    Step::Discard(L0State::QuoteEscape(delim))
                } else {
                    Step::Take(L0State::QuotedBody(delim))
                }
            }
            L0State::QuoteEscape(delim) => {
                if c == delim {
                    // Doubled delimiter: one literal delimiter, back in the
                    // body.
                    Step::Take(L0State::QuotedBody(delim))
                } else {
                    // The previous delimiter closed the literal.
                    Step::Finish
                }
            }
            L0State::Letters => {
                if c.is_alphabetic() {
                    Step::Take(L0State::Letters)
                } else {
                    Step::Finish
                }
            }
            L0State::Digits => {
                if c.is_ascii_digit() {
                    Step::Take(L0State::Digits)
                } else {
                    Step::Finish
                }
            }
            L0State::SymbolLess => match c {
                '>' | '=' => Step::TakeFinish,
                _ => Step::Reject,
            },
            L0State::SymbolGreater => {
                if c == '=' {
                    Step::TakeFinish
                } else {
                    Step::Reject
                }
            }
            L0State::SymbolPipe => {
                if c == '|' {
                    Step::TakeFinish
                } else {
                    Step::Reject
                }
            }
        }
    }

    fn at_chunk_end(&self, _rule: TokenName, state: &L0State) -> OnChunkEnd {
        match state {
            // Whitespace at a chunk boundary is always a complete token.
            L0State::Space => OnChunkEnd::Finish,
            _ => OnChunkEnd::Wait,
        }
    }

    fn at_source_end(&self, _rule: TokenName, state: &L0State) -> OnSourceEnd {
        match state {
            L0State::Space
            | L0State::CommentBody
            | L0State::QuoteEscape(_)
            | L0State::Letters
            | L0State::Digits => OnSourceEnd::Finish,
            L0State::CommentDash
            | L0State::QuotedBody(_)
            | L0State::SymbolLess
            | L0State::SymbolGreater
            | L0State::SymbolPipe => OnSourceEnd::Error,
        }
    }

    fn assemble(
        &self,
        rule: TokenName,
        parts: Vec<Part<char>>,
        retag: Option<Retag>,
        span: Span,
    ) -> Token {
        let text: String = parts.iter().map(|p| p.unit).collect();
        match retag {
            Some(retag) => Token::with_value(retag.name, text, retag.value, span),
            None => {
                let value: String = parts.iter().filter(|p| p.kept).map(|p| p.unit).collect();
                Token::with_value(rule, text, value, span)
            }
        }
    }
}
