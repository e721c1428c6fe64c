//! Token-layer grammar.
//!
//! Re-matches the character layer's token stream. Most rules are
//! pass-throughs; the interesting ones are the composites, which rely on
//! revert to resolve ambiguity: a typed-string prefix or a numeric sign is
//! consumed speculatively, and when the continuation fails the committed
//! tokens are replayed through the remaining rules. That is why the
//! approximate rules sit before the exact ones — an approximate attempt
//! that finds no exponent reverts, and the exact rule then claims the
//! mantissa.
//!
//! All four numeric rules walk one shared state machine. They differ only
//! in their entry requirement (signed rules demand a leading sign symbol)
//! and in what ends the mantissa: exact rules complete there, approximate
//! rules insist on an exponent and revert without one.

use squill_ir::{Span, Token, TokenName};
use squill_lexer_core::{Grammar, OnSourceEnd, Part, Retag, Step};

/// Token-layer rule state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L1State {
    /// Typed-string prefix consumed; a `$string` must follow.
    ExpectString,
    /// Leading sign consumed (signed numeric rules).
    Sign,
    /// Mantissa integer digits consumed.
    Int,
    /// Only a `.` consumed; not yet a valid literal.
    LeadingDot,
    /// Mantissa with a dot consumed (`1.`, `.5`, `1.5`); a valid literal.
    Frac,
    /// Exponent marker consumed; sign or digits must follow.
    ExpMark,
    /// Exponent sign consumed; digits must follow.
    ExpSign,
    /// Exponent digits consumed; a complete approximate literal.
    ExpDigits,
}

const RULES: &[TokenName] = &[
    TokenName::Space,
    TokenName::Comment,
    TokenName::BString,
    TokenName::XString,
    TokenName::NString,
    TokenName::String,
    TokenName::IdentifierQuoted,
    TokenName::ApproximateUnsignedNumber,
    TokenName::ApproximateSignedNumber,
    TokenName::ExactUnsignedNumber,
    TokenName::ExactSignedNumber,
    TokenName::Bareword,
    TokenName::Symbol,
];

fn is_digits(token: &Token) -> bool {
    token.name == TokenName::Digits
}

fn is_symbol(token: &Token, text: &str) -> bool {
    token.name == TokenName::Symbol && token.text() == text
}

fn is_sign(token: &Token) -> bool {
    token.name == TokenName::Symbol && matches!(token.text(), "+" | "-")
}

/// Case-insensitive exponent marker: a `$letters` token spelling `e`.
fn is_exp_marker(token: &Token) -> bool {
    token.name == TokenName::Letters && token.text().eq_ignore_ascii_case("e")
}

fn is_approximate(rule: TokenName) -> bool {
    matches!(
        rule,
        TokenName::ApproximateUnsignedNumber | TokenName::ApproximateSignedNumber
    )
}

/// Typed-string prefix letter for a rule, if it has one.
fn typed_prefix(rule: TokenName) -> Option<&'static str> {
    match rule {
        TokenName::BString => Some("b"),
        TokenName::XString => Some("x"),
        TokenName::NString => Some("n"),
        _ => None,
    }
}

/// Entry dispatch shared by the unsigned rules and the post-sign state.
fn mantissa_start(rule: TokenName, unit: &Token) -> Step<L1State> {
    if is_digits(unit) {
        Step::Take(L1State::Int)
    } else if is_symbol(unit, ".") {
        Step::Take(L1State::LeadingDot)
    } else if is_approximate(rule) && is_exp_marker(unit) {
        // Exponent with an empty mantissa (`e5`), as the grammar composes.
        Step::Take(L1State::ExpMark)
    } else {
        Step::Revert
    }
}

/// A unit past the mantissa: exact rules are done, approximate rules need
/// the exponent marker here or give the attempt up.
fn mantissa_end(rule: TokenName, unit: &Token) -> Step<L1State> {
    if is_approximate(rule) {
        if is_exp_marker(unit) {
            Step::Take(L1State::ExpMark)
        } else {
            Step::Revert
        }
    } else {
        Step::Finish
    }
}

/// Token-layer grammar instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct L1Grammar;

impl Grammar for L1Grammar {
    type Unit = Token;
    type State = L1State;

    fn rules(&self) -> &'static [TokenName] {
        RULES
    }

    fn begin(&self, rule: TokenName, unit: &Token) -> Step<L1State> {
        if let Some(prefix) = typed_prefix(rule) {
            return if unit.name == TokenName::Letters && unit.text().eq_ignore_ascii_case(prefix)
            {
                Step::Take(L1State::ExpectString)
            } else {
                Step::Reject
            };
        }
        match rule {
            // Pass-throughs: accept exactly their own character-layer name.
            TokenName::Space
            | TokenName::Comment
            | TokenName::String
            | TokenName::IdentifierQuoted => {
                if unit.name == rule {
                    Step::TakeFinish
                } else {
                    Step::Reject
                }
            }
            TokenName::ApproximateUnsignedNumber | TokenName::ExactUnsignedNumber => {
                mantissa_start(rule, unit)
            }
            TokenName::ApproximateSignedNumber | TokenName::ExactSignedNumber => {
                if is_sign(unit) {
                    Step::Take(L1State::Sign)
                } else {
                    Step::Revert
                }
            }
            TokenName::Bareword => {
                if unit.name == TokenName::Letters {
                    Step::TakeFinish
                } else {
                    Step::Reject
                }
            }
            TokenName::Symbol => {
                if unit.name == TokenName::Symbol {
                    Step::TakeFinish
                } else {
                    Step::Reject
                }
            }
            _ => Step::Reject,
        }
    }

    fn resume(&self, rule: TokenName, state: L1State, unit: &Token) -> Step<L1State> {
        match state {
            L1State::ExpectString => {
                if unit.name == TokenName::String {
                    Step::TakeFinish
                } else {
                    Step::Revert
                }
            }
            L1State::Sign => mantissa_start(rule, unit),
            L1State::Int => {
                if is_digits(unit) {
                    Step::Take(L1State::Int)
                } else if is_symbol(unit, ".") {
                    Step::Take(L1State::Frac)
                } else {
                    mantissa_end(rule, unit)
                }
            }
            L1State::LeadingDot => {
                if is_digits(unit) {
                    Step::Take(L1State::Frac)
                } else {
                    Step::Revert
                }
            }
            L1State::Frac => {
                if is_digits(unit) {
                    Step::Take(L1State::Frac)
                } else {
                    mantissa_end(rule, unit)
                }
            }
            L1State::ExpMark => {
                if is_sign(unit) {
                    Step::Take(L1State::ExpSign)
                } else if is_digits(unit) {
                    Step::Take(L1State::ExpDigits)
                } else {
                    Step::Revert
                }
            }
            L1State::ExpSign => {
                if is_digits(unit) {
                    Step::Take(L1State::ExpDigits)
                } else {
                    Step::Revert
                }
            }
            L1State::ExpDigits => {
                if is_digits(unit) {
                    Step::Take(L1State::ExpDigits)
                } else {
                    Step::Finish
                }
            }
        }
    }

    fn at_source_end(&self, rule: TokenName, state: &L1State) -> OnSourceEnd {
        match state {
            L1State::ExpectString
            | L1State::Sign
            | L1State::LeadingDot
            | L1State::ExpMark
            | L1State::ExpSign => OnSourceEnd::Revert,
            L1State::Int | L1State::Frac => {
                if is_approximate(rule) {
                    // An exponentless mantissa is exact, not approximate.
                    OnSourceEnd::Revert
                } else {
                    OnSourceEnd::Finish
                }
            }
            L1State::ExpDigits => OnSourceEnd::Finish,
        }
    }

    fn assemble(
        &self,
        rule: TokenName,
        parts: Vec<Part<Token>>,
        retag: Option<Retag>,
        _span: Span,
    ) -> Token {
        debug_assert!(retag.is_none(), "token layer never retags");
        let children: Vec<Token> = parts.into_iter().map(|p| p.unit).collect();
        if typed_prefix(rule).is_some() {
            // The composite's value is the inner string's; the prefix is
            // only kept as a child.
            let value = children
                .get(1)
                .map(|c| c.value().to_owned())
                .unwrap_or_default();
            Token::composite_with_value(rule, children, value)
        } else {
            Token::composite(rule, children)
        }
    }
}
