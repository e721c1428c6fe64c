use super::*;
use pretty_assertions::assert_eq;

/// Minimal grammar exercising every protocol path: runs (letters/digits),
/// a discard+retag rule (comment-style), a composite that reverts (x +
/// digit), and one- and two-unit symbols with a rejecting dead end.
struct ToyGrammar;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ToyState {
    Dash,
    Body,
    AfterX,
    Letters,
    Digits,
    Lt,
}

const TOY_RULES: &[TokenName] = &[
    TokenName::Comment,
    TokenName::XString,
    TokenName::Letters,
    TokenName::Digits,
    TokenName::Symbol,
];

impl Grammar for ToyGrammar {
    type Unit = char;
    type State = ToyState;

    fn rules(&self) -> &'static [TokenName] {
        TOY_RULES
    }

    fn begin(&self, rule: TokenName, unit: &char) -> Step<ToyState> {
        match rule {
            TokenName::Comment if *unit == '-' => Step::Discard(ToyState::Dash),
            TokenName::XString if *unit == 'x' => Step::Take(ToyState::AfterX),
            TokenName::Letters if unit.is_alphabetic() => Step::Take(ToyState::Letters),
            TokenName::Digits if unit.is_ascii_digit() => Step::Take(ToyState::Digits),
            TokenName::Symbol => match unit {
                '(' | ')' => Step::TakeFinish,
                '<' => Step::Take(ToyState::Lt),
                _ => Step::Reject,
            },
            _ => Step::Reject,
        }
    }

    fn resume(&self, _rule: TokenName, state: ToyState, unit: &char) -> Step<ToyState> {
        match state {
            ToyState::Dash => {
                if *unit == '-' {
                    Step::Discard(ToyState::Body)
                } else {
                    Step::Retag(Retag {
                        name: TokenName::Symbol,
                        value: "-".into(),
                    })
                }
            }
            ToyState::Body => {
                if *unit == '\n' {
                    Step::TakeFinish
                } else {
                    Step::Take(ToyState::Body)
                }
            }
            ToyState::AfterX => {
                if unit.is_ascii_digit() {
                    Step::TakeFinish
                } else {
                    Step::Revert
                }
            }
            ToyState::Letters => {
                if unit.is_alphabetic() {
                    Step::Take(ToyState::Letters)
                } else {
                    Step::Finish
                }
            }
            ToyState::Digits => {
                if unit.is_ascii_digit() {
                    Step::Take(ToyState::Digits)
                } else {
                    Step::Finish
                }
            }
            ToyState::Lt => {
                if *unit == '=' {
                    Step::TakeFinish
                } else {
                    Step::Reject
                }
            }
        }
    }

    fn at_source_end(&self, _rule: TokenName, state: &ToyState) -> OnSourceEnd {
        match state {
            ToyState::Body | ToyState::Letters | ToyState::Digits => OnSourceEnd::Finish,
            ToyState::AfterX => OnSourceEnd::Revert,
            ToyState::Dash | ToyState::Lt => OnSourceEnd::Error,
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

fn matcher() -> Matcher<ToyGrammar> {
    Matcher::new("toy", ToyGrammar)
}

/// Feed the whole input, signal the end, and collect every token.
fn run(input: &str) -> Result<Vec<Token>, LexError> {
    let mut m = matcher();
    m.feed(input.chars());
    m.end();
    let mut tokens = Vec::new();
    loop {
        match m.next_token()? {
            Progress::Token(t) => tokens.push(t),
            Progress::Done => return Ok(tokens),
            Progress::NeedInput => panic!("NeedInput after end of source"),
        }
    }
}

fn summary(tokens: &[Token]) -> Vec<(TokenName, String)> {
    tokens
        .iter()
        .map(|t| (t.name, t.text().to_owned()))
        .collect()
}

#[test]
fn runs_split_on_class_change() {
    let tokens = run("abc12").unwrap();
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenName::Letters, "abc".into()),
            (TokenName::Digits, "12".into()),
        ]
    );
    assert_eq!(tokens[0].span, Span::new(0, 3));
    assert_eq!(tokens[1].span, Span::new(3, 5));
}

#[test]
fn single_unit_symbols_complete_immediately() {
    let tokens = run("(ab)").unwrap();
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenName::Symbol, "(".into()),
            (TokenName::Letters, "ab".into()),
            (TokenName::Symbol, ")".into()),
        ]
    );
}

#[test]
fn suspension_keeps_a_run_whole_across_chunks() {
    let mut m = matcher();
    m.feed("ab".chars());
    assert_eq!(m.next_token().unwrap(), Progress::NeedInput);
    m.feed("cd(".chars());
    let Progress::Token(token) = m.next_token().unwrap() else {
        panic!("expected a token");
    };
    assert_eq!(token.text(), "abcd");
    assert_eq!(token.name, TokenName::Letters);
}

#[test]
fn retag_reclassifies_the_consumed_prefix() {
    let tokens = run("-a").unwrap();
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenName::Symbol, "-".into()),
            (TokenName::Letters, "a".into()),
        ]
    );
    assert_eq!(tokens[0].value(), "-");
}

#[test]
fn discard_drops_markers_from_the_value() {
    let tokens = run("--hi\n").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].name, TokenName::Comment);
    assert_eq!(tokens[0].text(), "--hi\n");
    assert_eq!(tokens[0].value(), "hi\n");
    assert_eq!(tokens[0].span, Span::new(0, 5));
}

#[test]
fn composite_takes_precedence() {
    let tokens = run("x1").unwrap();
    assert_eq!(summary(&tokens), vec![(TokenName::XString, "x1".into())]);
}

#[test]
fn revert_replays_committed_units_through_other_rules() {
    // XString consumes 'x', sees 'y', reverts; the letters rule then
    // matches the replayed 'x' and keeps going into 'y'.
    let tokens = run("xy").unwrap();
    assert_eq!(summary(&tokens), vec![(TokenName::Letters, "xy".into())]);
}

#[test]
fn revert_at_source_end() {
    let tokens = run("x").unwrap();
    assert_eq!(summary(&tokens), vec![(TokenName::Letters, "x".into())]);
}

#[test]
fn exclusion_clears_after_a_completed_token() {
    // First 'x' reverts into letters; after that token completes the
    // second 'x' must be offered to the composite rule again.
    let tokens = run("x(x1").unwrap();
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenName::Letters, "x".into()),
            (TokenName::Symbol, "(".into()),
            (TokenName::XString, "x1".into()),
        ]
    );
}

#[test]
fn two_unit_symbol() {
    let tokens = run("<=").unwrap();
    assert_eq!(summary(&tokens), vec![(TokenName::Symbol, "<=".into())]);
}

#[test]
fn mid_attempt_reject_with_no_fallback_is_fatal() {
    let err = run("<a").unwrap_err();
    assert_eq!(
        err,
        LexError::NoRuleMatched {
            unit: "'<'".into(),
            offset: 0,
            rule: TokenName::Symbol,
        }
    );
}

#[test]
fn unmatched_unit_is_fatal() {
    let err = run("?").unwrap_err();
    assert!(matches!(err, LexError::NoRuleMatched { offset: 0, .. }));
}

#[test]
fn source_end_mid_symbol_is_fatal() {
    let err = run("<").unwrap_err();
    assert_eq!(
        err,
        LexError::UnterminatedAtEof {
            rule: TokenName::Symbol,
            offset: 1,
        }
    );
}

#[test]
fn source_end_mid_comment_introducer_is_fatal() {
    let err = run("-").unwrap_err();
    assert_eq!(
        err,
        LexError::UnterminatedAtEof {
            rule: TokenName::Comment,
            offset: 1,
        }
    );
}

#[test]
fn done_is_sticky() {
    let mut m = matcher();
    m.feed("a".chars());
    m.end();
    let Progress::Token(_) = m.next_token().unwrap() else {
        panic!("expected a token");
    };
    assert_eq!(m.next_token().unwrap(), Progress::Done);
    assert_eq!(m.next_token().unwrap(), Progress::Done);
}

#[test]
fn empty_source_is_done() {
    let mut m = matcher();
    m.end();
    assert_eq!(m.next_token().unwrap(), Progress::Done);
}

/// Two-rule grammar where a revert leaves no rule able to take the unit.
struct DeadEndGrammar;

const DEAD_END_RULES: &[TokenName] = &[TokenName::XString, TokenName::Digits];

impl Grammar for DeadEndGrammar {
    type Unit = char;
    type State = ToyState;

    fn rules(&self) -> &'static [TokenName] {
        DEAD_END_RULES
    }

    fn begin(&self, rule: TokenName, unit: &char) -> Step<ToyState> {
        match rule {
            TokenName::XString if *unit == 'x' => Step::Take(ToyState::AfterX),
            TokenName::Digits if unit.is_ascii_digit() => Step::Take(ToyState::Digits),
            _ => Step::Reject,
        }
    }

    fn resume(&self, _rule: TokenName, state: ToyState, unit: &char) -> Step<ToyState> {
        match state {
            ToyState::AfterX => {
                if unit.is_ascii_digit() {
                    Step::TakeFinish
                } else {
                    Step::Revert
                }
            }
            _ => Step::Finish,
        }
    }

    fn at_source_end(&self, _rule: TokenName, _state: &ToyState) -> OnSourceEnd {
        OnSourceEnd::Finish
    }

    fn assemble(
        &self,
        rule: TokenName,
        parts: Vec<Part<char>>,
        _retag: Option<Retag>,
        span: Span,
    ) -> Token {
        let text: String = parts.iter().map(|p| p.unit).collect();
        Token::new(rule, text, span)
    }
}

#[test]
fn exhausted_revert_is_reported_not_looped() {
    let mut m = Matcher::new("toy", DeadEndGrammar);
    m.feed("x?".chars());
    m.end();
    let err = loop {
        match m.next_token() {
            Ok(Progress::Token(_)) => {}
            Ok(other) => panic!("expected an error, got {other:?}"),
            Err(err) => break err,
        }
    };
    assert!(matches!(err, LexError::RevertExhausted { .. }));
}
