use super::*;
use pretty_assertions::assert_eq;

fn letters(text: &str, start: u32) -> Token {
    let end = start + u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    Token::new(TokenName::Letters, text.into(), Span::new(start, end))
}

#[test]
fn leaf_value_defaults_to_text() {
    let tok = letters("SELECT", 0);
    assert_eq!(tok.text(), "SELECT");
    assert_eq!(tok.value(), "SELECT");
    assert!(tok.children().is_empty());
}

#[test]
fn with_value_normalizes_equal_override() {
    let tok = Token::with_value(
        TokenName::Symbol,
        "-".into(),
        "-".into(),
        Span::new(0, 1),
    );
    // Equal override collapses; Debug shows no arrow.
    assert_eq!(format!("{tok:?}"), "$symbol \"-\" @ 0..1");
}

#[test]
fn with_value_keeps_differing_override() {
    let tok = Token::with_value(
        TokenName::String,
        "'ab''cd'".into(),
        "ab'cd".into(),
        Span::new(0, 8),
    );
    assert_eq!(tok.text(), "'ab''cd'");
    assert_eq!(tok.value(), "ab'cd");
}

#[test]
fn composite_concatenates_text_and_value() {
    let minus = Token::new(TokenName::Symbol, "-".into(), Span::new(0, 1));
    let five = Token::new(TokenName::Digits, "5".into(), Span::new(1, 2));
    let tok = Token::composite(TokenName::ExactSignedNumber, vec![minus, five]);
    assert_eq!(tok.text(), "-5");
    assert_eq!(tok.value(), "-5");
    assert_eq!(tok.span, Span::new(0, 2));
    assert_eq!(tok.children().len(), 2);
}

#[test]
fn composite_value_uses_child_values() {
    let body = Token::with_value(
        TokenName::String,
        "'it''s'".into(),
        "it's".into(),
        Span::new(0, 7),
    );
    let tok = Token::composite(TokenName::String, vec![body]);
    assert_eq!(tok.text(), "'it''s'");
    assert_eq!(tok.value(), "it's");
}

#[test]
fn composite_with_value_overrides() {
    let prefix = letters("x", 0);
    let body = Token::with_value(
        TokenName::String,
        "'FF'".into(),
        "FF".into(),
        Span::new(1, 5),
    );
    let value = body.value().to_owned();
    let tok = Token::composite_with_value(TokenName::XString, vec![prefix, body], value);
    assert_eq!(tok.text(), "x'FF'");
    assert_eq!(tok.value(), "FF");
    assert_eq!(tok.span, Span::new(0, 5));
}

#[test]
fn wire_names() {
    assert_eq!(TokenName::Space.as_str(), "$space");
    assert_eq!(TokenName::IdentifierQuoted.as_str(), "$identifierQuoted");
    assert_eq!(TokenName::XString.as_str(), "$xstring");
    assert_eq!(
        TokenName::ApproximateUnsignedNumber.to_string(),
        "$approximateUnsignedNumber"
    );
}
