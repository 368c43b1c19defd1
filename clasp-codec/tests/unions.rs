mod common;

use clasp_codec::{ParseErrorKind, Token, TokenKind, parse_tokens, to_tokens};
use clasp_testhelpers::test;
use common::*;

#[test]
fn object_selects_the_range_branch() {
    let parsed: RangeOrLocations = parse_tokens(range_tokens((1, 0), (1, 5))).unwrap();
    assert_eq!(parsed, RangeOrLocations::Range(range((1, 0), (1, 5))));
}

#[test]
fn array_selects_the_locations_branch() {
    let mut tokens = vec![Token::ArrayStart, Token::ObjectStart, Token::key("uri"), Token::text("file:///l")];
    tokens.push(Token::key("range"));
    tokens.extend(range_tokens((2, 0), (2, 1)));
    tokens.extend([Token::ObjectEnd, Token::ArrayEnd]);

    let parsed: RangeOrLocations = parse_tokens(tokens).unwrap();
    assert_eq!(
        parsed,
        RangeOrLocations::Locations(vec![Location {
            uri: "file:///l".into(),
            range: range((2, 0), (2, 1)),
        }])
    );
}

#[test]
fn union_round_trips_either_way() {
    for value in [
        RangeOrLocations::Range(range((0, 0), (3, 3))),
        RangeOrLocations::Locations(Vec::new()),
    ] {
        let parsed: RangeOrLocations = parse_tokens(to_tokens(&value)).unwrap();
        assert_eq!(parsed, value);
    }
}

#[test]
fn unaccepted_kind_lists_the_alternatives() {
    let error = parse_tokens::<RangeOrLocations, _>([Token::text("nope")]).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::TypeMismatch {
            expected: "array or object".into(),
            got: TokenKind::Text,
        }
    );
}

#[test]
fn integer_or_string_token() {
    let number: ProgressToken = parse_tokens([Token::Integer(12)]).unwrap();
    assert_eq!(number, ProgressToken::Number(12));
    let text: ProgressToken = parse_tokens([Token::text("abc")]).unwrap();
    assert_eq!(text, ProgressToken::Text("abc".into()));

    let error = parse_tokens::<ProgressToken, _>([Token::Real(1.5)]).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::TypeMismatch {
            expected: "integer".into(),
            got: TokenKind::Real,
        }
    );
}
