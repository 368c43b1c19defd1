use clasp_codec::{
    Composable, Fields, JsonValue, Number, ParseErrorKind, PathSegment, Token, TokenKind, object_value, parse_tokens,
    to_tokens,
};
use clasp_testhelpers::test;

#[derive(Debug, Default, PartialEq)]
struct Sample {
    count: i64,
    ratio: f64,
    either: Option<Number>,
    anything: Option<JsonValue>,
}

impl Composable for Sample {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("count", |s| &s.count, |s| &mut s.count)
            .required("ratio", |s| &s.ratio, |s| &mut s.ratio)
            .optional("either", |s| &s.either, |s| &mut s.either)
            .optional("anything", |s| &s.anything, |s| &mut s.anything);
    }
}

object_value!(Sample);

fn sample_tokens(count: Token<'static>, ratio: Token<'static>) -> Vec<Token<'static>> {
    vec![
        Token::ObjectStart,
        Token::key("count"),
        count,
        Token::key("ratio"),
        ratio,
        Token::ObjectEnd,
    ]
}

#[test]
fn integer_stays_integer_and_real_stays_real() {
    let sample = Sample {
        count: 5,
        ratio: 5.0,
        either: Some(Number::Real(2.0)),
        anything: Some(JsonValue::Integer(2)),
    };
    let tokens = to_tokens(&sample);
    assert_eq!(tokens[2], Token::Integer(5));
    assert_eq!(tokens[4], Token::Real(5.0));
    assert_eq!(tokens[6], Token::Real(2.0));
    assert_eq!(tokens[8], Token::Integer(2));

    let parsed: Sample = parse_tokens(tokens).unwrap();
    assert_eq!(parsed, sample);
}

#[test]
fn integer_literal_in_real_field_is_a_mismatch() {
    let error = parse_tokens::<Sample, _>(sample_tokens(Token::Integer(1), Token::Integer(2))).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::TypeMismatch {
            expected: "real number".into(),
            got: TokenKind::Integer,
        }
    );
    assert_eq!(error.path.segments(), [PathSegment::Field("ratio".into())]);
}

#[test]
fn real_literal_in_integer_field_is_a_mismatch() {
    let error = parse_tokens::<Sample, _>(sample_tokens(Token::Real(1.5), Token::Real(2.0))).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::TypeMismatch {
            expected: "integer".into(),
            got: TokenKind::Real,
        }
    );
    assert_eq!(error.to_string(), "type mismatch: expected integer, got real number at count");
}

#[test]
fn number_fields_keep_the_tag() {
    let parsed: Vec<Number> = parse_tokens([
        Token::ArrayStart,
        Token::Integer(1),
        Token::Real(1.0),
        Token::Integer(-9),
        Token::ArrayEnd,
    ])
    .unwrap();
    assert_eq!(parsed, [Number::Integer(1), Number::Real(1.0), Number::Integer(-9)]);
}

#[test]
fn narrow_integers_reject_out_of_range_values() {
    let error = parse_tokens::<u32, _>([Token::Integer(-1)]).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::TypeMismatch {
            expected: "unsigned 32-bit integer".into(),
            got: TokenKind::Integer,
        }
    );
    assert_eq!(parse_tokens::<i32, _>([Token::Integer(-1)]).unwrap(), -1);
}
