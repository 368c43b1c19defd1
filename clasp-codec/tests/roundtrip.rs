mod common;

use clasp_codec::{Token, parse_tokens, to_tokens};
use clasp_testhelpers::test;
use common::*;

fn declaration_params() -> DeclarationParams {
    DeclarationParams {
        work_done: WorkDone {
            work_done_token: Some(ProgressToken::Text("wd-1".into())),
        },
        partial_result: PartialResult {
            partial_result_token: Some(ProgressToken::Number(7)),
        },
        uri: "file:///src/main.rs".into(),
        position: Position { line: 3, character: 14 },
    }
}

#[test]
fn composed_message_writes_mixins_first() {
    let mut expected = vec![
        Token::ObjectStart,
        Token::key("workDoneToken"),
        Token::text("wd-1"),
        Token::key("partialResultToken"),
        Token::Integer(7),
        Token::key("uri"),
        Token::text("file:///src/main.rs"),
        Token::key("position"),
    ];
    expected.extend(position_tokens(3, 14));
    expected.push(Token::ObjectEnd);

    assert_eq!(to_tokens(&declaration_params()), expected);
}

#[test]
fn composed_message_survives_a_round_trip() {
    let params = declaration_params();
    let parsed: DeclarationParams = parse_tokens(to_tokens(&params)).unwrap();
    assert_eq!(parsed, params);
}

#[test]
fn keys_may_arrive_in_any_order() {
    let mut tokens = vec![Token::ObjectStart, Token::key("position")];
    tokens.extend(position_tokens(1, 2));
    tokens.extend([
        Token::key("partialResultToken"),
        Token::text("p"),
        Token::key("uri"),
        Token::text("file:///x"),
        Token::ObjectEnd,
    ]);

    let parsed: DeclarationParams = parse_tokens(tokens).unwrap();
    assert_eq!(parsed.uri, "file:///x");
    assert_eq!(parsed.position, Position { line: 1, character: 2 });
    assert_eq!(parsed.work_done.work_done_token, None);
    assert_eq!(
        parsed.partial_result.partial_result_token,
        Some(ProgressToken::Text("p".into()))
    );
}

#[test]
fn absent_optional_fields_are_not_written() {
    let params = DeclarationParams {
        uri: "file:///y".into(),
        ..DeclarationParams::default()
    };
    let tokens = to_tokens(&params);
    assert!(!tokens.contains(&Token::key("workDoneToken")));
    assert!(!tokens.contains(&Token::key("partialResultToken")));
    assert!(!tokens.contains(&Token::Null));
}

#[test]
fn nullable_required_field_writes_null() {
    let registration = Registration::default();
    assert_eq!(
        to_tokens(&registration),
        vec![
            Token::ObjectStart,
            Token::key("documentSelector"),
            Token::Null,
            Token::ObjectEnd,
        ]
    );

    let parsed: Registration = parse_tokens(to_tokens(&registration)).unwrap();
    assert_eq!(parsed, registration);
}

#[test]
fn nullable_required_field_keeps_values() {
    let registration = Registration {
        document_selector: Some(vec!["rust".into(), "toml".into()]),
        id: Some("reg-1".into()),
    };
    let parsed: Registration = parse_tokens(to_tokens(&registration)).unwrap();
    assert_eq!(parsed, registration);
}

#[test]
fn array_of_objects_round_trips() {
    let locations = vec![
        Location {
            uri: "file:///a".into(),
            range: range((0, 0), (0, 4)),
        },
        Location {
            uri: "file:///b".into(),
            range: range((10, 2), (12, 0)),
        },
    ];
    let parsed: Vec<Location> = parse_tokens(to_tokens(&locations)).unwrap();
    assert_eq!(parsed, locations);
}

#[test]
fn empty_array_and_scalar_root() {
    let parsed: Vec<String> = parse_tokens([Token::ArrayStart, Token::ArrayEnd]).unwrap();
    assert!(parsed.is_empty());

    let parsed: String = parse_tokens([Token::text("alone")]).unwrap();
    assert_eq!(parsed, "alone");
}
