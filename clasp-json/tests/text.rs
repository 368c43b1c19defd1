use clasp_codec::{
    Composable, DecodeError, Fields, FreeObject, JsonValue, ParseErrorKind, ParseOptions, TokenKind, object_value,
};
use clasp_json::{JsonErrorKind, SerializeOptions, from_str, from_str_with, to_string, to_string_pretty};
use clasp_testhelpers::test;
use indoc::indoc;
use insta::assert_snapshot;

#[derive(Debug, Default, PartialEq)]
struct Position {
    line: u32,
    character: u32,
}

impl Composable for Position {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("line", |p| &p.line, |p| &mut p.line)
            .required("character", |p| &p.character, |p| &mut p.character);
    }
}

#[derive(Debug, Default, PartialEq)]
struct Edit {
    position: Position,
    new_text: String,
    annotation: Option<String>,
}

impl Composable for Edit {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("position", |e| &e.position, |e| &mut e.position)
            .required("newText", |e| &e.new_text, |e| &mut e.new_text)
            .optional("annotation", |e| &e.annotation, |e| &mut e.annotation);
    }
}

#[derive(Debug, Default, PartialEq)]
struct Batch {
    edits: Vec<Edit>,
    weight: f64,
}

impl Composable for Batch {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("edits", |b| &b.edits, |b| &mut b.edits)
            .required("weight", |b| &b.weight, |b| &mut b.weight);
    }
}

object_value!(Position, Edit, Batch);

fn batch() -> Batch {
    Batch {
        edits: vec![
            Edit {
                position: Position { line: 0, character: 4 },
                new_text: "let".into(),
                annotation: None,
            },
            Edit {
                position: Position { line: 2, character: 0 },
                new_text: "\t\"quoted\"\n".into(),
                annotation: Some("fmt".into()),
            },
        ],
        weight: 1.0,
    }
}

#[test]
fn compact_output() {
    assert_snapshot!(to_string(&batch()), @r#"{"edits":[{"position":{"line":0,"character":4},"newText":"let"},{"position":{"line":2,"character":0},"newText":"\t\"quoted\"\n","annotation":"fmt"}],"weight":1.0}"#);
}

#[test]
fn pretty_output() {
    assert_snapshot!(to_string_pretty(&batch()), @r#"
{
  "edits": [
    {
      "position": {
        "line": 0,
        "character": 4
      },
      "newText": "let"
    },
    {
      "position": {
        "line": 2,
        "character": 0
      },
      "newText": "\t\"quoted\"\n",
      "annotation": "fmt"
    }
  ],
  "weight": 1.0
}
"#);
}

#[test]
fn text_round_trip() {
    let original = batch();
    let json = to_string(&original);
    let parsed: Batch = from_str(&json).unwrap();
    assert_eq!(parsed, original);

    let pretty = clasp_json::to_string_with_options(&original, &SerializeOptions::new().indent("    "));
    let parsed: Batch = from_str(&pretty).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn whitespace_and_member_order_do_not_matter() {
    let json = indoc! {r#"
        {
            "weight" : 0.25,
            "edits" : [
                { "newText": "x", "position": { "character": 1, "line": 1 } }
            ]
        }
    "#};
    let parsed: Batch = from_str(json).unwrap();
    assert_eq!(parsed.weight, 0.25);
    assert_eq!(parsed.edits[0].position, Position { line: 1, character: 1 });
}

#[test]
fn escapes_after_multibyte_characters() {
    let cases = ["中文\n", "日本語\\", "한글\"", "émoji\r\n", "\u{1F600}\u{0007}"];
    for original in cases {
        let json = to_string(&original.to_string());
        let parsed: String = from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    let decoded: String = from_str(r#""é😀\/""#).unwrap();
    assert_eq!(decoded, "é\u{1F600}/");
}

#[test]
fn unknown_fields_are_skipped_with_their_contents() {
    let json = r#"{"line": 1, "extra": {"deep": [1, {"x": null}]}, "character": 2}"#;
    let position: Position = from_str(json).unwrap();
    assert_eq!(position, Position { line: 1, character: 2 });
}

#[test]
fn strict_mode_rejects_unknown_fields() {
    let err = from_str_with::<Position>(r#"{"line": 1, "charactr": 2}"#, ParseOptions::strict()).unwrap_err();
    assert_snapshot!(err, @"unknown field `charactr` (did you mean `character`?) at <root>");
}

#[test]
fn parse_errors_carry_the_field_path() {
    let json = r#"{"edits": [{"position": {"line": 0, "character": 0}, "newText": ""}, {"position": {"line": "2"}}], "weight": 1.0}"#;
    let Err(DecodeError::Parse(err)) = from_str::<Batch>(json) else {
        panic!("expected a parse error");
    };
    assert_eq!(
        err.kind,
        ParseErrorKind::TypeMismatch {
            expected: "number".into(),
            got: TokenKind::Text,
        }
    );
    assert_snapshot!(err.path, @"edits[1].position.line");
}

#[test]
fn missing_required_field() {
    let err = from_str::<Edit>(r#"{"newText": "x"}"#).unwrap_err();
    assert_snapshot!(err, @"missing required field `position` in `Edit` at <root>");
}

#[test]
fn integer_in_a_real_field_is_a_mismatch() {
    let err = from_str::<Batch>(r#"{"edits": [], "weight": 1}"#).unwrap_err();
    assert_snapshot!(err, @"type mismatch: expected real number, got integer at weight");
}

#[test]
fn syntax_errors_are_reported_by_offset() {
    let Err(DecodeError::Source(err)) = from_str::<Position>(r#"{"line": 1,, "character": 2}"#) else {
        panic!("expected a syntax error");
    };
    assert_eq!(err.offset, 11);
    assert_eq!(err.kind, JsonErrorKind::UnexpectedChar { got: ',', expected: "a string key" });
}

#[test]
fn integers_beyond_i64_are_refused_not_widened() {
    let Err(DecodeError::Source(err)) = from_str::<JsonValue>("18446744073709551615") else {
        panic!("expected the literal to be refused");
    };
    assert_eq!(err.kind, JsonErrorKind::NumberOutOfRange);

    let value: JsonValue = from_str("[-9223372036854775808, 0.5]").unwrap();
    assert_snapshot!(to_string(&value), @"[-9223372036854775808,0.5]");
}

#[test]
fn parse_errors_win_over_later_syntax_errors() {
    let err = from_str::<Position>(r#"{"line": true, oops"#).unwrap_err();
    assert!(matches!(err, DecodeError::Parse(_)), "{err}");
}

#[test]
fn untyped_values_keep_integer_and_real_apart() {
    let value: JsonValue = from_str(r#"{"a": 1, "b": 1.0, "c": [true, null, "s"]}"#).unwrap();
    assert_snapshot!(to_string(&value), @r#"{"a":1,"b":1.0,"c":[true,null,"s"]}"#);

    let object: FreeObject = from_str(r#"{"b": 2, "a": 1}"#).unwrap();
    let keys: Vec<&str> = object.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, ["b", "a"]);
}

#[test]
fn non_finite_reals_are_written_as_null() {
    let batch = Batch {
        edits: vec![],
        weight: f64::INFINITY,
    };
    assert_snapshot!(to_string(&batch), @r#"{"edits":[],"weight":null}"#);
}

#[test]
fn writing_to_an_io_writer() {
    let mut buffer = Vec::new();
    clasp_json::to_writer_std(&mut buffer, &Position { line: 5, character: 6 }).unwrap();
    assert_eq!(buffer, br#"{"line":5,"character":6}"#);
}
