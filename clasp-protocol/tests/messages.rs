use clasp_codec::{DecodeError, ParseErrorKind, ParseOptions, Token, TokenKind, to_tokens};
use clasp_json::{JsonTokenizer, from_str, to_string, to_string_pretty};
use clasp_protocol::*;
use clasp_testhelpers::test;
use indoc::indoc;
use insta::assert_snapshot;

fn declaration_params() -> DeclarationParams {
    DeclarationParams {
        position: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier {
                uri: "file:///src/main.rs".into(),
            },
            position: Position::new(3, 14),
        },
        work_done: WorkDoneProgressParams {
            work_done_token: Some(ProgressToken::from("wd-1")),
        },
        partial_result: PartialResultParams {
            partial_result_token: Some(ProgressToken::from(7)),
        },
    }
}

#[test]
fn declaration_params_write_mixins_in_order() {
    assert_snapshot!(to_string_pretty(&declaration_params()), @r#"
{
  "textDocument": {
    "uri": "file:///src/main.rs"
  },
  "position": {
    "line": 3,
    "character": 14
  },
  "workDoneToken": "wd-1",
  "partialResultToken": 7
}
"#);
}

#[test]
fn declaration_params_round_trip() {
    let params = declaration_params();
    let parsed: DeclarationParams = from_str(&to_string(&params)).unwrap();
    assert_eq!(parsed, params);
}

#[test]
fn mixin_fields_may_arrive_in_any_order() {
    let json = indoc! {r#"
        {
            "partialResultToken": 1,
            "position": {"character": 0, "line": 0},
            "textDocument": {"uri": "file:///a"}
        }
    "#};
    let parsed: DeclarationParams = from_str(json).unwrap();
    assert_eq!(parsed.partial_result.partial_result_token, Some(IntegerOrString::Integer(1)));
    assert_eq!(parsed.work_done.work_done_token, None);
    assert_eq!(parsed.position.text_document.uri, "file:///a");
}

#[test]
fn missing_mixin_field_is_reported() {
    let err = from_str::<DeclarationParams>(r#"{"textDocument": {"uri": "file:///a"}}"#).unwrap_err();
    assert_snapshot!(err, @"missing required field `position` in `DeclarationParams` at <root>");
}

#[test]
fn null_document_selector_is_written() {
    let options = DeclarationRegistrationOptions::default();
    assert_snapshot!(to_string(&options), @r#"{"documentSelector":null}"#);

    let options = DeclarationRegistrationOptions {
        declaration: DeclarationOptions {
            work_done_progress: Some(true),
        },
        text_document: TextDocumentRegistrationOptions {
            document_selector: Some(vec![
                DocumentFilter::language("rust"),
                DocumentFilter::pattern("**/Cargo.toml").with_scheme("file"),
            ]),
        },
        static_registration: StaticRegistrationOptions {
            id: Some("decl".into()),
        },
    };
    let json = to_string(&options);
    assert_snapshot!(json, @r#"{"workDoneProgress":true,"documentSelector":[{"language":"rust"},{"scheme":"file","pattern":"**/Cargo.toml"}],"id":"decl"}"#);
    assert_eq!(from_str::<DeclarationRegistrationOptions>(&json).unwrap(), options);
}

#[test]
fn document_selector_is_required_even_though_nullable() {
    let err = from_str::<TextDocumentRegistrationOptions>("{}").unwrap_err();
    assert_snapshot!(err, @"missing required field `documentSelector` in `TextDocumentRegistrationOptions` at <root>");

    let parsed: TextDocumentRegistrationOptions = from_str(r#"{"documentSelector": null}"#).unwrap();
    assert_eq!(parsed.document_selector, None);
}

#[test]
fn empty_document_filter_is_invalid() {
    let err = from_str::<TextDocumentRegistrationOptions>(r#"{"documentSelector": [{"language": "c"}, {}]}"#)
        .unwrap_err();
    assert_snapshot!(err, @"`DocumentFilter` failed validation at documentSelector[1]");
}

#[test]
fn declaration_result_picks_variant_by_first_token() {
    let single = r#"{"uri": "file:///a", "range": {"start": {"line": 1, "character": 0}, "end": {"line": 1, "character": 3}}}"#;
    let parsed = methods::DECLARATION
        .decode_result(JsonTokenizer::new(single), ParseOptions::new())
        .unwrap();
    assert!(matches!(parsed, Some(DeclarationResult::Location(_))));

    let many = format!("[{single}, {single}]");
    let parsed = methods::DECLARATION
        .decode_result(JsonTokenizer::new(&many), ParseOptions::new())
        .unwrap();
    let Some(DeclarationResult::Locations(locations)) = parsed else {
        panic!("expected a list of locations");
    };
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[1].range.end, Position::new(1, 3));

    let parsed = methods::DECLARATION
        .decode_result(JsonTokenizer::new("null"), ParseOptions::new())
        .unwrap();
    assert_eq!(parsed, None);

    let err = methods::DECLARATION
        .decode_result(JsonTokenizer::new(r#""file:///a""#), ParseOptions::new())
        .unwrap_err();
    let DecodeError::Parse(err) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(
        err.kind,
        ParseErrorKind::TypeMismatch {
            expected: "null, array or object".into(),
            got: TokenKind::Text,
        }
    );
}

#[test]
fn code_action_registration_flattens_nested_mixins() {
    let options = CodeActionRegistrationOptions {
        text_document: TextDocumentRegistrationOptions {
            document_selector: None,
        },
        options: CodeActionOptions {
            work_done: WorkDoneProgressOptions {
                work_done_progress: Some(false),
            },
            code_action_kinds: Some(vec![CodeActionKind::QUICK_FIX, CodeActionKind::REFACTOR_EXTRACT]),
        },
    };
    let json = to_string(&options);
    assert_snapshot!(json, @r#"{"documentSelector":null,"workDoneProgress":false,"codeActionKinds":["quickfix","refactor.extract"]}"#);
    assert_eq!(from_str::<CodeActionRegistrationOptions>(&json).unwrap(), options);
}

#[test]
fn code_action_params_with_diagnostics() {
    let json = indoc! {r#"
        {
            "textDocument": {"uri": "file:///src/lib.rs"},
            "range": {"start": {"line": 4, "character": 0}, "end": {"line": 4, "character": 9}},
            "context": {
                "diagnostics": [
                    {
                        "range": {"start": {"line": 4, "character": 4}, "end": {"line": 4, "character": 7}},
                        "severity": 2,
                        "code": "unused_variables",
                        "source": "rustc",
                        "message": "unused variable: `x`"
                    }
                ],
                "only": ["quickfix"]
            },
            "workDoneToken": 12
        }
    "#};
    let params: CodeActionParams = from_str(json).unwrap();
    let diagnostic = &params.context.diagnostics[0];
    assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::Warning));
    assert_eq!(diagnostic.code, Some(IntegerOrString::from("unused_variables")));
    assert_eq!(params.context.only, Some(vec![CodeActionKind::QUICK_FIX]));
    assert_eq!(params.work_done.work_done_token, Some(IntegerOrString::Integer(12)));

    assert_snapshot!(to_string(&params.context), @r#"{"diagnostics":[{"range":{"start":{"line":4,"character":4},"end":{"line":4,"character":7}},"severity":2,"code":"unused_variables","source":"rustc","message":"unused variable: `x`"}],"only":["quickfix"]}"#);
}

#[test]
fn unknown_diagnostic_severity_is_rejected() {
    let json = r#"{"range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 0}}, "severity": 9, "message": "m"}"#;
    let err = from_str::<Diagnostic>(json).unwrap_err();
    assert_snapshot!(err, @"type mismatch: expected diagnostic severity (1 to 4), got integer at severity");
}

#[test]
fn code_action_needs_an_edit_or_a_command() {
    let err = from_str::<CodeAction>(r#"{"title": "Fix"}"#).unwrap_err();
    assert_snapshot!(err, @"`CodeAction` failed validation at <root>");

    let json = r#"{"title": "Run", "command": {"title": "Run", "command": "cargo.run", "arguments": [1, "two", {"three": 3.0}]}}"#;
    let action: CodeAction = from_str(json).unwrap();
    let command = action.command.as_ref().unwrap();
    assert_eq!(command.arguments.as_ref().map(Vec::len), Some(3));
    assert_snapshot!(to_string(&action), @r#"{"title":"Run","command":{"title":"Run","command":"cargo.run","arguments":[1,"two",{"three":3.0}]}}"#);
}

#[test]
fn watched_file_changes() {
    let json = r#"{"changes": [{"uri": "file:///a.rs", "type": 1}, {"uri": "file:///b.rs", "type": 3}]}"#;
    let params = methods::DID_CHANGE_WATCHED_FILES
        .decode_params(JsonTokenizer::new(json), ParseOptions::new())
        .unwrap();
    assert_eq!(
        params.changes,
        vec![
            FileEvent {
                uri: "file:///a.rs".into(),
                change: FileChangeType::Created,
            },
            FileEvent {
                uri: "file:///b.rs".into(),
                change: FileChangeType::Deleted,
            },
        ]
    );
    assert!(methods::DID_CHANGE_WATCHED_FILES.is_notification());

    let err = from_str::<DidChangeWatchedFilesParams>(r#"{"changes": [{"uri": "file:///a.rs", "type": 4}]}"#)
        .unwrap_err();
    assert_snapshot!(err, @"type mismatch: expected file change type (1, 2 or 3), got integer at changes[0].type");
}

#[test]
fn watcher_registration() {
    let options = DidChangeWatchedFilesRegistrationOptions {
        watchers: vec![
            FileSystemWatcher {
                glob_pattern: "**/*.rs".into(),
                kind: None,
            },
            FileSystemWatcher {
                glob_pattern: "Cargo.lock".into(),
                kind: Some(WatchKind::CREATE | WatchKind::DELETE),
            },
        ],
    };
    assert_snapshot!(to_string_pretty(&options), @r#"
{
  "watchers": [
    {
      "globPattern": "**/*.rs"
    },
    {
      "globPattern": "Cargo.lock",
      "kind": 5
    }
  ]
}
"#);
    let parsed: DidChangeWatchedFilesRegistrationOptions = from_str(&to_string(&options)).unwrap();
    assert_eq!(parsed.watchers[1].effective_kind(), WatchKind::CREATE | WatchKind::DELETE);
    assert_eq!(parsed.watchers[0].effective_kind(), WatchKind::ALL);

    assert!(from_str::<FileSystemWatcher>(r#"{"globPattern": "*", "kind": 8}"#).is_err());
}

#[test]
fn range_formatting_round_trip() {
    let params = DocumentRangeFormattingParams {
        work_done: WorkDoneProgressParams::default(),
        text_document: TextDocumentIdentifier {
            uri: "file:///src/lib.rs".into(),
        },
        range: Range::new(Position::new(0, 0), Position::new(10, 0)),
        options: FormattingOptions {
            tab_size: 4,
            insert_spaces: true,
            trim_trailing_whitespace: Some(true),
            ..FormattingOptions::default()
        },
    };
    let json = to_string(&params);
    assert_snapshot!(json, @r#"{"textDocument":{"uri":"file:///src/lib.rs"},"range":{"start":{"line":0,"character":0},"end":{"line":10,"character":0}},"options":{"tabSize":4,"insertSpaces":true,"trimTrailingWhitespace":true}}"#);
    assert_eq!(from_str::<DocumentRangeFormattingParams>(&json).unwrap(), params);

    let edits = methods::RANGE_FORMATTING
        .decode_result(
            JsonTokenizer::new(r#"[{"range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 2}}, "newText": "  "}]"#),
            ParseOptions::new(),
        )
        .unwrap();
    assert_eq!(edits.map(|edits| edits.len()), Some(1));
}

#[test]
fn cancel_request_accepts_both_id_kinds() {
    for (json, id) in [(r#"{"id": 42}"#, IntegerOrString::Integer(42)), (r#"{"id": "abc"}"#, "abc".into())] {
        let params: CancelParams = from_str(json).unwrap();
        assert_eq!(params.id, id);
    }

    let mut tokens: Vec<Token<'static>> = Vec::new();
    methods::CANCEL_REQUEST.write_params(&CancelParams { id: 5.into() }, &mut tokens);
    assert_eq!(
        tokens,
        vec![Token::ObjectStart, Token::key("id"), Token::Integer(5), Token::ObjectEnd]
    );
    assert_eq!(tokens, to_tokens(&CancelParams { id: 5.into() }));
}

#[test]
fn strict_parsing_of_client_capabilities() {
    let json = r#"{"dynamicRegistration": true, "linkSupport": false, "dynamicRegistration": false}"#;
    let lenient: DeclarationClientCapabilities = from_str(json).unwrap();
    assert_eq!(lenient.dynamic_registration, Some(false));

    let err = clasp_json::from_str_with::<DeclarationClientCapabilities>(json, ParseOptions::strict()).unwrap_err();
    assert_snapshot!(err, @"duplicate field `dynamicRegistration` at <root>");
}

#[test]
fn client_capabilities_with_nested_literals() {
    let json = r#"{"codeActionLiteralSupport": {"codeActionKind": {"valueSet": ["", "quickfix", "refactor"]}}, "isPreferredSupport": true}"#;
    let capabilities: CodeActionClientCapabilities = from_str(json).unwrap();
    let literals = capabilities.code_action_literal_support.as_ref().unwrap();
    assert_eq!(literals.code_action_kind.value_set[0], CodeActionKind::EMPTY);
    assert_eq!(capabilities.dynamic_registration, None);
    assert_eq!(to_string(&capabilities), json.replace(": ", ":").replace(", ", ","));
}

#[test]
fn method_names() {
    assert_eq!(
        methods::NAMES,
        [
            "$/cancelRequest",
            "textDocument/declaration",
            "textDocument/codeAction",
            "textDocument/rangeFormatting",
            "workspace/didChangeWatchedFiles",
        ]
    );
    assert!(!methods::CODE_ACTION.is_notification());
}
