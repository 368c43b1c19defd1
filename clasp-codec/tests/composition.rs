mod common;

use std::rc::Rc;

use clasp_codec::{
    Composable, CompositionError, FieldRegistry, Fields, ParseErrorKind, Token, object_value, parse_tokens, to_tokens,
};
use clasp_testhelpers::test;
use common::*;

/// Declares the same key as [`WorkDone`].
#[derive(Debug, Clone, Default, PartialEq)]
struct LegacyProgress {
    token: Option<String>,
}

impl Composable for LegacyProgress {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional("workDoneToken", |p| &p.token, |p| &mut p.token);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Clash {
    work_done: WorkDone,
    legacy: LegacyProgress,
}

impl Composable for Clash {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|c| &c.work_done, |c| &mut c.work_done)
            .mixin(|c| &c.legacy, |c| &mut c.legacy);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Holder {
    inner: Option<Clash>,
}

impl Composable for Holder {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional("inner", |h| &h.inner, |h| &mut h.inner);
    }
}

/// A mixin with a cross-field rule: `start <= end`.
#[derive(Debug, Clone, Default, PartialEq)]
struct Span {
    start: u32,
    end: u32,
}

impl Composable for Span {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("start", |s| &s.start, |s| &mut s.start)
            .required("end", |s| &s.end, |s| &mut s.end);
    }

    fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Selection {
    span: Span,
    label: String,
}

impl Composable for Selection {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|s| &s.span, |s| &mut s.span)
            .required("label", |s| &s.label, |s| &mut s.label);
    }
}

/// Composes [`Selection`], so [`Span`] is two mixin levels down.
#[derive(Debug, Clone, Default, PartialEq)]
struct Highlight {
    selection: Selection,
    color: Option<String>,
}

impl Composable for Highlight {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|h| &h.selection, |h| &mut h.selection)
            .optional("color", |h| &h.color, |h| &mut h.color);
    }
}

object_value!(LegacyProgress, Clash, Holder, Span, Selection, Highlight);

fn selection_tokens(start: i64, end: i64) -> Vec<Token<'static>> {
    vec![
        Token::ObjectStart,
        Token::key("start"),
        Token::Integer(start),
        Token::key("end"),
        Token::Integer(end),
        Token::key("label"),
        Token::text("sel"),
        Token::ObjectEnd,
    ]
}

#[test]
fn sibling_mixins_sharing_a_key_are_rejected() {
    let error = FieldRegistry::<Clash>::build().unwrap_err();
    assert_eq!(
        error,
        CompositionError::DuplicateField {
            field: "workDoneToken",
            type_name: "Clash",
        }
    );
}

#[test]
fn clash_is_reported_when_its_object_opens() {
    let tokens = [Token::ObjectStart, Token::ObjectEnd];
    let error = parse_tokens::<Clash, _>(tokens).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::Composition(CompositionError::DuplicateField {
            field: "workDoneToken",
            type_name: "Clash",
        })
    );
}

#[test]
#[should_panic(expected = "cannot write `Clash`: field `workDoneToken` is declared more than once in `Clash`")]
fn clashing_type_is_never_written() {
    let clash = Clash {
        work_done: WorkDone {
            work_done_token: Some(ProgressToken::Text("x".into())),
        },
        legacy: LegacyProgress { token: Some("y".into()) },
    };
    let _ = to_tokens(&clash);
}

#[test]
fn absent_clashing_type_does_not_affect_its_owner() {
    assert_eq!(to_tokens(&Holder::default()), [Token::ObjectStart, Token::ObjectEnd]);
}

#[test]
fn registries_are_built_once_per_type() {
    let first = FieldRegistry::<DeclarationParams>::shared().unwrap();
    let second = FieldRegistry::<DeclarationParams>::shared().unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(
        first.names().collect::<Vec<_>>(),
        ["workDoneToken", "partialResultToken", "uri", "position"]
    );

    let error = FieldRegistry::<Clash>::shared().unwrap_err();
    assert_eq!(FieldRegistry::<Clash>::shared().unwrap_err(), error);
}

#[test]
fn mixin_validation_runs_for_the_owner() {
    let parsed: Selection = parse_tokens(selection_tokens(1, 4)).unwrap();
    assert_eq!(parsed.span, Span { start: 1, end: 4 });

    let error = parse_tokens::<Selection, _>(selection_tokens(4, 1)).unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::InvalidObject { type_name: "Selection" });
    assert!(error.path.is_root());
}

#[test]
fn nested_mixin_validation_is_chained() {
    let mut tokens = selection_tokens(9, 2);
    tokens.pop();
    tokens.extend([Token::key("color"), Token::text("red"), Token::ObjectEnd]);
    let error = parse_tokens::<Highlight, _>(tokens).unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::InvalidObject { type_name: "Highlight" });
}
