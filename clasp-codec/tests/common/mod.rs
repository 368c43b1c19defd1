//! Message types shared by the integration tests.
#![allow(dead_code)]

use clasp_codec::{Composable, FieldValue, Fields, Reader, Token, TokenSink, object_value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Composable for Position {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("line", |p| &p.line, |p| &mut p.line)
            .required("character", |p| &p.character, |p| &mut p.character);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Composable for Range {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("start", |r| &r.start, |r| &mut r.start)
            .required("end", |r| &r.end, |r| &mut r.end);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

impl Composable for Location {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("uri", |l| &l.uri, |l| &mut l.uri)
            .required("range", |l| &l.range, |l| &mut l.range);
    }
}

/// `integer | string`
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressToken {
    Number(i64),
    Text(String),
}

impl FieldValue for ProgressToken {
    fn reader() -> Reader<Self> {
        i64::reader().map(ProgressToken::Number).or(String::reader().map(ProgressToken::Text))
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        match self {
            ProgressToken::Number(value) => sink.integer(*value),
            ProgressToken::Text(value) => sink.text(value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkDone {
    pub work_done_token: Option<ProgressToken>,
}

impl Composable for WorkDone {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional("workDoneToken", |w| &w.work_done_token, |w| &mut w.work_done_token);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialResult {
    pub partial_result_token: Option<ProgressToken>,
}

impl Composable for PartialResult {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional(
            "partialResultToken",
            |p| &p.partial_result_token,
            |p| &mut p.partial_result_token,
        );
    }
}

/// Two mixins followed by own fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationParams {
    pub work_done: WorkDone,
    pub partial_result: PartialResult,
    pub uri: String,
    pub position: Position,
}

impl Composable for DeclarationParams {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|d| &d.work_done, |d| &mut d.work_done)
            .mixin(|d| &d.partial_result, |d| &mut d.partial_result)
            .required("uri", |d| &d.uri, |d| &mut d.uri)
            .required("position", |d| &d.position, |d| &mut d.position);
    }
}

/// A required field that may be `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    pub document_selector: Option<Vec<String>>,
    pub id: Option<String>,
}

impl Composable for Registration {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("documentSelector", |r| &r.document_selector, |r| &mut r.document_selector)
            .optional("id", |r| &r.id, |r| &mut r.id);
    }
}

/// `Range | Location[]`
#[derive(Debug, Clone, PartialEq)]
pub enum RangeOrLocations {
    Range(Range),
    Locations(Vec<Location>),
}

impl FieldValue for RangeOrLocations {
    fn reader() -> Reader<Self> {
        Range::reader()
            .map(RangeOrLocations::Range)
            .or(<Vec<Location>>::reader().map(RangeOrLocations::Locations))
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        match self {
            RangeOrLocations::Range(range) => range.write(sink),
            RangeOrLocations::Locations(locations) => locations.write(sink),
        }
    }
}

object_value!(Position, Range, Location, WorkDone, PartialResult, DeclarationParams, Registration);

pub fn position_tokens(line: i64, character: i64) -> Vec<Token<'static>> {
    vec![
        Token::ObjectStart,
        Token::key("line"),
        Token::Integer(line),
        Token::key("character"),
        Token::Integer(character),
        Token::ObjectEnd,
    ]
}

pub fn range_tokens(start: (i64, i64), end: (i64, i64)) -> Vec<Token<'static>> {
    let mut tokens = vec![Token::ObjectStart, Token::key("start")];
    tokens.extend(position_tokens(start.0, start.1));
    tokens.push(Token::key("end"));
    tokens.extend(position_tokens(end.0, end.1));
    tokens.push(Token::ObjectEnd);
    tokens
}

pub fn range(start: (u32, u32), end: (u32, u32)) -> Range {
    Range {
        start: Position {
            line: start.0,
            character: start.1,
        },
        end: Position {
            line: end.0,
            character: end.1,
        },
    }
}
