//! Structures shared by nearly every message.

use clasp_codec::{Composable, FieldValue, Fields, Reader, TokenSink, object_value};

/// A document URI, as sent by the client.
pub type DocumentUri = String;

/// `integer | string`, used for request ids, progress tokens and
/// diagnostic codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntegerOrString {
    /// An integer id.
    Integer(i64),
    /// A string id.
    String(String),
}

impl FieldValue for IntegerOrString {
    fn reader() -> Reader<Self> {
        i64::reader()
            .map(IntegerOrString::Integer)
            .or(String::reader().map(IntegerOrString::String))
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        match self {
            IntegerOrString::Integer(value) => sink.integer(*value),
            IntegerOrString::String(value) => sink.text(value),
        }
    }
}

impl Default for IntegerOrString {
    fn default() -> Self {
        IntegerOrString::Integer(0)
    }
}

impl From<i64> for IntegerOrString {
    fn from(value: i64) -> Self {
        IntegerOrString::Integer(value)
    }
}

impl From<&str> for IntegerOrString {
    fn from(value: &str) -> Self {
        IntegerOrString::String(value.into())
    }
}

impl From<String> for IntegerOrString {
    fn from(value: String) -> Self {
        IntegerOrString::String(value)
    }
}

/// Position in a text document, as a zero-based line and a zero-based
/// UTF-16 offset into that line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line position in a document (zero-based).
    pub line: u32,
    /// Character offset on a line in a document (zero-based).
    pub character: u32,
}

impl Position {
    /// Create a position.
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl Composable for Position {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("line", |p| &p.line, |p| &mut p.line)
            .required("character", |p| &p.character, |p| &mut p.character);
    }
}

/// A range in a text document, end exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    /// The range's start position.
    pub start: Position,
    /// The range's end position.
    pub end: Position,
}

impl Range {
    /// Create a range.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl Composable for Range {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("start", |r| &r.start, |r| &mut r.start)
            .required("end", |r| &r.end, |r| &mut r.end);
    }
}

/// A range inside a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    /// The resource.
    pub uri: DocumentUri,
    /// The range inside it.
    pub range: Range,
}

impl Composable for Location {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("uri", |l| &l.uri, |l| &mut l.uri)
            .required("range", |l| &l.range, |l| &mut l.range);
    }
}

/// Identifies a text document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextDocumentIdentifier {
    /// The text document's URI.
    pub uri: DocumentUri,
}

impl Composable for TextDocumentIdentifier {
    fn declare(fields: &mut Fields<Self>) {
        fields.required("uri", |t| &t.uri, |t| &mut t.uri);
    }
}

/// Mixin for requests that point at a position in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextDocumentPositionParams {
    /// The text document.
    pub text_document: TextDocumentIdentifier,
    /// The position inside the text document.
    pub position: Position,
}

impl Composable for TextDocumentPositionParams {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("textDocument", |t| &t.text_document, |t| &mut t.text_document)
            .required("position", |t| &t.position, |t| &mut t.position);
    }
}

/// A textual edit applicable to a text document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextEdit {
    /// The range of the text document to be manipulated. To insert text
    /// into a document create a range where start == end.
    pub range: Range,
    /// The string to be inserted. For delete operations use an empty string.
    pub new_text: String,
}

impl Composable for TextEdit {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("range", |t| &t.range, |t| &mut t.range)
            .required("newText", |t| &t.new_text, |t| &mut t.new_text);
    }
}

object_value!(
    Position,
    Range,
    Location,
    TextDocumentIdentifier,
    TextDocumentPositionParams,
    TextEdit,
);
