//! Method names bound to the codecs of their params and results.

use core::fmt;
use core::marker::PhantomData;

use clasp_codec::{DecodeError, FieldValue, Handler, ParseOptions, Reader, TokenSink, TokenSource};

use crate::{
    CancelParams, CodeAction, CodeActionParams, DeclarationParams, DeclarationResult, DidChangeWatchedFilesParams,
    DocumentRangeFormattingParams, TextEdit,
};

/// Result type of a notification: it has no values, so nothing reads as
/// one and nothing is ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResult {}

impl FieldValue for NoResult {
    fn reader() -> Reader<Self> {
        Reader::new()
    }

    fn write(&self, _sink: &mut dyn TokenSink) {
        match *self {}
    }
}

/// A protocol method: its wire name, the type of its params and the type
/// of its result. Notifications use [`NoResult`].
///
/// ```
/// use clasp_codec::ParseOptions;
/// use clasp_json::JsonTokenizer;
/// use clasp_protocol::{IntegerOrString, methods};
///
/// let params = methods::CANCEL_REQUEST
///     .decode_params(JsonTokenizer::new(r#"{"id": "req-7"}"#), ParseOptions::new())
///     .unwrap();
/// assert_eq!(params.id, IntegerOrString::from("req-7"));
/// assert!(methods::CANCEL_REQUEST.is_notification());
/// assert!(!methods::DECLARATION.is_notification());
/// ```
pub struct Method<P, R = NoResult> {
    name: &'static str,
    _codec: PhantomData<fn() -> (P, R)>,
}

impl<P, R> Clone for Method<P, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, R> Copy for Method<P, R> {}

impl<P, R> fmt::Debug for Method<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("name", &self.name).finish()
    }
}

impl<P, R> Method<P, R> {
    /// Bind `name` to `P` and `R`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _codec: PhantomData,
        }
    }

    /// The method name, like `textDocument/declaration`.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<P: FieldValue, R: FieldValue> Method<P, R> {
    /// Whether the method is a notification, i.e. has no result.
    pub fn is_notification(&self) -> bool {
        R::reader().accepts().is_empty()
    }

    /// A push parser for this method's params.
    pub fn params_handler(&self, options: ParseOptions) -> Handler<P> {
        Handler::with_options(options)
    }

    /// A push parser for this method's result.
    pub fn result_handler(&self, options: ParseOptions) -> Handler<R> {
        Handler::with_options(options)
    }

    /// Read params from a token source.
    pub fn decode_params<'de, S>(&self, source: S, options: ParseOptions) -> Result<P, DecodeError<S::Error>>
    where
        S: TokenSource<'de>,
    {
        clasp_codec::decode_with(source, options)
    }

    /// Read a result from a token source.
    pub fn decode_result<'de, S>(&self, source: S, options: ParseOptions) -> Result<R, DecodeError<S::Error>>
    where
        S: TokenSource<'de>,
    {
        clasp_codec::decode_with(source, options)
    }

    /// Write params as one value.
    pub fn write_params(&self, params: &P, sink: &mut dyn TokenSink) {
        params.write(sink);
    }

    /// Write a result as one value.
    pub fn write_result(&self, result: &R, sink: &mut dyn TokenSink) {
        result.write(sink);
    }
}

/// `$/cancelRequest`
pub const CANCEL_REQUEST: Method<CancelParams> = Method::new("$/cancelRequest");

/// `textDocument/declaration`
pub const DECLARATION: Method<DeclarationParams, Option<DeclarationResult>> = Method::new("textDocument/declaration");

/// `textDocument/codeAction`. Servers answering with bare commands are not
/// covered: results are read as code action literals only.
pub const CODE_ACTION: Method<CodeActionParams, Option<Vec<CodeAction>>> = Method::new("textDocument/codeAction");

/// `textDocument/rangeFormatting`
pub const RANGE_FORMATTING: Method<DocumentRangeFormattingParams, Option<Vec<TextEdit>>> =
    Method::new("textDocument/rangeFormatting");

/// `workspace/didChangeWatchedFiles`
pub const DID_CHANGE_WATCHED_FILES: Method<DidChangeWatchedFilesParams> =
    Method::new("workspace/didChangeWatchedFiles");

/// Names of every method above.
pub const NAMES: [&str; 5] = [
    CANCEL_REQUEST.name(),
    DECLARATION.name(),
    CODE_ACTION.name(),
    RANGE_FORMATTING.name(),
    DID_CHANGE_WATCHED_FILES.name(),
];
