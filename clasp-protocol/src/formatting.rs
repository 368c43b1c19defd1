//! The `textDocument/rangeFormatting` request.

use clasp_codec::{Composable, Fields, object_value};

use crate::{Range, TextDocumentIdentifier, TextDocumentRegistrationOptions, WorkDoneProgressOptions, WorkDoneProgressParams};

/// Client capabilities for range formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRangeFormattingClientCapabilities {
    /// Whether range formatting supports dynamic registration.
    pub dynamic_registration: Option<bool>,
}

impl Composable for DocumentRangeFormattingClientCapabilities {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional("dynamicRegistration", |c| &c.dynamic_registration, |c| &mut c.dynamic_registration);
    }
}

/// Server capability options for range formatting.
pub type DocumentRangeFormattingOptions = WorkDoneProgressOptions;

/// Registration options for range formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRangeFormattingRegistrationOptions {
    /// Documents the registration applies to.
    pub text_document: TextDocumentRegistrationOptions,
    /// Work-done progress support.
    pub options: DocumentRangeFormattingOptions,
}

impl Composable for DocumentRangeFormattingRegistrationOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|o| &o.text_document, |o| &mut o.text_document)
            .mixin(|o| &o.options, |o| &mut o.options);
    }
}

/// Value-object describing what options formatting should use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattingOptions {
    /// Size of a tab in spaces.
    pub tab_size: u32,
    /// Prefer spaces over tabs.
    pub insert_spaces: bool,
    /// Trim trailing whitespace on a line.
    pub trim_trailing_whitespace: Option<bool>,
    /// Insert a newline character at the end of the file if one does not
    /// exist.
    pub insert_final_newline: Option<bool>,
    /// Trim all newlines after the final newline at the end of the file.
    pub trim_final_newlines: Option<bool>,
}

impl Composable for FormattingOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("tabSize", |o| &o.tab_size, |o| &mut o.tab_size)
            .required("insertSpaces", |o| &o.insert_spaces, |o| &mut o.insert_spaces)
            .optional(
                "trimTrailingWhitespace",
                |o| &o.trim_trailing_whitespace,
                |o| &mut o.trim_trailing_whitespace,
            )
            .optional("insertFinalNewline", |o| &o.insert_final_newline, |o| &mut o.insert_final_newline)
            .optional("trimFinalNewlines", |o| &o.trim_final_newlines, |o| &mut o.trim_final_newlines);
    }
}

/// Params of a `textDocument/rangeFormatting` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRangeFormattingParams {
    /// Work-done progress token.
    pub work_done: WorkDoneProgressParams,
    /// The document to format.
    pub text_document: TextDocumentIdentifier,
    /// The range to format.
    pub range: Range,
    /// The format options.
    pub options: FormattingOptions,
}

impl Composable for DocumentRangeFormattingParams {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|p| &p.work_done, |p| &mut p.work_done)
            .required("textDocument", |p| &p.text_document, |p| &mut p.text_document)
            .required("range", |p| &p.range, |p| &mut p.range)
            .required("options", |p| &p.options, |p| &mut p.options);
    }
}

object_value!(
    DocumentRangeFormattingClientCapabilities,
    DocumentRangeFormattingRegistrationOptions,
    FormattingOptions,
    DocumentRangeFormattingParams,
);
