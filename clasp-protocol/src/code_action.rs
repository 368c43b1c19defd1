//! Code actions: quick fixes, refactorings and source actions.

use alloc::borrow::Cow;
use core::fmt;

use clasp_codec::{Composable, FieldValue, Fields, FreeObject, JsonValue, Reader, Rejection, TokenSink, object_value};

use crate::{
    IntegerOrString, PartialResultParams, Range, TextDocumentIdentifier, TextDocumentRegistrationOptions,
    WorkDoneProgressOptions, WorkDoneProgressParams,
};

/// The kind of a code action: a hierarchical, dot-separated identifier
/// such as `refactor.extract.function`.
///
/// The set of kinds is open; the constants are the predefined ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeActionKind(Cow<'static, str>);

impl CodeActionKind {
    /// Empty kind.
    pub const EMPTY: CodeActionKind = CodeActionKind::new("");
    /// Base kind for quickfix actions: `quickfix`.
    pub const QUICK_FIX: CodeActionKind = CodeActionKind::new("quickfix");
    /// Base kind for refactoring actions: `refactor`.
    pub const REFACTOR: CodeActionKind = CodeActionKind::new("refactor");
    /// Base kind for refactoring extraction actions: `refactor.extract`.
    pub const REFACTOR_EXTRACT: CodeActionKind = CodeActionKind::new("refactor.extract");
    /// Base kind for refactoring inline actions: `refactor.inline`.
    pub const REFACTOR_INLINE: CodeActionKind = CodeActionKind::new("refactor.inline");
    /// Base kind for refactoring rewrite actions: `refactor.rewrite`.
    pub const REFACTOR_REWRITE: CodeActionKind = CodeActionKind::new("refactor.rewrite");
    /// Base kind for source actions, which apply to the entire file: `source`.
    pub const SOURCE: CodeActionKind = CodeActionKind::new("source");
    /// Base kind for an organize imports source action:
    /// `source.organizeImports`.
    pub const SOURCE_ORGANIZE_IMPORTS: CodeActionKind = CodeActionKind::new("source.organizeImports");

    /// A kind with a static name.
    pub const fn new(kind: &'static str) -> Self {
        CodeActionKind(Cow::Borrowed(kind))
    }

    /// The dotted identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `self` is `base` or one of its sub-kinds:
    /// `refactor.extract` is within `refactor`, `refactoring` is not.
    pub fn is_within(&self, base: &CodeActionKind) -> bool {
        match self.as_str().strip_prefix(base.as_str()) {
            Some(rest) => base.as_str().is_empty() || rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

impl From<String> for CodeActionKind {
    fn from(kind: String) -> Self {
        CodeActionKind(Cow::Owned(kind))
    }
}

impl fmt::Display for CodeActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FieldValue for CodeActionKind {
    fn reader() -> Reader<Self> {
        String::reader().map(CodeActionKind::from)
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.text(self.as_str());
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DiagnosticSeverity {
    /// Reports an error.
    Error = 1,
    /// Reports a warning.
    Warning = 2,
    /// Reports an information.
    Information = 3,
    /// Reports a hint.
    Hint = 4,
}

impl FieldValue for DiagnosticSeverity {
    fn reader() -> Reader<Self> {
        i64::reader().try_map(|value| match value {
            1 => Ok(DiagnosticSeverity::Error),
            2 => Ok(DiagnosticSeverity::Warning),
            3 => Ok(DiagnosticSeverity::Information),
            4 => Ok(DiagnosticSeverity::Hint),
            _ => Err(Rejection::expected("diagnostic severity (1 to 4)")),
        })
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.integer(*self as i64);
    }
}

/// A compiler error or warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostic {
    /// The range at which the message applies.
    pub range: Range,
    /// The diagnostic's severity. If omitted it is up to the client to
    /// interpret diagnostics as error, warning, info or hint.
    pub severity: Option<DiagnosticSeverity>,
    /// The diagnostic's code, which might appear in the user interface.
    pub code: Option<IntegerOrString>,
    /// A human-readable string describing the source of this diagnostic,
    /// e.g. 'typescript' or 'super lint'.
    pub source: Option<String>,
    /// The diagnostic's message.
    pub message: String,
}

impl Composable for Diagnostic {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("range", |d| &d.range, |d| &mut d.range)
            .optional("severity", |d| &d.severity, |d| &mut d.severity)
            .optional("code", |d| &d.code, |d| &mut d.code)
            .optional("source", |d| &d.source, |d| &mut d.source)
            .required("message", |d| &d.message, |d| &mut d.message);
    }
}

/// A reference to a command the client can run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    /// Title of the command, like `save`.
    pub title: String,
    /// The identifier of the actual command handler.
    pub command: String,
    /// Arguments that the command handler should be invoked with.
    pub arguments: Option<Vec<JsonValue>>,
}

impl Composable for Command {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("title", |c| &c.title, |c| &mut c.title)
            .required("command", |c| &c.command, |c| &mut c.command)
            .optional("arguments", |c| &c.arguments, |c| &mut c.arguments);
    }
}

/// The code action kinds a client can show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeActionKindValueSet {
    /// The code action kind values the client supports. Clients also handle
    /// values outside the set gracefully.
    pub value_set: Vec<CodeActionKind>,
}

impl Composable for CodeActionKindValueSet {
    fn declare(fields: &mut Fields<Self>) {
        fields.required("valueSet", |s| &s.value_set, |s| &mut s.value_set);
    }
}

/// Present when the client supports code action literals as a response of
/// the `textDocument/codeAction` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeActionLiteralSupport {
    /// The code action kinds the client supports.
    pub code_action_kind: CodeActionKindValueSet,
}

impl Composable for CodeActionLiteralSupport {
    fn declare(fields: &mut Fields<Self>) {
        fields.required("codeActionKind", |s| &s.code_action_kind, |s| &mut s.code_action_kind);
    }
}

/// Client capabilities for code actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeActionClientCapabilities {
    /// Whether code action supports dynamic registration.
    pub dynamic_registration: Option<bool>,
    /// The client supports code action literals.
    pub code_action_literal_support: Option<CodeActionLiteralSupport>,
    /// Whether code action supports the `isPreferred` property.
    pub is_preferred_support: Option<bool>,
}

impl Composable for CodeActionClientCapabilities {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .optional("dynamicRegistration", |c| &c.dynamic_registration, |c| &mut c.dynamic_registration)
            .optional(
                "codeActionLiteralSupport",
                |c| &c.code_action_literal_support,
                |c| &mut c.code_action_literal_support,
            )
            .optional("isPreferredSupport", |c| &c.is_preferred_support, |c| &mut c.is_preferred_support);
    }
}

/// Server capability options for code actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeActionOptions {
    /// Work-done progress support.
    pub work_done: WorkDoneProgressOptions,
    /// Code action kinds that this server may return. May be generic, such
    /// as [`CodeActionKind::REFACTOR`], or list every specific kind.
    pub code_action_kinds: Option<Vec<CodeActionKind>>,
}

impl Composable for CodeActionOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|o| &o.work_done, |o| &mut o.work_done)
            .optional("codeActionKinds", |o| &o.code_action_kinds, |o| &mut o.code_action_kinds);
    }
}

/// Registration options for code actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeActionRegistrationOptions {
    /// Documents the registration applies to.
    pub text_document: TextDocumentRegistrationOptions,
    /// The code action options, themselves composed of a mixin.
    pub options: CodeActionOptions,
}

impl Composable for CodeActionRegistrationOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|o| &o.text_document, |o| &mut o.text_document)
            .mixin(|o| &o.options, |o| &mut o.options);
    }
}

/// Additional information about the context in which a code action is run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeActionContext {
    /// The diagnostics overlapping the requested range. This is not an
    /// exhaustive list of errors in the document.
    pub diagnostics: Vec<Diagnostic>,
    /// Requested kinds of actions. Servers can skip computing the others.
    pub only: Option<Vec<CodeActionKind>>,
}

impl Composable for CodeActionContext {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("diagnostics", |c| &c.diagnostics, |c| &mut c.diagnostics)
            .optional("only", |c| &c.only, |c| &mut c.only);
    }
}

/// Params of a `textDocument/codeAction` request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeActionParams {
    /// Work-done progress token.
    pub work_done: WorkDoneProgressParams,
    /// Partial result token.
    pub partial_result: PartialResultParams,
    /// The document in which the command was invoked.
    pub text_document: TextDocumentIdentifier,
    /// The range for which the command was invoked.
    pub range: Range,
    /// Context carrying additional information.
    pub context: CodeActionContext,
}

impl Composable for CodeActionParams {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|p| &p.work_done, |p| &mut p.work_done)
            .mixin(|p| &p.partial_result, |p| &mut p.partial_result)
            .required("textDocument", |p| &p.text_document, |p| &mut p.text_document)
            .required("range", |p| &p.range, |p| &mut p.range)
            .required("context", |p| &p.context, |p| &mut p.context);
    }
}

/// A change that can be performed in code, e.g. to fix a problem or to
/// refactor code. A code action sets `edit`, `command`, or both; the edit
/// is applied first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeAction {
    /// A short, human-readable title for this code action.
    pub title: String,
    /// The kind of the code action, used to filter code actions.
    pub kind: Option<CodeActionKind>,
    /// The diagnostics that this code action resolves.
    pub diagnostics: Option<Vec<Diagnostic>>,
    /// Marks this as a preferred action, the target of the `auto fix`
    /// command.
    pub is_preferred: Option<bool>,
    /// The workspace edit this code action performs, kept as an untyped
    /// object.
    pub edit: Option<FreeObject>,
    /// A command this code action executes.
    pub command: Option<Command>,
}

impl Composable for CodeAction {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("title", |a| &a.title, |a| &mut a.title)
            .optional("kind", |a| &a.kind, |a| &mut a.kind)
            .optional("diagnostics", |a| &a.diagnostics, |a| &mut a.diagnostics)
            .optional("isPreferred", |a| &a.is_preferred, |a| &mut a.is_preferred)
            .optional("edit", |a| &a.edit, |a| &mut a.edit)
            .optional("command", |a| &a.command, |a| &mut a.command);
    }

    fn is_valid(&self) -> bool {
        self.edit.is_some() || self.command.is_some()
    }
}

object_value!(
    Diagnostic,
    Command,
    CodeActionKindValueSet,
    CodeActionLiteralSupport,
    CodeActionClientCapabilities,
    CodeActionOptions,
    CodeActionRegistrationOptions,
    CodeActionContext,
    CodeActionParams,
    CodeAction,
);
