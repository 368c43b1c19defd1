#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod basic;
mod cancel;
mod code_action;
mod declaration;
mod formatting;
pub mod methods;
mod progress;
mod registration;
mod watched_files;

pub use basic::{
    DocumentUri, IntegerOrString, Location, Position, Range, TextDocumentIdentifier, TextDocumentPositionParams,
    TextEdit,
};
pub use cancel::{CancelParams, RequestId};
pub use code_action::{
    CodeAction, CodeActionClientCapabilities, CodeActionContext, CodeActionKind, CodeActionKindValueSet,
    CodeActionLiteralSupport, CodeActionOptions, CodeActionParams, CodeActionRegistrationOptions, Command, Diagnostic,
    DiagnosticSeverity,
};
pub use declaration::{
    DeclarationClientCapabilities, DeclarationOptions, DeclarationParams, DeclarationRegistrationOptions,
    DeclarationResult,
};
pub use formatting::{
    DocumentRangeFormattingClientCapabilities, DocumentRangeFormattingOptions, DocumentRangeFormattingParams,
    DocumentRangeFormattingRegistrationOptions, FormattingOptions,
};
pub use methods::{Method, NoResult};
pub use progress::{PartialResultParams, ProgressToken, WorkDoneProgressOptions, WorkDoneProgressParams};
pub use registration::{
    DocumentFilter, DocumentSelector, StaticRegistrationOptions, TextDocumentRegistrationOptions,
};
pub use watched_files::{
    DidChangeWatchedFilesClientCapabilities, DidChangeWatchedFilesParams, DidChangeWatchedFilesRegistrationOptions,
    FileChangeType, FileEvent, FileSystemWatcher, WatchKind,
};
