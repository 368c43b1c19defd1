//! The `textDocument/declaration` request.

use clasp_codec::{Composable, FieldValue, Fields, Reader, TokenSink, object_value};

use crate::{
    Location, PartialResultParams, StaticRegistrationOptions, TextDocumentPositionParams,
    TextDocumentRegistrationOptions, WorkDoneProgressOptions, WorkDoneProgressParams,
};

/// Client capabilities for goto declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationClientCapabilities {
    /// Whether declaration supports dynamic registration. If this is set to
    /// `true` the client supports the new `DeclarationRegistrationOptions`
    /// return value for the corresponding server capability as well.
    pub dynamic_registration: Option<bool>,
    /// The client supports additional metadata in the form of declaration
    /// links.
    pub link_support: Option<bool>,
}

impl Composable for DeclarationClientCapabilities {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .optional("dynamicRegistration", |c| &c.dynamic_registration, |c| &mut c.dynamic_registration)
            .optional("linkSupport", |c| &c.link_support, |c| &mut c.link_support);
    }
}

/// Server capability options for goto declaration.
pub type DeclarationOptions = WorkDoneProgressOptions;

/// Registration options for goto declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationRegistrationOptions {
    /// Work-done progress support.
    pub declaration: DeclarationOptions,
    /// Documents the registration applies to.
    pub text_document: TextDocumentRegistrationOptions,
    /// Registration id.
    pub static_registration: StaticRegistrationOptions,
}

impl Composable for DeclarationRegistrationOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|o| &o.declaration, |o| &mut o.declaration)
            .mixin(|o| &o.text_document, |o| &mut o.text_document)
            .mixin(|o| &o.static_registration, |o| &mut o.static_registration);
    }
}

/// Params of a `textDocument/declaration` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationParams {
    /// Document and position of the request.
    pub position: TextDocumentPositionParams,
    /// Work-done progress token.
    pub work_done: WorkDoneProgressParams,
    /// Partial result token.
    pub partial_result: PartialResultParams,
}

impl Composable for DeclarationParams {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .mixin(|p| &p.position, |p| &mut p.position)
            .mixin(|p| &p.work_done, |p| &mut p.work_done)
            .mixin(|p| &p.partial_result, |p| &mut p.partial_result);
    }
}

object_value!(DeclarationClientCapabilities, DeclarationRegistrationOptions, DeclarationParams);

/// Result of a `textDocument/declaration` request: one location or many.
///
/// The variant is picked by the first token: `{` reads a single
/// [`Location`], `[` reads a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationResult {
    /// A single location.
    Location(Location),
    /// Several locations.
    Locations(Vec<Location>),
}

impl FieldValue for DeclarationResult {
    fn reader() -> Reader<Self> {
        Location::reader()
            .map(DeclarationResult::Location)
            .or(Vec::<Location>::reader().map(DeclarationResult::Locations))
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        match self {
            DeclarationResult::Location(location) => location.write(sink),
            DeclarationResult::Locations(locations) => locations.write(sink),
        }
    }
}
