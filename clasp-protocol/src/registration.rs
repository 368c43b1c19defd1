//! Mixins for capabilities that can be registered dynamically.

use clasp_codec::{Composable, Fields, object_value};

/// Denotes a document by language, scheme or glob pattern. At least one of
/// the three must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentFilter {
    /// A language id, like `typescript`.
    pub language: Option<String>,
    /// A URI scheme, like `file` or `untitled`.
    pub scheme: Option<String>,
    /// A glob pattern, like `*.{ts,js}`.
    pub pattern: Option<String>,
}

impl DocumentFilter {
    /// A filter matching documents of one language.
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::default()
        }
    }

    /// A filter matching documents by glob pattern.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Restrict the filter to one URI scheme.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }
}

impl Composable for DocumentFilter {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .optional("language", |f| &f.language, |f| &mut f.language)
            .optional("scheme", |f| &f.scheme, |f| &mut f.scheme)
            .optional("pattern", |f| &f.pattern, |f| &mut f.pattern);
    }

    fn is_valid(&self) -> bool {
        self.language.is_some() || self.scheme.is_some() || self.pattern.is_some()
    }
}

/// A combination of filters; a document matches if any filter matches.
pub type DocumentSelector = Vec<DocumentFilter>;

/// Mixin for registrations scoped to a set of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDocumentRegistrationOptions {
    /// A document selector to identify the scope of the registration. If
    /// `None` the selector provided on the client side is used.
    ///
    /// Always present on the wire: `None` is written as `null`.
    pub document_selector: Option<DocumentSelector>,
}

impl Composable for TextDocumentRegistrationOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields.required(
            "documentSelector",
            |o| &o.document_selector,
            |o| &mut o.document_selector,
        );
    }
}

/// Mixin for registrations that can carry an id, so they can be
/// unregistered later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRegistrationOptions {
    /// The id used to register the request.
    pub id: Option<String>,
}

impl Composable for StaticRegistrationOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional("id", |o| &o.id, |o| &mut o.id);
    }
}

object_value!(DocumentFilter, TextDocumentRegistrationOptions, StaticRegistrationOptions);
