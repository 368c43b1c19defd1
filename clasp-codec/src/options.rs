/// What to do with an object key that the target type does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Skip the key and its value (default). Message variants evolve, so
    /// newer peers may send fields this build does not know about.
    #[default]
    Ignore,
    /// Fail with [`ParseErrorKind::UnknownField`](crate::ParseErrorKind::UnknownField).
    Reject,
}

/// What to do when one object contains the same key twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateFieldPolicy {
    /// The later occurrence overwrites the earlier one (default).
    #[default]
    LastWins,
    /// Fail with [`ParseErrorKind::DuplicateField`](crate::ParseErrorKind::DuplicateField).
    Reject,
}

/// Options for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Policy for undeclared keys (default: ignore).
    pub unknown_fields: UnknownFieldPolicy,

    /// Policy for repeated keys (default: last wins).
    pub duplicate_fields: DuplicateFieldPolicy,

    /// Maximum number of simultaneously open arrays and objects (default: 128).
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptions {
    /// Lenient defaults.
    pub const fn new() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Ignore,
            duplicate_fields: DuplicateFieldPolicy::LastWins,
            max_depth: 128,
        }
    }

    /// Reject both unknown and duplicate fields.
    pub const fn strict() -> Self {
        Self::new().deny_unknown_fields().reject_duplicates()
    }

    /// Fail on undeclared keys.
    pub const fn deny_unknown_fields(mut self) -> Self {
        self.unknown_fields = UnknownFieldPolicy::Reject;
        self
    }

    /// Fail on repeated keys.
    pub const fn reject_duplicates(mut self) -> Self {
        self.duplicate_fields = DuplicateFieldPolicy::Reject;
        self
    }

    /// Set the nesting limit.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
