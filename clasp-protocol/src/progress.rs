//! Mixins for work-done progress and partial results.

use clasp_codec::{Composable, Fields, object_value};

use crate::IntegerOrString;

/// Token identifying a progress stream.
pub type ProgressToken = IntegerOrString;

/// Mixin for requests that accept a work-done progress token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkDoneProgressParams {
    /// An optional token that a server can use to report work done progress.
    pub work_done_token: Option<ProgressToken>,
}

impl Composable for WorkDoneProgressParams {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional("workDoneToken", |p| &p.work_done_token, |p| &mut p.work_done_token);
    }
}

/// Mixin for requests whose results may be streamed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialResultParams {
    /// An optional token that a server can use to report partial results
    /// (e.g. streaming) to the client.
    pub partial_result_token: Option<ProgressToken>,
}

impl Composable for PartialResultParams {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional(
            "partialResultToken",
            |p| &p.partial_result_token,
            |p| &mut p.partial_result_token,
        );
    }
}

/// Mixin for server capabilities that may report work-done progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkDoneProgressOptions {
    /// Whether the server reports work-done progress.
    pub work_done_progress: Option<bool>,
}

impl Composable for WorkDoneProgressOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional("workDoneProgress", |o| &o.work_done_progress, |o| &mut o.work_done_progress);
    }
}

object_value!(WorkDoneProgressParams, PartialResultParams, WorkDoneProgressOptions);
