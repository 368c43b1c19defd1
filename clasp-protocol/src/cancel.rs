use clasp_codec::{Composable, Fields, object_value};

use crate::IntegerOrString;

/// Identifier of a request.
pub type RequestId = IntegerOrString;

/// Params of a `$/cancelRequest` notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelParams {
    /// The request id to cancel.
    pub id: RequestId,
}

impl Composable for CancelParams {
    fn declare(fields: &mut Fields<Self>) {
        fields.required("id", |p| &p.id, |p| &mut p.id);
    }
}

object_value!(CancelParams);
