use std::future::Future;

use crate::error::SubmitError;
use crate::models::RemoteRef;

/// Repeated form field carrying the uploaded photo references
pub const GALLERY_FIELD: &str = "gallery[]";

/// The action that receives the finished form
pub trait FormSubmitter: Send + Sync {
    fn submit(
        &self,
        payload: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

/// Appends one `gallery[]` entry per reference, in item order
pub fn build_payload(
    mut fields: Vec<(String, String)>,
    references: &[RemoteRef],
) -> Vec<(String, String)> {
    fields.extend(
        references
            .iter()
            .map(|r| (GALLERY_FIELD.to_string(), r.as_str().to_string())),
    );
    fields
}
