use axum::{
    extract::{FromRequest, Request},
    response::Json,
};

use crate::errors::TaskError;
use crate::models::domain::Document;

/// JSON object request body. Any body that is missing, malformed or not an
/// object is rejected as a validation error instead of axum's plain-text rejection.
pub struct JsonDocument(pub Document);

impl<S> FromRequest<S> for JsonDocument
where
    S: Send + Sync,
{
    type Rejection = TaskError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Document>::from_request(req, state).await {
            Ok(Json(doc)) => Ok(Self(doc)),
            Err(rejection) => {
                log::debug!("Rejected request body: {}", rejection.body_text());
                Err(TaskError::validation("Request body must be a JSON object"))
            }
        }
    }
}
