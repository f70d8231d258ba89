//! Request body extraction
//!
//! Book bodies arrive as JSON from API clients and as url-encoded forms from
//! the create page. `BookPayload` accepts either, chosen by `Content-Type`.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};

use crate::catalog::{BookRequest, CatalogError};

/// A `BookRequest` read from a JSON or form body
#[derive(Debug)]
pub struct BookPayload(pub BookRequest);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for BookPayload
where
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(body) = Form::<BookRequest>::from_request(req, state)
                .await
                .map_err(|e| CatalogError::BadRequest(e.body_text()))?;
            Ok(BookPayload(body))
        } else {
            let Json(body) = Json::<BookRequest>::from_request(req, state)
                .await
                .map_err(|e| CatalogError::BadRequest(e.body_text()))?;
            Ok(BookPayload(body))
        }
    }
}
