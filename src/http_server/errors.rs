//! HTTP error mapping
//!
//! JSON routes answer with `{error, code}`; page routes render an HTML
//! error page with the same status.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;
use crate::views::pages;

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&CatalogError> for ErrorResponse {
    fn from(err: &CatalogError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: String,
}

fn status_of(err: &CatalogError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = status_of(&self);
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

/// Catalog error surfaced on an HTML page
#[derive(Debug)]
pub struct PageError(pub CatalogError);

impl From<CatalogError> for PageError {
    fn from(err: CatalogError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = status_of(&self.0);
        let body = Html(pages::error(status.as_u16(), &self.0.to_string()));
        (status, body).into_response()
    }
}
