//! Error type for request handlers.
//!
//! Missing resources render the plain not-found fragment; anything else is
//! logged and reported as a bare 500 page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use folio_core::StoreError;

pub const NOT_FOUND_BODY: &str = "<h3>Not Found</h3>";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No route or no article for the requested slug.
    #[error("not found")]
    NotFound,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("template error: {0}")]
    Render(#[from] askama::Error),

    /// Task join failures and other plumbing errors.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound | Self::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response()
            }
            Self::Store(err) => {
                tracing::error!(error = %err, "store error");
                internal_error()
            }
            Self::Render(err) => {
                tracing::error!(error = %err, "template error");
                internal_error()
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h3>Internal Server Error</h3>"),
    )
        .into_response()
}
