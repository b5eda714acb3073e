//! HTTP mapping for `CafeError` on the HTML routes.

use crate::domain::error::CafeError;
use crate::transport::http::views;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

impl CafeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CafeError::Conflict { .. } => StatusCode::CONFLICT,
            CafeError::NotFound(_) | CafeError::EmptyCollection => StatusCode::NOT_FOUND,
            CafeError::Authorization => StatusCode::FORBIDDEN,
            CafeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CafeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Storage details stay in the log, not the page.
        let message = match &self {
            CafeError::Storage(e) => {
                error!(error = %e, "storage failure");
                "Something went wrong talking to the database.".to_string()
            }
            other => other.to_string(),
        };
        (status, Html(views::error_page(status, &message))).into_response()
    }
}
