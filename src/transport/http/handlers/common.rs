use crate::domain::error::ValidationErrors;
use crate::domain::forms::CSRF_FIELD;
use crate::transport::http::types::AppState;
use crate::transport::http::views;
use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::debug;

/// Listing page every successful (or silently refused) write lands on.
pub const ALL_CAFES_PATH: &str = "/all";

pub fn redirect_to_all() -> Redirect {
    Redirect::to(ALL_CAFES_PATH)
}

/// Accepts only unsigned decimal ids; anything else is a 404 page, the same
/// as a route that does not exist.
pub fn cafe_id(path: Result<Path<u64>, PathRejection>) -> Result<i64, Response> {
    match path {
        Ok(Path(id)) => i64::try_from(id).map_err(|_| not_found_page()),
        Err(rejection) => {
            debug!(%rejection, "cafe id rejected");
            Err(not_found_page())
        }
    }
}

fn not_found_page() -> Response {
    let status = StatusCode::NOT_FOUND;
    (
        status,
        Html(views::error_page(status, "That page does not exist.")),
    )
        .into_response()
}

/// Combines the anti-forgery check with the form's own validation so the
/// re-rendered form shows every problem at once.
pub fn check_submission<T>(
    state: &AppState,
    csrf_token: Option<&str>,
    validated: Result<T, ValidationErrors>,
) -> Result<T, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Err(rejection) = state.csrf.verify(csrf_token) {
        errors.push(CSRF_FIELD, rejection.message());
    }
    match validated {
        Ok(value) if errors.is_empty() => Ok(value),
        Ok(_) => Err(errors),
        Err(field_errors) => {
            errors.extend(field_errors);
            Err(errors)
        }
    }
}
