use crate::domain::error::{CafeError, ValidationErrors};
use crate::domain::forms::DeleteForm;
use crate::domain::model::CafeRecord;
use crate::transport::http::handlers::common::{cafe_id, check_submission, redirect_to_all};
use crate::transport::http::types::AppState;
use crate::transport::http::views;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use tracing::warn;

fn render(
    state: &AppState,
    id: i64,
    cafe: Option<&CafeRecord>,
    errors: &ValidationErrors,
    status: StatusCode,
) -> Response {
    let page = views::delete_form(id, cafe, errors, &state.csrf.issue());
    (status, Html(page)).into_response()
}

pub async fn report_closed_form_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    let id = match cafe_id(id) {
        Ok(id) => id,
        Err(not_found) => return not_found,
    };
    let cafe = match state.cafe_service.get(id).await {
        Ok(cafe) => cafe,
        Err(e) => return e.into_response(),
    };
    render(
        &state,
        id,
        cafe.as_ref(),
        &ValidationErrors::new(),
        StatusCode::OK,
    )
}

/// A wrong or missing key redirects to the listing without a message and
/// without touching the table.
pub async fn report_closed_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let id = match cafe_id(id) {
        Ok(id) => id,
        Err(not_found) => return not_found,
    };

    if state
        .cafe_service
        .authorize_delete(form.key.as_deref())
        .is_err()
    {
        return redirect_to_all().into_response();
    }

    if let Err(errors) = check_submission(&state, form.csrf_token.as_deref(), form.validate()) {
        warn!(id, fields = ?errors.fields(), "report-closed form rejected");
        let cafe = state.cafe_service.get(id).await.ok().flatten();
        return render(&state, id, cafe.as_ref(), &errors, StatusCode::OK);
    }

    match state
        .cafe_service
        .report_closed(id, form.key.as_deref())
        .await
    {
        Ok(()) => redirect_to_all().into_response(),
        Err(CafeError::NotFound(_)) => {
            warn!(id, "report-closed for unknown cafe");
            let errors = ValidationErrors::single("id", format!("No cafe with id {} exists.", id));
            render(&state, id, None, &errors, StatusCode::NOT_FOUND)
        }
        Err(e) => e.into_response(),
    }
}
