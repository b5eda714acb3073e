use crate::domain::error::{CafeError, ValidationErrors};
use crate::domain::forms::PriceUpdateForm;
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
    price: Option<&str>,
    errors: &ValidationErrors,
    status: StatusCode,
) -> Response {
    let page = views::update_form(id, cafe, price, errors, &state.csrf.issue());
    (status, Html(page)).into_response()
}

pub async fn update_price_form_handler(
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
        None,
        &ValidationErrors::new(),
        StatusCode::OK,
    )
}

pub async fn update_price_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    Form(form): Form<PriceUpdateForm>,
) -> Response {
    let id = match cafe_id(id) {
        Ok(id) => id,
        Err(not_found) => return not_found,
    };

    let price = match check_submission(&state, form.csrf_token.as_deref(), form.validate()) {
        Ok(price) => price,
        Err(errors) => {
            warn!(id, fields = ?errors.fields(), "price update form rejected");
            let cafe = state.cafe_service.get(id).await.ok().flatten();
            return render(
                &state,
                id,
                cafe.as_ref(),
                form.price.as_deref(),
                &errors,
                StatusCode::OK,
            );
        }
    };

    match state.cafe_service.update_price(id, &price).await {
        Ok(_) => redirect_to_all().into_response(),
        Err(CafeError::NotFound(_)) => {
            warn!(id, "price update for unknown cafe");
            let errors = ValidationErrors::single("id", format!("No cafe with id {} exists.", id));
            render(
                &state,
                id,
                None,
                form.price.as_deref(),
                &errors,
                StatusCode::NOT_FOUND,
            )
        }
        Err(e) => e.into_response(),
    }
}
