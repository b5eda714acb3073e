use crate::domain::error::{CafeError, ValidationErrors};
use crate::domain::forms::AddCafeForm;
use crate::transport::http::handlers::common::{check_submission, redirect_to_all};
use crate::transport::http::types::AppState;
use crate::transport::http::views;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use tracing::warn;

fn render(state: &AppState, form: &AddCafeForm, errors: &ValidationErrors, status: StatusCode) -> Response {
    let page = views::add_form(form, errors, &state.csrf.issue());
    (status, Html(page)).into_response()
}

pub async fn add_form_handler(State(state): State<AppState>) -> Response {
    render(
        &state,
        &AddCafeForm::default(),
        &ValidationErrors::new(),
        StatusCode::OK,
    )
}

pub async fn add_cafe_handler(
    State(state): State<AppState>,
    Form(form): Form<AddCafeForm>,
) -> Response {
    let new_cafe = match check_submission(&state, form.csrf_token.as_deref(), form.validate()) {
        Ok(cafe) => cafe,
        Err(errors) => {
            warn!(fields = ?errors.fields(), "add cafe form rejected");
            return render(&state, &form, &errors, StatusCode::OK);
        }
    };

    match state.cafe_service.add(new_cafe).await {
        Ok(_) => redirect_to_all().into_response(),
        Err(CafeError::Conflict { name }) => {
            warn!(name = %name, "add cafe rejected: duplicate name");
            let errors = ValidationErrors::single(
                "name",
                format!("A cafe named '{}' already exists.", name),
            );
            render(&state, &form, &errors, StatusCode::CONFLICT)
        }
        Err(e) => e.into_response(),
    }
}
