use crate::domain::error::CafeError;
use crate::transport::http::types::AppState;
use crate::transport::http::views;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::debug;

pub async fn home_handler() -> Html<String> {
    Html(views::index())
}

pub async fn all_cafes_handler(State(state): State<AppState>) -> Result<Html<String>, CafeError> {
    let cafes = state.cafe_service.all().await?;
    Ok(Html(views::cafes("All Cafes", &cafes, None)))
}

pub async fn random_cafe_handler(State(state): State<AppState>) -> Response {
    match state.cafe_service.random().await {
        Ok(cafe) => {
            debug!(id = cafe.id, "random cafe picked");
            Html(views::cafes("Random Cafe", std::slice::from_ref(&cafe), None)).into_response()
        }
        Err(CafeError::EmptyCollection) => (
            StatusCode::NOT_FOUND,
            Html(views::cafes(
                "Random Cafe",
                &[],
                Some("There are no cafes to pick from yet."),
            )),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
