use crate::transport::http::types::{ApiResponse, AppState, FindQuery, FindResponse};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::{debug, error};

/// A miss is reported in the body with status 200; existing clients rely on it.
#[utoipa::path(
    get,
    path = "/find",
    params(FindQuery),
    responses(
        (status = 200, description = "Matching cafe, or a not-found body", body = FindResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn find_cafe_handler(
    State(state): State<AppState>,
    Query(query): Query<FindQuery>,
) -> impl IntoResponse {
    let Some(location) = query.loc else {
        return Json(FindResponse::not_found()).into_response();
    };

    match state.cafe_service.find_by_location(&location).await {
        Ok(Some(cafe)) => Json(FindResponse::Cafe(cafe)).into_response(),
        Ok(None) => {
            debug!(location = %location, "no cafe at location");
            Json(FindResponse::not_found()).into_response()
        }
        Err(e) => {
            error!(error = %e, "find by location failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse {
                    success: false,
                    data: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
