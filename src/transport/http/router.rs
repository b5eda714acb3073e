use crate::domain::model::CafeRecord;
use crate::transport::http::handlers::{add, find, health, pages, report_closed, update_price};
use crate::transport::http::types::{ApiResponse, FindResponse, NotFoundBody};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// OpenAPI document for the JSON endpoints. The HTML routes are not described.
#[derive(OpenApi)]
#[openapi(
    paths(find::find_cafe_handler, health::healthcheck_handler),
    components(schemas(ApiResponse, CafeRecord, FindResponse, NotFoundBody))
)]
pub struct ApiDoc;

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/", get(pages::home_handler))
        .route("/random", get(pages::random_cafe_handler))
        .route("/all", get(pages::all_cafes_handler))
        .route("/find", get(find::find_cafe_handler))
        .route(
            "/add",
            get(add::add_form_handler).post(add::add_cafe_handler),
        )
        .route(
            "/update_price/:id",
            get(update_price::update_price_form_handler).post(update_price::update_price_handler),
        )
        .route(
            "/report-closed/:id",
            get(report_closed::report_closed_form_handler)
                .post(report_closed::report_closed_handler),
        )
        .route("/health", get(health::healthcheck_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
