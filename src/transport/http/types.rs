use crate::app::CafeService;
use crate::crypto::CsrfGuard;
use crate::domain::model::CafeRecord;
use crate::infra::config::AppConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Message returned by `/find` when nothing matches.
pub const FIND_NOT_FOUND_MESSAGE: &str = "Sorry we couldn't find the cafe at that location.";

#[derive(Clone)]
pub struct AppState {
    pub cafe_service: Arc<CafeService>,
    pub csrf: Arc<CsrfGuard>,
}

impl AppState {
    pub fn new(cafe_service: Arc<CafeService>, config: &AppConfig) -> anyhow::Result<Self> {
        let csrf = CsrfGuard::new(config.secret_key.as_bytes(), config.csrf_time_limit_secs)
            .map_err(|e| anyhow::anyhow!("SECRET_KEY cannot key the CSRF signer: {}", e))?;
        Ok(Self {
            cafe_service,
            csrf: Arc::new(csrf),
        })
    }

    /// Connects the database named in `config` and wires the state around it.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let cafe_service = CafeService::from_config(config).await?;
        Self::new(Arc::new(cafe_service), config)
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindQuery {
    /// Location to match exactly (case-sensitive, untrimmed).
    pub loc: Option<String>,
}

/// Body of `/find`: `{"cafe": {...}}` or `{"error": {"not found": "..."}}`.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FindResponse {
    Cafe(CafeRecord),
    Error(NotFoundBody),
}

impl FindResponse {
    pub fn not_found() -> Self {
        FindResponse::Error(NotFoundBody {
            not_found: FIND_NOT_FOUND_MESSAGE.to_string(),
        })
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct NotFoundBody {
    #[serde(rename = "not found")]
    pub not_found: String,
}
