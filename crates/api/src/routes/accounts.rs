//! Account signup.

use axum::{extract::State, http::StatusCode, Json};
use cinegrok_core::{ApiKeyEnv, SubscriptionTier};
use cinegrok_telemetry::metrics;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::extractors::ClientIp;
use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    /// Key environment; live unless asked otherwise.
    #[serde(default)]
    pub env: Option<ApiKeyEnv>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub account_id: Uuid,
    pub email: String,
    /// The full API key, shown only in this response.
    pub api_key: String,
    pub tier: SubscriptionTier,
}

/// POST /v1/accounts - Create an account and issue its API key.
pub async fn signup_handler(
    State(state): State<AppState>,
    client_ip: ClientIp,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    state.rate_limiter.enforce("signup", client_ip.key())?;

    let env = request.env.unwrap_or(ApiKeyEnv::Live);
    let account = state.store.create_account(&request.email, env)?;

    metrics().accounts_created.inc();
    info!(account_id = %account.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            account_id: account.id,
            email: account.email,
            api_key: account.api_key,
            tier: account.tier,
        }),
    ))
}
