use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{api::error::AppError, app_state::SharedAppState};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserCapabilitiesResponse {
    pub user: String,
    /// Sorted capability names, direct grants and custom roles combined
    pub capabilities: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/capabilities",
    params(
        ("user_id" = String, Path, description = "User identifier")
    ),
    responses(
        (status = 200, body = UserCapabilitiesResponse),
        (status = 404, description = "Unknown user"),
    )
)]
pub async fn user_capabilities_handler(
    State(state): State<SharedAppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let capabilities = state.auth_service.effective_capabilities(&user_id).await?;

    Ok(Json(UserCapabilitiesResponse {
        user: user_id,
        capabilities: capabilities.names(),
    }))
}
