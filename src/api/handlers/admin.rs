use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::{
        extract::{ApiJson, ClientAddr},
        middleware::auth::AdminIdentity,
        state::AppState,
        ErrorBody,
    },
    error::{AppError, Result},
    service::stats_service::DashboardStats,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchanges the admin password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/admin/session",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Wrong password", body = ErrorBody),
        (status = 429, description = "Too many failed attempts", body = ErrorBody),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ClientAddr(client): ClientAddr,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>)> {
    let (session, token) = state.service_context.auth_service
        .login(client, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            expires_at: session.expires_at,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/session",
    tag = "admin",
    security(("admin_session" = [])),
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Missing or unknown token", body = ErrorBody),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<StatusCode> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let removed = state.service_context.auth_service
        .invalidate_session(bearer.token())
        .await?;

    if !removed {
        return Err(AppError::Unauthorized);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "admin",
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
    )
)]
pub async fn stats(
    State(state): State<AppState>,
    Extension(_admin): Extension<AdminIdentity>,
) -> Result<Json<DashboardStats>> {
    let today = Utc::now().date_naive();
    let stats = state.service_context.stats_service.dashboard(today).await?;
    Ok(Json(stats))
}
