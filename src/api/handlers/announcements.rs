use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{
        extract::{ApiJson, ApiPath},
        middleware::auth::AdminIdentity,
        state::AppState,
        ErrorBody,
    },
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    error::{AppError, Result},
};

#[utoipa::path(
    get,
    path = "/api/announcements",
    tag = "announcements",
    responses(
        (status = 200, description = "Every announcement, in stored order", body = Vec<Announcement>),
        (status = 503, description = "Storage unavailable", body = ErrorBody),
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Announcement>>> {
    let announcements = state.service_context.announcement_repo.list().await?;
    Ok(Json(announcements))
}

#[utoipa::path(
    post,
    path = "/api/announcements",
    tag = "announcements",
    request_body = CreateAnnouncementRequest,
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 201, description = "Announcement published", body = Announcement),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiJson(mut request): ApiJson<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    request.normalize();
    request.validate()?;

    let announcement = state.service_context.announcement_repo
        .create(request.into_announcement())
        .await?;

    tracing::info!(%admin, "Published announcement {} ({})", announcement.id, announcement.title);
    Ok((StatusCode::CREATED, Json(announcement)))
}

#[utoipa::path(
    put,
    path = "/api/announcements/{id}",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement id")),
    request_body = UpdateAnnouncementRequest,
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 200, description = "Announcement updated", body = Announcement),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
        (status = 404, description = "No announcement with this id", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let existing = state.service_context.announcement_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

    let announcement = request.apply(existing);
    CreateAnnouncementRequest::from(&announcement).validate()?;

    let updated = state.service_context.announcement_repo
        .update(id, announcement)
        .await?;

    tracing::info!(%admin, "Updated announcement {}", id);
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement id")),
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
        (status = 404, description = "No announcement with this id", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.service_context.announcement_repo.delete(id).await?;

    tracing::info!(%admin, "Deleted announcement {}", id);
    Ok(StatusCode::NO_CONTENT)
}
