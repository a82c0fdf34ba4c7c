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
    domain::{CreateEventRequest, Event, UpdateEventRequest},
    error::{AppError, Result},
};

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    responses(
        (status = 200, description = "Every event, in stored order", body = Vec<Event>),
        (status = 503, description = "Storage unavailable", body = ErrorBody),
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    let events = state.service_context.event_repo.list().await?;
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "events",
    request_body = CreateEventRequest,
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiJson(mut request): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    request.normalize();
    request.validate()?;

    let event = state.service_context.event_repo
        .create(request.into_event())
        .await?;

    tracing::info!(%admin, "Created event {} ({})", event.id, event.title);
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
        (status = 404, description = "No event with this id", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateEventRequest>,
) -> Result<Json<Event>> {
    let existing = state.service_context.event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let event = request.apply(existing);
    CreateEventRequest::from(&event).validate()?;

    let updated = state.service_context.event_repo.update(id, event).await?;

    tracing::info!(%admin, "Updated event {}", id);
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
        (status = 404, description = "No event with this id", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.service_context.event_repo.delete(id).await?;

    tracing::info!(%admin, "Deleted event {}", id);
    Ok(StatusCode::NO_CONTENT)
}
