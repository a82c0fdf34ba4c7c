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
    domain::{CreateRegistrationRequest, Registration},
    error::Result,
};

/// The event title is stored as given; it is not checked against the
/// events table.
#[utoipa::path(
    post,
    path = "/api/registrations",
    tag = "registrations",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration recorded", body = Registration),
        (status = 400, description = "Blank field or invalid phone", body = ErrorBody),
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<Registration>)> {
    request.normalize();
    request.validate()?;

    let registration = state.service_context.registration_repo
        .create(request.into_registration())
        .await?;

    tracing::info!(
        "Registration {} recorded for \"{}\"",
        registration.id,
        registration.event_title
    );
    Ok((StatusCode::CREATED, Json(registration)))
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    tag = "registrations",
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 200, description = "Every registration", body = Vec<Registration>),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Extension(_admin): Extension<AdminIdentity>,
) -> Result<Json<Vec<Registration>>> {
    let registrations = state.service_context.registration_repo.list().await?;
    Ok(Json(registrations))
}

#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    tag = "registrations",
    params(("id" = Uuid, Path, description = "Registration id")),
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 204, description = "Registration deleted"),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
        (status = 404, description = "No registration with this id", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.service_context.registration_repo.delete(id).await?;

    tracing::info!(%admin, "Deleted registration {}", id);
    Ok(StatusCode::NO_CONTENT)
}
