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
    domain::{ContactMessage, CreateContactMessageRequest},
    error::Result,
};

#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "contact",
    request_body = CreateContactMessageRequest,
    responses(
        (status = 201, description = "Message received", body = ContactMessage),
        (status = 400, description = "Blank field or malformed email", body = ErrorBody),
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(mut request): ApiJson<CreateContactMessageRequest>,
) -> Result<(StatusCode, Json<ContactMessage>)> {
    request.normalize();
    request.validate()?;

    let message = state.service_context.contact_repo
        .create(request.into_message())
        .await?;

    tracing::info!("Contact message {} received", message.id);
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    get,
    path = "/api/contact",
    tag = "contact",
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 200, description = "Every contact message", body = Vec<ContactMessage>),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Extension(_admin): Extension<AdminIdentity>,
) -> Result<Json<Vec<ContactMessage>>> {
    let messages = state.service_context.contact_repo.list().await?;
    Ok(Json(messages))
}

#[utoipa::path(
    delete,
    path = "/api/contact/{id}",
    tag = "contact",
    params(("id" = Uuid, Path, description = "Contact message id")),
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
        (status = 404, description = "No message with this id", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.service_context.contact_repo.delete(id).await?;

    tracing::info!(%admin, "Deleted contact message {}", id);
    Ok(StatusCode::NO_CONTENT)
}
