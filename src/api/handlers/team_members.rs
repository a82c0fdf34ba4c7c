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
    domain::{CreateTeamMemberRequest, TeamMember, UpdateTeamMemberRequest},
    error::{AppError, Result},
};

/// Returned unsorted; display ordering is the client's job.
#[utoipa::path(
    get,
    path = "/api/team-members",
    tag = "team",
    responses(
        (status = 200, description = "Every team member, in stored order", body = Vec<TeamMember>),
        (status = 503, description = "Storage unavailable", body = ErrorBody),
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TeamMember>>> {
    let members = state.service_context.team_member_repo.list().await?;
    Ok(Json(members))
}

#[utoipa::path(
    post,
    path = "/api/team-members",
    tag = "team",
    request_body = CreateTeamMemberRequest,
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 201, description = "Team member created", body = TeamMember),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiJson(mut request): ApiJson<CreateTeamMemberRequest>,
) -> Result<(StatusCode, Json<TeamMember>)> {
    request.normalize();
    request.validate()?;

    let member = state.service_context.team_member_repo
        .create(request.into_member())
        .await?;

    tracing::info!(%admin, "Added team member {} ({})", member.id, member.role);
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    put,
    path = "/api/team-members/{id}",
    tag = "team",
    params(("id" = Uuid, Path, description = "Team member id")),
    request_body = UpdateTeamMemberRequest,
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 200, description = "Team member updated", body = TeamMember),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
        (status = 404, description = "No team member with this id", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateTeamMemberRequest>,
) -> Result<Json<TeamMember>> {
    let existing = state.service_context.team_member_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team member not found".to_string()))?;

    let member = request.apply(existing);
    CreateTeamMemberRequest::from(&member).validate()?;

    let updated = state.service_context.team_member_repo.update(id, member).await?;

    tracing::info!(%admin, "Updated team member {}", id);
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/team-members/{id}",
    tag = "team",
    params(("id" = Uuid, Path, description = "Team member id")),
    security(("admin_password" = []), ("admin_session" = [])),
    responses(
        (status = 204, description = "Team member removed"),
        (status = 401, description = "Bad admin credential", body = ErrorBody),
        (status = 404, description = "No team member with this id", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.service_context.team_member_repo.delete(id).await?;

    tracing::info!(%admin, "Removed team member {}", id);
    Ok(StatusCode::NO_CONTENT)
}
