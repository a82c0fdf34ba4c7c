use std::fmt;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    api::{extract::ClientAddr, state::AppState},
    error::AppError,
};

/// Header carrying the admin secret on privileged requests.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// How the caller of a privileged route proved it is an admin.
#[derive(Debug, Clone)]
pub enum AdminIdentity {
    Session { session_id: String },
    SharedSecret,
}

impl fmt::Display for AdminIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminIdentity::Session { session_id } => write!(f, "session:{}", session_id),
            AdminIdentity::SharedSecret => f.write_str("shared-secret"),
        }
    }
}

/// Accepts either `Authorization: Bearer <session token>` or the
/// `x-admin-password` header. Runs before the handler, so a rejected request
/// never reaches storage.
pub async fn require_admin(
    State(state): State<AppState>,
    ClientAddr(client): ClientAddr,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_service = &state.service_context.auth_service;

    let identity = if let Some(TypedHeader(Authorization(bearer))) = bearer {
        let session = auth_service
            .validate_session(bearer.token())
            .await?
            .ok_or(AppError::Unauthorized)?;
        AdminIdentity::Session { session_id: session.id }
    } else {
        let password = request
            .headers()
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        auth_service.check_admin_password(client, password).await?;
        AdminIdentity::SharedSecret
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
