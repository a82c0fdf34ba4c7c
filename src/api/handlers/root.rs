use axum::{http::StatusCode, Json, response::IntoResponse};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub status: String,
}

pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": "Society API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Content and submissions API for the society website",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "api": "/api",
            "events": "/api/events",
            "team": "/api/team-members",
            "announcements": "/api/announcements",
            "contact": "/api/contact",
            "registrations": "/api/registrations",
            "site": "/api/site",
            "admin": "/api/admin/session",
            "docs": "/api/docs"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

pub async fn root() -> impl IntoResponse {
    Json(ApiInfo {
        name: "Society API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Content and submissions API for the society website".to_string(),
        status: "operational".to_string(),
    })
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
