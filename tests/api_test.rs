use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use society::{
    api::create_app,
    config::Settings,
    repository::{EventRepository, SqliteEventRepository},
    service::ServiceContext,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "correct horse battery staple";

enum Auth<'a> {
    None,
    Password(&'a str),
    Bearer(&'a str),
}

async fn test_app() -> anyhow::Result<(Router, SqlitePool)> {
    // One connection, or each would get its own in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    let mut settings = Settings::default();
    settings.auth.admin_password = Some(ADMIN_PASSWORD.to_string());
    settings.auth.max_failed_attempts = 3;

    let service_context = Arc::new(ServiceContext::sqlite(pool.clone(), &settings.auth));
    Ok((create_app(service_context, Arc::new(settings)), pool))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Auth<'_>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    builder = match auth {
        Auth::None => builder,
        Auth::Password(password) => builder.header("x-admin-password", password),
        Auth::Bearer(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
    };

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

fn event_body(title: &str, date: &str) -> Value {
    json!({
        "title": title,
        "description": "Bring a laptop",
        "date": date,
        "location": "Main Lab",
        "image": "https://example.com/poster.png",
    })
}

#[tokio::test]
async fn test_event_lifecycle() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/events",
        Auth::Password(ADMIN_PASSWORD),
        Some(event_body("Code Sprint", "2099-03-01")),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["registrationLink"], Value::Null);
    assert!(created["createdAt"].is_string());

    // Public read, stable id
    let (status, events) = send(&app, Method::GET, "/api/events", Auth::None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().map(Vec::len), Some(1));
    assert_eq!(events[0]["id"], created["id"]);

    // Partial update: title changes, image cleared, the rest kept
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/events/{}", id),
        Auth::Password(ADMIN_PASSWORD),
        Some(json!({ "title": "Code Sprint 2099", "image": null })),
    ).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Code Sprint 2099");
    assert_eq!(updated["image"], Value::Null);
    assert_eq!(updated["location"], "Main Lab");
    assert_eq!(updated["date"], "2099-03-01");
    assert_eq!(updated["id"], created["id"]);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/events/{}", id),
        Auth::Password(ADMIN_PASSWORD),
        None,
    ).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, events) = send(&app, Method::GET, "/api/events", Auth::None, None).await?;
    assert_eq!(events.as_array().map(Vec::len), Some(0));

    // Second delete of the same id
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/events/{}", id),
        Auth::Password(ADMIN_PASSWORD),
        None,
    ).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_wrong_credential_leaves_storage_untouched() -> anyhow::Result<()> {
    let (app, pool) = test_app().await?;
    let repo = SqliteEventRepository::new(pool.clone());

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/events",
        Auth::Password(ADMIN_PASSWORD),
        Some(event_body("Original", "2099-01-01")),
    ).await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/events",
        Auth::Password("wrong"),
        Some(event_body("Intruder", "2099-01-01")),
    ).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/events/{}", id),
        Auth::None,
        Some(json!({ "title": "Defaced" })),
    ).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let events = repo.list().await?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Original");

    // An unknown session token is a plain 401 and does not count toward lockout
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/events/{}", id),
        Auth::Bearer("not-a-session"),
        None,
    ).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(repo.list().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_update_unknown_and_malformed_ids() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/announcements/7f0c5a0e-4d5b-4f7e-9b1a-2c3d4e5f6a7b",
        Auth::Password(ADMIN_PASSWORD),
        Some(json!({ "title": "Nothing here" })),
    ).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/team-members/not-a-uuid",
        Auth::Password(ADMIN_PASSWORD),
        None,
    ).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().starts_with("Invalid id"));

    Ok(())
}

#[tokio::test]
async fn test_create_validation_names_field() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/team-members",
        Auth::Password(ADMIN_PASSWORD),
        Some(json!({ "name": "   ", "role": "Treasurer" })),
    ).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name is required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/announcements",
        Auth::Password(ADMIN_PASSWORD),
        Some(json!({ "title": "Results", "content": "See board", "type": "Result", "date": "31/12/2025" })),
    ).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_contact_submission_and_admin_list() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contact",
        Auth::None,
        Some(json!({ "name": "A", "email": "not-an-email", "message": "hi" })),
    ).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("email"));

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/contact",
        Auth::None,
        Some(json!({ "name": "A", "email": "a@b.com", "message": "hi" })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::GET, "/api/contact", Auth::None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, messages) = send(
        &app,
        Method::GET,
        "/api/contact",
        Auth::Password(ADMIN_PASSWORD),
        None,
    ).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(messages.as_array().map(Vec::len), Some(1));
    assert_eq!(messages[0]["id"], created["id"]);
    assert_eq!(messages[0]["email"], "a@b.com");

    Ok(())
}

#[tokio::test]
async fn test_registration_phone_rule() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let mut body = json!({
        "name": "Ali",
        "roll_number": "CS-101",
        "department": "Computer Science",
        "phone": "not a phone",
        "event_title": "Code Sprint",
    });

    let (status, error) = send(&app, Method::POST, "/api/registrations", Auth::None, Some(body.clone())).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap_or_default().contains("phone"));

    body["phone"] = json!("+92 300 1234567");
    let (status, created) = send(&app, Method::POST, "/api/registrations", Auth::None, Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["roll_number"], "CS-101");
    assert_eq!(created["event_title"], "Code Sprint");
    assert!(created["created_at"].is_string());

    let (status, list) = send(
        &app,
        Method::GET,
        "/api/registrations",
        Auth::Password(ADMIN_PASSWORD),
        None,
    ).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_session_login_and_logout() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let (status, session) = send(
        &app,
        Method::POST,
        "/api/admin/session",
        Auth::None,
        Some(json!({ "password": ADMIN_PASSWORD })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    let token = session["token"].as_str().unwrap_or_default().to_string();
    assert_eq!(token.len(), 64);
    assert!(session["expiresAt"].is_string());

    let (status, member) = send(
        &app,
        Method::POST,
        "/api/team-members",
        Auth::Bearer(&token),
        Some(json!({ "name": "Sara Ahmed", "role": "President", "order": 1 })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["order"], 1);

    let (status, _) = send(&app, Method::DELETE, "/api/admin/session", Auth::Bearer(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/team-members",
        Auth::Bearer(&token),
        Some(json!({ "name": "Bilal Khan", "role": "Vice President" })),
    ).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::DELETE, "/api/admin/session", Auth::None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/admin/session",
            Auth::None,
            Some(json!({ "password": "guess" })),
        ).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // Locked out: even the right password is refused
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/contact",
        Auth::Password(ADMIN_PASSWORD),
        None,
    ).await?;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap_or_default().contains("retry"));

    Ok(())
}

#[tokio::test]
async fn test_dashboard_stats() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    for (title, date) in [("Future Talk", "2099-01-01"), ("Old Talk", "2020-01-01")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/events",
            Auth::Password(ADMIN_PASSWORD),
            Some(event_body(title, date)),
        ).await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/registrations",
        Auth::None,
        Some(json!({
            "name": "Ali",
            "roll_number": "CS-101",
            "department": "CS",
            "phone": "03001234567",
            "event_title": "Future Talk",
        })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, stats) = send(
        &app,
        Method::GET,
        "/api/admin/stats",
        Auth::Password(ADMIN_PASSWORD),
        None,
    ).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["upcomingEvents"], 1);
    assert_eq!(stats["pastEvents"], 1);
    assert_eq!(stats["registrations"], 1);
    assert_eq!(stats["registrationsByEvent"][0]["eventTitle"], "Future Talk");
    assert_eq!(stats["registrationsByEvent"][0]["count"], 1);

    Ok(())
}

#[tokio::test]
async fn test_site_content_and_service_routes() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let (status, site) = send(&app, Method::GET, "/api/site", Auth::None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(site["testimonials"][0]["initials"], "UA");
    assert_eq!(site["socialLinks"].as_array().map(Vec::len), Some(3));
    assert_eq!(site["stats"][2]["label"], "Competitions Won");
    assert_eq!(site["stats"][2]["suffix"], "");
    assert_eq!(site["contact"]["location"], "GCU Lahore, Punjab, Pakistan");

    let (status, health) = send(&app, Method::GET, "/health", Auth::None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/nowhere", Auth::None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");

    let (status, doc) = send(&app, Method::GET, "/api/openapi.json", Auth::None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/events"].is_object());

    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_team_member_lifecycle() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/team-members",
        Auth::Password(ADMIN_PASSWORD),
        Some(json!({
            "name": "Fatima Noor",
            "role": "Treasurer",
            "bio": "Keeps the books",
            "order": 4,
        })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(created["order"], 4);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/team-members/{}", id),
        Auth::Password(ADMIN_PASSWORD),
        Some(json!({ "order": 1, "bio": null })),
    ).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["order"], 1);
    assert_eq!(updated["bio"], Value::Null);
    assert_eq!(updated["role"], "Treasurer");

    let (_, members) = send(&app, Method::GET, "/api/team-members", Auth::None, None).await?;
    assert_eq!(members[0]["order"], 1);

    let uri = format!("/api/team-members/{}", id);
    let (status, _) = send(&app, Method::DELETE, &uri, Auth::Password(ADMIN_PASSWORD), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &uri, Auth::Password(ADMIN_PASSWORD), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_announcement_lifecycle() -> anyhow::Result<()> {
    let (app, _pool) = test_app().await?;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/announcements",
        Auth::Password(ADMIN_PASSWORD),
        Some(json!({
            "title": "Quiz Night",
            "content": "Teams of three",
            "type": "Event",
            "date": "2099-05-10",
        })),
    ).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(created["type"], "Event");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/announcements/{}", id),
        Auth::Password(ADMIN_PASSWORD),
        Some(json!({ "type": "Result" })),
    ).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["type"], "Result");
    assert_eq!(updated["title"], "Quiz Night");
    assert_eq!(updated["date"], "2099-05-10");

    let uri = format!("/api/announcements/{}", id);
    let (status, _) = send(&app, Method::DELETE, &uri, Auth::Password(ADMIN_PASSWORD), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, announcements) = send(&app, Method::GET, "/api/announcements", Auth::None, None).await?;
    assert_eq!(announcements.as_array().map(Vec::len), Some(0));

    let (status, _) = send(&app, Method::DELETE, &uri, Auth::Password(ADMIN_PASSWORD), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_storage_outage_is_service_unavailable() -> anyhow::Result<()> {
    let (app, pool) = test_app().await?;
    pool.close().await;

    let (status, body) = send(&app, Method::GET, "/api/events", Auth::None, None).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service temporarily unavailable");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contact",
        Auth::None,
        Some(json!({ "name": "A", "email": "a@b.com", "message": "hi" })),
    ).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service temporarily unavailable");

    Ok(())
}
