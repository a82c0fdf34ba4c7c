pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use std::sync::Arc;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use middleware::auth::ADMIN_PASSWORD_HEADER;
use state::AppState;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Society API", description = "Site content, public submissions and admin management"),
    paths(
        handlers::events::list,
        handlers::events::create,
        handlers::events::update,
        handlers::events::delete,
        handlers::team_members::list,
        handlers::team_members::create,
        handlers::team_members::update,
        handlers::team_members::delete,
        handlers::announcements::list,
        handlers::announcements::create,
        handlers::announcements::update,
        handlers::announcements::delete,
        handlers::contact::submit,
        handlers::contact::list,
        handlers::contact::delete,
        handlers::registrations::submit,
        handlers::registrations::list,
        handlers::registrations::delete,
        handlers::site::content,
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::stats,
    ),
    components(schemas(ErrorBody)),
    modifiers(&SecurityAddon),
    tags(
        (name = "events", description = "Society events"),
        (name = "team", description = "Team roster"),
        (name = "announcements", description = "News and notices"),
        (name = "contact", description = "Contact form submissions"),
        (name = "registrations", description = "Event registrations"),
        (name = "site", description = "Static home page content"),
        (name = "admin", description = "Admin sessions and dashboard"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_password",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_PASSWORD_HEADER))),
        );
        components.add_security_scheme(
            "admin_session",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let static_dir = settings.server.static_dir.clone();
    let app_state = AppState::new(service_context, settings);

    let router = Router::new()
        // Health and discovery
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))

        .nest("/api", api_routes(app_state.clone()))

        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()));

    // Built site assets take over everything the API does not claim
    let router = match static_dir {
        Some(dir) => {
            let index = std::path::Path::new(&dir).join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router
            .route("/", get(handlers::root::root))
            .fallback(handlers::root::not_found),
    };

    router
        .with_state(app_state)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/events", event_routes(state.clone()))
        .nest("/team-members", team_member_routes(state.clone()))
        .nest("/announcements", announcement_routes(state.clone()))
        .nest("/contact", contact_routes(state.clone()))
        .nest("/registrations", registration_routes(state.clone()))
        .nest("/admin", admin_routes(state))
        .route("/site", get(handlers::site::content))
        .fallback(handlers::root::not_found)
}

fn admin_only(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(axum::middleware::from_fn_with_state(
        state,
        middleware::auth::require_admin,
    ))
}

fn event_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(handlers::events::create))
        .route("/:id", put(handlers::events::update).delete(handlers::events::delete));

    Router::new()
        .route("/", get(handlers::events::list))
        .merge(admin_only(protected, state))
}

fn team_member_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(handlers::team_members::create))
        .route("/:id", put(handlers::team_members::update).delete(handlers::team_members::delete));

    Router::new()
        .route("/", get(handlers::team_members::list))
        .merge(admin_only(protected, state))
}

fn announcement_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(handlers::announcements::create))
        .route("/:id", put(handlers::announcements::update).delete(handlers::announcements::delete));

    Router::new()
        .route("/", get(handlers::announcements::list))
        .merge(admin_only(protected, state))
}

fn contact_routes(state: AppState) -> Router<AppState> {
    // Anyone may write, only admins may read
    let protected = Router::new()
        .route("/", get(handlers::contact::list))
        .route("/:id", axum::routing::delete(handlers::contact::delete));

    Router::new()
        .route("/", post(handlers::contact::submit))
        .merge(admin_only(protected, state))
}

fn registration_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(handlers::registrations::list))
        .route("/:id", axum::routing::delete(handlers::registrations::delete));

    Router::new()
        .route("/", post(handlers::registrations::submit))
        .merge(admin_only(protected, state))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/stats", get(handlers::admin::stats));

    Router::new()
        .route(
            "/session",
            post(handlers::admin::login).delete(handlers::admin::logout),
        )
        .merge(admin_only(protected, state))
}
