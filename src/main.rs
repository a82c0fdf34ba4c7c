use std::{net::SocketAddr, sync::Arc};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use society::{
    api,
    config::Settings,
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "society=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    if !settings.auth.has_admin_secret() {
        tracing::warn!(
            "No admin secret configured (SOCIETY__AUTH__ADMIN_PASSWORD_HASH or SOCIETY__AUTH__ADMIN_PASSWORD); \
             every admin request will be rejected"
        );
    }

    tracing::info!("Starting society server on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let service_context = Arc::new(ServiceContext::sqlite(db_pool, &settings.auth));

    let removed = service_context.auth_service.cleanup_expired_sessions().await?;
    if removed > 0 {
        tracing::info!("Removed {} expired admin sessions", removed);
    }

    if let Some(dir) = &settings.server.static_dir {
        tracing::info!("Serving front-end bundle from {}", dir);
    }

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on {}", settings.server.base_url);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
