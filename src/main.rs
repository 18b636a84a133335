use anyhow::Context;
use shopfront::{
    AppState, DisabledAuthProvider, PostgresDatabase, SupabaseAuthProvider,
    auth::AuthState,
    config::{AppConfig, Env},
    create_router,
    database::DatabaseState,
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, installs logging, builds the collaborators and serves HTTP.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration (.env first, then the process environment)
    dotenv::dotenv().ok();
    let config = AppConfig::load().context("invalid configuration")?;

    // 2. Logging: RUST_LOG wins, otherwise local-friendly defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for log aggregation.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Database: lazy pool, the first query connects.
    let db = PostgresDatabase::connect_lazy(
        &config.db_url,
        Duration::from_secs(config.db_acquire_timeout_secs),
    )
    .context("invalid DATABASE_URL")?;
    let db = Arc::new(db) as DatabaseState;

    // 4. Auth provider, or the disabled stand-in.
    let auth = match (&config.auth_url, &config.auth_key) {
        (Some(url), Some(key)) => {
            tracing::info!("Authentication enabled via {}", url);
            Arc::new(SupabaseAuthProvider::new(url, key)) as AuthState
        }
        _ => {
            tracing::warn!("Authentication is disabled: SUPABASE_URL/SUPABASE_KEY not set");
            Arc::new(DisabledAuthProvider) as AuthState
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState { db, auth, config });

    // 5. Server
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
