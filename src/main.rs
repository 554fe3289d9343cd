use std::sync::Arc;

use gluco_portal::{
    ApiClient, AppConfig, AppState, AuthStore, Env, GatewayState, create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point: initializes configuration, logging, the
/// auth store, the backend client, and the HTTP server, in that order.
#[tokio::main]
async fn main() {
    // 1. Configuration & environment loading (fail-fast).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging filter setup. RUST_LOG wins; otherwise sensible local
    // defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gluco_portal=debug,tower_http=info,axum=trace".into());

    // 3. Logging format per environment: pretty for humans locally, JSON
    // for log aggregation in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Navigation controller starting in {:?} mode", config.env);

    // 4. Auth store initialization. Every hard load starts in the loading
    // state; bootstrap resolves it from the stored token, if any, handed in
    // by the hosting shell via the environment.
    let store = Arc::new(AuthStore::new(config.jwt_secret.clone()));
    let stored_token = std::env::var("PORTAL_SESSION_TOKEN").ok();
    store.bootstrap(stored_token.as_deref());

    // 5. Backend gateway.
    let client = Arc::new(ApiClient::new(config.api_base_url.clone(), store.clone()));

    // An authenticated bootstrap needs the profile before any protected
    // navigation can resolve; fire the initial fetch in the background.
    {
        let store = store.clone();
        let client = client.clone();
        tokio::spawn(async move {
            if matches!(
                store.snapshot().session,
                gluco_portal::models::SessionState::Authenticated(_)
            ) {
                store.refresh_profile(client.as_ref()).await;
            }
        });
    }

    // 6. Unified state assembly.
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        store,
        gateway: client as GatewayState,
        config,
    };

    // 7. Router and server startup.
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind listener. Check BIND_ADDR.");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {bind_addr}");

    axum::serve(listener, app).await.unwrap();
}
