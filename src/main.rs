use todo_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, installs logging, builds the in-memory stores and serves HTTP.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail fast on a missing signing secret)
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");

    // 2. Logging: RUST_LOG wins, otherwise crate debug + http info.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todo_api=debug,tower_http=info".into());

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

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. State
    let port = config.port;
    let bootstrap_admin = config.bootstrap_admin.clone();
    let app_state = AppState::in_memory(config).expect("FATAL: failed to build token service");

    if let Some(admin) = bootstrap_admin {
        app_state.seed_admin(&admin).await;
    }

    // 4. Router and server
    let app = create_router(app_state);

    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address)
        .await
        .expect("FATAL: failed to bind listener");

    tracing::info!("Listening on {}", address);
    tracing::info!("OpenAPI document at http://localhost:{}/api-docs/openapi.json", port);

    axum::serve(listener, app)
        .await
        .expect("FATAL: server terminated unexpectedly");
}
