use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::account::ports::UserStore;
use account_service::domain::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserStore;
use account_service::outbound::repositories::PostgresUserStore;
use anyhow::Context;
use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    // Refuse to serve rather than sign tokens with a guessable key.
    let secret = config.auth.secret().map_err(|e| {
        tracing::error!(error = %e, "Invalid auth.secret, set AUTH__SECRET");
        e
    })?;

    tracing::info!(
        http_port = config.server.http_port,
        database = if config.database.url.is_some() { "postgresql" } else { "memory" },
        password_scheme = %config.auth.password_scheme,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::with_scheme(
        secret,
        config.auth.password_scheme,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let store = Arc::new(PostgresUserStore::new(pg_pool));
            serve(http_listener, store, authenticator).await?;
        }
        None => {
            tracing::warn!("No database.url configured, accounts are kept in memory");
            let store = Arc::new(InMemoryUserStore::new());
            serve(http_listener, store, authenticator).await?;
        }
    }

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn serve<S: UserStore>(
    listener: TcpListener,
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
) -> Result<(), anyhow::Error> {
    let account_service = Arc::new(AccountService::new(store, authenticator));
    let application = create_router(account_service);

    axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
