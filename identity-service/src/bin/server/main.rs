use std::sync::Arc;

use auth::Authenticator;
use identity_service::config::Config;
use identity_service::domain::credentials::ports::RevocationStore;
use identity_service::domain::credentials::service::AuthService;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::PostgresUserRepository;
use identity_service::outbound::revocation::InMemoryRevocationStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        password_scheme = %config.password.scheme,
        enforce_revocation = config.auth.enforce_revocation,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = config.password.hasher()?;
    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes())
            .with_password_hasher(password_hasher.clone())
            .with_lifetimes(config.jwt.lifetimes()),
    );

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let revocations = Arc::new(InMemoryRevocationStore::new());

    let user_service = Arc::new(
        UserService::new(Arc::clone(&user_repository), password_hasher)
            .with_default_picture(config.users.default_picture.clone()),
    );
    let auth_service = Arc::new(
        AuthService::new(
            user_repository,
            Arc::clone(&user_service),
            Arc::clone(&revocations),
            Arc::clone(&authenticator),
        )
        .with_reset_lifetime(config.jwt.reset_lifetime()),
    );

    let gate_revocations: Option<Arc<dyn RevocationStore>> = if config.auth.enforce_revocation {
        Some(revocations)
    } else {
        tracing::warn!("Revoked tokens are not rejected by the request gate");
        None
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application =
        create_router(user_service, auth_service, authenticator, gate_revocations);

    axum::serve(http_listener, http_application).await?;

    Ok(())
}
