use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use db::DBService;
use server::{AppState, app, config::Config};
use services::services::{database_validator::DatabaseValidator, identity::IdentityService};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, prelude::*};
use utils::sentry::{init_once as init_sentry, sentry_layer};

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Ok(match &config.cors_allow_origin {
        Some(origin) => layer.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS_ALLOW_ORIGIN: {origin}"))?,
        ),
        None => layer.allow_origin(Any),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_sentry(config.sentry_dsn.as_deref(), &config.environment);

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},services={level},db={level},utils={level},tower_http={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).context("invalid RUST_LOG filter")?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .with(sentry_layer())
        .init();

    let db = DBService::new(&config.database_url).await?;

    let validation = DatabaseValidator::new(db.pool.clone()).validate().await?;
    if validation.is_ok() {
        info!("{}", validation.summary());
    } else {
        warn!("{}", validation.summary());
    }

    let identity = IdentityService::new(&config.jwt_secret, config.jwt_audience.as_deref());
    let router = app(AppState::new(db, identity)).layer(cors_layer(&config)?);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!(address = %listener.local_addr()?, environment = %config.environment, "Server listening");

    axum::serve(listener, router).await?;
    Ok(())
}
