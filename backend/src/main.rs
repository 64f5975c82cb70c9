use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use clap::{Arg, Command};
use social_presence::{
    db::{get_db_pool, DatabaseConfig, PgStore},
    handlers, utils, Config, SocialRepository,
};
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let matches = Command::new("server")
        .about("Friends and presence API")
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .help("Port to listen on (overrides PORT)")
                .value_parser(clap::value_parser!(u16)),
        )
        .get_matches();

    let config = Config::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    let port = matches.get_one::<u16>("port").copied().unwrap_or(config.port);
    let repo = Arc::new(SocialRepository::new(PgStore::new(pool)));
    let app = handlers::create_router(repo).layer(create_cors_layer(&config));

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        // Default to permissive for development
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}
