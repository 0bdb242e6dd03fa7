mod config;
mod doc;
mod error;

mod dtos {
    pub mod enroll;
}

mod routes {
    pub mod enroll;
    pub mod health;
}

mod utils {
    pub mod auth;
    pub mod shutdown;
}

use crate::{
    config::Config,
    doc::ApiDoc,
    routes::{enroll, health},
    utils::shutdown::shutdown_signal,
};
use database::db::create_connection;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::process::ExitCode;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

/// Shared by every handler; the pool is cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let db = create_connection(&config.database_url, config.database_max_connections).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Database migrations applied");
    }

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(&config.oidc_issuer_url)
        .build()
        .await
        .map_err(|err| format!("Failed to build OAuth2ResourceServer: {err:?}"))?;

    // Routes acting on the caller's own records require a bearer token
    let authenticated = OpenApiRouter::new()
        .routes(routes!(enroll::drop_registration))
        .routes(routes!(enroll::withdraw))
        .routes(routes!(enroll::me))
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(enroll::register))
        .routes(routes!(health::health))
        .merge(authenticated)
        .split_for_parts();

    let app = router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api))
        .layer(CompressionLayer::new())
        .with_state(AppState { db });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Running axum on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
