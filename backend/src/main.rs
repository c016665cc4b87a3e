//! Service entry-point: loads settings, prepares persistence and serves the
//! REST API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use license_registry::inbound::http::health::HealthState;
use license_registry::inbound::http::session_config::{BuildMode, session_settings_from_env};
use license_registry::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, ServerSettings, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os()).map_err(|error| {
        std::io::Error::other(format!("failed to load settings: {error}"))
    })?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.fingerprint(), "session key loaded");

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );
    match settings.database_url() {
        Some(url) => {
            if settings.run_migrations {
                migrate(url.to_owned()).await?;
            }
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("REGISTRY_DATABASE_URL unset; using the in-memory registry"),
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::make_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    health_state.mark_ready();
    server.await
}

async fn migrate(url: String) -> std::io::Result<()> {
    let applied = tokio::task::spawn_blocking(move || run_migrations(&url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    info!(applied, "database migrations complete");
    Ok(())
}
