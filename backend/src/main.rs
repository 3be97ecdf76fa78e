//! User API entry-point: loads settings, selects the user store and serves
//! the REST endpoints.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_api::domain::ports::UserRepository;
use user_api::inbound::http::health::HealthState;
use user_api::outbound::persistence::{
    ClientConfig, InMemoryUserRepository, MongoUserRepository, connect, ping,
};
use user_api::settings::{ServerSettings, StoreTarget};

async fn mongo_repository(config: &ClientConfig) -> color_eyre::Result<Arc<dyn UserRepository>> {
    let client = connect(config)
        .await
        .wrap_err("failed to prepare MongoDB client")?;
    // The driver connects lazily; an unreachable deployment still lets the
    // server start and each request reports the store error.
    match ping(&client).await {
        Ok(()) => info!(
            database = config.database(),
            collection = config.collection(),
            "connected to MongoDB"
        ),
        Err(err) => error!(error = %err, "MongoDB did not answer ping"),
    }
    Ok(Arc::new(MongoUserRepository::new(&client, config)))
}

fn load_settings<I>(args: I) -> color_eyre::Result<ServerSettings>
where
    I: IntoIterator<Item = OsString>,
{
    ServerSettings::load_from_iter(args).wrap_err("failed to load settings")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let repository: Arc<dyn UserRepository> = match settings.store_target()? {
        StoreTarget::Mongo(config) => mongo_repository(&config).await?,
        StoreTarget::InMemory => {
            warn!("no MongoDB configured; user records are kept in memory");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let config = ServerConfig::new(settings.bind_addr()).with_repository(repository);
    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;

    #[test]
    fn settings_load_without_any_configuration() {
        let _guard = lock_env([
            ("USER_API_PORT", None::<String>),
            ("USER_API_HOST", None),
            ("USER_API_MONGODB_URI", None),
            ("USER_API_DB_USER", None),
            ("USER_API_DB_PASS", None),
            ("USER_API_DB_CLUSTER", None),
        ]);

        let settings = load_settings([OsString::from("user-api")]).expect("settings should load");
        assert_eq!(settings.bind_addr().port(), 5000);
        assert!(matches!(settings.store_target(), Ok(StoreTarget::InMemory)));
    }
}
