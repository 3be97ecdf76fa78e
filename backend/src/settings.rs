//! Server settings loaded via OrthoConfig.
//!
//! Values layer as CLI flags over `USER_API_*` environment variables over
//! defaults. The store target is resolved from either an explicit connection
//! string or Atlas-style credentials.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::persistence::{ClientConfig, DEFAULT_COLLECTION, DEFAULT_DATABASE};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_APP_NAME: &str = "Cluster0";

/// Errors raised while turning settings into a store target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Only some of the Atlas credential settings were provided.
    #[error("incomplete store credentials: missing {missing}")]
    IncompleteCredentials { missing: String },
    /// The cluster host cannot form a connection string.
    #[error("invalid store cluster host '{cluster}': {message}")]
    InvalidCluster { cluster: String, message: String },
}

/// Where user records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// A MongoDB deployment.
    Mongo(ClientConfig),
    /// The process-local store used when no deployment is configured.
    InMemory,
}

/// Configuration values for the HTTP server and its user store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_API")]
pub struct ServerSettings {
    /// Address to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    #[ortho_config(default = 5000)]
    pub port: u16,
    /// Full MongoDB connection string; takes precedence over credentials.
    pub mongodb_uri: Option<String>,
    /// Atlas database user.
    pub db_user: Option<String>,
    /// Atlas database password.
    pub db_pass: Option<String>,
    /// Atlas cluster host, e.g. `cluster0.abcde.mongodb.net`.
    pub db_cluster: Option<String>,
    /// Application name reported to the cluster.
    pub app_name: Option<String>,
    /// Database holding the user collection.
    pub database: Option<String>,
    /// Collection holding user records.
    pub collection: Option<String>,
}

impl ServerSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port)
    }

    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or(DEFAULT_APP_NAME)
    }

    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    pub fn collection(&self) -> &str {
        self.collection.as_deref().unwrap_or(DEFAULT_COLLECTION)
    }

    /// Resolve the store the server should use.
    ///
    /// An explicit `mongodb_uri` wins. Otherwise user, password and cluster
    /// together produce an SRV connection string. With none of them set the
    /// in-memory store is selected.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::IncompleteCredentials`] when only part of the
    /// credentials is set and [`SettingsError::InvalidCluster`] when the
    /// cluster host is unusable.
    pub fn store_target(&self) -> Result<StoreTarget, SettingsError> {
        let uri = match (&self.mongodb_uri, &self.db_user, &self.db_pass, &self.db_cluster) {
            (Some(uri), _, _, _) => uri.clone(),
            (None, Some(user), Some(pass), Some(cluster)) => {
                srv_uri(user, pass, cluster, self.app_name())?
            }
            (None, None, None, None) => return Ok(StoreTarget::InMemory),
            (None, user, pass, cluster) => {
                let missing: Vec<&str> = [
                    ("db_user", user.is_none()),
                    ("db_pass", pass.is_none()),
                    ("db_cluster", cluster.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(SettingsError::IncompleteCredentials {
                    missing: missing.join(", "),
                });
            }
        };
        Ok(StoreTarget::Mongo(
            ClientConfig::new(uri)
                .with_database(self.database())
                .with_collection(self.collection()),
        ))
    }
}

fn srv_uri(user: &str, pass: &str, cluster: &str, app_name: &str) -> Result<String, SettingsError> {
    let invalid = |message: String| SettingsError::InvalidCluster {
        cluster: cluster.to_owned(),
        message,
    };
    let mut url = Url::parse(&format!("mongodb+srv://{cluster}/"))
        .map_err(|err| invalid(err.to_string()))?;
    url.set_username(user)
        .map_err(|()| invalid("cannot carry credentials".to_owned()))?;
    url.set_password(Some(pass))
        .map_err(|()| invalid("cannot carry credentials".to_owned()))?;
    url.query_pairs_mut()
        .append_pair("retryWrites", "true")
        .append_pair("w", "majority")
        .append_pair("appName", app_name);
    Ok(url.into())
}
