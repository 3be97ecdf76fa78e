//! MongoDB client construction.
//!
//! Wraps the driver's option parsing and client creation behind a small
//! configuration object. The client is built once at startup; the driver
//! manages its own connection pool, so callers clone and share it freely.

use std::fmt;

use mongodb::Client;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};

/// Database holding the user collection unless configured otherwise.
pub const DEFAULT_DATABASE: &str = "userDB";
/// Collection holding user records unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "users";

/// Errors that can occur while preparing the MongoDB client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The connection string could not be parsed or resolved.
    #[error("invalid MongoDB connection string: {message}")]
    Options { message: String },

    /// The client could not be constructed from parsed options.
    #[error("failed to build MongoDB client: {message}")]
    Build { message: String },

    /// The deployment did not answer a ping.
    #[error("MongoDB ping failed: {message}")]
    Ping { message: String },
}

impl ClientError {
    /// Create an options error with the given message.
    pub fn options(message: impl Into<String>) -> Self {
        Self::Options {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Create a ping error with the given message.
    pub fn ping(message: impl Into<String>) -> Self {
        Self::Ping {
            message: message.into(),
        }
    }
}

/// Connection target for the user store.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::new("mongodb://localhost:27017")
///     .with_database("userDB")
///     .with_collection("users");
/// let client = connect(&config).await?;
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    uri: String,
    database: String,
    collection: String,
}

impl ClientConfig {
    /// Create a configuration for the given connection string.
    ///
    /// Uses `userDB` / `users` as database and collection.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: DEFAULT_DATABASE.to_owned(),
            collection: DEFAULT_COLLECTION.to_owned(),
        }
    }

    /// Override the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Override the collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Get the connection string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

// The connection string usually embeds credentials.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("uri", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

/// Build a client pinned to the Stable API version 1.
///
/// Connections are established lazily by the driver; use [`ping`] to check
/// reachability.
///
/// # Errors
///
/// Returns [`ClientError::Options`] when the connection string is invalid
/// (including SRV lookup failures) and [`ClientError::Build`] when the driver
/// rejects the resulting options.
pub async fn connect(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut options = ClientOptions::parse(config.uri())
        .await
        .map_err(|err| ClientError::options(err.to_string()))?;
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    Client::with_options(options).map_err(|err| ClientError::build(err.to_string()))
}

/// Send a `ping` command to the `admin` database.
///
/// # Errors
///
/// Returns [`ClientError::Ping`] when the deployment cannot be reached.
pub async fn ping(client: &Client) -> Result<(), ClientError> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|err| ClientError::ping(err.to_string()))
}
