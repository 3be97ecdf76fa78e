//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use user_api::domain::ports::UserRepository;
use user_api::outbound::persistence::InMemoryUserRepository;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repository: Arc<dyn UserRepository>,
}

impl ServerConfig {
    /// Construct a server configuration backed by the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            repository: Arc::new(InMemoryUserRepository::new()),
        }
    }

    /// Attach the repository that persists user records.
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.repository = repository;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
