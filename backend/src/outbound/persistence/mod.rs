//! User store adapters implementing the `UserRepository` port.
//!
//! - **MongoDB**: [`MongoUserRepository`] issues one driver call per port
//!   method against the configured collection.
//! - **In-memory**: [`InMemoryUserRepository`] mirrors the store semantics for
//!   tests and for local runs without a deployment.
//!
//! Adapters are thin translators between BSON documents and domain types.
//! They contain no business logic; counts are reported as the store gave
//! them and interpreted by the domain service.
//!
//! # Example
//!
//! ```ignore
//! use user_api::outbound::persistence::{connect, ClientConfig, MongoUserRepository};
//!
//! let config = ClientConfig::new("mongodb://localhost:27017");
//! let client = connect(&config).await?;
//! let repo = MongoUserRepository::new(&client, &config);
//! ```

mod client;
mod document;
mod in_memory_user_repository;
mod mongo_user_repository;

pub use client::{
    ClientConfig, ClientError, DEFAULT_COLLECTION, DEFAULT_DATABASE, connect, ping,
};
pub use in_memory_user_repository::InMemoryUserRepository;
pub use mongo_user_repository::MongoUserRepository;
