//! Driving port for user read queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch records without
//! importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserRecord};

/// Domain use-case port for reading user records.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return the record with the given identifier, or a not-found error.
    async fn get_user(&self, id: &UserId) -> Result<UserRecord, Error>;

    /// Return every stored record.
    async fn list_users(&self) -> Result<Vec<UserRecord>, Error>;
}
