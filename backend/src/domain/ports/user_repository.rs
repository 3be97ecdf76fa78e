//! Port abstraction for user persistence adapters and their errors.
//!
//! Each method maps onto exactly one store round trip. Adapters report what
//! the store reported (matched/modified counts, deleted count) and leave the
//! interpretation of those counts to the domain service.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{UserDetails, UserId, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "user store connection failed: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } => "user store operation failed: {message}",
    }
}

impl UserPersistenceError {
    /// The store's own description of the failure, without the adapter prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection { message } | Self::Query { message } => message.as_str(),
        }
    }
}

/// Counts reported by the store for a single-record field assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Records matching the identifier filter.
    pub matched: u64,
    /// Records whose stored values actually changed.
    pub modified: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new record and return the store-assigned identifier.
    async fn insert(&self, details: &UserDetails) -> Result<UserId, UserPersistenceError>;

    /// Fetch a record by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch every record in the order the store yields them.
    async fn list(&self) -> Result<Vec<UserRecord>, UserPersistenceError>;

    /// Assign the given fields on the matching record, leaving others untouched.
    async fn set_fields(
        &self,
        id: &UserId,
        fields: &Map<String, Value>,
    ) -> Result<UpdateOutcome, UserPersistenceError>;

    /// Remove the matching record and return how many records were deleted.
    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError>;
}
