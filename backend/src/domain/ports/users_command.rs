//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, UserDetails, UserId, UserPatch};

/// Domain use-case port for creating, updating, and deleting user records.
///
/// Update and delete report [`crate::domain::ErrorCode::NotFound`] when the
/// store changed nothing, whether or not the identifier matched a record.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Persist a new record and return its identifier.
    async fn create_user(&self, details: UserDetails) -> Result<UserId, Error>;

    /// Overwrite the recognised attribute set of an existing record.
    async fn replace_user(&self, id: &UserId, details: UserDetails) -> Result<(), Error>;

    /// Merge arbitrary fields into an existing record.
    async fn patch_user(&self, id: &UserId, patch: UserPatch) -> Result<(), Error>;

    /// Remove a record.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
