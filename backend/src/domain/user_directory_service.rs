//! User directory domain service.
//!
//! Implements the [`UsersQuery`] and [`UsersCommand`] driving ports over a
//! [`UserRepository`]. Every operation performs exactly one repository call
//! and translates the outcome; nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, UserDetails, UserId, UserPatch, UserRecord};

/// Message reported whenever a lookup or mutation finds nothing to act on.
pub const USER_NOT_FOUND: &str = "User not found";

/// User directory service implementing the driving ports.
///
/// The repository may be a concrete adapter or `dyn UserRepository`.
pub struct UserDirectoryService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for UserDirectoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ?Sized> UserDirectoryService<R> {
    /// Create a new service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

/// Store failures surface verbatim as internal errors.
fn map_persistence_error(error: UserPersistenceError) -> Error {
    Error::internal(error.message())
}

#[async_trait]
impl<R> UsersQuery for UserDirectoryService<R>
where
    R: UserRepository + ?Sized,
{
    async fn get_user(&self, id: &UserId) -> Result<UserRecord, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        self.repository.list().await.map_err(map_persistence_error)
    }
}

#[async_trait]
impl<R> UsersCommand for UserDirectoryService<R>
where
    R: UserRepository + ?Sized,
{
    async fn create_user(&self, details: UserDetails) -> Result<UserId, Error> {
        let id = self
            .repository
            .insert(&details)
            .await
            .map_err(map_persistence_error)?;
        debug!(user_id = %id, "user created");
        Ok(id)
    }

    async fn replace_user(&self, id: &UserId, details: UserDetails) -> Result<(), Error> {
        let outcome = self
            .repository
            .set_fields(id, &details.to_fields())
            .await
            .map_err(map_persistence_error)?;
        // A matched record whose values were already identical is reported
        // exactly like a missing record.
        if outcome.modified == 0 {
            debug!(user_id = %id, matched = outcome.matched, "replace changed nothing");
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        Ok(())
    }

    async fn patch_user(&self, id: &UserId, patch: UserPatch) -> Result<(), Error> {
        let outcome = self
            .repository
            .set_fields(id, patch.fields())
            .await
            .map_err(map_persistence_error)?;
        if outcome.modified == 0 {
            debug!(user_id = %id, matched = outcome.matched, "patch changed nothing");
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if deleted == 0 {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
