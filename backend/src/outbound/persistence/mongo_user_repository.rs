//! MongoDB-backed implementation of the `UserRepository` port.
//!
//! Every port method issues exactly one driver call against the configured
//! collection. Driver failures are classified into connection and query
//! errors; the server's message is preserved so callers see it verbatim.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::ports::{UpdateOutcome, UserPersistenceError, UserRepository};
use crate::domain::{UserDetails, UserId, UserRecord};

use super::client::ClientConfig;
use super::document::{
    id_filter, inserted_id, map_driver_error, new_user_document, record_from_document, set_update,
};

/// MongoDB implementation of [`UserRepository`].
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<Document>,
}

impl MongoUserRepository {
    /// Bind the repository to the collection named in `config`.
    pub fn new(client: &Client, config: &ClientConfig) -> Self {
        let collection = client
            .database(config.database())
            .collection::<Document>(config.collection());
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, details: &UserDetails) -> Result<UserId, UserPersistenceError> {
        let result = self
            .collection
            .insert_one(new_user_document(details))
            .await
            .map_err(|err| map_driver_error(&err))?;
        inserted_id(&result.inserted_id)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.collection
            .find_one(id_filter(id))
            .await
            .map_err(|err| map_driver_error(&err))?
            .map(record_from_document)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<UserRecord>, UserPersistenceError> {
        let documents: Vec<Document> = self
            .collection
            .find(doc! {})
            .await
            .map_err(|err| map_driver_error(&err))?
            .try_collect()
            .await
            .map_err(|err| map_driver_error(&err))?;
        debug!(count = documents.len(), "listed users");
        documents.into_iter().map(record_from_document).collect()
    }

    async fn set_fields(
        &self,
        id: &UserId,
        fields: &Map<String, Value>,
    ) -> Result<UpdateOutcome, UserPersistenceError> {
        let update = set_update(fields)?;
        let result = self
            .collection
            .update_one(id_filter(id), update)
            .await
            .map_err(|err| map_driver_error(&err))?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError> {
        let result = self
            .collection
            .delete_one(id_filter(id))
            .await
            .map_err(|err| map_driver_error(&err))?;
        Ok(result.deleted_count)
    }
}
