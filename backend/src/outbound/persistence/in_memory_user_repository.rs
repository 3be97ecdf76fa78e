//! In-process `UserRepository` used by tests and by local runs without a
//! configured MongoDB deployment.
//!
//! Mirrors the store semantics the service relies on: records keep insertion
//! order, `set_fields` reports matched/modified counts the way `$set` does,
//! and assigning `_id` on an existing record is rejected. Update keys follow
//! `$set` path rules: `address.city` writes into a nested object, and
//! `$`-prefixed, empty or overlapping paths are refused.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::ports::{UpdateOutcome, UserPersistenceError, UserRepository};
use crate::domain::user::ID_FIELD;
use crate::domain::{UserDetails, UserId, UserRecord};

/// Thread-safe in-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    records: Mutex<Vec<UserRecord>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`UserPersistenceError::Query`] if the store lock is poisoned.
    pub fn len(&self) -> Result<usize, UserPersistenceError> {
        self.with_records(|records| Ok(records.len()))
    }

    /// Whether the store holds no records.
    ///
    /// # Errors
    ///
    /// Returns [`UserPersistenceError::Query`] if the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, UserPersistenceError> {
        self.len().map(|len| len == 0)
    }

    fn with_records<T>(
        &self,
        f: impl FnOnce(&mut Vec<UserRecord>) -> Result<T, UserPersistenceError>,
    ) -> Result<T, UserPersistenceError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store lock poisoned"))?;
        f(&mut guard)
    }
}

fn check_paths(fields: &Map<String, Value>) -> Result<(), UserPersistenceError> {
    for path in fields.keys() {
        if path.split('.').next() == Some(ID_FIELD) {
            return Err(UserPersistenceError::query(format!(
                "Performing an update on the path '{path}' would modify the immutable field '{ID_FIELD}'"
            )));
        }
        if path.split('.').any(str::is_empty) {
            return Err(UserPersistenceError::query(format!(
                "The update path '{path}' contains an empty field name, which is not allowed."
            )));
        }
        if let Some(segment) = path.split('.').find(|segment| segment.starts_with('$')) {
            return Err(UserPersistenceError::query(format!(
                "The dollar ($) prefixed field '{segment}' in '{path}' is not valid for storage."
            )));
        }
        if let Some(prefix) = fields
            .keys()
            .find(|other| path.len() > other.len() && path.starts_with(&format!("{other}.")))
        {
            return Err(UserPersistenceError::query(format!(
                "Updating the path '{path}' would create a conflict at '{prefix}'"
            )));
        }
    }
    Ok(())
}

fn set_path(
    target: &mut Map<String, Value>,
    path: &str,
    value: &Value,
) -> Result<(), UserPersistenceError> {
    let Some((head, rest)) = path.split_once('.') else {
        target.insert(path.to_owned(), value.clone());
        return Ok(());
    };
    let child = target
        .entry(head.to_owned())
        .or_insert_with(|| Value::Object(Map::new()));
    match child {
        Value::Object(nested) => set_path(nested, rest, value),
        other => {
            let field = rest.split('.').next().unwrap_or(rest);
            Err(UserPersistenceError::query(format!(
                "Cannot create field '{field}' in element {{{head}: {other}}}"
            )))
        }
    }
}

fn apply_fields(
    record: &UserRecord,
    fields: &Map<String, Value>,
) -> Result<Option<UserRecord>, UserPersistenceError> {
    let mut merged = record.fields().clone();
    for (path, value) in fields {
        set_path(&mut merged, path, value)?;
    }
    if merged == *record.fields() {
        return Ok(None);
    }
    Ok(Some(UserRecord::new(*record.id(), merged)))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, details: &UserDetails) -> Result<UserId, UserPersistenceError> {
        let id = UserId::random();
        self.with_records(|records| {
            records.push(UserRecord::new(id, details.to_fields()));
            Ok(id)
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.with_records(|records| Ok(records.iter().find(|record| record.id() == id).cloned()))
    }

    async fn list(&self) -> Result<Vec<UserRecord>, UserPersistenceError> {
        self.with_records(|records| Ok(records.clone()))
    }

    async fn set_fields(
        &self,
        id: &UserId,
        fields: &Map<String, Value>,
    ) -> Result<UpdateOutcome, UserPersistenceError> {
        self.with_records(|records| {
            let Some(slot) = records.iter_mut().find(|record| record.id() == id) else {
                return Ok(UpdateOutcome::default());
            };
            check_paths(fields)?;
            let modified = match apply_fields(slot, fields)? {
                Some(updated) => {
                    *slot = updated;
                    1
                }
                None => 0,
            };
            Ok(UpdateOutcome {
                matched: 1,
                modified,
            })
        })
    }

    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError> {
        self.with_records(|records| {
            let before = records.len();
            records.retain(|record| record.id() != id);
            Ok(u64::from(before != records.len()))
        })
    }
}
