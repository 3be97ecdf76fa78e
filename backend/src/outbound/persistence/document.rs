//! Translation between domain user types and BSON documents.

use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use serde_json::{Map, Value};

use crate::domain::ports::UserPersistenceError;
use crate::domain::user::{
    ADDRESS_FIELD, EMAIL_FIELD, ID_FIELD, NAME_FIELD, PHONE_FIELD, ROLE_FIELD,
};
use crate::domain::{UserDetails, UserId, UserRecord};

/// Filter matching a single record by identifier.
pub(super) fn id_filter(id: &UserId) -> Document {
    doc! { ID_FIELD: *id.as_object_id() }
}

/// Document inserted for a new record; the driver assigns `_id`.
pub(super) fn new_user_document(details: &UserDetails) -> Document {
    doc! {
        NAME_FIELD: details.name(),
        EMAIL_FIELD: details.email(),
        PHONE_FIELD: details.phone(),
        ROLE_FIELD: details.role(),
        ADDRESS_FIELD: details.address(),
    }
}

/// `$set` update assigning each given field.
pub(super) fn set_update(fields: &Map<String, Value>) -> Result<Document, UserPersistenceError> {
    let mut assignments = Document::new();
    for (name, value) in fields {
        let converted = bson::to_bson(value).map_err(|err| {
            UserPersistenceError::query(format!("cannot store field '{name}': {err}"))
        })?;
        assignments.insert(name.clone(), converted);
    }
    Ok(doc! { "$set": assignments })
}

/// Convert a stored document into a domain record.
///
/// BSON-specific values other than `_id` are rendered as relaxed extended
/// JSON.
pub(super) fn record_from_document(mut document: Document) -> Result<UserRecord, UserPersistenceError> {
    let id = document.get_object_id(ID_FIELD).map_err(|err| {
        UserPersistenceError::query(format!("stored user has no ObjectId _id: {err}"))
    })?;
    document.remove(ID_FIELD);
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(fields) => Ok(UserRecord::new(UserId::from(id), fields)),
        other => Err(UserPersistenceError::query(format!(
            "stored user is not a document: {other}"
        ))),
    }
}

/// Read the identifier the driver reported for an inserted document.
pub(super) fn inserted_id(value: &Bson) -> Result<UserId, UserPersistenceError> {
    value.as_object_id().map(UserId::from).ok_or_else(|| {
        UserPersistenceError::query(format!("store assigned a non-ObjectId identifier: {value}"))
    })
}

/// Classify a driver failure, keeping the server's own message when it sent one.
pub(super) fn map_driver_error(error: &DriverError) -> UserPersistenceError {
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
            UserPersistenceError::connection(error.to_string())
        }
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            UserPersistenceError::query(write_error.message.clone())
        }
        ErrorKind::Write(WriteFailure::WriteConcernError(concern_error)) => {
            UserPersistenceError::query(concern_error.message.clone())
        }
        ErrorKind::Command(command_error) => UserPersistenceError::query(command_error.message.clone()),
        _ => UserPersistenceError::query(error.to_string()),
    }
}
