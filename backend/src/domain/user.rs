//! User data model.
//!
//! Records are flat documents. The identifier is the store-native `ObjectId`;
//! the attribute set is open because partial updates may introduce fields
//! outside the nominal `name`/`email`/`phone`/`role`/`address` schema.

use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names recognised by create and full update.
pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";
pub const PHONE_FIELD: &str = "phone";
pub const ROLE_FIELD: &str = "role";
pub const ADDRESS_FIELD: &str = "address";
/// Store key holding the record identifier.
pub const ID_FIELD: &str = "_id";

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    MissingRequiredFields,
    EmptyPatch,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "Invalid user id"),
            Self::MissingRequiredFields => write!(f, "Missing required fields"),
            Self::EmptyPatch => write!(f, "No fields to update"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier, rendered as a 24 character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(ObjectId);

impl UserId {
    /// Parse a [`UserId`] from its hex representation.
    ///
    /// # Examples
    /// ```
    /// use user_api::domain::UserId;
    ///
    /// let id = UserId::new("65f1c0ffee0000000000beef").expect("valid id");
    /// assert_eq!(id.to_string(), "65f1c0ffee0000000000beef");
    /// assert!(UserId::new("not-an-id").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        ObjectId::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a fresh identifier the way the store would.
    pub fn random() -> Self {
        Self(ObjectId::new())
    }

    /// Access the store-native identifier.
    pub fn as_object_id(&self) -> &ObjectId {
        &self.0
    }
}

impl From<ObjectId> for UserId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_hex()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The recognised attribute set written by create and full update.
///
/// ## Invariants
/// - `name`, `email`, `phone`, and `role` are non-empty.
/// - `address` is passed through untouched, including when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    name: String,
    email: String,
    phone: String,
    role: String,
    address: Option<String>,
}

impl UserDetails {
    /// Validate the required fields and build the attribute set.
    ///
    /// # Examples
    /// ```
    /// use user_api::domain::UserDetails;
    ///
    /// let details = UserDetails::try_from_parts(
    ///     Some("Ada".into()),
    ///     Some("ada@example.com".into()),
    ///     Some("555".into()),
    ///     Some("user".into()),
    ///     None,
    /// )
    /// .expect("valid details");
    /// assert_eq!(details.name(), "Ada");
    /// ```
    pub fn try_from_parts(
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        role: Option<String>,
        address: Option<String>,
    ) -> Result<Self, UserValidationError> {
        match (required(name), required(email), required(phone), required(role)) {
            (Some(name), Some(email), Some(phone), Some(role)) => Ok(Self {
                name,
                email,
                phone,
                role,
                address,
            }),
            _ => Err(UserValidationError::MissingRequiredFields),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Render the attribute set as record fields.
    ///
    /// An absent address becomes an explicit `null` so a full update clears
    /// any previously stored address.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(NAME_FIELD.to_owned(), Value::from(self.name.as_str()));
        fields.insert(EMAIL_FIELD.to_owned(), Value::from(self.email.as_str()));
        fields.insert(PHONE_FIELD.to_owned(), Value::from(self.phone.as_str()));
        fields.insert(ROLE_FIELD.to_owned(), Value::from(self.role.as_str()));
        fields.insert(
            ADDRESS_FIELD.to_owned(),
            self.address.as_deref().map_or(Value::Null, Value::from),
        );
        fields
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Arbitrary field assignments merged into an existing record.
///
/// ## Invariants
/// - at least one field is present.
///
/// Field names are not checked against the nominal schema.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPatch(Map<String, Value>);

impl UserPatch {
    /// Build a patch, rejecting an empty field set.
    pub fn new(fields: Map<String, Value>) -> Result<Self, UserValidationError> {
        if fields.is_empty() {
            return Err(UserValidationError::EmptyPatch);
        }
        Ok(Self(fields))
    }

    /// Field assignments carried by the patch.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A stored user record as returned by reads.
///
/// Serialises flat, with the identifier under `_id`:
/// `{"_id":"65f1c0ffee0000000000beef","name":"Ada",...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    id: UserId,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl UserRecord {
    /// Build a record; any `_id` entry in `fields` is dropped in favour of `id`.
    pub fn new(id: UserId, mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single attribute.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
