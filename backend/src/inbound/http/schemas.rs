//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the wire shape of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use std::collections::HashMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::UserRecord`].
///
/// Stored user document. Partial updates may add properties beyond the
/// five listed here; they are returned unchanged.
#[derive(ToSchema)]
#[schema(as = crate::domain::UserRecord)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserRecordSchema {
    /// Store-assigned identifier as a 24 character hex string.
    #[schema(rename = "_id", example = "65f1c0ffee0000000000beef")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "555-0100")]
    phone: String,
    #[schema(example = "user")]
    role: String,
    /// Null when the record was created without an address.
    address: Option<String>,
}

/// OpenAPI schema for [`crate::domain::UserPatch`].
///
/// Any non-empty JSON object; every property is assigned verbatim.
#[derive(ToSchema)]
#[schema(as = crate::domain::UserPatch)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPatchSchema(HashMap<String, serde_json::Value>);

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn user_record_schema_has_expected_name() {
        // utoipa replaces :: with . in schema names
        assert_eq!(UserRecordSchema::name(), "crate.domain.UserRecord");
    }

    #[test]
    fn user_record_schema_uses_store_id_key() {
        let schema_json = schema_to_json::<UserRecordSchema>();
        assert!(schema_json.contains("\"_id\""), "schema should expose _id");
        assert!(
            schema_json.contains("address"),
            "schema should contain address field"
        );
    }

    #[test]
    fn user_patch_schema_has_expected_name() {
        assert_eq!(UserPatchSchema::name(), "crate.domain.UserPatch");
    }
}
