//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: the user CRUD endpoints, the root banner and health probes
//! - **Schemas**: request/response bodies plus the domain wrappers
//!   ([`UserRecordSchema`], [`UserPatchSchema`]) that describe stored records
//!   without coupling domain types to utoipa
//!
//! The generated document is served by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{UserPatchSchema, UserRecordSchema};
use crate::inbound::http::users::{CreatedResponse, MessageResponse, UserRequest};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API",
        description = "CRUD access to the user directory and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::root,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::replace_user,
        crate::inbound::http::users::patch_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserRecordSchema,
        UserPatchSchema,
        UserRequest,
        CreatedResponse,
        MessageResponse,
        ErrorBody
    )),
    tags(
        (name = "users", description = "Operations on user records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const USER_RECORD_SCHEMA_NAME: &str = "crate.domain.UserRecord";

    #[rstest]
    #[case("/")]
    #[case("/api/user")]
    #[case("/api/users")]
    #[case("/api/users/{id}")]
    #[case("/api/user/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn openapi_lists_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn openapi_user_record_schema_has_store_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(USER_RECORD_SCHEMA_NAME).expect("UserRecord schema");

        match schema {
            RefOr::T(Schema::Object(obj)) => {
                for field in ["_id", "name", "email", "phone", "role", "address"] {
                    assert!(
                        obj.properties.contains_key(field),
                        "schema should have field '{field}'"
                    );
                }
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_body_has_error_field() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get("ErrorBody").expect("ErrorBody schema");

        match schema {
            RefOr::T(Schema::Object(obj)) => assert!(obj.properties.contains_key("error")),
            _ => panic!("expected Object schema"),
        }
    }
}
