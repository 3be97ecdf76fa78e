//! Users API handlers.
//!
//! ```text
//! POST   /api/user        {"name":"A","email":"a@x.com","phone":"555","role":"user"}
//! GET    /api/users
//! GET    /api/users/{id}
//! PUT    /api/user/{id}   {"name":"B","email":"b@x.com","phone":"556","role":"admin"}
//! PATCH  /api/user/{id}   {"role":"admin"}
//! DELETE /api/user/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Error, UserDetails, UserId, UserPatch, UserRecord, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{UserPatchSchema, UserRecordSchema};
use crate::inbound::http::state::HttpState;

/// Plain-text body returned by `GET /`.
pub const SERVER_RUNNING: &str = "User Server is running";

/// Message reported for paths no route matches.
pub const ROUTE_NOT_FOUND: &str = "Route not found";

/// Create and full-update request body.
///
/// Every field is optional at the wire level so that missing and empty
/// values produce the same "Missing required fields" response.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "555-0100")]
    pub phone: Option<String>,
    #[schema(example = "user")]
    pub role: Option<String>,
    #[schema(example = "12 St James's Square")]
    pub address: Option<String>,
}

impl TryFrom<UserRequest> for UserDetails {
    type Error = UserValidationError;

    fn try_from(value: UserRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.name, value.email, value.phone, value.role, value.address)
    }
}

/// Confirmation body for successful mutations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User updated successfully")]
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

/// Body returned by `POST /api/user`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    #[schema(value_type = String, example = "65f1c0ffee0000000000beef")]
    pub user_id: UserId,
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    UserId::new(raw).map_err(map_user_validation_error)
}

/// Register the user routes and the root banner.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_api::inbound::http::users;
///
/// let app = App::new().configure(users::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root).service(
        web::scope("/api")
            .service(create_user)
            .service(list_users)
            .service(get_user)
            .service(replace_user)
            .service(patch_user)
            .service(delete_user),
    );
}

/// Fallback for unmatched paths, reported through the error envelope.
///
/// Register with `App::default_service(web::to(route_not_found))`.
pub async fn route_not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found(ROUTE_NOT_FOUND))
}

/// Report that the server is up.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Server banner", body = String, content_type = "text/plain")),
    tags = ["users"],
    operation_id = "root"
)]
#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(SERVER_RUNNING)
}

/// Create a user record.
#[utoipa::path(
    post,
    path = "/api/user",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = CreatedResponse),
        (status = 400, description = "Missing required fields", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/user")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let details = UserDetails::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    let user_id = state.users_command.create_user(details).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "User created successfully".to_owned(),
        user_id,
    }))
}

/// List every user record in store order.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_api::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserRecordSchema]),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserRecord>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users))
}

/// Fetch one user record.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Hex ObjectId of the user")),
    responses(
        (status = 200, description = "User", body = UserRecordSchema),
        (status = 400, description = "Invalid user id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserRecord>> {
    let id = parse_user_id(&path)?;
    let user = state.users_query.get_user(&id).await?;
    Ok(web::Json(user))
}

/// Replace the five recognised fields of a user record.
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "Hex ObjectId of the user")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Missing required fields or invalid id", body = ErrorBody),
        (status = 404, description = "User not found or unchanged", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/user/{id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_user_id(&path)?;
    let details = UserDetails::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    state.users_command.replace_user(&id, details).await?;
    Ok(web::Json(MessageResponse::new("User updated successfully")))
}

/// Merge arbitrary fields into a user record.
#[utoipa::path(
    patch,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "Hex ObjectId of the user")),
    request_body(content = UserPatchSchema, description = "Fields to set"),
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "No fields to update or invalid id", body = ErrorBody),
        (status = 404, description = "User not found or unchanged", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/user/{id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_user_id(&path)?;
    let patch = UserPatch::new(payload.into_inner()).map_err(map_user_validation_error)?;
    state.users_command.patch_user(&id, patch).await?;
    Ok(web::Json(MessageResponse::new("User updated successfully")))
}

/// Remove a user record.
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    params(("id" = String, Path, description = "Hex ObjectId of the user")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid user id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/user/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_user_id(&path)?;
    state.users_command.delete_user(&id).await?;
    Ok(web::Json(MessageResponse::new("User deleted successfully")))
}

#[cfg(test)]
mod tests;
