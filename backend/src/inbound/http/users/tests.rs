//! Tests for users API handlers.

use super::*;
use crate::domain::ports::{MockUserRepository, UserPersistenceError, UserRepository};
use crate::inbound::http::error::json_error_handler;
use crate::outbound::persistence::InMemoryUserRepository;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

const UNKNOWN_ID: &str = "65f1c0ffee0000000000beef";

async fn test_app(
    repository: Arc<dyn UserRepository>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::from_repository(repository)))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .configure(configure),
    )
    .await
}

async fn in_memory_app() -> (
    impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    Arc<InMemoryUserRepository>,
) {
    let repository = Arc::new(InMemoryUserRepository::new());
    (test_app(repository.clone()).await, repository)
}

fn ada() -> Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "555-0100",
        "role": "user"
    })
}

async fn create(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    body: Value,
) -> String {
    let request = actix_test::TestRequest::post()
        .uri("/api/user")
        .set_json(body)
        .to_request();
    let response: CreatedResponse = actix_test::call_and_read_body_json(app, request).await;
    response.user_id.to_string()
}

async fn error_message(response: ServiceResponse) -> String {
    let body: ErrorBody = actix_test::read_body_json(response).await;
    body.error
}

#[actix_web::test]
async fn root_reports_running() {
    let (app, _) = in_memory_app().await;
    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_test::read_body(response).await;
    assert_eq!(body.as_ref(), SERVER_RUNNING.as_bytes());
}

#[actix_web::test]
async fn create_returns_created_with_fresh_id() {
    let (app, repository) = in_memory_app().await;
    let request = actix_test::TestRequest::post()
        .uri("/api/user")
        .set_json(ada())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: CreatedResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.message, "User created successfully");

    let second = create(&app, ada()).await;
    assert_ne!(body.user_id.to_string(), second);
    assert_eq!(repository.len().expect("len"), 2);
}

#[rstest]
#[case::missing_name(json!({"email": "a@x.com", "phone": "555", "role": "user"}))]
#[case::missing_email(json!({"name": "A", "phone": "555", "role": "user"}))]
#[case::missing_phone(json!({"name": "A", "email": "a@x.com", "role": "user"}))]
#[case::missing_role(json!({"name": "A", "email": "a@x.com", "phone": "555"}))]
#[case::empty_role(json!({"name": "A", "email": "a@x.com", "phone": "555", "role": ""}))]
#[actix_web::test]
async fn create_rejects_missing_required_fields(#[case] body: Value) {
    let (app, repository) = in_memory_app().await;
    let request = actix_test::TestRequest::post()
        .uri("/api/user")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Missing required fields");
    assert!(repository.is_empty().expect("is_empty"));
}

#[actix_web::test]
async fn create_rejects_non_string_fields_through_envelope() {
    let (app, repository) = in_memory_app().await;
    let mut body = ada();
    body["name"] = json!(42);
    let request = actix_test::TestRequest::post()
        .uri("/api/user")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!error_message(response).await.is_empty());
    assert!(repository.is_empty().expect("is_empty"));
}

#[actix_web::test]
async fn get_returns_submitted_fields_with_null_address() {
    let (app, _) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/users/{id}"))
        .to_request();
    let record: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(
        record,
        json!({
            "_id": id,
            "name": "Ada",
            "email": "ada@example.com",
            "phone": "555-0100",
            "role": "user",
            "address": null
        })
    );
}

#[actix_web::test]
async fn list_returns_records_in_insertion_order() {
    let (app, _) = in_memory_app().await;
    let first = create(&app, ada()).await;
    let second = create(&app, ada()).await;

    let request = actix_test::TestRequest::get().uri("/api/users").to_request();
    let records: Vec<Value> = actix_test::call_and_read_body_json(&app, request).await;

    let ids: Vec<&str> = records
        .iter()
        .filter_map(|record| record.get("_id").and_then(Value::as_str))
        .collect();
    assert_eq!(ids, [first.as_str(), second.as_str()]);
}

#[rstest]
#[case::get(actix_test::TestRequest::get().uri(&format!("/api/users/{UNKNOWN_ID}")))]
#[case::put(actix_test::TestRequest::put().uri(&format!("/api/user/{UNKNOWN_ID}")).set_json(ada()))]
#[case::patch(actix_test::TestRequest::patch().uri(&format!("/api/user/{UNKNOWN_ID}")).set_json(json!({"role": "admin"})))]
#[case::delete(actix_test::TestRequest::delete().uri(&format!("/api/user/{UNKNOWN_ID}")))]
#[actix_web::test]
async fn unknown_ids_are_not_found(#[case] request: actix_test::TestRequest) {
    let (app, repository) = in_memory_app().await;
    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "User not found");
    assert!(repository.is_empty().expect("is_empty"));
}

#[rstest]
#[case::get(actix_test::TestRequest::get().uri("/api/users/not-an-id"))]
#[case::put(actix_test::TestRequest::put().uri("/api/user/xyz").set_json(ada()))]
#[case::patch(actix_test::TestRequest::patch().uri("/api/user/123").set_json(json!({"role": "admin"})))]
#[case::delete(actix_test::TestRequest::delete().uri("/api/user/zzzzzzzzzzzzzzzzzzzzzzzz"))]
#[actix_web::test]
async fn malformed_ids_are_rejected_before_the_store(#[case] request: actix_test::TestRequest) {
    // A mock with no expectations panics on any call.
    let app = test_app(Arc::new(MockUserRepository::new())).await;
    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid user id");
}

#[actix_web::test]
async fn replace_updates_recognised_fields() {
    let (app, _) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/user/{id}"))
        .set_json(json!({
            "name": "Grace",
            "email": "grace@example.com",
            "phone": "555-0199",
            "role": "admin",
            "address": "Arlington"
        }))
        .to_request();
    let response: MessageResponse = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(response.message, "User updated successfully");

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/users/{id}"))
        .to_request();
    let record: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(record["_id"], json!(id));
    assert_eq!(record["name"], json!("Grace"));
    assert_eq!(record["address"], json!("Arlington"));
}

#[actix_web::test]
async fn replace_with_identical_values_is_not_found() {
    let (app, _) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/user/{id}"))
        .set_json(ada())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "User not found");
}

#[actix_web::test]
async fn replace_rejects_missing_fields() {
    let (app, _) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/user/{id}"))
        .set_json(json!({"name": "Only"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Missing required fields");
}

#[actix_web::test]
async fn patch_changes_only_given_fields() {
    let (app, _) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/user/{id}"))
        .set_json(json!({"role": "admin"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/users/{id}"))
        .to_request();
    let record: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(record["role"], json!("admin"));
    assert_eq!(record["name"], json!("Ada"));
    assert_eq!(record["email"], json!("ada@example.com"));
}

#[actix_web::test]
async fn patch_rejects_empty_object() {
    let (app, _) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/user/{id}"))
        .set_json(json!({}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No fields to update");
}

#[actix_web::test]
async fn patch_rejects_non_object_bodies() {
    let (app, _) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/user/{id}"))
        .set_json(json!(["role", "admin"]))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn patch_of_id_surfaces_store_error() {
    let (app, _) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/user/{id}"))
        .set_json(json!({"_id": "other"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(response).await.contains("immutable field '_id'"));
}

#[actix_web::test]
async fn delete_then_get_is_not_found() {
    let (app, repository) = in_memory_app().await;
    let id = create(&app, ada()).await;

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/user/{id}"))
        .to_request();
    let response: MessageResponse = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(response.message, "User deleted successfully");
    assert!(repository.is_empty().expect("is_empty"));

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/users/{id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn store_failures_surface_message_verbatim() {
    let mut repository = MockUserRepository::new();
    repository
        .expect_list()
        .times(1)
        .return_once(|| Err(UserPersistenceError::connection("connection refused")));
    repository
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::query("E11000 duplicate key error")));
    let app = test_app(Arc::new(repository)).await;

    let request = actix_test::TestRequest::get().uri("/api/users").to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(response).await, "connection refused");

    let request = actix_test::TestRequest::post()
        .uri("/api/user")
        .set_json(ada())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(response).await, "E11000 duplicate key error");
}
