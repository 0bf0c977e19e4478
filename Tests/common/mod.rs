#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use todo_views_backend::{
    config::{ApiSettings, StorageBackend},
    datalayer::CRUD::helper::password::make_password,
    datalayer::NewUser,
    routes::create_router,
    state::AppState,
};
use tower::ServiceExt;

pub const USERNAME: &str = "tester";
pub const PASSWORD: &str = "s3cret-pass";

pub fn test_settings() -> ApiSettings {
    ApiSettings::new()
        .set_storage(StorageBackend::Memory)
        .set_page_size(10)
        .without_admin()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Drives the full router against a fresh in-memory store
pub struct TestClient {
    pub state: AppState,
    app: Router,
    authorization: Option<String>,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: ApiSettings) -> Self {
        let state = AppState::in_memory(settings);
        Self {
            app: create_router(state.clone()),
            state,
            authorization: None,
        }
    }

    /// Register a user and send its Basic credentials on every request
    pub async fn authenticated(mut self) -> Self {
        add_user(&self.state, USERNAME, PASSWORD, true).await;
        self.authorization = Some(basic_header(USERNAME, PASSWORD));
        self
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    pub fn without_authorization(mut self) -> Self {
        self.authorization = None;
        self
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(authorization) = &self.authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}

pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

pub async fn add_user(state: &AppState, username: &str, password: &str, is_active: bool) {
    state
        .users
        .create(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: String::new(),
            last_name: String::new(),
            password: make_password(password).unwrap(),
            is_active,
            is_staff: false,
        })
        .await
        .unwrap();
}

/// One of the todo endpoint families
pub struct Variant {
    pub collection: &'static str,
    pub paginated: bool,
    pub requires_auth: bool,
    pub supports_patch: bool,
}

impl Variant {
    pub fn item(&self, id: impl std::fmt::Display) -> String {
        format!("{}/{}", self.collection, id)
    }

    pub async fn client(&self) -> TestClient {
        if self.requires_auth {
            TestClient::new().authenticated().await
        } else {
            TestClient::new()
        }
    }
}

/// Records from a listing, unwrapping the page envelope when present
pub fn records(body: &Value) -> Vec<Value> {
    let list = body.get("results").unwrap_or(body);
    list.as_array().cloned().unwrap_or_default()
}

pub async fn create(client: &TestClient, variant: &Variant, body: Value) -> Value {
    let response = client.post(variant.collection, body).await;
    assert_eq!(response.status, StatusCode::CREATED, "body: {}", response.body);
    response.body
}

pub async fn titles(client: &TestClient, variant: &Variant) -> Vec<String> {
    let response = client.get(variant.collection).await;
    assert_eq!(response.status, StatusCode::OK);
    records(&response.body)
        .iter()
        .map(|todo| todo["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

pub fn assert_error_code(response: &TestResponse, status: StatusCode, code: &str) {
    assert_eq!(response.status, status, "body: {}", response.body);
    assert_eq!(response.body["error"]["code"], code, "body: {}", response.body);
}

// ===== CONTRACT CHECKS SHARED BY EVERY VARIANT =====

pub async fn check_listing_sorted_by_priority(variant: &Variant) {
    let client = variant.client().await;
    create(&client, variant, json!({ "title": "low", "priority": 5 })).await;
    create(&client, variant, json!({ "title": "high", "priority": 0 })).await;
    create(&client, variant, json!({ "title": "mid", "priority": 2 })).await;
    create(&client, variant, json!({ "title": "mid-later", "priority": 2 })).await;

    assert_eq!(
        titles(&client, variant).await,
        vec!["high", "mid", "mid-later", "low"]
    );

    let listing = client.get(variant.collection).await;
    if variant.paginated {
        assert_eq!(listing.body["count"], 4);
        assert!(listing.body["next"].is_null());
        assert!(listing.body["previous"].is_null());
    } else {
        assert!(listing.body.is_array());
    }
}

pub async fn check_create_then_fetch(variant: &Variant) {
    let client = variant.client().await;
    let created = create(
        &client,
        variant,
        json!({ "title": "  write report ", "content": "quarterly", "priority": 3 }),
    )
    .await;

    assert_eq!(created["title"], "write report");
    assert_eq!(created["content"], "quarterly");
    assert_eq!(created["priority"], 3);
    assert_eq!(created["is_done"], false);

    let fetched = client.get(&variant.item(&created["id"])).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created);
}

pub async fn check_create_applies_defaults(variant: &Variant) {
    let client = variant.client().await;
    let created = create(&client, variant, json!({ "title": "defaults" })).await;
    assert_eq!(created["content"], "");
    assert_eq!(created["priority"], 1);
    assert_eq!(created["is_done"], false);
    assert!(created["created_at"].is_string());
}

pub async fn check_update_changes_submitted_fields(variant: &Variant) {
    let client = variant.client().await;
    let created = create(
        &client,
        variant,
        json!({ "title": "draft", "content": "keep me", "priority": 4 }),
    )
    .await;
    let url = variant.item(&created["id"]);

    let updated = client
        .put(&url, json!({ "title": "final", "is_done": true }))
        .await;
    assert_eq!(updated.status, StatusCode::ACCEPTED, "body: {}", updated.body);
    assert_eq!(updated.body["title"], "final");
    assert_eq!(updated.body["is_done"], true);
    assert_eq!(updated.body["content"], "keep me");
    assert_eq!(updated.body["priority"], 4);

    let fetched = client.get(&url).await;
    assert_eq!(fetched.body["title"], "final");
    assert_eq!(fetched.body["is_done"], true);
    assert_eq!(fetched.body["id"], created["id"]);
}

pub async fn check_full_update_requires_title(variant: &Variant) {
    let client = variant.client().await;
    let created = create(&client, variant, json!({ "title": "keep" })).await;
    let url = variant.item(&created["id"]);

    let response = client.put(&url, json!({ "is_done": true })).await;
    assert_error_code(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
    assert_eq!(
        response.body["error"]["details"]["title"][0],
        "This field is required."
    );

    let fetched = client.get(&url).await;
    assert_eq!(fetched.body, created);
}

pub async fn check_partial_update(variant: &Variant) {
    let client = variant.client().await;
    let created = create(&client, variant, json!({ "title": "patch me", "priority": 7 })).await;
    let url = variant.item(&created["id"]);

    let patched = client.patch(&url, json!({ "is_done": true })).await;
    assert_eq!(patched.status, StatusCode::ACCEPTED, "body: {}", patched.body);
    assert_eq!(patched.body["is_done"], true);
    assert_eq!(patched.body["title"], "patch me");
    assert_eq!(patched.body["priority"], 7);
}

pub async fn check_delete_then_not_found(variant: &Variant) {
    let client = variant.client().await;
    let created = create(&client, variant, json!({ "title": "temporary" })).await;
    let url = variant.item(&created["id"]);

    let deleted = client.delete(&url).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_null());

    assert_error_code(&client.get(&url).await, StatusCode::NOT_FOUND, "TODO_NOT_FOUND");
    assert_error_code(&client.delete(&url).await, StatusCode::NOT_FOUND, "TODO_NOT_FOUND");
}

pub async fn check_invalid_payloads_do_not_mutate(variant: &Variant) {
    let client = variant.client().await;
    let created = create(&client, variant, json!({ "title": "original", "priority": 1 })).await;
    let url = variant.item(&created["id"]);

    let bad_create = client
        .post(variant.collection, json!({ "title": "", "priority": -2 }))
        .await;
    assert_error_code(&bad_create, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
    let details = &bad_create.body["error"]["details"];
    assert!(details["title"].is_array());
    assert!(details["priority"].is_array());

    let bad_update = client
        .put(&url, json!({ "title": "changed", "priority": "soon" }))
        .await;
    assert_error_code(&bad_update, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

    assert_eq!(titles(&client, variant).await, vec!["original"]);
    assert_eq!(client.get(&url).await.body, created);
}

pub async fn check_missing_ids_are_not_found(variant: &Variant) {
    let client = variant.client().await;
    let url = variant.item(9999);

    assert_error_code(&client.get(&url).await, StatusCode::NOT_FOUND, "TODO_NOT_FOUND");
    assert_error_code(
        &client.put(&url, json!({ "title": "" })).await,
        StatusCode::NOT_FOUND,
        "TODO_NOT_FOUND",
    );
    assert_error_code(&client.delete(&url).await, StatusCode::NOT_FOUND, "TODO_NOT_FOUND");
    if variant.supports_patch {
        assert_error_code(
            &client.patch(&url, json!({})).await,
            StatusCode::NOT_FOUND,
            "TODO_NOT_FOUND",
        );
    }

    assert_error_code(
        &client.get(&variant.item("not-a-number")).await,
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
    );
}

pub async fn check_body_errors(variant: &Variant) {
    let client = variant.client().await;

    let malformed = client
        .send(
            Request::builder()
                .method(Method::POST)
                .uri(variant.collection)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"title\": "))
                .unwrap(),
        )
        .await;
    assert_error_code(&malformed, StatusCode::BAD_REQUEST, "INVALID_INPUT");

    let not_json = client
        .send(
            Request::builder()
                .method(Method::POST)
                .uri(variant.collection)
                .body(Body::from("title=x"))
                .unwrap(),
        )
        .await;
    assert_error_code(&not_json, StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE");

    let not_object = client.post(variant.collection, json!(["title"])).await;
    assert_error_code(&not_object, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
    assert!(not_object.body["error"]["details"]["non_field_errors"].is_array());
}

pub async fn check_wrong_method(variant: &Variant) {
    let client = variant.client().await;
    let response = client.delete(variant.collection).await;
    assert_error_code(&response, StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED");
    assert_eq!(response.body["error"]["message"], "Method \"DELETE\" not allowed.");
}
