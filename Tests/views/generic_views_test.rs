#[path = "../common/mod.rs"]
mod common;

use axum::http::{StatusCode, header};
use common::*;
use serde_json::json;

const VARIANT: Variant = Variant {
    collection: "/api/generics/todos",
    paginated: true,
    requires_auth: true,
    supports_patch: true,
};

#[tokio::test]
async fn test_listing_sorted_by_priority() {
    check_listing_sorted_by_priority(&VARIANT).await;
}

#[tokio::test]
async fn test_create_then_fetch() {
    check_create_then_fetch(&VARIANT).await;
}

#[tokio::test]
async fn test_create_applies_defaults() {
    check_create_applies_defaults(&VARIANT).await;
}

#[tokio::test]
async fn test_update_changes_submitted_fields() {
    check_update_changes_submitted_fields(&VARIANT).await;
}

#[tokio::test]
async fn test_full_update_requires_title() {
    check_full_update_requires_title(&VARIANT).await;
}

#[tokio::test]
async fn test_delete_then_not_found() {
    check_delete_then_not_found(&VARIANT).await;
}

#[tokio::test]
async fn test_invalid_payloads_do_not_mutate() {
    check_invalid_payloads_do_not_mutate(&VARIANT).await;
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    check_missing_ids_are_not_found(&VARIANT).await;
}

#[tokio::test]
async fn test_body_errors() {
    check_body_errors(&VARIANT).await;
}

#[tokio::test]
async fn test_wrong_method_on_collection() {
    check_wrong_method(&VARIANT).await;
}

#[tokio::test]
async fn test_partial_update() {
    check_partial_update(&VARIANT).await;
}

#[tokio::test]
async fn test_pagination_envelope_and_links() {
    let client = TestClient::with_settings(test_settings().set_page_size(2));
    for (title, priority) in [("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)] {
        create(&client, &VARIANT, json!({ "title": title, "priority": priority })).await;
    }

    let first = client.get(VARIANT.collection).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["count"], 5);
    assert_eq!(first.body["next"], "/api/generics/todos?page=2");
    assert!(first.body["previous"].is_null());
    assert_eq!(records(&first.body).len(), 2);

    let second = client.get("/api/generics/todos?page=2").await;
    assert_eq!(second.body["previous"], "/api/generics/todos");
    assert_eq!(second.body["next"], "/api/generics/todos?page=3");
    assert_eq!(records(&second.body)[0]["title"], "c");

    let last = client.get("/api/generics/todos?page=last").await;
    assert_eq!(records(&last.body).len(), 1);
    assert_eq!(records(&last.body)[0]["title"], "e");
    assert!(last.body["next"].is_null());
}

#[tokio::test]
async fn test_invalid_page_is_not_found() {
    let client = TestClient::new();
    create(&client, &VARIANT, json!({ "title": "only" })).await;

    for page in ["0", "2", "abc"] {
        let response = client
            .get(&format!("/api/generics/todos?page={}", page))
            .await;
        assert_error_code(&response, StatusCode::NOT_FOUND, "INVALID_PAGE");
        assert_eq!(response.body["error"]["message"], "Invalid page.");
    }
}

#[tokio::test]
async fn test_repeated_page_param_uses_last_value() {
    let client = TestClient::new();
    create(&client, &VARIANT, json!({ "title": "only" })).await;

    let response = client.get("/api/generics/todos?page=1&page=1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(records(&response.body).len(), 1);

    let response = client.get("/api/generics/todos?page=1&page=2").await;
    assert_error_code(&response, StatusCode::NOT_FOUND, "INVALID_PAGE");
}

#[tokio::test]
async fn test_empty_collection_has_one_page() {
    let client = TestClient::new();
    let response = client.get("/api/generics/todos?page=1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 0);
    assert_eq!(records(&response.body).len(), 0);
}

#[tokio::test]
async fn test_collection_does_not_require_credentials() {
    let client = TestClient::new();
    let created = client.post(VARIANT.collection, json!({ "title": "anon" })).await;
    assert_eq!(created.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_detail_requires_credentials() {
    let authed = TestClient::new().authenticated().await;
    let created = create(&authed, &VARIANT, json!({ "title": "secret" })).await;
    let url = VARIANT.item(&created["id"]);

    let anonymous = authed.without_authorization();
    let response = anonymous.get(&url).await;
    assert_error_code(&response, StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED");
    assert_eq!(
        response.body["error"]["message"],
        "Authentication credentials were not provided."
    );
    assert_eq!(
        response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"api\""
    );

    // Rejected writes leave the record untouched
    let response = anonymous.delete(&url).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(titles(&anonymous, &VARIANT).await, vec!["secret"]);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let client = TestClient::new().authenticated().await;
    let created = create(&client, &VARIANT, json!({ "title": "x" })).await;

    let client = client.with_authorization(basic_header(USERNAME, "wrong"));
    let response = client.get(&VARIANT.item(&created["id"])).await;
    assert_error_code(&response, StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED");
    assert_eq!(response.body["error"]["message"], "Invalid username/password.");

    let client = client.with_authorization(basic_header("nobody", PASSWORD));
    let response = client.get(&VARIANT.item(&created["id"])).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let client = client.with_authorization("Basic ###");
    let response = client.get(&VARIANT.item(&created["id"])).await;
    assert_error_code(&response, StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn test_inactive_user_rejected() {
    let client = TestClient::new();
    add_user(&client.state, "dormant", "pw", false).await;
    let created = create(&client, &VARIANT, json!({ "title": "x" })).await;

    let client = client.with_authorization(basic_header("dormant", "pw"));
    let response = client.get(&VARIANT.item(&created["id"])).await;
    assert_error_code(&response, StatusCode::UNAUTHORIZED, "USER_INACTIVE");
}
