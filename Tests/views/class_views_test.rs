#[path = "../common/mod.rs"]
mod common;

use common::*;

const VARIANT: Variant = Variant {
    collection: "/api/class-views/todos",
    paginated: false,
    requires_auth: false,
    supports_patch: false,
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
async fn test_delete_missing_todo_reports_id() {
    let client = TestClient::new();
    let response = client.delete(&VARIANT.item(42)).await;

    assert_error_code(&response, axum::http::StatusCode::NOT_FOUND, "TODO_NOT_FOUND");
    assert_eq!(response.body["error"]["details"]["id"], 42);
}
