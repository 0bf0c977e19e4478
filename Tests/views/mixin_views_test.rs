#[path = "../common/mod.rs"]
mod common;

use common::*;

const VARIANT: Variant = Variant {
    collection: "/api/mixins/todos",
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
async fn test_delete_removes_only_target() {
    let client = TestClient::new();
    let keep = create(&client, &VARIANT, serde_json::json!({ "title": "keep" })).await;
    let drop = create(&client, &VARIANT, serde_json::json!({ "title": "drop" })).await;

    let response = client.delete(&VARIANT.item(&drop["id"])).await;
    assert_eq!(response.status, axum::http::StatusCode::NO_CONTENT);

    assert_eq!(titles(&client, &VARIANT).await, vec!["keep"]);
    assert_eq!(client.get(&VARIANT.item(&keep["id"])).await.body, keep);
}

#[tokio::test]
async fn test_unpaginated_listing_ignores_page_param() {
    let client = TestClient::new();
    create(&client, &VARIANT, serde_json::json!({ "title": "only" })).await;

    let response = client.get("/api/mixins/todos?page=a&page=b").await;
    assert_eq!(response.status, axum::http::StatusCode::OK);
    assert_eq!(response.body.as_array().map(Vec::len), Some(1));
}
