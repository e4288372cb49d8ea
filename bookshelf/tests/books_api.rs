use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use bookshelf::{app, catalog::BookCatalog, handler::AppState};
use bookshelf_core::{
    DeleteAck, DocumentStore, Fields, InsertAck, Query, RecordId, StoreBackend, StoreBackendBuilder,
    StoreError, StoreResult, UpdateAck,
};
use bson::{Document, doc, oid::ObjectId};
use bookshelf_memory::InMemoryStore;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app_with(store: DocumentStore) -> Router {
    app(Arc::new(AppState {
        catalog: BookCatalog::new(store, "books"),
    }))
}

fn memory_app() -> Router {
    app_with(DocumentStore::from_backend(InMemoryStore::new()))
}

async fn send(sut: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    sut.clone().oneshot(request).await.unwrap()
}

async fn response_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn response_body(response: Response) -> Value {
    serde_json::from_str(&response_text(response).await).unwrap()
}

async fn create(sut: &Router, book: Value) -> String {
    let response = send(sut, "POST", "/api/v1/books", Some(book)).await;
    assert_eq!(response.status(), StatusCode::OK);

    response_body(response).await["insertedId"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn seed_numbered(sut: &Router, count: usize) {
    for n in 1..=count {
        create(sut, json!({ "title": format!("Book {n}"), "author": "Anon" })).await;
    }
}

fn titles(books: &Value) -> Vec<&str> {
    books
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap())
        .collect()
}

#[rstest]
#[case("/api/v1/books?page=2&limit=5", vec!["Book 6", "Book 7", "Book 8", "Book 9", "Book 10"], 3, 2)]
#[case("/api/v1/books?page=3&limit=5", vec!["Book 11", "Book 12"], 3, 3)]
#[case("/api/v1/books?page=4&limit=5", vec![], 3, 4)]
#[case("/api/v1/books?page=1&limit=3", vec!["Book 1", "Book 2", "Book 3"], 4, 1)]
#[tokio::test]
async fn test_list_books_returns_natural_order_slice(
    #[case] uri: &str,
    #[case] expected: Vec<&str>,
    #[case] total_pages: u64,
    #[case] current_page: u64,
) {
    // Given
    let sut = memory_app();
    seed_numbered(&sut, 12).await;

    // When
    let response = send(&sut, "GET", uri, None).await;

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_body(response).await;
    assert_eq!(titles(&body["books"]), expected);
    assert_eq!(body["totalPages"], json!(total_pages));
    assert_eq!(body["currentPage"], json!(current_page));
}

#[rstest]
#[case("/api/v1/books?page=abc&limit=-3")]
#[case("/api/v1/books?page=0&limit=0")]
#[case("/api/v1/books")]
#[tokio::test]
async fn test_invalid_paging_falls_back_to_defaults(#[case] uri: &str) {
    // Given
    let sut = memory_app();
    seed_numbered(&sut, 12).await;

    // When
    let body = response_body(send(&sut, "GET", uri, None).await).await;

    // Then
    assert_eq!(body["books"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalPages"], json!(2));
    assert_eq!(body["currentPage"], json!(1));
}

#[tokio::test]
async fn test_search_matches_any_field_case_insensitively() {
    // Given
    let sut = memory_app();
    create(&sut, json!({ "title": "The Hobbit", "author": "J.R.R. Tolkien", "narrator": "Andy Serkis" })).await;
    create(&sut, json!({ "title": "Dune", "author": "Frank Herbert", "narrator": "Scott Brick" })).await;
    create(&sut, json!({ "title": "Tolkien: A Biography", "author": "Humphrey Carpenter" })).await;
    create(&sut, json!({ "title": "Mistborn", "author": "Brandon Sanderson", "narrator": "Michael KRAMER" })).await;

    // When
    let tolkien = response_body(send(&sut, "GET", "/api/v1/books?searchText=tOLKIEN&limit=1", None).await).await;
    let kramer = response_body(send(&sut, "GET", "/api/v1/books?searchText=kramer", None).await).await;

    // Then
    assert_eq!(titles(&tolkien["books"]), vec!["The Hobbit", "Tolkien: A Biography"]);
    assert_eq!(tolkien["totalPages"], json!(4));
    assert_eq!(titles(&kramer["books"]), vec!["Mistborn"]);
}

#[tokio::test]
async fn test_search_without_matches_keeps_unfiltered_total() {
    // Given
    let sut = memory_app();
    seed_numbered(&sut, 25).await;

    // When
    let response = send(&sut, "GET", "/api/v1/books?searchText=tolkien", None).await;

    // Then
    assert_eq!(
        response_body(response).await,
        json!({ "books": [], "totalPages": 3, "currentPage": 1 })
    );
}

#[tokio::test]
async fn test_featured_books_are_rated_above_four_and_a_half() {
    // Given
    let sut = memory_app();
    create(&sut, json!({ "title": "Exactly", "rating": 4.5 })).await;
    create(&sut, json!({ "title": "Above", "rating": 4.51 })).await;
    create(&sut, json!({ "title": "Below", "rating": 3 })).await;
    create(&sut, json!({ "title": "Perfect", "rating": 5 })).await;
    create(&sut, json!({ "title": "Unrated" })).await;

    // When
    let response = send(&sut, "GET", "/api/v1/featuredbooks", None).await;

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(&response_body(response).await), vec!["Above", "Perfect"]);
}

#[tokio::test]
async fn test_created_book_is_returned_with_its_id() {
    // Given
    let sut = memory_app();
    let id = create(&sut, json!({ "title": "A", "author": "B", "rating": 5 })).await;

    // When
    let response = send(&sut, "GET", &format!("/api/v1/books/{id}"), None).await;

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_body(response).await,
        json!([{ "_id": id, "title": "A", "author": "B", "rating": 5 }])
    );
}

#[tokio::test]
async fn test_client_supplied_id_is_ignored() {
    // Given
    let sut = memory_app();

    // When
    let id = create(&sut, json!({ "_id": "000000000000000000000000", "title": "A" })).await;

    // Then
    assert!(id != "000000000000000000000000");
    let body = response_body(send(&sut, "GET", &format!("/api/v1/books/{id}"), None).await).await;
    assert_eq!(body, json!([{ "_id": id, "title": "A" }]));
}

#[tokio::test]
async fn test_get_missing_book_is_an_empty_list() {
    let sut = memory_app();

    let response = send(&sut, "GET", "/api/v1/books/5f0c2b9e8d1a4c3b2a190807", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_body(response).await, json!([]));
}

#[tokio::test]
async fn test_update_merges_fields() {
    // Given
    let sut = memory_app();
    let id = create(&sut, json!({ "title": "A", "author": "B", "rating": 3 })).await;

    // When
    let response = send(&sut, "PUT", &format!("/api/v1/books/{id}"), Some(json!({ "rating": 4.8, "narrator": "C" }))).await;

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_body(response).await,
        json!({
            "acknowledged": true,
            "matchedCount": 1,
            "modifiedCount": 1,
            "upsertedCount": 0,
            "upsertedId": null,
        })
    );
    let book = response_body(send(&sut, "GET", &format!("/api/v1/books/{id}"), None).await).await;
    assert_eq!(
        book,
        json!([{ "_id": id, "title": "A", "author": "B", "rating": 4.8, "narrator": "C" }])
    );
}

#[tokio::test]
async fn test_update_with_same_values_modifies_nothing() {
    let sut = memory_app();
    let id = create(&sut, json!({ "title": "A" })).await;

    let response = send(&sut, "PUT", &format!("/api/v1/books/{id}"), Some(json!({ "title": "A" }))).await;

    let body = response_body(response).await;
    assert_eq!(body["matchedCount"], json!(1));
    assert_eq!(body["modifiedCount"], json!(0));
}

#[rstest]
#[case("PUT", Some(json!({ "title": "X" })))]
#[case("DELETE", None)]
#[tokio::test]
async fn test_missing_book_is_not_found(#[case] method: &str, #[case] body: Option<Value>) {
    // Given
    let sut = memory_app();
    create(&sut, json!({ "title": "A" })).await;

    // When
    let response = send(&sut, method, "/api/v1/books/5f0c2b9e8d1a4c3b2a190807", body).await;

    // Then
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_body(response).await, json!({ "error": "Book not found" }));
}

#[tokio::test]
async fn test_delete_removes_exactly_one_book() {
    // Given
    let sut = memory_app();
    let keep = create(&sut, json!({ "title": "Keep" })).await;
    let gone = create(&sut, json!({ "title": "Gone" })).await;

    // When
    let response = send(&sut, "DELETE", &format!("/api/v1/books/{gone}"), None).await;

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_body(response).await,
        json!({ "acknowledged": true, "deletedCount": 1 })
    );
    let listing = response_body(send(&sut, "GET", "/api/v1/books", None).await).await;
    assert_eq!(listing["books"], json!([{ "_id": keep, "title": "Keep" }]));
    let again = send(&sut, "DELETE", &format!("/api/v1/books/{gone}"), None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("GET", None)]
#[case("PUT", Some(json!({ "title": "X" })))]
#[case("DELETE", None)]
#[tokio::test]
async fn test_malformed_id_is_a_client_error(#[case] method: &str, #[case] body: Option<Value>) {
    let sut = memory_app();

    let response = send(&sut, method, "/api/v1/books/not-an-object-id", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_body(response).await, json!({ "error": "Invalid book id" }));
}

#[tokio::test]
async fn test_create_without_json_content_type_is_bad_request() {
    let sut = memory_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/books")
        .body(Body::from(r#"{"title":"A"}"#))
        .unwrap();

    let response = sut.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Fails to connect until `available` is set.
#[derive(Debug)]
struct FlakyBuilder {
    available: Arc<AtomicBool>,
}

#[async_trait]
impl StoreBackendBuilder for FlakyBuilder {
    type Backend = InMemoryStore;

    async fn build(&self) -> StoreResult<Self::Backend> {
        if self.available.load(Ordering::SeqCst) {
            Ok(InMemoryStore::new())
        } else {
            Err(StoreError::Initialization("connection refused".to_string()))
        }
    }
}

#[tokio::test]
async fn test_store_initialisation_failure_is_retried() {
    // Given
    let available = Arc::new(AtomicBool::new(false));
    let sut = app_with(DocumentStore::new(FlakyBuilder {
        available: Arc::clone(&available),
    }));

    // When
    let failed = send(&sut, "GET", "/api/v1/books", None).await;

    // Then
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response_text(failed).await, "Internal Server Error");

    // When
    available.store(true, Ordering::SeqCst);
    let recovered = send(&sut, "GET", "/api/v1/books", None).await;

    // Then
    assert_eq!(recovered.status(), StatusCode::OK);
    assert_eq!(
        response_body(recovered).await,
        json!({ "books": [], "totalPages": 0, "currentPage": 1 })
    );
}

#[tokio::test]
async fn test_health_does_not_touch_the_store() {
    let sut = app_with(DocumentStore::new(FlakyBuilder {
        available: Arc::new(AtomicBool::new(false)),
    }));

    let response = send(&sut, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_body(response).await,
        json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") })
    );
}

#[tokio::test]
async fn test_readiness_follows_store_availability() {
    // Given
    let available = Arc::new(AtomicBool::new(false));
    let sut = app_with(DocumentStore::new(FlakyBuilder {
        available: Arc::clone(&available),
    }));

    // When
    let not_ready = send(&sut, "GET", "/health/ready", None).await;

    // Then
    assert_eq!(not_ready.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response_body(not_ready).await,
        json!({ "status": "not_ready", "checks": { "store": "error" } })
    );

    // When
    available.store(true, Ordering::SeqCst);
    let ready = send(&sut, "GET", "/health/ready", None).await;

    // Then
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(
        response_body(ready).await,
        json!({ "status": "ready", "checks": { "store": "ok" } })
    );
}

#[tokio::test]
async fn test_cors_mirrors_request_origin() {
    let sut = memory_app();
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/featuredbooks")
        .header("origin", "https://shelf.example")
        .body(Body::empty())
        .unwrap();

    let response = sut.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://shelf.example"
    );
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");
}

/// Serves a fixed set of documents, as a collection populated by another tool would.
#[derive(Debug)]
struct ImportedBackend {
    documents: Vec<Document>,
}

#[async_trait]
impl StoreBackend for ImportedBackend {
    async fn insert_document(&self, _: Fields, _: &str) -> StoreResult<InsertAck> {
        Ok(InsertAck::new(RecordId::new()))
    }

    async fn update_document(&self, _: RecordId, _: Fields, _: &str) -> StoreResult<UpdateAck> {
        Ok(UpdateAck::new(0, 0))
    }

    async fn delete_document(&self, _: RecordId, _: &str) -> StoreResult<DeleteAck> {
        Ok(DeleteAck::new(0))
    }

    async fn get_documents(&self, _: Vec<RecordId>, _: &str) -> StoreResult<Vec<Document>> {
        Ok(vec![])
    }

    async fn query_documents(&self, _: Query, _: &str) -> StoreResult<Vec<Document>> {
        Ok(self.documents.clone())
    }

    async fn count_documents(&self, _: &str) -> StoreResult<u64> {
        Ok(self.documents.len() as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_listing_includes_documents_with_non_object_ids() {
    // Given
    let oid = ObjectId::new();
    let sut = app_with(DocumentStore::from_backend(ImportedBackend {
        documents: vec![
            doc! { "_id": oid, "title": "Dune" },
            doc! { "_id": "imported-1", "title": "Hobbit" },
        ],
    }));

    // When
    let response = send(&sut, "GET", "/api/v1/books", None).await;

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_body(response).await["books"],
        json!([
            { "_id": oid.to_hex(), "title": "Dune" },
            { "_id": "imported-1", "title": "Hobbit" },
        ])
    );
}

#[tokio::test]
async fn test_rejected_query_string_is_a_json_bad_request() {
    let sut = memory_app();

    let response = send(&sut, "GET", "/api/v1/books?page=1&page=2", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response_body(response).await["error"].is_string());
}
