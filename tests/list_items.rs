mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{build_book, spawn_app};

#[tokio::test]
async fn list_item_crud() {
    let app = spawn_app(vec![build_book("book-1")]);
    let (user_id, token) = app.register("reader", "Abc123!").await;

    // create
    let (status, created) = app
        .send(
            Method::POST,
            "/api/list-items",
            Some(&token),
            Some(json!({ "bookId": "book-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    let item = &created["listItem"];
    assert_eq!(item["ownerId"], user_id.as_str());
    assert_eq!(item["bookId"], "book-1");
    assert_eq!(item["rating"], -1);
    assert_eq!(item["notes"], "");
    assert!(item["finishDate"].is_null());
    assert_eq!(item["book"]["id"], "book-1");
    assert_eq!(item["book"]["title"], "Book book-1");
    let item_id = item["id"].as_str().unwrap().to_string();
    let item_uri = format!("/api/list-items/{item_id}");

    // read
    let (status, read) = app.send(Method::GET, &item_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["listItem"], created["listItem"]);

    // update
    let (status, updated) = app
        .send(
            Method::PUT,
            &item_uri,
            Some(&token),
            Some(json!({ "notes": "a great read", "rating": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["listItem"]["id"], item_id.as_str());
    assert_eq!(updated["listItem"]["notes"], "a great read");
    assert_eq!(updated["listItem"]["rating"], 4);
    assert_eq!(updated["listItem"]["book"]["id"], "book-1");

    // delete
    let (status, deleted) = app.send(Method::DELETE, &item_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "success": true }));

    let (status, gone) = app.send(Method::GET, &item_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        gone,
        json!({ "message": format!("No list item was found with the id of {item_id}") })
    );
}

#[tokio::test]
async fn list_returns_only_the_callers_items() {
    let app = spawn_app(vec![build_book("book-1"), build_book("book-2")]);
    let (_, alice) = app.register("alice", "Abc123!").await;
    let (_, bob) = app.register("bob", "Abc123!").await;

    for book in ["book-1", "book-2"] {
        let (status, _) = app
            .send(Method::POST, "/api/list-items", Some(&alice), Some(json!({ "bookId": book })))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = app
        .send(Method::POST, "/api/list-items", Some(&bob), Some(json!({ "bookId": "book-1" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, listed) = app.send(Method::GET, "/api/list-items", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = listed["listItems"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["book"]["id"] == item["bookId"]));
}

#[tokio::test]
async fn duplicate_list_item_is_rejected() {
    let app = spawn_app(vec![build_book("book-1")]);
    let (user_id, token) = app.register("reader", "Abc123!").await;
    let body = json!({ "bookId": "book-1" });

    let (status, _) = app
        .send(Method::POST, "/api/list-items", Some(&token), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = app
        .send(Method::POST, "/api/list-items", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error,
        json!({
            "message": format!("User {user_id} already has a list item for the book with the ID book-1")
        })
    );
}

#[tokio::test]
async fn create_without_book_id() {
    let app = spawn_app(vec![]);
    let (_, token) = app.register("reader", "Abc123!").await;

    let (status, error) = app
        .send(Method::POST, "/api/list-items", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({ "message": "No bookId provided" }));
}

#[tokio::test]
async fn list_item_for_an_unknown_book_has_no_book() {
    let app = spawn_app(vec![]);
    let (_, token) = app.register("reader", "Abc123!").await;

    let (status, created) = app
        .send(
            Method::POST,
            "/api/list-items",
            Some(&token),
            Some(json!({ "bookId": "not-in-catalogue" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(created["listItem"]["book"].is_null());
}

#[tokio::test]
async fn other_users_cannot_touch_a_list_item() {
    let app = spawn_app(vec![build_book("book-1")]);
    let (_, owner) = app.register("owner", "Abc123!").await;
    let (intruder_id, intruder) = app.register("intruder", "Abc123!").await;

    let (_, created) = app
        .send(Method::POST, "/api/list-items", Some(&owner), Some(json!({ "bookId": "book-1" })))
        .await;
    let item_id = created["listItem"]["id"].as_str().unwrap().to_string();
    let item_uri = format!("/api/list-items/{item_id}");
    let expected = json!({
        "message": format!(
            "User with id {intruder_id} is not authorized to access the list item {item_id}"
        )
    });

    let (status, body) = app.send(Method::GET, &item_uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, expected);

    let (status, _) = app
        .send(Method::PUT, &item_uri, Some(&intruder), Some(json!({ "notes": "mine now" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::DELETE, &item_uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // untouched for the owner
    let (status, read) = app.send(Method::GET, &item_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["listItem"]["notes"], "");
}

#[tokio::test]
async fn list_items_require_a_token() {
    let app = spawn_app(vec![build_book("book-1")]);

    let (status, body) = app.send(Method::GET, "/api/list-items", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "credentials_required");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/list-items",
            Some("not-a-jwt"),
            Some(json!({ "bookId": "book-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_token");
}

#[tokio::test]
async fn books_can_be_searched_and_read() {
    let app = spawn_app(vec![build_book("book-1"), build_book("book-2")]);
    let (_, token) = app.register("reader", "Abc123!").await;

    let (status, all) = app.send(Method::GET, "/api/books", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["books"].as_array().unwrap().len(), 2);

    let (status, found) = app
        .send(Method::GET, "/api/books?query=book-2", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let books = found["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["coverImageUrl"], "https://covers.example.com/book-2.jpg");

    let (status, book) = app.send(Method::GET, "/api/books/book-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["book"]["pageCount"], 321);

    let (status, missing) = app.send(Method::GET, "/api/books/nope", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing, json!({ "message": "No book was found with the id of nope" }));

    let (status, _) = app.send(Method::GET, "/api/books", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_list_item_bodies_are_bad_requests() {
    let app = spawn_app(vec![build_book("book-1")]);
    let (_, token) = app.register("reader", "Abc123!").await;

    let (status, error) = app
        .send(Method::POST, "/api/list-items", Some(&token), Some(json!({ "bookId": 5 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to deserialize the JSON body"));

    let (status, error) = app
        .send_raw(
            Method::POST,
            "/api/list-items",
            Some(&token),
            Some("application/json"),
            "not json",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].is_string());

    let (status, error) = app
        .send_raw(Method::POST, "/api/list-items", Some(&token), None, r#"{"bookId":"book-1"}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].is_string());

    let (_, created) = app
        .send(Method::POST, "/api/list-items", Some(&token), Some(json!({ "bookId": "book-1" })))
        .await;
    let item_uri = format!("/api/list-items/{}", created["listItem"]["id"].as_str().unwrap());
    let (status, error) = app
        .send(Method::PUT, &item_uri, Some(&token), Some(json!({ "rating": "five" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.as_object().unwrap().len(), 1);
}
