use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use shelf_auth::CurrentUser;
use shelf_db::BookStore;
use shelf_http::AppError;

use super::models::{BookEnvelope, BookSearch, BooksEnvelope};

type Books = State<Arc<dyn BookStore>>;

/// Search the catalogue by title or author
pub(super) async fn search_books(
    State(books): Books,
    _user: CurrentUser,
    Query(search): Query<BookSearch>,
) -> Result<Json<BooksEnvelope>, AppError> {
    let books = books.query(&search.query).await.map_err(AppError::internal)?;
    Ok(Json(BooksEnvelope { books }))
}

pub(super) async fn get_book(
    State(books): Books,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = books
        .read_by_id(&id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("No book was found with the id of {id}")))?;
    Ok(Json(BookEnvelope { book }))
}
