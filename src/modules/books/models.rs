use serde::{Deserialize, Serialize};
use shelf_db::Book;

/// Query string for `GET /api/books`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookSearch {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    pub book: Book,
}

#[derive(Debug, Serialize)]
pub struct BooksEnvelope {
    pub books: Vec<Book>,
}
