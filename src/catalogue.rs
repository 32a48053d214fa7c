//! Loading the book catalogue that seeds the in-memory book store.

use std::path::Path;

use anyhow::Context;
use shelf_db::Book;

/// Read a JSON array of books from `path`.
pub fn load(path: &Path) -> anyhow::Result<Vec<Book>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalogue {}", path.display()))?;
    parse(&raw).with_context(|| format!("failed to parse catalogue {}", path.display()))
}

pub fn parse(raw: &str) -> anyhow::Result<Vec<Book>> {
    let books: Vec<Book> = serde_json::from_str(raw)?;
    if let Some(book) = books.iter().find(|book| book.id.is_empty()) {
        anyhow::bail!("catalogue entry '{}' has an empty id", book.title);
    }
    Ok(books)
}
