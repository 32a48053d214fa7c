//! Store traits consumed by the services. Implementations own their
//! synchronization; every method may be called concurrently.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Book, ListItem, ListItemPatch, NewListItem, NewUser, User};

/// Failures surfaced by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate {entity}: {key}")]
    Duplicate { entity: &'static str, key: String },

    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    /// Insert a user, failing with [`StoreError::Duplicate`] on a taken username.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
}

/// Field filter for [`ListItemStore::query`]. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItemFilter {
    pub owner_id: Option<String>,
    pub book_id: Option<String>,
}

impl ListItemFilter {
    pub fn owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            book_id: None,
        }
    }

    pub fn owner_and_book(owner_id: impl Into<String>, book_id: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            book_id: Some(book_id.into()),
        }
    }

    pub fn matches(&self, item: &ListItem) -> bool {
        self.owner_id.as_deref().map_or(true, |id| id == item.owner_id)
            && self.book_id.as_deref().map_or(true, |id| id == item.book_id)
    }
}

#[async_trait]
pub trait ListItemStore: Send + Sync {
    async fn query(&self, filter: &ListItemFilter) -> StoreResult<Vec<ListItem>>;

    /// Create a list item, failing with [`StoreError::Duplicate`] when the
    /// `(owner, book)` pair already exists.
    async fn create(&self, item: NewListItem) -> StoreResult<ListItem>;

    /// Apply a patch; `Ok(None)` if the item does not exist.
    async fn update(&self, id: &str, patch: &ListItemPatch) -> StoreResult<Option<ListItem>>;

    /// Remove an item; `Ok(false)` if it did not exist.
    async fn remove(&self, id: &str) -> StoreResult<bool>;

    async fn read_by_id(&self, id: &str) -> StoreResult<Option<ListItem>>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn read_by_id(&self, id: &str) -> StoreResult<Option<Book>>;

    /// Read several books at once; unknown ids are skipped.
    async fn read_many_by_id(&self, ids: &[String]) -> StoreResult<Vec<Book>>;

    /// Case-insensitive match on title or author. An empty query returns everything.
    async fn query(&self, text: &str) -> StoreResult<Vec<Book>>;
}
