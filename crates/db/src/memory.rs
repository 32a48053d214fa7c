//! In-memory stores backed by `parking_lot` locks. Used by the default binary
//! and by tests; nothing here survives a restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::models::{Book, ListItem, ListItemPatch, NewListItem, NewUser, User};
use crate::new_id;
use crate::store::{
    BookStore, CredentialStore, ListItemFilter, ListItemStore, StoreError, StoreResult,
};

#[derive(Default)]
struct Credentials {
    by_id: HashMap<String, User>,
    // username -> id
    usernames: HashMap<String, String>,
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Credentials>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read();
        Ok(inner
            .usernames
            .get(username)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().by_id.get(id).cloned())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write();
        if inner.usernames.contains_key(&user.username) {
            return Err(StoreError::Duplicate {
                entity: "user",
                key: user.username,
            });
        }

        let user = User {
            id: new_id(),
            username: user.username,
            password_hash: user.password_hash,
        };
        inner.usernames.insert(user.username.clone(), user.id.clone());
        inner.by_id.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct InMemoryListItemStore {
    // UUIDv7 keys keep iteration in creation order
    items: RwLock<BTreeMap<String, ListItem>>,
}

impl InMemoryListItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ListItemStore for InMemoryListItemStore {
    async fn query(&self, filter: &ListItemFilter) -> StoreResult<Vec<ListItem>> {
        Ok(self
            .items
            .read()
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    async fn create(&self, item: NewListItem) -> StoreResult<ListItem> {
        let mut items = self.items.write();
        let taken = items
            .values()
            .any(|existing| existing.owner_id == item.owner_id && existing.book_id == item.book_id);
        if taken {
            return Err(StoreError::Duplicate {
                entity: "list item",
                key: format!("{}/{}", item.owner_id, item.book_id),
            });
        }

        let item = ListItem::new(new_id(), item);
        items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, patch: &ListItemPatch) -> StoreResult<Option<ListItem>> {
        let mut items = self.items.write();
        Ok(items.get_mut(id).map(|item| {
            item.apply(patch);
            item.clone()
        }))
    }

    async fn remove(&self, id: &str) -> StoreResult<bool> {
        Ok(self.items.write().remove(id).is_some())
    }

    async fn read_by_id(&self, id: &str) -> StoreResult<Option<ListItem>> {
        Ok(self.items.read().get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryBookStore {
    books: RwLock<BTreeMap<String, Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        let store = Self::new();
        for book in books {
            store.insert(book);
        }
        store
    }

    /// Add or replace a catalogue entry.
    pub fn insert(&self, book: Book) {
        self.books.write().insert(book.id.clone(), book);
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn read_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        Ok(self.books.read().get(id).cloned())
    }

    async fn read_many_by_id(&self, ids: &[String]) -> StoreResult<Vec<Book>> {
        let books = self.books.read();
        Ok(ids.iter().filter_map(|id| books.get(id).cloned()).collect())
    }

    async fn query(&self, text: &str) -> StoreResult<Vec<Book>> {
        let needle = text.trim().to_lowercase();
        Ok(self
            .books
            .read()
            .values()
            .filter(|book| {
                needle.is_empty()
                    || book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}
