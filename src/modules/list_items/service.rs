//! Ownership-scoped list item operations.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tokio::sync::Mutex;

use shelf_auth::CurrentUser;
use shelf_db::{
    BookStore, ListItem, ListItemFilter, ListItemPatch, ListItemStore, NewListItem, StoreError,
};
use shelf_http::AppError;

use super::models::{DeleteOutcome, ListItemWithBook};

const CREATE_LOCK_STRIPES: usize = 64;

pub struct ListItemService {
    items: Arc<dyn ListItemStore>,
    books: Arc<dyn BookStore>,
    // check-then-insert on the same (owner, book) pair runs under one stripe
    create_locks: Vec<Mutex<()>>,
}

impl ListItemService {
    pub fn new(items: Arc<dyn ListItemStore>, books: Arc<dyn BookStore>) -> Self {
        Self {
            items,
            books,
            create_locks: (0..CREATE_LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    pub async fn get_list_item(
        &self,
        user: &CurrentUser,
        id: &str,
    ) -> Result<ListItemWithBook, AppError> {
        let item = self.owned_item(user, id).await?;
        self.compose(item).await
    }

    /// Every list item the user owns, each joined with its book.
    pub async fn list_list_items(
        &self,
        user: &CurrentUser,
    ) -> Result<Vec<ListItemWithBook>, AppError> {
        let items = self
            .items
            .query(&ListItemFilter::owner(&user.id))
            .await
            .map_err(store_failure)?;

        let book_ids: Vec<String> = items.iter().map(|item| item.book_id.clone()).collect();
        let mut books: HashMap<String, _> = self
            .books
            .read_many_by_id(&book_ids)
            .await
            .map_err(store_failure)?
            .into_iter()
            .map(|book| (book.id.clone(), book))
            .collect();

        // (owner, book) is unique, so each book is taken at most once
        Ok(items
            .into_iter()
            .map(|item| {
                let book = books.remove(&item.book_id);
                if book.is_none() {
                    tracing::warn!(list_item_id = %item.id, book_id = %item.book_id, "list item references a missing book");
                }
                ListItemWithBook { item, book }
            })
            .collect())
    }

    pub async fn create_list_item(
        &self,
        user: &CurrentUser,
        book_id: Option<&str>,
    ) -> Result<ListItemWithBook, AppError> {
        let book_id = book_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::validation("No bookId provided"))?;

        let created = {
            let _guard = self.create_lock(&user.id, book_id).lock().await;

            let existing = self
                .items
                .query(&ListItemFilter::owner_and_book(&user.id, book_id))
                .await
                .map_err(store_failure)?;
            if !existing.is_empty() {
                return Err(duplicate_item(&user.id, book_id));
            }

            self.items
                .create(NewListItem {
                    owner_id: user.id.clone(),
                    book_id: book_id.to_string(),
                })
                .await
                .map_err(|err| match err {
                    StoreError::Duplicate { .. } => duplicate_item(&user.id, book_id),
                    other => store_failure(other),
                })?
        };

        tracing::info!(list_item_id = %created.id, user_id = %user.id, book_id, "list item created");
        self.compose(created).await
    }

    pub async fn update_list_item(
        &self,
        user: &CurrentUser,
        id: &str,
        patch: &ListItemPatch,
    ) -> Result<ListItemWithBook, AppError> {
        self.owned_item(user, id).await?;

        let updated = self
            .items
            .update(id, patch)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| missing_item(id))?;

        self.compose(updated).await
    }

    pub async fn delete_list_item(
        &self,
        user: &CurrentUser,
        id: &str,
    ) -> Result<DeleteOutcome, AppError> {
        self.owned_item(user, id).await?;

        let removed = self.items.remove(id).await.map_err(store_failure)?;
        if removed {
            tracing::info!(list_item_id = %id, user_id = %user.id, "list item deleted");
        }

        Ok(DeleteOutcome { success: true })
    }

    /// Load a list item, rejecting missing items and items owned by someone else.
    async fn owned_item(&self, user: &CurrentUser, id: &str) -> Result<ListItem, AppError> {
        let item = self
            .items
            .read_by_id(id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| missing_item(id))?;

        if item.owner_id != user.id {
            return Err(AppError::forbidden(format!(
                "User with id {} is not authorized to access the list item {}",
                user.id, id
            )));
        }

        Ok(item)
    }

    async fn compose(&self, item: ListItem) -> Result<ListItemWithBook, AppError> {
        let book = self
            .books
            .read_by_id(&item.book_id)
            .await
            .map_err(store_failure)?;

        if book.is_none() {
            tracing::warn!(list_item_id = %item.id, book_id = %item.book_id, "list item references a missing book");
        }

        Ok(ListItemWithBook { item, book })
    }

    fn create_lock(&self, owner_id: &str, book_id: &str) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        (owner_id, book_id).hash(&mut hasher);
        &self.create_locks[(hasher.finish() as usize) % self.create_locks.len()]
    }
}

fn missing_item(id: &str) -> AppError {
    AppError::not_found(format!("No list item was found with the id of {id}"))
}

fn duplicate_item(owner_id: &str, book_id: &str) -> AppError {
    AppError::conflict(format!(
        "User {owner_id} already has a list item for the book with the ID {book_id}"
    ))
}

fn store_failure(err: StoreError) -> AppError {
    AppError::internal(err)
}
