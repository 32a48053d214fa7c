//! Storage layer: the records shelf persists, the store traits services
//! depend on, and in-memory implementations of those traits.

pub mod memory;
pub mod models;
pub mod store;

pub use memory::{InMemoryBookStore, InMemoryCredentialStore, InMemoryListItemStore};
pub use models::{Book, ListItem, ListItemPatch, NewListItem, NewUser, User};
pub use store::{
    BookStore, CredentialStore, ListItemFilter, ListItemStore, StoreError, StoreResult,
};

/// Generate a fresh record id. UUIDv7 keeps ids roughly creation-ordered.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
