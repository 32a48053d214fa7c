use serde::{Deserialize, Deserializer, Serialize};

/// A registered account. The hash never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2id PHC string
    pub password_hash: String,
}

/// Fields supplied when inserting a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Catalogue entry referenced by list items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier for the book
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    #[serde(default)]
    pub cover_image_url: String,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub synopsis: String,
}

/// A book on a user's reading list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    pub owner_id: String,
    pub book_id: String,
    /// `-1` means unrated
    pub rating: i8,
    pub notes: String,
    /// Epoch milliseconds
    pub start_date: i64,
    /// Epoch milliseconds, `None` while still reading
    pub finish_date: Option<i64>,
}

impl ListItem {
    pub const UNRATED: i8 = -1;

    /// Build a fresh list item started now.
    pub fn new(id: String, item: NewListItem) -> Self {
        Self {
            id,
            owner_id: item.owner_id,
            book_id: item.book_id,
            rating: Self::UNRATED,
            notes: String::new(),
            start_date: now_millis(),
            finish_date: None,
        }
    }

    /// Apply the fields present in `patch`.
    pub fn apply(&mut self, patch: &ListItemPatch) {
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(finish_date) = patch.finish_date {
            self.finish_date = finish_date;
        }
    }
}

/// Fields supplied when creating a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListItem {
    pub owner_id: String,
    pub book_id: String,
}

/// Partial update of a list item.
///
/// Identity fields (`id`, `ownerId`, `bookId`) are not part of the patch and
/// are silently ignored when present in a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemPatch {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub rating: Option<i8>,
    #[serde(default)]
    pub start_date: Option<i64>,
    /// `Some(None)` clears the finish date, `None` leaves it untouched.
    #[serde(default, deserialize_with = "nullable")]
    pub finish_date: Option<Option<i64>>,
}

// Distinguishes an explicit `null` from an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
