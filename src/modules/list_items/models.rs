use serde::{Deserialize, Serialize};
use shelf_db::{Book, ListItem};

/// A list item joined with the book it references at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItemWithBook {
    #[serde(flatten)]
    pub item: ListItem,
    /// `None` when the book is no longer in the catalogue
    pub book: Option<Book>,
}

/// Request body for creating a list item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListItem {
    #[serde(default)]
    pub book_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemEnvelope {
    pub list_item: ListItemWithBook,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsEnvelope {
    pub list_items: Vec<ListItemWithBook>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
}
