use serde::{Deserialize, Serialize};

use super::Row;

/// Title given to categories created from the editor.
pub const DEFAULT_CATEGORY_TITLE: &str = "New Category";

/// A user-named grouping of related feature rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub rows: Vec<Row>,
}

impl Category {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_TITLE)
    }
}

/// Input for renaming a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTitleInput {
    pub title: String,
}
