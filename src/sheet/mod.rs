//! The feature tree and its mutation protocol.
//!
//! A [`Sheet`] is an immutable snapshot of the whole document: an ordered
//! list of categories, each holding rows, each holding actors. Every operation
//! takes `&self` and returns the next snapshot, leaving the receiver intact.
//! Categories sit behind `Arc`, so the next snapshot shares every category it
//! did not touch with the previous one.
//!
//! Entities are addressed by position. Deleting index `i` shifts later
//! siblings down by one, so indices must not be cached across mutations.

mod session;

pub use session::*;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::*;

/// Which level of the tree an index addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Category,
    Row,
    Actor,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Category => "category",
            Self::Row => "row",
            Self::Actor => "actor",
        })
    }
}

/// Errors raised by sheet operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("{level} index {index} out of range (len {len})")]
    IndexOutOfRange {
        level: Level,
        index: usize,
        len: usize,
    },
}

pub type Result<T, E = SheetError> = std::result::Result<T, E>;

fn out_of_range(level: Level, index: usize, len: usize) -> SheetError {
    SheetError::IndexOutOfRange { level, index, len }
}

/// Snapshot of the full document: the ordered categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet {
    categories: Vec<Arc<Category>>,
}

impl Sheet {
    /// An empty sheet with no categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sheet a new session starts with: one category, one row, one actor.
    pub fn seeded() -> Self {
        let mut row = Row::new(
            "Create, Edit, Delete",
            "Basic CRUD to manage products in the database.",
        )
        .with_actors(vec![Actor::new("Developer", Role::Dev, Cost::new(100.0))]);
        row.criticality = Criticality::new(5);
        row.status = Status::Mandatory;

        let mut category = Category::new("1. Product Management");
        category.rows.push(row);
        Self::from_categories(vec![category])
    }

    pub fn from_categories(categories: Vec<Category>) -> Self {
        Self {
            categories: categories.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn categories(&self) -> impl ExactSizeIterator<Item = &Category> {
        self.categories.iter().map(|c| &**c)
    }

    pub fn category(&self, cat: usize) -> Option<&Category> {
        self.categories.get(cat).map(|c| &**c)
    }

    pub fn row(&self, cat: usize, row: usize) -> Option<&Row> {
        self.category(cat).and_then(|c| c.rows.get(row))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Whether two snapshots hold the very same allocation for a category.
    pub fn shares_category_with(&self, other: &Sheet, cat: usize) -> bool {
        match (self.categories.get(cat), other.categories.get(cat)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    // ============================================================
    // Category operations
    // ============================================================

    pub fn add_category(&self) -> Sheet {
        let mut next = self.clone();
        next.categories.push(Arc::new(Category::default()));
        tracing::debug!(len = next.len(), "added category");
        next
    }

    pub fn delete_category(&self, cat: usize) -> Result<Sheet> {
        if cat >= self.categories.len() {
            return Err(out_of_range(Level::Category, cat, self.categories.len()));
        }
        let mut next = self.clone();
        next.categories.remove(cat);
        tracing::debug!(cat, "deleted category");
        Ok(next)
    }

    pub fn update_category_title(&self, cat: usize, title: impl Into<String>) -> Result<Sheet> {
        let title = title.into();
        self.with_category(cat, |category| {
            category.title = title;
            Ok(())
        })
    }

    // ============================================================
    // Row operations
    // ============================================================

    pub fn add_row(&self, cat: usize) -> Result<Sheet> {
        self.with_category(cat, |category| {
            category.rows.push(Row::default());
            tracing::debug!(cat, rows = category.rows.len(), "added row");
            Ok(())
        })
    }

    pub fn delete_row(&self, cat: usize, row: usize) -> Result<Sheet> {
        self.with_category(cat, |category| {
            if row >= category.rows.len() {
                return Err(out_of_range(Level::Row, row, category.rows.len()));
            }
            category.rows.remove(row);
            tracing::debug!(cat, row, "deleted row");
            Ok(())
        })
    }

    /// Set one scalar field on a row. Actors and total are left alone.
    pub fn update_row_field(&self, cat: usize, row: usize, field: RowField) -> Result<Sheet> {
        self.with_row(cat, row, |target| {
            field.apply(target);
            Ok(())
        })
    }

    // ============================================================
    // Actor operations
    // ============================================================

    pub fn add_actor(&self, cat: usize, row: usize) -> Result<Sheet> {
        self.with_row(cat, row, |target| {
            target.actors_mut().push(Actor::default());
            target.recalc_total();
            Ok(())
        })
    }

    /// Set one field on an actor, then refresh the row total.
    pub fn update_actor_field(
        &self,
        cat: usize,
        row: usize,
        actor: usize,
        field: ActorField,
    ) -> Result<Sheet> {
        self.with_row(cat, row, |target| {
            let actors = target.actors_mut();
            let len = actors.len();
            let entry = actors
                .get_mut(actor)
                .ok_or_else(|| out_of_range(Level::Actor, actor, len))?;
            field.apply(entry);
            target.recalc_total();
            Ok(())
        })
    }

    /// Remove an actor, then refresh the row total.
    pub fn delete_actor(&self, cat: usize, row: usize, actor: usize) -> Result<Sheet> {
        self.with_row(cat, row, |target| {
            let actors = target.actors_mut();
            if actor >= actors.len() {
                return Err(out_of_range(Level::Actor, actor, actors.len()));
            }
            actors.remove(actor);
            target.recalc_total();
            Ok(())
        })
    }

    /// Recompute a row's total from its actors.
    pub fn recalc_total(&self, cat: usize, row: usize) -> Result<Sheet> {
        self.with_row(cat, row, |target| {
            target.recalc_total();
            Ok(())
        })
    }

    // ============================================================
    // Path copying
    // ============================================================

    /// Copy the path down to one category and edit it there.
    ///
    /// The returned snapshot owns a fresh copy of that category; every other
    /// category stays shared with `self`.
    fn with_category<F>(&self, cat: usize, edit: F) -> Result<Sheet>
    where
        F: FnOnce(&mut Category) -> Result<()>,
    {
        let len = self.categories.len();
        if cat >= len {
            return Err(out_of_range(Level::Category, cat, len));
        }
        let mut next = self.clone();
        edit(Arc::make_mut(&mut next.categories[cat]))?;
        Ok(next)
    }

    fn with_row<F>(&self, cat: usize, row: usize, edit: F) -> Result<Sheet>
    where
        F: FnOnce(&mut Row) -> Result<()>,
    {
        self.with_category(cat, |category| {
            let len = category.rows.len();
            let target = category
                .rows
                .get_mut(row)
                .ok_or_else(|| out_of_range(Level::Row, row, len))?;
            edit(target)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_categories_are_shared() {
        let sheet = Sheet::seeded().add_category();
        let next = sheet.add_row(1).unwrap();

        assert!(next.shares_category_with(&sheet, 0));
        assert!(!next.shares_category_with(&sheet, 1));
    }

    #[test]
    fn previous_snapshot_is_unchanged() {
        let sheet = Sheet::seeded();
        let next = sheet.update_category_title(0, "Renamed").unwrap();

        assert_eq!(sheet.category(0).unwrap().title, "1. Product Management");
        assert_eq!(next.category(0).unwrap().title, "Renamed");
    }

    #[test]
    fn errors_name_the_level() {
        let err = Sheet::seeded().delete_actor(0, 0, 4).unwrap_err();
        assert_eq!(err.to_string(), "actor index 4 out of range (len 1)");
    }
}
