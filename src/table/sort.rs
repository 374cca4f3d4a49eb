use serde::Serialize;

use crate::query::{SortClause, SortDirection};

/// Active sort column of a table and the click-to-toggle rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortController {
    pub field: String,
    pub direction: SortDirection,
}

impl SortController {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Most recent first: `(id, DESC)`.
    pub fn primary() -> Self {
        Self::new("id", SortDirection::Desc)
    }

    /// Alphabetical: `(name, ASC)`.
    pub fn picker() -> Self {
        Self::new("name", SortDirection::Asc)
    }

    /// State the table would be in after clicking `column`.
    #[must_use]
    pub fn after_click(&self, column: &str) -> Self {
        if self.field == column {
            Self::new(self.field.clone(), self.direction.toggled())
        } else {
            Self::new(column, SortDirection::Asc)
        }
    }

    /// Applies a header click. Always changes the sort, so callers reset the
    /// page afterwards.
    pub fn click(&mut self, column: &str) {
        *self = self.after_click(column);
    }

    pub fn is_sorted_by(&self, column: &str) -> bool {
        self.field == column
    }

    pub fn to_clause(&self) -> SortClause {
        SortClause::new(self.field.clone(), self.direction)
    }
}

impl Default for SortController {
    fn default() -> Self {
        Self::primary()
    }
}
