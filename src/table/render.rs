//! Column specifications and the cell/header view model handed to templates.

use std::fmt::{Debug, Formatter};

use serde::Serialize;
use serde_json::Value;

use crate::query::SortDirection;
use crate::table::fetch::{TableController, TableStatus};
use crate::table::pagination::PaginationView;
use crate::table::sort::SortController;

/// Shown for missing or `null` values.
pub const PLACEHOLDER: &str = "-";

/// Produces the HTML of one cell from the raw field value and its row.
pub type CellRenderer<T> = Box<dyn Fn(&Value, &T) -> String>;

/// One table column. `key` addresses the row field (dotted keys reach into
/// nested objects) and is the sort field when the column is sortable.
pub struct ColumnSpec<T> {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    render: Option<CellRenderer<T>>,
}

impl<T> ColumnSpec<T> {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            render: None,
        }
    }

    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    #[must_use]
    pub fn render(mut self, render: impl Fn(&Value, &T) -> String + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }
}

impl<T> Debug for ColumnSpec<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// Looks `key` up in a serialised row: the literal key first, then the
/// dotted path through nested objects.
pub fn field_value<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(value) = row.get(key) {
        return Some(value);
    }
    key.split('.')
        .try_fold(row, |value, segment| value.get(segment))
}

/// Plain-text form of a scalar; `None` for `null`.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn cell_html<T>(column: &ColumnSpec<T>, row: &T, row_json: &Value) -> String {
    let value = field_value(row_json, &column.key).unwrap_or(&Value::Null);

    match &column.render {
        Some(render) => render(value, row),
        None => display_value(value)
            .map(|text| ammonia::clean_text(&text))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

/// HTML of one cell. Raw values are escaped; custom renderers are trusted
/// to escape what they embed.
pub fn render_cell<T: Serialize>(column: &ColumnSpec<T>, row: &T) -> String {
    let row_json = serde_json::to_value(row).unwrap_or(Value::Null);
    cell_html(column, row, &row_json)
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// `"↑"`/`"↓"` on the active sort column.
    pub indicator: Option<&'static str>,
    /// Sort state after clicking this header, for sortable columns.
    pub next_sort: Option<SortController>,
}

pub fn render_header<T>(column: &ColumnSpec<T>, sort: &SortController) -> HeaderView {
    let indicator = (column.sortable && sort.is_sorted_by(&column.key)).then(|| {
        match sort.direction {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    });

    HeaderView {
        key: column.key.clone(),
        label: column.label.clone(),
        sortable: column.sortable,
        indicator,
        next_sort: column.sortable.then(|| sort.after_click(&column.key)),
    }
}

/// Everything a template needs to draw a table.
#[derive(Clone, Debug, Serialize)]
pub struct TableView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<Vec<String>>,
    pub status: TableStatus,
    pub search_text: String,
    pub sort: SortController,
    pub pagination: PaginationView,
    pub has_more: bool,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn render_table<T: Serialize>(
    table: &TableController<T>,
    columns: &[ColumnSpec<T>],
) -> TableView {
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let row_json = serde_json::to_value(row).unwrap_or(Value::Null);
            columns
                .iter()
                .map(|column| cell_html(column, row, &row_json))
                .collect()
        })
        .collect();

    TableView {
        headers: columns
            .iter()
            .map(|column| render_header(column, table.sort()))
            .collect(),
        rows,
        status: table.status().clone(),
        search_text: table.search_text().to_string(),
        sort: table.sort().clone(),
        pagination: table.pagination().view(),
        has_more: table.has_more(),
    }
}
