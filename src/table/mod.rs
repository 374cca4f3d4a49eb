//! Paginated, sortable, searchable tables backed by a remote list endpoint.

pub mod fetch;
pub mod pagination;
pub mod render;
pub mod sort;

pub use fetch::{
    Completion, PICKER_PAGE_SIZE, PendingRequest, SharedTable, TableConfig, TableController,
    TableStatus, fetch_page,
};
pub use pagination::{DEFAULT_PAGE_SIZE, PaginationController, PaginationView};
pub use render::{ColumnSpec, HeaderView, TableView, render_cell, render_header, render_table};
pub use sort::SortController;
