use serde::{Deserialize, Serialize};

use crate::table::TableView;

/// Table state carried in the query string of a list screen.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub page: Option<usize>,
    /// Search box text.
    pub q: Option<String>,
    /// Sort column key; ignored unless it names a sortable column.
    pub sort: Option<String>,
    /// `ASC` or `DESC`.
    pub dir: Option<String>,
}

/// Data required to render `tables/index.html`.
#[derive(Debug, Serialize)]
pub struct TablePageData {
    /// Route segment of the screen, e.g. `rifas`.
    pub screen: &'static str,
    pub title: &'static str,
    pub table: TableView,
}
