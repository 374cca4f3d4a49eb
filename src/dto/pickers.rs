use serde::{Deserialize, Serialize};

/// Query parameters of the picker endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PickerQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
}

/// One page of picker options returned as JSON.
#[derive(Debug, Serialize, PartialEq)]
pub struct PickerPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total: usize,
    pub has_more: bool,
}
