use serde::{Deserialize, Serialize};

use crate::domain::client::ClientRef;

/// Console operator account as listed by `/admin`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Wire role name; see [`crate::domain::types::Role`].
    pub role: String,
    pub identification: Option<String>,
    pub client: Option<ClientRef>,
}
