use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant organising raffles.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub name: String,
    pub fantasy_name: Option<String>,
    pub domain: Option<String>,
    pub whatsapp: Option<String>,
    #[serde(rename = "logoURL")]
    pub logo_url: Option<String>,
    /// Spelled as the API spells it.
    pub autoadminitrable: bool,
    pub requires_auth: bool,
}

/// Tenant embedded in another row through a join.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientRef {
    pub id: i64,
    pub name: String,
    pub fantasy_name: Option<String>,
    pub domain: Option<String>,
}

/// Entry of the client picker.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientOption {
    pub id: i64,
    pub name: String,
}
