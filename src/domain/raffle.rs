use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientRef;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Raffle {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub ticket_limit: Option<i64>,
    pub min_tickets: Option<i64>,
    /// Decimal string as sent by the API.
    pub ticket_price: Option<String>,
    pub ticket_currency: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub client: Option<ClientRef>,
}

/// Raffle embedded in another row through a join.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RaffleRef {
    pub id: i64,
    pub name: String,
    pub ticket_currency: Option<String>,
    pub ticket_price: Option<String>,
}
