use serde::{Deserialize, Serialize};

use crate::domain::client::ClientRef;

/// Raffle participant.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub identification: Option<String>,
    pub client: Option<ClientRef>,
    pub tickets: Vec<Ticket>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub ticket_number: i64,
}

/// Participant embedded in a payment row.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}
