use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::raffle::RaffleRef;
use crate::domain::types::PaymentStatus;
use crate::domain::user::{Ticket, UserRef};

/// Ticket purchase: one payment covering one or more ticket numbers.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    /// Review status label, see [`PaymentStatus`]. Missing means pending.
    pub is_validated: Option<String>,
    pub method: Option<String>,
    pub amount: Option<String>,
    pub raffle: Option<RaffleRef>,
    pub user: Option<UserRef>,
    pub tickets: Vec<Ticket>,
}

impl Payment {
    pub fn status(&self) -> PaymentStatus {
        self.is_validated
            .as_deref()
            .and_then(|label| label.parse().ok())
            .unwrap_or(PaymentStatus::Pending)
    }

    pub fn ticket_numbers(&self) -> Vec<i64> {
        self.tickets.iter().map(|ticket| ticket.ticket_number).collect()
    }
}
