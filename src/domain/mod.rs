//! Rows returned by the raffle API list endpoints.
//!
//! Field names follow the API (camelCase) in both directions so that column
//! keys such as `client.name` or `ticketLimit` address the serialised row.

pub mod admin;
pub mod client;
pub mod payment;
pub mod raffle;
pub mod types;
pub mod user;
