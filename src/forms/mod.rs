//! Form definitions backing the console routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod scope;
pub mod tables;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid client id")]
    InvalidClientId,

    #[error("invalid raffle id")]
    InvalidRaffleId,

    #[error("invalid currency")]
    InvalidCurrency,

    #[error("invalid status")]
    InvalidStatus,

    #[error("invalid role")]
    InvalidRole,
}

/// `None` for absent or blank select values.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
