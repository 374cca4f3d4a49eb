//! Strongly-typed value objects shared by rows, forms and services.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i64` backing this identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ClientId, "Unique identifier for a tenant (raffle organiser).");
id_newtype!(RaffleId, "Unique identifier for a raffle.");

/// Role of a console operator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees every tenant; may pick an ambient tenant scope.
    SuperAdmin,
    /// Manages one tenant.
    Admin,
    /// Validates payments of one tenant.
    Client,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::Admin => "admin",
            Role::Client => "client",
        }
    }

    /// Label shown in the console.
    pub const fn label(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Administrador",
            Role::Admin => "Administrador",
            Role::Client => "Validador",
        }
    }

    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::Admin, Role::Client];
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| TypeConstraintError::InvalidValue(value.to_string()))
    }
}

/// Review state of a ticket payment, sent by the API as a Spanish label.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Aprobado")]
    Approved,
    #[serde(rename = "Rechazado")]
    Rejected,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Approved,
        PaymentStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pendiente",
            PaymentStatus::Approved => "Aprobado",
            PaymentStatus::Rejected => "Rechazado",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| TypeConstraintError::InvalidValue(value.to_string()))
    }
}

/// Currencies a raffle may be priced in: `(code, name)`.
pub const CURRENCIES: &[(&str, &str)] = &[
    ("Bs.", "Bolívares"),
    ("ARS", "Pesos Argentinos"),
    ("COP", "Pesos Colombianos"),
    ("CLP", "Pesos Chilenos"),
    ("USD", "Dólares Estadounidenses"),
    ("EUR", "Euros"),
    ("MXN", "Pesos Mexicanos"),
    ("BRL", "Reales Brasileños"),
    ("PEN", "Soles Peruanos"),
];

/// Currency code from [`CURRENCIES`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new<S: Into<String>>(code: S) -> Result<Self, TypeConstraintError> {
        let code = code.into().trim().to_string();
        if code.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if CURRENCIES.iter().any(|(known, _)| *known == code) {
            Ok(Self(code))
        } else {
            Err(TypeConstraintError::InvalidValue(code))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
