//! Filter forms of the list screens. Each one turns the submitted query
//! parameters into the filter clauses baked into the screen's base endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{CurrencyCode, PaymentStatus, RaffleId, Role};
use crate::forms::{FormError, non_blank};
use crate::query::{FilterClause, FilterOperator};

/// Value of a status select meaning "any status".
pub const ALL_STATUSES: &str = "todos";

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct RaffleFilterForm {
    /// `"true"` for active raffles, `"false"` for closed ones.
    #[serde(default)]
    #[validate(length(max = 5))]
    pub active: Option<String>,
}

impl RaffleFilterForm {
    pub fn filters(&self) -> Result<Vec<FilterClause>, FormError> {
        self.validate()?;

        match non_blank(self.active.as_deref()) {
            None => Ok(vec![]),
            Some("true") => Ok(vec![FilterClause::equals("isActive", true)]),
            Some("false") => Ok(vec![FilterClause::equals("isActive", false)]),
            Some(_) => Err(FormError::InvalidStatus),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct PaymentFilterForm {
    #[serde(default)]
    pub raffle: Option<String>,
    /// Free text matched against the payment method.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub method: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Status label, [`ALL_STATUSES`] or absent (pending payments).
    #[serde(default)]
    pub status: Option<String>,
}

impl PaymentFilterForm {
    /// Selected status; payments awaiting review when nothing was chosen.
    pub fn status(&self) -> Result<Option<PaymentStatus>, FormError> {
        match non_blank(self.status.as_deref()) {
            None => Ok(Some(PaymentStatus::Pending)),
            Some(value) if value.eq_ignore_ascii_case(ALL_STATUSES) => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| FormError::InvalidStatus),
        }
    }

    pub fn raffle_id(&self) -> Result<Option<RaffleId>, FormError> {
        non_blank(self.raffle.as_deref())
            .map(|value| {
                value
                    .parse::<i64>()
                    .ok()
                    .and_then(|id| RaffleId::new(id).ok())
                    .ok_or(FormError::InvalidRaffleId)
            })
            .transpose()
    }

    pub fn filters(&self) -> Result<Vec<FilterClause>, FormError> {
        self.validate()?;

        let mut filters = Vec::new();

        if let Some(raffle_id) = self.raffle_id()? {
            filters.push(FilterClause::equals("raffle.id", raffle_id.get()));
        }
        if let Some(method) = non_blank(self.method.as_deref()) {
            filters.push(FilterClause::new("method", FilterOperator::ContL, method));
        }
        if let Some(currency) = non_blank(self.currency.as_deref()) {
            let currency = CurrencyCode::new(currency).map_err(|_| FormError::InvalidCurrency)?;
            filters.push(FilterClause::equals(
                "raffle.ticketCurrency",
                currency.as_str(),
            ));
        }
        if let Some(status) = self.status()? {
            filters.push(FilterClause::equals("isValidated", status.label()));
        }

        Ok(filters)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct AdminFilterForm {
    #[serde(default)]
    pub role: Option<String>,
}

impl AdminFilterForm {
    pub fn filters(&self) -> Result<Vec<FilterClause>, FormError> {
        self.validate()?;

        match non_blank(self.role.as_deref()) {
            None => Ok(vec![]),
            Some(role) => {
                let role: Role = role.parse().map_err(|_| FormError::InvalidRole)?;
                Ok(vec![FilterClause::equals("role", role.as_str())])
            }
        }
    }
}
