//! Raffle choices of the tickets screen filter.

use crate::api::ListSource;
use crate::domain::raffle::RaffleRef;
use crate::domain::types::Role;
use crate::models::auth::Operator;
use crate::query::ScopeFilter;
use crate::services::tables::base_endpoint;
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::table::{SharedTable, TableConfig};

pub const RAFFLE_OPTIONS_LIMIT: usize = 1000;

/// Raffles visible to the operator, alphabetically, in a single request.
pub async fn load_raffle_options<S>(
    source: &S,
    operator: &Operator,
    scope: Option<&ScopeFilter>,
) -> ServiceResult<Vec<RaffleRef>>
where
    S: ListSource + ?Sized,
{
    ensure_role(operator, &Role::ALL)?;

    let endpoint = base_endpoint("/raffle", operator, vec![])?;
    let options = SharedTable::<RaffleRef>::new(
        TableConfig::picker(endpoint).page_size(RAFFLE_OPTIONS_LIMIT),
    );
    options
        .reload(source, operator.effective_scope(scope))
        .await;

    let options = options.borrow();
    match options.error() {
        Some(message) => Err(ServiceError::Fetch(message.to_string())),
        None => Ok(options.rows().to_vec()),
    }
}
