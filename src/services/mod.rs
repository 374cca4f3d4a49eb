//! Orchestration between the console routes, the table engine and the
//! remote API. Nothing here touches HTTP request or response types.

use thiserror::Error;

use crate::domain::types::Role;
use crate::models::auth::Operator;
use crate::query::QueryError;

pub mod pickers;
pub mod raffle_options;
pub mod scope;
pub mod tables;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// The remote API request failed; the message is user-facing.
    #[error("{0}")]
    Fetch(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Fails with [`ServiceError::Unauthorized`] unless the operator holds one of
/// `roles`. Tenant-bound roles must also carry their tenant.
pub(crate) fn ensure_role(operator: &Operator, roles: &[Role]) -> ServiceResult<()> {
    if !roles.contains(&operator.role) {
        return Err(ServiceError::Unauthorized);
    }
    if !operator.is_superadmin() && operator.client.is_none() {
        log::warn!("Operator {} has role {} but no client", operator.email, operator.role);
        return Err(ServiceError::Unauthorized);
    }
    Ok(())
}
