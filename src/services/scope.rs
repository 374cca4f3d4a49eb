//! Selecting and clearing the ambient tenant scope.

use crate::domain::types::Role;
use crate::forms::scope::SelectScopeForm;
use crate::models::auth::Operator;
use crate::query::ScopeFilter;
use crate::services::{ServiceResult, ensure_role};

/// Validates the selection. Storing it is up to the caller's session.
pub fn select_scope(operator: &Operator, form: SelectScopeForm) -> ServiceResult<ScopeFilter> {
    ensure_role(operator, &[Role::SuperAdmin])?;

    let scope = ScopeFilter::try_from(form).inspect_err(|err| {
        log::error!("Failed to validate scope form: {err}");
    })?;
    log::info!("{} scoped the console to client {}", operator.email, scope.value);

    Ok(scope)
}

pub fn clear_scope(operator: &Operator) -> ServiceResult<()> {
    ensure_role(operator, &[Role::SuperAdmin])?;
    log::info!("{} cleared the console scope", operator.email);
    Ok(())
}
