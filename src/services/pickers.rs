//! Searchable pickers served as JSON to the select widgets of the console.

use serde::de::DeserializeOwned;

use crate::api::ListSource;
use crate::domain::admin::Admin;
use crate::domain::client::ClientOption;
use crate::domain::types::Role;
use crate::dto::pickers::{PickerPage, PickerQuery};
use crate::models::auth::Operator;
use crate::query::ScopeFilter;
use crate::services::tables::base_endpoint;
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::table::{SharedTable, TableConfig};

pub const ADMIN_PICKER_PAGE_SIZE: usize = 10;

async fn load_picker<T, S>(
    source: &S,
    config: TableConfig,
    query: &PickerQuery,
    scope: Option<&ScopeFilter>,
) -> ServiceResult<PickerPage<T>>
where
    T: DeserializeOwned + Clone,
    S: ListSource + ?Sized,
{
    let picker = SharedTable::<T>::new(config);
    picker.update(|picker| {
        picker.set_search(query.q.as_deref().unwrap_or_default().trim());
        picker.set_page(query.page.unwrap_or(1));
    });
    picker.reload(source, scope).await;

    let picker = picker.borrow();
    if let Some(message) = picker.error() {
        return Err(ServiceError::Fetch(message.to_string()));
    }

    Ok(PickerPage {
        items: picker.rows().to_vec(),
        page: picker.pagination().page(),
        total: picker.pagination().total(),
        has_more: picker.pagination().has_next(),
    })
}

/// Tenants for the scope selector. The tenant list itself is never scoped.
pub async fn load_client_picker<S>(
    source: &S,
    operator: &Operator,
    query: &PickerQuery,
) -> ServiceResult<PickerPage<ClientOption>>
where
    S: ListSource + ?Sized,
{
    ensure_role(operator, &[Role::SuperAdmin])?;

    let config = TableConfig::picker("/client").exempt_from_scope(true);
    load_picker(source, config, query, None).await
}

/// Operators of the current tenant: the pinned one for tenant
/// administrators, the selected scope for super administrators.
pub async fn load_admin_picker<S>(
    source: &S,
    operator: &Operator,
    query: &PickerQuery,
    scope: Option<&ScopeFilter>,
) -> ServiceResult<PickerPage<Admin>>
where
    S: ListSource + ?Sized,
{
    ensure_role(operator, &[Role::SuperAdmin, Role::Admin])?;

    let endpoint = base_endpoint("/admin", operator, vec![])?;
    let config = TableConfig::picker(endpoint).page_size(ADMIN_PICKER_PAGE_SIZE);
    load_picker(source, config, query, operator.effective_scope(scope)).await
}
