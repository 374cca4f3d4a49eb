//! Combines the filters of a base endpoint, the ambient tenant scope and the
//! search box into one [`QuerySpec`].

use serde::{Deserialize, Serialize};

use crate::query::{
    FilterClause, QueryResult, QuerySpec, SearchCondition, SearchExpr, parse_filter_param,
    split_endpoint,
};

/// Field names searched by exact integer match instead of substring match.
pub const NUMERIC_SEARCH_FIELDS: &[&str] = &["ticketNumber"];

/// Parameters of a base endpoint that the merger rebuilds itself.
const RESERVED_PARAMS: &[&str] = &["filter", "page", "limit", "sort", "s", "join"];

/// Operator-selected tenant restricting every list request that is not
/// explicitly exempt. Owned by the session; tables only read snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    pub field: String,
    pub value: i64,
    /// Display name of the selected tenant.
    #[serde(default)]
    pub label: Option<String>,
}

impl ScopeFilter {
    pub const CLIENT_FIELD: &'static str = "client.id";

    /// Scope on `client.id`.
    pub fn client(client_id: i64, label: Option<String>) -> Self {
        Self {
            field: Self::CLIENT_FIELD.to_string(),
            value: client_id,
            label,
        }
    }

    pub fn to_filter(&self) -> FilterClause {
        FilterClause::equals(self.field.clone(), self.value)
    }
}

/// Whether `field` names (or ends in) one of [`NUMERIC_SEARCH_FIELDS`].
pub fn is_numeric_field(field: &str) -> bool {
    NUMERIC_SEARCH_FIELDS.iter().any(|numeric| {
        field == *numeric
            || field
                .strip_suffix(numeric)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

fn build_search(search_text: &str, searchable_fields: &[String]) -> SearchExpr {
    let number = search_text.parse::<i64>().ok();

    let any_of = searchable_fields
        .iter()
        .filter_map(|field| {
            if is_numeric_field(field) {
                number.map(|value| SearchCondition::Equals {
                    field: field.clone(),
                    value,
                })
            } else {
                Some(SearchCondition::Contains {
                    field: field.clone(),
                    value: search_text.to_string(),
                })
            }
        })
        .collect();

    SearchExpr { any_of }
}

/// Builds the filter/search/join part of a list request.
///
/// Paging and sorting are left unset for the caller. The ambient `scope` is
/// applied unless `exempt_from_scope` is set. When the search text yields at
/// least one field condition, every filter (base endpoint and scope) is
/// dropped for this request; otherwise the request behaves as if nothing was
/// typed.
pub fn merge(
    base_endpoint: &str,
    scope: Option<&ScopeFilter>,
    search_text: &str,
    searchable_fields: &[String],
    exempt_from_scope: bool,
) -> QueryResult<QuerySpec> {
    let (_, base_query) = split_endpoint(base_endpoint);
    let base_params: Vec<(String, String)> = serde_html_form::from_str(base_query)?;

    let mut spec = QuerySpec::new();

    let search_text = search_text.trim();
    if !search_text.is_empty() && !searchable_fields.is_empty() {
        let search = build_search(search_text, searchable_fields);
        if !search.is_empty() {
            spec.search = Some(search);
        }
    }

    if !spec.has_search() {
        if let Some(scope) = scope.filter(|_| !exempt_from_scope) {
            spec.filter.push(scope.to_filter());
        }
        spec.filter.extend(
            base_params
                .iter()
                .filter(|(key, _)| key == "filter")
                .filter_map(|(_, value)| parse_filter_param(value)),
        );
    }

    for field in searchable_fields {
        if let Some((relation, _)) = field.split_once('.') {
            spec = spec.join(relation);
        }
    }

    spec.extra = base_params
        .into_iter()
        .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
        .collect();

    Ok(spec)
}
