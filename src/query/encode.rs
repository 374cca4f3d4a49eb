//! Wire encoding of [`QuerySpec`] for `nestjsx/crud` list endpoints.

use crate::query::{FilterClause, FilterOperator, FilterValue, QueryResult, QuerySpec};

/// Encodes `spec` as an `application/x-www-form-urlencoded` query string.
///
/// Parameter order is fixed: `page`, `limit`, `sort`*, `filter`*, `or`*, `s`,
/// `fields`, `join`*, then passthrough parameters. `filter` is left out
/// whenever a non-empty search expression is present.
pub fn encode(spec: &QuerySpec) -> QueryResult<String> {
    let mut params: Vec<(&str, String)> = Vec::new();

    if let Some(page) = spec.page {
        params.push(("page", page.to_string()));
    }
    if let Some(limit) = spec.limit {
        params.push(("limit", limit.to_string()));
    }

    params.extend(spec.sort.iter().map(|sort| ("sort", sort.to_param())));

    let search = spec.search.as_ref().filter(|search| !search.is_empty());

    if search.is_none() {
        params.extend(spec.filter.iter().map(|f| ("filter", f.to_param())));
    }

    params.extend(spec.or.iter().map(|f| ("or", f.to_param())));

    if let Some(search) = search {
        params.push(("s", search.to_json().to_string()));
    }

    if !spec.fields.is_empty() {
        params.push(("fields", spec.fields.join(",")));
    }

    params.extend(spec.join.iter().map(|join| ("join", join.clone())));

    params.extend(
        spec.extra
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone())),
    );

    Ok(serde_html_form::to_string(&params)?)
}

/// Splits `"/raffle?filter=..."` into `("/raffle", "filter=...")`.
pub fn split_endpoint(endpoint: &str) -> (&str, &str) {
    endpoint.split_once('?').unwrap_or((endpoint, ""))
}

/// Reads a decoded `field||operator||value` parameter. The value keeps any
/// further `||` separators verbatim.
pub fn parse_filter_param(param: &str) -> Option<FilterClause> {
    let mut parts = param.splitn(3, "||");
    let field = parts.next().filter(|field| !field.is_empty())?;
    let operator = parts.next().filter(|op| !op.is_empty())?;
    let value = parts.next().unwrap_or_default();

    Some(FilterClause::new(
        field,
        FilterOperator::parse(operator),
        FilterValue::Text(value.to_string()),
    ))
}
