//! Structured description of a list request against a `nestjsx/crud` style
//! endpoint and its wire encoding.
//!
//! A [`QuerySpec`] is assembled by [`merge`] from a screen's base endpoint,
//! the ambient [`ScopeFilter`] and the search box, and turned into a query
//! string by [`encode`].

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

pub mod encode;
pub mod merge;

pub use encode::{encode, parse_filter_param, split_endpoint};
pub use merge::{NUMERIC_SEARCH_FIELDS, ScopeFilter, is_numeric_field, merge};

/// Errors raised while turning a [`QuerySpec`] into a query string or while
/// reading the query part of a base endpoint.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to encode query: {0}")]
    Encode(#[from] serde_html_form::ser::Error),

    #[error("failed to parse endpoint query: {0}")]
    Decode(#[from] serde_html_form::de::Error),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Sort direction understood by the remote list endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Parses `ASC`/`DESC` in any letter case.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `sort=<field>,<direction>` parameter. `field` may be a dotted path
/// into a joined relation, e.g. `client.name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortClause {
    pub field: String,
    pub direction: SortDirection,
}

impl SortClause {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn to_param(&self) -> String {
        format!("{},{}", self.field, self.direction)
    }
}

/// Condition operators of the `nestjsx/crud` filter vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Starts,
    Ends,
    Cont,
    Excl,
    /// Case-insensitive substring match.
    ContL,
    In,
    NotIn,
    IsNull,
    NotNull,
    Between,
    Other(String),
}

impl FilterOperator {
    pub fn as_str(&self) -> &str {
        match self {
            FilterOperator::Eq => "$eq",
            FilterOperator::Ne => "$ne",
            FilterOperator::Gt => "$gt",
            FilterOperator::Lt => "$lt",
            FilterOperator::Gte => "$gte",
            FilterOperator::Lte => "$lte",
            FilterOperator::Starts => "$starts",
            FilterOperator::Ends => "$ends",
            FilterOperator::Cont => "$cont",
            FilterOperator::Excl => "$excl",
            FilterOperator::ContL => "$contL",
            FilterOperator::In => "$in",
            FilterOperator::NotIn => "$notin",
            FilterOperator::IsNull => "$isnull",
            FilterOperator::NotNull => "$notnull",
            FilterOperator::Between => "$between",
            FilterOperator::Other(op) => op,
        }
    }

    /// Maps a wire operator back to the enum. Unknown operators are kept
    /// verbatim as [`FilterOperator::Other`].
    pub fn parse(op: &str) -> Self {
        match op {
            "$eq" => FilterOperator::Eq,
            "$ne" => FilterOperator::Ne,
            "$gt" => FilterOperator::Gt,
            "$lt" => FilterOperator::Lt,
            "$gte" => FilterOperator::Gte,
            "$lte" => FilterOperator::Lte,
            "$starts" => FilterOperator::Starts,
            "$ends" => FilterOperator::Ends,
            "$cont" => FilterOperator::Cont,
            "$excl" => FilterOperator::Excl,
            "$contL" => FilterOperator::ContL,
            "$in" => FilterOperator::In,
            "$notin" => FilterOperator::NotIn,
            "$isnull" => FilterOperator::IsNull,
            "$notnull" => FilterOperator::NotNull,
            "$between" => FilterOperator::Between,
            other => FilterOperator::Other(other.to_string()),
        }
    }
}

impl Display for FilterOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar operand of a filter clause.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Text(text) => f.write_str(text),
            FilterValue::Integer(number) => write!(f, "{number}"),
            FilterValue::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// One `filter=<field>||<operator>||<value>` parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterClause {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterClause {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// The `{field: value}` shorthand: equality.
    pub fn equals(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    pub fn to_param(&self) -> String {
        format!("{}||{}||{}", self.field, self.operator, self.value)
    }
}

/// A single field condition inside the `$or` of a [`SearchExpr`].
#[derive(Clone, Debug, PartialEq)]
pub enum SearchCondition {
    /// Exact match against a numeric field.
    Equals { field: String, value: i64 },
    /// Case-insensitive substring match against a text field.
    Contains { field: String, value: String },
}

impl SearchCondition {
    pub fn field(&self) -> &str {
        match self {
            SearchCondition::Equals { field, .. } | SearchCondition::Contains { field, .. } => {
                field
            }
        }
    }

    fn to_json(&self) -> Value {
        let (field, condition) = match self {
            SearchCondition::Equals { field, value } => (field, json!({ "$eq": value })),
            SearchCondition::Contains { field, value } => (field, json!({ "$contL": value })),
        };
        let mut object = Map::new();
        object.insert(field.clone(), condition);
        Value::Object(object)
    }
}

/// Disjunction of per-field conditions sent as the `s` parameter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchExpr {
    pub any_of: Vec<SearchCondition>,
}

impl SearchExpr {
    pub fn is_empty(&self) -> bool {
        self.any_of.is_empty()
    }

    /// JSON body of the `s` parameter: `{"$or":[{...},{...}]}`.
    pub fn to_json(&self) -> Value {
        let conditions = self.any_of.iter().map(SearchCondition::to_json).collect();
        json!({ "$or": Value::Array(conditions) })
    }
}

/// Structured list request. See [`encode`] for the wire form.
///
/// When `search` is present the `filter` clauses are not sent: search and
/// structured filter are mutually exclusive on one request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySpec {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub sort: Vec<SortClause>,
    pub filter: Vec<FilterClause>,
    pub or: Vec<FilterClause>,
    pub search: Option<SearchExpr>,
    pub fields: Vec<String>,
    pub join: Vec<String>,
    /// Parameters outside the crud vocabulary, carried over verbatim from a
    /// base endpoint.
    pub extra: Vec<(String, String)>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortClause::new(field, direction));
        self
    }

    pub fn filter(mut self, clause: FilterClause) -> Self {
        self.filter.push(clause);
        self
    }

    pub fn search(mut self, search: SearchExpr) -> Self {
        self.search = Some(search);
        self
    }

    pub fn join(mut self, relation: impl Into<String>) -> Self {
        let relation = relation.into();
        if !self.join.contains(&relation) {
            self.join.push(relation);
        }
        self
    }

    /// Whether a non-empty search expression replaces the filter set.
    pub fn has_search(&self) -> bool {
        self.search.as_ref().is_some_and(|search| !search.is_empty())
    }
}

/// A path on the remote API paired with the query to send to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ListRequest {
    pub path: String,
    pub query: QuerySpec,
}

impl ListRequest {
    pub fn new(path: impl Into<String>, query: QuerySpec) -> Self {
        Self {
            path: path.into(),
            query,
        }
    }

    /// `path?query`, or just `path` when nothing needs to be sent.
    pub fn url(&self) -> QueryResult<String> {
        let query = encode(&self.query)?;
        if query.is_empty() {
            Ok(self.path.clone())
        } else {
            Ok(format!("{}?{}", self.path, query))
        }
    }
}
