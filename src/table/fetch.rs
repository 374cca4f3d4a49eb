//! Request lifecycle of one table: builds the list URL from the current
//! inputs, tracks `Idle -> Loading -> Loaded | Failed`, and drops responses
//! that belong to a superseded request.
//!
//! Every call to [`TableController::begin`] bumps a generation counter and
//! stamps the returned [`PendingRequest`] with it. A response is applied only
//! while its generation is still the current one, so the visible rows always
//! come from the most recently issued request whatever order the network
//! answers in.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiResult, ListResponse, ListSource};
use crate::query::{ListRequest, QueryResult, ScopeFilter, merge, split_endpoint};
use crate::table::pagination::{DEFAULT_PAGE_SIZE, PaginationController};
use crate::table::sort::SortController;

pub const PICKER_PAGE_SIZE: usize = 30;

/// Static description of a table: where it reads from and how it searches.
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    /// API path, optionally with screen filters already encoded in its query.
    pub endpoint: String,
    pub page_size: usize,
    pub searchable_fields: Vec<String>,
    /// Ignore the ambient scope (e.g. the tenant list itself).
    pub exempt_from_scope: bool,
    pub default_sort: SortController,
    /// Pickers keep earlier pages and append the next one ("load more").
    pub accumulate: bool,
}

impl TableConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            page_size: DEFAULT_PAGE_SIZE,
            searchable_fields: Vec::new(),
            exempt_from_scope: false,
            default_sort: SortController::primary(),
            accumulate: false,
        }
    }

    /// Searchable picker: alphabetical, 30 per page, appending pages.
    pub fn picker(endpoint: impl Into<String>) -> Self {
        Self {
            page_size: PICKER_PAGE_SIZE,
            searchable_fields: vec!["name".to_string()],
            default_sort: SortController::picker(),
            accumulate: true,
            ..Self::new(endpoint)
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn search_fields(mut self, fields: &[&str]) -> Self {
        self.searchable_fields = fields.iter().map(ToString::to_string).collect();
        self
    }

    pub fn exempt_from_scope(mut self, exempt: bool) -> Self {
        self.exempt_from_scope = exempt;
        self
    }

}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// A request issued by [`TableController::begin`] and not yet completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub generation: u64,
    pub page: usize,
    pub url: String,
}

/// What [`TableController::complete`] did with a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// A newer request was issued in the meantime; nothing changed.
    Stale,
    /// Applied, but the requested page no longer exists and was clamped;
    /// the table needs another request.
    Reclamped,
}

/// Inputs, results and lifecycle state of one table instance.
#[derive(Debug)]
pub struct TableController<T> {
    config: TableConfig,
    pagination: PaginationController,
    sort: SortController,
    search_text: String,
    rows: Vec<T>,
    status: TableStatus,
    generation: u64,
}

impl<T> TableController<T> {
    pub fn new(config: TableConfig) -> Self {
        Self {
            pagination: PaginationController::new(config.page_size),
            sort: config.default_sort.clone(),
            config,
            search_text: String::new(),
            rows: Vec::new(),
            status: TableStatus::Idle,
            generation: 0,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn sort(&self) -> &SortController {
        &self.sort
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn status(&self) -> &TableStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.status == TableStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            TableStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Whether another page exists past the current one.
    pub fn has_more(&self) -> bool {
        if self.config.accumulate {
            self.rows.len() < self.pagination.total()
        } else {
            self.pagination.has_next()
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.search_text {
            self.search_text = text;
            self.pagination.reset();
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.set_page(page);
    }

    pub fn set_sort(&mut self, sort: SortController) {
        if sort != self.sort {
            self.sort = sort;
            self.pagination.reset();
        }
    }

    pub fn click_sort(&mut self, column: &str) {
        self.sort.click(column);
        self.pagination.reset();
    }

    /// The ambient scope was selected or cleared elsewhere.
    pub fn scope_changed(&mut self) {
        self.pagination.reset();
    }

    /// Requests the next page. Returns `false` when there is none or a
    /// request is already in flight.
    pub fn load_more(&mut self) -> bool {
        if self.is_loading() || !self.has_more() {
            return false;
        }
        let next = self.pagination.page() + 1;
        self.pagination.set_page(next);
        true
    }

    /// The list request for the current inputs. `scope` is the snapshot
    /// taken for this request only.
    pub fn request(&self, scope: Option<&ScopeFilter>) -> QueryResult<ListRequest> {
        let (path, _) = split_endpoint(&self.config.endpoint);
        let mut query = merge(
            &self.config.endpoint,
            scope,
            &self.search_text,
            &self.config.searchable_fields,
            self.config.exempt_from_scope,
        )?
        .paginate(self.pagination.page(), self.pagination.page_size());
        query.sort.push(self.sort.to_clause());

        Ok(ListRequest::new(path, query))
    }

    /// Enters `Loading` under a new generation and returns the request to
    /// send.
    pub fn begin(&mut self, scope: Option<&ScopeFilter>) -> QueryResult<PendingRequest> {
        self.generation += 1;

        let url = match self.request(scope).and_then(|request| request.url()) {
            Ok(url) => url,
            Err(err) => {
                log::error!("Failed to build list request for {}: {err}", self.config.endpoint);
                self.status = TableStatus::Failed(err.to_string());
                return Err(err);
            }
        };

        self.status = TableStatus::Loading;
        log::debug!("Table request #{}: {url}", self.generation);

        Ok(PendingRequest {
            generation: self.generation,
            page: self.pagination.page(),
            url,
        })
    }

    /// Whether `pending` is still the latest issued request.
    pub fn is_current(&self, pending: &PendingRequest) -> bool {
        pending.generation == self.generation
    }
}

impl<T: DeserializeOwned> TableController<T> {
    /// Applies the outcome of `pending` unless a newer request exists.
    pub fn complete(&mut self, pending: &PendingRequest, outcome: ApiResult<Value>) -> Completion {
        if !self.is_current(pending) {
            log::debug!(
                "Discarding stale response #{} (current #{})",
                pending.generation,
                self.generation
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(body) => {
                let response = ListResponse::<T>::from_body(body);
                if self.config.accumulate && pending.page > 1 {
                    self.rows.extend(response.data);
                } else {
                    self.rows = response.data;
                }
                self.status = TableStatus::Loaded;

                if self.pagination.set_total(response.total) {
                    Completion::Reclamped
                } else {
                    Completion::Applied
                }
            }
            Err(err) => {
                log::error!("Failed to load {}: {err}", pending.url);
                self.status = TableStatus::Failed(err.to_string());
                // The failed page was never appended; the next `load_more`
                // must ask for it again.
                if self.config.accumulate && pending.page > 1 {
                    self.pagination.set_page(pending.page - 1);
                }
                Completion::Failed
            }
        }
    }
}

/// Sends `pending` through `source`.
pub async fn fetch_page<S: ListSource + ?Sized>(
    source: &S,
    pending: &PendingRequest,
) -> ApiResult<Value> {
    source.fetch(&pending.url).await
}

/// A [`TableController`] shared by the event handlers of one single-threaded
/// view. Several reloads may be in flight; only the latest one lands.
#[derive(Debug)]
pub struct SharedTable<T> {
    inner: Rc<RefCell<TableController<T>>>,
}

impl<T> Clone for SharedTable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: DeserializeOwned> SharedTable<T> {
    pub fn new(config: TableConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TableController::new(config))),
        }
    }

    pub fn borrow(&self) -> Ref<'_, TableController<T>> {
        self.inner.borrow()
    }

    pub fn update(&self, change: impl FnOnce(&mut TableController<T>)) {
        change(&mut self.inner.borrow_mut());
    }

    /// Issues a request for the current inputs and applies its response if
    /// it is still current on arrival. A clamped page is fetched once more.
    pub async fn reload<S: ListSource + ?Sized>(
        &self,
        source: &S,
        scope: Option<&ScopeFilter>,
    ) -> Completion {
        let mut completion = self.reload_once(source, scope).await;
        if completion == Completion::Reclamped {
            completion = self.reload_once(source, scope).await;
        }
        completion
    }

    async fn reload_once<S: ListSource + ?Sized>(
        &self,
        source: &S,
        scope: Option<&ScopeFilter>,
    ) -> Completion {
        let pending = self.inner.borrow_mut().begin(scope);
        let Ok(pending) = pending else {
            return Completion::Failed;
        };

        let outcome = fetch_page(source, &pending).await;
        self.inner.borrow_mut().complete(&pending, outcome)
    }
}
