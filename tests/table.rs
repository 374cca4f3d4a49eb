use std::collections::HashMap;
use std::time::Duration;

use mockall::mock;
use rifa_admin::api::{ApiError, ListFuture, ListSource};
use rifa_admin::query::ScopeFilter;
use rifa_admin::table::{
    ColumnSpec, Completion, SharedTable, TableConfig, TableStatus, render_table,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
struct Row {
    id: i64,
}

fn body(ids: &[i64], total: usize) -> Value {
    let data: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
    json!({ "data": data, "count": ids.len(), "total": total, "page": 1, "pageCount": 1 })
}

/// Answers known URLs after a fixed delay.
#[derive(Default)]
struct ScriptedSource {
    responses: HashMap<String, (u64, Result<Value, ApiError>)>,
}

impl ScriptedSource {
    fn respond(mut self, url: &str, delay_ms: u64, outcome: Result<Value, ApiError>) -> Self {
        self.responses.insert(url.to_string(), (delay_ms, outcome));
        self
    }
}

impl ListSource for ScriptedSource {
    fn fetch(&self, url: &str) -> ListFuture {
        let (delay_ms, outcome) = self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| panic!("unexpected request {url}"));
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            outcome
        })
    }
}

const PAGE_1: &str = "/raffle?page=1&limit=10&sort=id%2CDESC";
const PAGE_2: &str = "/raffle?page=2&limit=10&sort=id%2CDESC";

#[tokio::test]
async fn newer_request_wins_when_it_resolves_first() {
    let source = ScriptedSource::default()
        .respond(PAGE_1, 60, Ok(body(&[1, 2], 20)))
        .respond(PAGE_2, 5, Ok(body(&[11, 12], 20)));
    let table = SharedTable::<Row>::new(TableConfig::new("/raffle"));

    let (first, second) = tokio::join!(table.reload(&source, None), async {
        table.update(|table| table.set_page(2));
        table.reload(&source, None).await
    });

    assert_eq!(first, Completion::Stale);
    assert_eq!(second, Completion::Applied);

    let table = table.borrow();
    assert_eq!(table.rows(), &[Row { id: 11 }, Row { id: 12 }]);
    assert_eq!(table.pagination().page(), 2);
    assert_eq!(table.status(), &TableStatus::Loaded);
}

#[tokio::test]
async fn in_order_responses_end_on_the_latest() {
    let source = ScriptedSource::default()
        .respond(PAGE_1, 5, Ok(body(&[1, 2], 20)))
        .respond(PAGE_2, 40, Ok(body(&[11, 12], 20)));
    let table = SharedTable::<Row>::new(TableConfig::new("/raffle"));

    let (first, second) = tokio::join!(table.reload(&source, None), async {
        table.update(|table| table.set_page(2));
        table.reload(&source, None).await
    });

    assert_eq!(first, Completion::Stale);
    assert_eq!(second, Completion::Applied);
    assert_eq!(table.borrow().rows(), &[Row { id: 11 }, Row { id: 12 }]);
}

#[tokio::test]
async fn late_failure_of_superseded_request_is_ignored() {
    let source = ScriptedSource::default()
        .respond(
            "/user?page=1&limit=10&sort=id%2CDESC&filter=client.id%7C%7C%24eq%7C%7C7",
            50,
            Err(ApiError::Timeout),
        )
        .respond("/user?page=1&limit=10&sort=id%2CDESC", 5, Ok(body(&[3], 1)));
    let table = SharedTable::<Row>::new(TableConfig::new("/user"));
    let scope = ScopeFilter::client(7, None);

    // The scope is cleared while the scoped request is still in flight.
    let (scoped, unscoped) = tokio::join!(table.reload(&source, Some(&scope)), async {
        table.update(|table| table.scope_changed());
        table.reload(&source, None).await
    });

    assert_eq!(scoped, Completion::Stale);
    assert_eq!(unscoped, Completion::Applied);

    let table = table.borrow();
    assert_eq!(table.error(), None);
    assert_eq!(table.rows(), &[Row { id: 3 }]);
}

#[tokio::test]
async fn rejection_is_rendered_inline() {
    let source = ScriptedSource::default().respond(
        PAGE_1,
        0,
        Err(ApiError::Rejected {
            status: 401,
            message: "Unauthorized".into(),
        }),
    );
    let table = SharedTable::<Row>::new(TableConfig::new("/raffle"));

    assert_eq!(table.reload(&source, None).await, Completion::Failed);

    let view = render_table(&table.borrow(), &[ColumnSpec::new("id", "ID")]);
    assert_eq!(view.status, TableStatus::Failed("Unauthorized".into()));
    assert!(view.is_empty());
}

mock! {
    pub Source {}

    impl ListSource for Source {
        fn fetch(&self, url: &str) -> ListFuture;
    }
}

#[tokio::test]
async fn clamped_page_is_fetched_once_more() {
    let mut source = MockSource::new();
    source
        .expect_fetch()
        .withf(|url: &str| url == "/raffle?page=5&limit=10&sort=id%2CDESC")
        .times(1)
        .returning(|_| Box::pin(async { Ok(body(&[], 25)) }));
    source
        .expect_fetch()
        .withf(|url: &str| url == "/raffle?page=3&limit=10&sort=id%2CDESC")
        .times(1)
        .returning(|_| Box::pin(async { Ok(body(&[21, 22, 23, 24, 25], 25)) }));

    let table = SharedTable::<Row>::new(TableConfig::new("/raffle"));
    table.update(|table| table.set_page(5));

    assert_eq!(table.reload(&source, None).await, Completion::Applied);

    let table = table.borrow();
    assert_eq!(table.pagination().page(), 3);
    assert_eq!(table.pagination().page_count(), 3);
    assert_eq!(table.rows().len(), 5);
}

#[tokio::test]
async fn malformed_body_is_an_empty_page() {
    let mut source = MockSource::new();
    source
        .expect_fetch()
        .times(1)
        .returning(|_| Box::pin(async { Ok(json!({"unexpected": true})) }));

    let table = SharedTable::<Row>::new(TableConfig::new("/raffle"));
    assert_eq!(table.reload(&source, None).await, Completion::Applied);

    let table = table.borrow();
    assert!(table.rows().is_empty());
    assert_eq!(table.pagination().display_page_count(), 1);
    assert_eq!(table.status(), &TableStatus::Loaded);
}
