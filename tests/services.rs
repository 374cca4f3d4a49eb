use std::sync::Mutex;

use rifa_admin::api::{ApiError, ListFuture, ListSource};
use rifa_admin::domain::client::ClientRef;
use rifa_admin::domain::types::Role;
use rifa_admin::dto::pickers::PickerQuery;
use rifa_admin::dto::tables::TableQuery;
use rifa_admin::forms::scope::SelectScopeForm;
use rifa_admin::forms::tables::{PaymentFilterForm, RaffleFilterForm};
use rifa_admin::models::auth::Operator;
use rifa_admin::query::ScopeFilter;
use rifa_admin::services::ServiceError;
use rifa_admin::services::pickers::{load_admin_picker, load_client_picker};
use rifa_admin::services::raffle_options::load_raffle_options;
use rifa_admin::services::scope::{clear_scope, select_scope};
use rifa_admin::services::tables::{
    clients_screen, load_table_page, payments_screen, raffles_screen, users_screen,
};
use rifa_admin::table::TableStatus;
use serde_json::{Value, json};

/// Records every requested URL and answers with a fixed outcome.
struct RecordingSource {
    outcome: Result<Value, ApiError>,
    urls: Mutex<Vec<String>>,
}

impl RecordingSource {
    fn ok(body: Value) -> Self {
        Self {
            outcome: Ok(body),
            urls: Mutex::new(Vec::new()),
        }
    }

    fn failing(err: ApiError) -> Self {
        Self {
            outcome: Err(err),
            urls: Mutex::new(Vec::new()),
        }
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl ListSource for RecordingSource {
    fn fetch(&self, url: &str) -> ListFuture {
        self.urls.lock().unwrap().push(url.to_string());
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

fn operator(role: Role, client: Option<i64>) -> Operator {
    Operator {
        sub: "1".into(),
        name: "Ana".into(),
        email: "ana@example.com".into(),
        role,
        client: client.map(|id| ClientRef {
            id,
            name: "Rifas Sur".into(),
            ..ClientRef::default()
        }),
        token: "api-token".into(),
        exp: 0,
    }
}

fn raffles_body() -> Value {
    json!({
        "data": [
            {"id": 9, "name": "Moto", "isActive": true, "ticketPrice": "5", "ticketCurrency": "USD",
             "date": "2024-12-24T18:00:00Z", "client": {"id": 3, "name": "Rifas Sur"}},
            {"id": 8, "name": "Casa", "isActive": false}
        ],
        "count": 2,
        "total": 12,
        "page": 1,
        "pageCount": 2
    })
}

#[actix_web::test]
async fn admin_table_is_pinned_and_ignores_session_scope() {
    let source = RecordingSource::ok(raffles_body());
    let admin = operator(Role::Admin, Some(3));
    let scope = ScopeFilter::client(7, None);

    let screen = raffles_screen(&admin, &RaffleFilterForm::default()).unwrap();
    let page = load_table_page(&source, &admin, screen, &TableQuery::default(), Some(&scope)).await;

    assert_eq!(
        source.urls(),
        vec!["/raffle?page=1&limit=10&sort=id%2CDESC&filter=client.id%7C%7C%24eq%7C%7C3"]
    );
    assert_eq!(page.screen, "rifas");
    assert_eq!(page.table.rows.len(), 2);
    assert_eq!(page.table.rows[0][0], "9");
    assert_eq!(page.table.rows[0][3], "5&#32;USD");
    assert!(page.table.rows[1][5].contains("Cerrada"));
    assert_eq!(page.table.pagination.page_count, 2);
}

#[actix_web::test]
async fn superadmin_table_reads_the_scope_snapshot() {
    let source = RecordingSource::ok(raffles_body());
    let superadmin = operator(Role::SuperAdmin, None);
    let scope = ScopeFilter::client(7, None);

    let screen = raffles_screen(&superadmin, &RaffleFilterForm::default()).unwrap();
    load_table_page(&source, &superadmin, screen, &TableQuery::default(), Some(&scope)).await;

    let screen = raffles_screen(&superadmin, &RaffleFilterForm::default()).unwrap();
    load_table_page(&source, &superadmin, screen, &TableQuery::default(), None).await;

    assert_eq!(
        source.urls(),
        vec![
            "/raffle?page=1&limit=10&sort=id%2CDESC&filter=client.id%7C%7C%24eq%7C%7C7",
            "/raffle?page=1&limit=10&sort=id%2CDESC",
        ]
    );
}

#[actix_web::test]
async fn clients_table_is_exempt_from_scope() {
    let source = RecordingSource::ok(json!({"data": [], "total": 0}));
    let superadmin = operator(Role::SuperAdmin, None);
    let scope = ScopeFilter::client(7, None);

    let screen = clients_screen(&superadmin).unwrap();
    let page = load_table_page(&source, &superadmin, screen, &TableQuery::default(), Some(&scope)).await;

    assert_eq!(source.urls(), vec!["/client?page=1&limit=10&sort=id%2CDESC"]);
    assert!(page.table.is_empty());
    assert_eq!(page.table.pagination.page_count, 1);
}

#[actix_web::test]
async fn ticket_search_sort_and_filters() {
    let source = RecordingSource::ok(json!({"data": [], "total": 40}));
    let superadmin = operator(Role::SuperAdmin, None);
    let form = PaymentFilterForm {
        raffle: Some("4".into()),
        ..PaymentFilterForm::default()
    };
    let query = TableQuery {
        page: Some(3),
        q: Some("42".into()),
        sort: Some("raffle.name".into()),
        dir: Some("desc".into()),
    };

    let screen = payments_screen(&superadmin, &form).unwrap();
    let page = load_table_page(&source, &superadmin, screen, &query, None).await;

    let urls = source.urls();
    assert_eq!(urls.len(), 1);
    let url = &urls[0];
    assert!(url.starts_with("/payment?page=3&limit=10&sort=raffle.name%2CDESC&s="));
    assert!(!url.contains("filter="));
    assert!(url.ends_with("&join=user&join=tickets"));

    let params: Vec<(String, String)> =
        serde_html_form::from_str(url.split_once('?').unwrap().1).unwrap();
    let search: Value = serde_json::from_str(
        &params.iter().find(|(key, _)| key == "s").unwrap().1,
    )
    .unwrap();
    assert_eq!(
        search,
        json!({"$or": [
            {"user.name": {"$contL": "42"}},
            {"user.email": {"$contL": "42"}},
            {"user.phoneNumber": {"$contL": "42"}},
            {"tickets.ticketNumber": {"$eq": 42}}
        ]})
    );
    assert_eq!(page.table.search_text, "42");
    assert_eq!(page.table.pagination.page, 3);
}

#[actix_web::test]
async fn ticket_filters_without_search_reach_the_endpoint() {
    let source = RecordingSource::ok(json!({"data": [], "total": 0}));
    let validator = operator(Role::Client, Some(3));
    let form = PaymentFilterForm {
        currency: Some("USD".into()),
        ..PaymentFilterForm::default()
    };

    let screen = payments_screen(&validator, &form).unwrap();
    load_table_page(&source, &validator, screen, &TableQuery::default(), None).await;

    assert_eq!(
        source.urls(),
        vec![
            "/payment?page=1&limit=10&sort=id%2CDESC\
             &filter=client.id%7C%7C%24eq%7C%7C3\
             &filter=raffle.ticketCurrency%7C%7C%24eq%7C%7CUSD\
             &filter=isValidated%7C%7C%24eq%7C%7CPendiente\
             &join=user&join=tickets"
        ]
    );
}

#[actix_web::test]
async fn fetch_failure_is_carried_in_the_page() {
    let source = RecordingSource::failing(ApiError::Rejected {
        status: 500,
        message: "Error 500: Internal Server Error".into(),
    });
    let admin = operator(Role::Admin, Some(3));

    let screen = users_screen(&admin).unwrap();
    let page = load_table_page(&source, &admin, screen, &TableQuery::default(), None).await;

    assert_eq!(
        page.table.status,
        TableStatus::Failed("Error 500: Internal Server Error".into())
    );
    assert!(page.table.is_empty());
}

#[actix_web::test]
async fn client_picker_pages_alphabetically() {
    let source = RecordingSource::ok(json!({
        "data": [{"id": 31, "name": "Zeta"}],
        "total": 61
    }));
    let superadmin = operator(Role::SuperAdmin, None);
    let query = PickerQuery {
        q: None,
        page: Some(2),
    };

    let page = load_client_picker(&source, &superadmin, &query).await.unwrap();

    assert_eq!(source.urls(), vec!["/client?page=2&limit=30&sort=name%2CASC"]);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Zeta");
    assert_eq!(page.page, 2);
    assert_eq!(page.total, 61);
    assert!(page.has_more);
}

#[actix_web::test]
async fn client_picker_requires_superadmin() {
    let source = RecordingSource::ok(json!({"data": []}));
    let admin = operator(Role::Admin, Some(3));

    let result = load_client_picker(&source, &admin, &PickerQuery::default()).await;

    assert!(matches!(result, Err(ServiceError::Unauthorized)));
    assert!(source.urls().is_empty());
}

#[actix_web::test]
async fn admin_picker_is_pinned_for_tenant_admins() {
    let source = RecordingSource::ok(json!({"data": [{"id": 2, "name": "Luis"}], "total": 1}));
    let admin = operator(Role::Admin, Some(3));

    let page = load_admin_picker(&source, &admin, &PickerQuery::default(), None)
        .await
        .unwrap();

    assert_eq!(
        source.urls(),
        vec!["/admin?page=1&limit=10&sort=name%2CASC&filter=client.id%7C%7C%24eq%7C%7C3"]
    );
    assert!(!page.has_more);
}

#[actix_web::test]
async fn picker_failure_is_an_error() {
    let source = RecordingSource::failing(ApiError::Timeout);
    let superadmin = operator(Role::SuperAdmin, None);

    let result = load_client_picker(&source, &superadmin, &PickerQuery::default()).await;

    assert!(matches!(result, Err(ServiceError::Fetch(message)) if message == "request timed out"));
}

#[actix_web::test]
async fn raffle_options_load_in_one_request() {
    let source = RecordingSource::ok(json!({
        "data": [{"id": 1, "name": "Casa"}, {"id": 2, "name": "Moto"}],
        "total": 2
    }));
    let superadmin = operator(Role::SuperAdmin, None);
    let scope = ScopeFilter::client(7, None);

    let raffles = load_raffle_options(&source, &superadmin, Some(&scope))
        .await
        .unwrap();

    assert_eq!(
        source.urls(),
        vec!["/raffle?page=1&limit=1000&sort=name%2CASC&filter=client.id%7C%7C%24eq%7C%7C7"]
    );
    assert_eq!(raffles.len(), 2);
    assert_eq!(raffles[1].name, "Moto");
}

#[test]
fn only_superadmin_changes_the_scope() {
    let superadmin = operator(Role::SuperAdmin, None);
    let admin = operator(Role::Admin, Some(3));

    let scope = select_scope(
        &superadmin,
        SelectScopeForm {
            client_id: 7,
            client_name: Some("Rifas Sur".into()),
        },
    )
    .unwrap();
    assert_eq!(scope, ScopeFilter::client(7, Some("Rifas Sur".into())));

    let denied = select_scope(
        &admin,
        SelectScopeForm {
            client_id: 7,
            client_name: None,
        },
    );
    assert!(matches!(denied, Err(ServiceError::Unauthorized)));

    assert!(clear_scope(&superadmin).is_ok());
    assert!(matches!(clear_scope(&admin), Err(ServiceError::Unauthorized)));
}

#[test]
fn invalid_scope_form_is_rejected() {
    let superadmin = operator(Role::SuperAdmin, None);

    let result = select_scope(
        &superadmin,
        SelectScopeForm {
            client_id: -1,
            client_name: None,
        },
    );

    assert!(matches!(result, Err(ServiceError::Form(_))));
}
