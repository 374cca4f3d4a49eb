//! The five list screens of the console: endpoint, search fields, columns
//! and who may open them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ListSource;
use crate::domain::admin::Admin;
use crate::domain::client::Client;
use crate::domain::payment::Payment;
use crate::domain::raffle::Raffle;
use crate::domain::types::{PaymentStatus, Role};
use crate::domain::user::User;
use crate::dto::tables::{TablePageData, TableQuery};
use crate::forms::tables::{AdminFilterForm, PaymentFilterForm, RaffleFilterForm};
use crate::models::auth::Operator;
use crate::query::{FilterClause, ListRequest, QuerySpec, ScopeFilter, SortDirection};
use crate::services::{ServiceResult, ensure_role};
use crate::table::render::PLACEHOLDER;
use crate::table::{ColumnSpec, SharedTable, SortController, TableConfig, render_table};

const RAFFLE_NAME_WIDTH: usize = 25;

/// A list screen: the table it drives and how its rows are drawn.
#[derive(Debug)]
pub struct ScreenDefinition<T> {
    /// Route segment, e.g. `rifas`.
    pub name: &'static str,
    pub title: &'static str,
    pub config: TableConfig,
    pub columns: Vec<ColumnSpec<T>>,
}

/// `path` with the operator's own client and the screen filters encoded into
/// its query. Super administrators are never pinned.
pub fn base_endpoint(
    path: &str,
    operator: &Operator,
    filters: Vec<FilterClause>,
) -> ServiceResult<String> {
    let mut spec = QuerySpec::new();
    if let Some(client_id) = operator.pinned_client() {
        spec = spec.filter(ScopeFilter::client(client_id, None).to_filter());
    }
    for clause in filters {
        spec = spec.filter(clause);
    }

    Ok(ListRequest::new(path, spec).url()?)
}

fn text(value: &str) -> String {
    ammonia::clean_text(value)
}

fn badge(tone: &str, label: &str) -> String {
    format!("<span class=\"badge text-bg-{tone}\">{}</span>", text(label))
}

fn yes_no(value: &Value) -> String {
    if value.as_bool() == Some(true) {
        badge("success", "Sí")
    } else {
        badge("secondary", "No")
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Payment method without the account details in parentheses.
fn method_name(method: &str) -> &str {
    method.split('(').next().unwrap_or(method).trim()
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let head: String = value.chars().take(width).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

fn ticket_numbers(payment: &Payment) -> String {
    let numbers = payment.ticket_numbers();
    if numbers.is_empty() {
        return PLACEHOLDER.to_string();
    }
    numbers
        .iter()
        .map(|number| format!("{number:05}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_badge(status: PaymentStatus) -> String {
    let tone = match status {
        PaymentStatus::Pending => "warning",
        PaymentStatus::Approved => "success",
        PaymentStatus::Rejected => "danger",
    };
    badge(tone, status.label())
}

fn client_column<T>(operator: &Operator) -> Option<ColumnSpec<T>> {
    operator
        .is_superadmin()
        .then(|| ColumnSpec::new("client.name", "Cliente"))
}

pub fn raffles_screen(
    operator: &Operator,
    form: &RaffleFilterForm,
) -> ServiceResult<ScreenDefinition<Raffle>> {
    ensure_role(operator, &[Role::SuperAdmin, Role::Admin])?;

    let endpoint = base_endpoint("/raffle", operator, form.filters()?)?;

    let mut columns = vec![ColumnSpec::new("id", "ID"), ColumnSpec::new("name", "Nombre")];
    columns.extend(client_column(operator));
    columns.extend([
        ColumnSpec::new("ticketLimit", "Tickets"),
        ColumnSpec::new("ticketPrice", "Precio").render(|_, raffle: &Raffle| {
            match (&raffle.ticket_price, &raffle.ticket_currency) {
                (Some(price), Some(currency)) => text(&format!("{price} {currency}")),
                (Some(price), None) => text(price),
                _ => PLACEHOLDER.to_string(),
            }
        }),
        ColumnSpec::new("date", "Fecha").render(|_, raffle: &Raffle| format_date(raffle.date)),
        ColumnSpec::new("isActive", "Estado").render(|value, _: &Raffle| {
            if value.as_bool() == Some(true) {
                badge("success", "Activa")
            } else {
                badge("secondary", "Cerrada")
            }
        }),
    ]);

    Ok(ScreenDefinition {
        name: "rifas",
        title: "Rifas",
        config: TableConfig::new(endpoint).search_fields(&["name"]),
        columns,
    })
}

pub fn payments_screen(
    operator: &Operator,
    form: &PaymentFilterForm,
) -> ServiceResult<ScreenDefinition<Payment>> {
    ensure_role(operator, &Role::ALL)?;

    let endpoint = base_endpoint("/payment", operator, form.filters()?)?;

    let columns = vec![
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("isValidated", "Estado")
            .render(|_, payment: &Payment| status_badge(payment.status())),
        ColumnSpec::new("method", "Método").render(|_, payment: &Payment| {
            payment
                .method
                .as_deref()
                .map(|method| text(method_name(method)))
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        }),
        ColumnSpec::new("raffle.name", "Rifa").render(|_, payment: &Payment| {
            payment
                .raffle
                .as_ref()
                .map(|raffle| text(&truncate(&raffle.name, RAFFLE_NAME_WIDTH)))
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        }),
        ColumnSpec::new("user.name", "Usuario"),
        ColumnSpec::new("tickets", "Tickets")
            .unsortable()
            .render(|_, payment: &Payment| ticket_numbers(payment)),
    ];

    Ok(ScreenDefinition {
        name: "tickets",
        title: "Tickets",
        config: TableConfig::new(endpoint).search_fields(&[
            "user.name",
            "user.email",
            "user.phoneNumber",
            "tickets.ticketNumber",
        ]),
        columns,
    })
}

pub fn users_screen(operator: &Operator) -> ServiceResult<ScreenDefinition<User>> {
    ensure_role(operator, &Role::ALL)?;

    let endpoint = base_endpoint("/user", operator, vec![])?;

    let mut columns = vec![
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("name", "Nombre"),
        ColumnSpec::new("email", "Correo"),
        ColumnSpec::new("phoneNumber", "Teléfono"),
    ];
    columns.extend(client_column(operator));
    columns.push(
        ColumnSpec::new("tickets", "Tickets")
            .unsortable()
            .render(|_, user: &User| user.tickets.len().to_string()),
    );

    Ok(ScreenDefinition {
        name: "usuarios",
        title: "Usuarios",
        config: TableConfig::new(endpoint).search_fields(&["name", "email", "phoneNumber"]),
        columns,
    })
}

pub fn admins_screen(
    operator: &Operator,
    form: &AdminFilterForm,
) -> ServiceResult<ScreenDefinition<Admin>> {
    ensure_role(operator, &[Role::SuperAdmin, Role::Admin])?;

    let endpoint = base_endpoint("/admin", operator, form.filters()?)?;

    let mut columns = vec![
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("name", "Nombre"),
        ColumnSpec::new("email", "Correo"),
        ColumnSpec::new("role", "Rol").render(|value, _: &Admin| {
            let role = value.as_str().unwrap_or_default();
            match role.parse::<Role>() {
                Ok(role) => text(role.label()),
                Err(_) if role.is_empty() => PLACEHOLDER.to_string(),
                Err(_) => text(role),
            }
        }),
        ColumnSpec::new("identification", "Identificación"),
    ];
    columns.extend(client_column(operator));

    Ok(ScreenDefinition {
        name: "administradores",
        title: "Administradores",
        config: TableConfig::new(endpoint).search_fields(&["name", "email", "identification"]),
        columns,
    })
}

pub fn clients_screen(operator: &Operator) -> ServiceResult<ScreenDefinition<Client>> {
    ensure_role(operator, &[Role::SuperAdmin])?;

    let columns = vec![
        ColumnSpec::new("id", "ID"),
        ColumnSpec::new("logoURL", "Logo")
            .unsortable()
            .render(|value, _: &Client| match value.as_str() {
                Some(url) if !url.is_empty() => format!(
                    "<img src=\"{}\" alt=\"\" class=\"img-thumbnail\" width=\"40\">",
                    text(url)
                ),
                _ => PLACEHOLDER.to_string(),
            }),
        ColumnSpec::new("name", "Nombre"),
        ColumnSpec::new("domain", "Dominio"),
        ColumnSpec::new("autoadminitrable", "Autoadministrable")
            .render(|value, _: &Client| yes_no(value)),
        ColumnSpec::new("requiresAuth", "Requiere registro")
            .render(|value, _: &Client| yes_no(value)),
    ];

    Ok(ScreenDefinition {
        name: "clientes",
        title: "Clientes",
        config: TableConfig::new("/client")
            .search_fields(&["name", "fantasyName", "domain", "whatsapp"])
            .exempt_from_scope(true),
        columns,
    })
}

/// Requested sort, if it names a sortable column of the screen.
fn requested_sort<T>(columns: &[ColumnSpec<T>], query: &TableQuery) -> Option<SortController> {
    let field = query.sort.as_deref()?;
    if !columns
        .iter()
        .any(|column| column.sortable && column.key == field)
    {
        return None;
    }

    let direction = query
        .dir
        .as_deref()
        .and_then(SortDirection::parse)
        .unwrap_or_default();
    Some(SortController::new(field, direction))
}

/// Fetches one page of `screen` for the inputs in `query`.
///
/// Fetch failures do not fail the call: they are carried in the table status
/// and rendered in place of the rows.
pub async fn load_table_page<T, S>(
    source: &S,
    operator: &Operator,
    screen: ScreenDefinition<T>,
    query: &TableQuery,
    scope: Option<&ScopeFilter>,
) -> TablePageData
where
    T: DeserializeOwned + Serialize,
    S: ListSource + ?Sized,
{
    let ScreenDefinition {
        name,
        title,
        config,
        columns,
    } = screen;

    let table = SharedTable::<T>::new(config);
    table.update(|table| {
        if let Some(sort) = requested_sort(&columns, query) {
            table.set_sort(sort);
        }
        table.set_search(query.q.as_deref().unwrap_or_default().trim());
        table.set_page(query.page.unwrap_or(1));
    });

    let completion = table
        .reload(source, operator.effective_scope(scope))
        .await;
    log::debug!("Loaded {name} table: {completion:?}");

    let view = render_table(&table.borrow(), &columns);

    TablePageData {
        screen: name,
        title,
        table: view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::ClientRef;
    use crate::domain::raffle::RaffleRef;
    use crate::domain::user::Ticket;
    use crate::services::ServiceError;
    use crate::table::render_cell;

    fn operator(role: Role, client: Option<i64>) -> Operator {
        Operator {
            sub: "1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role,
            client: client.map(|id| ClientRef {
                id,
                ..ClientRef::default()
            }),
            token: "token".into(),
            exp: 0,
        }
    }

    #[test]
    fn admin_is_pinned_to_own_client() {
        let admin = operator(Role::Admin, Some(3));
        let screen = raffles_screen(&admin, &RaffleFilterForm::default()).unwrap();
        assert_eq!(
            screen.config.endpoint,
            "/raffle?filter=client.id%7C%7C%24eq%7C%7C3"
        );
        assert!(screen.columns.iter().all(|column| column.key != "client.name"));
    }

    #[test]
    fn superadmin_is_not_pinned_and_sees_client_column() {
        let superadmin = operator(Role::SuperAdmin, None);
        let screen = users_screen(&superadmin).unwrap();
        assert_eq!(screen.config.endpoint, "/user");
        assert!(screen.columns.iter().any(|column| column.key == "client.name"));
    }

    #[test]
    fn screen_access_by_role() {
        let validator = operator(Role::Client, Some(3));
        assert!(payments_screen(&validator, &PaymentFilterForm::default()).is_ok());
        assert!(matches!(
            raffles_screen(&validator, &RaffleFilterForm::default()),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            clients_screen(&operator(Role::Admin, Some(3))),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            users_screen(&operator(Role::Admin, None)),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn clients_screen_is_exempt_from_scope() {
        let screen = clients_screen(&operator(Role::SuperAdmin, None)).unwrap();
        assert!(screen.config.exempt_from_scope);
        assert_eq!(screen.config.endpoint, "/client");
    }

    #[test]
    fn payment_cells() {
        let screen = payments_screen(
            &operator(Role::SuperAdmin, None),
            &PaymentFilterForm::default(),
        )
        .unwrap();
        let payment = Payment {
            id: 5,
            method: Some("Pago Movil (0414-555)".into()),
            raffle: Some(RaffleRef {
                name: "Gran rifa de fin de año 2024 edición".into(),
                ..RaffleRef::default()
            }),
            tickets: vec![
                Ticket {
                    id: 1,
                    ticket_number: 7,
                },
                Ticket {
                    id: 2,
                    ticket_number: 123,
                },
            ],
            ..Payment::default()
        };

        let cell = |key: &str| {
            let column = screen
                .columns
                .iter()
                .find(|column| column.key == key)
                .unwrap();
            render_cell(column, &payment)
        };

        assert_eq!(cell("method"), "Pago&#32;Movil");
        assert_eq!(cell("raffle.name"), text("Gran rifa de fin de año 2..."));
        assert_eq!(cell("tickets"), "00007, 00123");
        assert!(cell("isValidated").contains("Pendiente"));
        assert_eq!(cell("user.name"), PLACEHOLDER);
    }

    #[test]
    fn unknown_sort_column_is_ignored() {
        let columns = vec![
            ColumnSpec::<Payment>::new("id", "ID"),
            ColumnSpec::<Payment>::new("tickets", "Tickets").unsortable(),
        ];
        let query = TableQuery {
            sort: Some("tickets".into()),
            ..TableQuery::default()
        };
        assert_eq!(requested_sort(&columns, &query), None);

        let query = TableQuery {
            sort: Some("id".into()),
            dir: Some("asc".into()),
            ..TableQuery::default()
        };
        assert_eq!(
            requested_sort(&columns, &query),
            Some(SortController::new("id", SortDirection::Asc))
        );
    }
}
