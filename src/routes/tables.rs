use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Serialize;
use tera::{Context, Tera};

use crate::api::client::ApiClient;
use crate::dto::tables::{TablePageData, TableQuery};
use crate::forms::tables::{ALL_STATUSES, AdminFilterForm, PaymentFilterForm, RaffleFilterForm};
use crate::models::auth::Operator;
use crate::models::config::ServerConfig;
use crate::models::scope::read_scope;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::raffle_options::load_raffle_options;
use crate::services::tables::{
    admins_screen, clients_screen, load_table_page, payments_screen, raffles_screen,
    users_screen,
};

/// Filter form of screens without filters.
#[derive(Default, Serialize)]
struct NoFilters {}

fn render_table_page<F: Serialize>(
    tera: &Tera,
    mut context: Context,
    data: &TablePageData,
    filters: &F,
) -> HttpResponse {
    let filter_query = serde_html_form::to_string(filters).unwrap_or_else(|err| {
        log::warn!("Failed to encode screen filters: {err}");
        String::new()
    });

    context.insert("page", data);
    context.insert("filters", filters);
    context.insert("filter_query", &filter_query);

    render_template(tera, "tables/index.html", &context)
}

#[get("/rifas")]
#[allow(clippy::too_many_arguments)]
pub async fn show_raffles(
    operator: Operator,
    params: web::Query<TableQuery>,
    filters: web::Query<RaffleFilterForm>,
    session: Session,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let screen = match raffles_screen(&operator, &filters) {
        Ok(screen) => screen,
        Err(err) => return service_error_response(err, "/rifas"),
    };

    let scope = read_scope(&session);
    let source = api.with_token(&operator.token);
    let data = load_table_page(&source, &operator, screen, &params, scope.as_ref()).await;

    let context = base_context(
        &flash_messages,
        &operator,
        data.screen,
        scope.as_ref(),
        &server_config,
    );
    render_table_page(&tera, context, &data, &*filters)
}

#[get("/tickets")]
#[allow(clippy::too_many_arguments)]
pub async fn show_payments(
    operator: Operator,
    params: web::Query<TableQuery>,
    filters: web::Query<PaymentFilterForm>,
    session: Session,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let screen = match payments_screen(&operator, &filters) {
        Ok(screen) => screen,
        Err(err) => return service_error_response(err, "/tickets"),
    };

    let scope = read_scope(&session);
    let source = api.with_token(&operator.token);
    let data = load_table_page(&source, &operator, screen, &params, scope.as_ref()).await;

    let raffles = load_raffle_options(&source, &operator, scope.as_ref())
        .await
        .unwrap_or_else(|err| {
            log::error!("Failed to load raffle options: {err}");
            Vec::new()
        });
    let selected_status = match filters.status() {
        Ok(Some(status)) => status.label(),
        _ => ALL_STATUSES,
    };

    let mut context = base_context(
        &flash_messages,
        &operator,
        data.screen,
        scope.as_ref(),
        &server_config,
    );
    context.insert("raffles", &raffles);
    context.insert("selected_status", selected_status);
    render_table_page(&tera, context, &data, &*filters)
}

#[get("/usuarios")]
pub async fn show_users(
    operator: Operator,
    params: web::Query<TableQuery>,
    session: Session,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let screen = match users_screen(&operator) {
        Ok(screen) => screen,
        Err(err) => return service_error_response(err, "/usuarios"),
    };

    let scope = read_scope(&session);
    let source = api.with_token(&operator.token);
    let data = load_table_page(&source, &operator, screen, &params, scope.as_ref()).await;

    let context = base_context(
        &flash_messages,
        &operator,
        data.screen,
        scope.as_ref(),
        &server_config,
    );
    render_table_page(&tera, context, &data, &NoFilters::default())
}

#[get("/administradores")]
#[allow(clippy::too_many_arguments)]
pub async fn show_admins(
    operator: Operator,
    params: web::Query<TableQuery>,
    filters: web::Query<AdminFilterForm>,
    session: Session,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let screen = match admins_screen(&operator, &filters) {
        Ok(screen) => screen,
        Err(err) => return service_error_response(err, "/administradores"),
    };

    let scope = read_scope(&session);
    let source = api.with_token(&operator.token);
    let data = load_table_page(&source, &operator, screen, &params, scope.as_ref()).await;

    let context = base_context(
        &flash_messages,
        &operator,
        data.screen,
        scope.as_ref(),
        &server_config,
    );
    render_table_page(&tera, context, &data, &*filters)
}

#[get("/clientes")]
pub async fn show_clients(
    operator: Operator,
    params: web::Query<TableQuery>,
    session: Session,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let screen = match clients_screen(&operator) {
        Ok(screen) => screen,
        Err(err) => return service_error_response(err, "/clientes"),
    };

    let scope = read_scope(&session);
    let source = api.with_token(&operator.token);
    let data = load_table_page(&source, &operator, screen, &params, scope.as_ref()).await;

    let context = base_context(
        &flash_messages,
        &operator,
        data.screen,
        scope.as_ref(),
        &server_config,
    );
    render_table_page(&tera, context, &data, &NoFilters::default())
}
