//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::types::{CURRENCIES, PaymentStatus, Role};
use crate::models::auth::Operator;
use crate::models::config::ServerConfig;
use crate::query::ScopeFilter;
use crate::services::ServiceError;

pub mod main;
pub mod pickers;
pub mod scope;
pub mod tables;

/// Bootstrap alert class of a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: alerts, operator, navigation and scope.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    operator: &Operator,
    current_page: &str,
    scope: Option<&ScopeFilter>,
    server_config: &ServerConfig,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", operator);
    context.insert("current_role", operator.role.label());
    context.insert("current_page", current_page);
    context.insert("home_url", &server_config.auth_service_url);
    context.insert("scope", &operator.effective_scope(scope));
    context.insert("roles", &Role::ALL.map(|role| (role.as_str(), role.label())));
    context.insert("statuses", &PaymentStatus::ALL.map(PaymentStatus::label));
    context.insert("currencies", CURRENCIES);
    context
}

/// Turns a failed service call into a redirect with a flash message.
pub fn service_error_response(err: ServiceError, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("No tiene permisos para esta sección.").send();
            redirect("/na")
        }
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            log::warn!("Rejected form input: {message}");
            FlashMessage::error("Error de validación del formulario.").send();
            redirect(back)
        }
        ServiceError::Fetch(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::Query(err) => {
            log::error!("Failed to build list query: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
