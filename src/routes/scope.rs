use actix_session::Session;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;
use serde::Deserialize;

use crate::forms::scope::SelectScopeForm;
use crate::models::auth::Operator;
use crate::models::scope::{clear_scope, store_scope};
use crate::routes::{redirect, service_error_response};
use crate::services::scope as scope_service;

/// Screen to return to after changing the scope.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnTo {
    next: Option<String>,
}

impl ReturnTo {
    /// Local path only, so the parameter cannot redirect off-site.
    pub fn path(&self) -> &str {
        match self.next.as_deref() {
            Some(next)
                if next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\") =>
            {
                next
            }
            _ => "/",
        }
    }
}

#[post("/scope/select")]
pub async fn select_scope(
    operator: Operator,
    session: Session,
    back: web::Query<ReturnTo>,
    web::Form(form): web::Form<SelectScopeForm>,
) -> impl Responder {
    let scope = match scope_service::select_scope(&operator, form) {
        Ok(scope) => scope,
        Err(err) => return service_error_response(err, back.path()),
    };

    match store_scope(&session, &scope) {
        Ok(()) => {
            let label = scope.label.as_deref().unwrap_or("el cliente seleccionado");
            FlashMessage::info(format!("Mostrando datos de {label}.")).send();
        }
        Err(err) => {
            log::error!("Failed to store scope in session: {err}");
            FlashMessage::error("No se pudo seleccionar el cliente.").send();
        }
    }
    redirect(back.path())
}

#[post("/scope/clear")]
pub async fn reset_scope(
    operator: Operator,
    session: Session,
    back: web::Query<ReturnTo>,
) -> impl Responder {
    if let Err(err) = scope_service::clear_scope(&operator) {
        return service_error_response(err, back.path());
    }

    clear_scope(&session);
    FlashMessage::info("Mostrando datos de todos los clientes.").send();
    redirect(back.path())
}
