use actix_identity::Identity;
use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::types::Role;
use crate::models::auth::Operator;
use crate::models::config::ServerConfig;
use crate::models::scope::clear_scope;
use crate::routes::{base_context, redirect, render_template};

/// Landing screen: validators only work on tickets.
#[get("/")]
pub async fn show_index(operator: Operator) -> impl Responder {
    match operator.role {
        Role::Client => redirect("/tickets"),
        Role::SuperAdmin | Role::Admin => redirect("/rifas"),
    }
}

#[get("/na")]
pub async fn not_assigned(
    operator: Operator,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &operator, "na", None, &server_config);
    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
pub async fn logout(user: Identity, session: Session) -> impl Responder {
    clear_scope(&session);
    user.logout();
    redirect("/")
}
