use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::api::client::ApiClient;
use crate::dto::pickers::PickerQuery;
use crate::models::auth::Operator;
use crate::models::scope::read_scope;
use crate::services::ServiceError;
use crate::services::pickers::{load_admin_picker, load_client_picker};

fn picker_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        err => {
            log::error!("Failed to load picker: {err}");
            HttpResponse::BadGateway().json(json!({ "message": err.to_string() }))
        }
    }
}

#[get("/v1/pickers/clients")]
pub async fn api_v1_client_picker(
    params: web::Query<PickerQuery>,
    operator: Operator,
    api: web::Data<ApiClient>,
) -> impl Responder {
    let source = api.with_token(&operator.token);

    match load_client_picker(&source, &operator, &params).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => picker_error(err),
    }
}

#[get("/v1/pickers/admins")]
pub async fn api_v1_admin_picker(
    params: web::Query<PickerQuery>,
    operator: Operator,
    session: Session,
    api: web::Data<ApiClient>,
) -> impl Responder {
    let scope = read_scope(&session);
    let source = api.with_token(&operator.token);

    match load_admin_picker(&source, &operator, &params, scope.as_ref()).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => picker_error(err),
    }
}
