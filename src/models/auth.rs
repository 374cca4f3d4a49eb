//! The signed-in console operator, decoded from the identity cookie.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientRef;
use crate::domain::types::Role;
use crate::models::config::ServerConfig;
use crate::query::ScopeFilter;

/// JWT claims issued by the auth service for one operator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Operator {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Tenant the operator belongs to; `None` for super administrators.
    #[serde(default)]
    pub client: Option<ClientRef>,
    /// Bearer token forwarded to the raffle API.
    pub token: String,
    pub exp: usize,
}

impl Operator {
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Client every list request of this operator is pinned to, if any.
    pub fn pinned_client(&self) -> Option<i64> {
        if self.is_superadmin() {
            None
        } else {
            self.client.as_ref().map(|client| client.id)
        }
    }

    /// The session scope as seen by this operator: only super administrators
    /// pick a tenant, everybody else is pinned.
    pub fn effective_scope<'a>(&self, scope: Option<&'a ScopeFilter>) -> Option<&'a ScopeFilter> {
        scope.filter(|_| self.is_superadmin())
    }

    /// Decodes and validates a signed identity token.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

fn sign_in_redirect(req: &HttpRequest, cause: &'static str) -> actix_web::Error {
    let location = req
        .app_data::<web::Data<ServerConfig>>()
        .map(|config| format!("{}/auth/signin", config.auth_service_url))
        .unwrap_or_else(|| "/na".to_string());

    InternalError::from_response(
        cause,
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, location))
            .finish(),
    )
    .into()
}

impl FromRequest for Operator {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("ServerConfig is not registered as app data");
            return ready(Err(sign_in_redirect(req, "missing configuration")));
        };

        let token = match req.get_identity().and_then(|identity| identity.id()) {
            Ok(token) => token,
            Err(_) => return ready(Err(sign_in_redirect(req, "not signed in"))),
        };

        ready(Operator::from_jwt(&token, &config.secret).map_err(|err| {
            log::warn!("Rejected identity token: {err}");
            sign_in_redirect(req, "invalid identity token")
        }))
    }
}
