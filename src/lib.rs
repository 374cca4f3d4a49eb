//! Raffle administration console.
//!
//! The `data` feature carries the list-query protocol and table engine
//! (`query`, `table`, `api`, `domain`); `server` adds the Actix-Web console
//! that renders the list screens on top of it.

pub mod api;
pub mod domain;
pub mod query;
pub mod table;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::api::client::{ApiClient, create_http_client};
    use crate::models::config::ServerConfig;
    use crate::routes::main::{logout, not_assigned, show_index};
    use crate::routes::pickers::{api_v1_admin_picker, api_v1_client_picker};
    use crate::routes::scope::{reset_scope, select_scope};
    use crate::routes::tables::{
        show_admins, show_clients, show_payments, show_raffles, show_users,
    };

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let http = create_http_client(server_config.api_timeout())
            .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;
        let api = ApiClient::new(http, &server_config.api_url);

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving the console on {}:{} against {}",
            bind_address.0,
            bind_address.1,
            server_config.api_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(not_assigned)
                .service(
                    web::scope("/api")
                        .service(api_v1_client_picker)
                        .service(api_v1_admin_picker),
                )
                .service(show_index)
                .service(show_raffles)
                .service(show_payments)
                .service(show_users)
                .service(show_admins)
                .service(show_clients)
                .service(select_scope)
                .service(reset_scope)
                .service(logout)
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(api.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
