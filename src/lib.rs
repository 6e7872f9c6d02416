#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod listing;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware as actix_middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::db::establish_connection_pool;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::clients::{delete_client, save_client, show_client, show_clients};
    use crate::routes::invoices::{
        delete_invoice, edit_invoice, new_invoice, save_invoice, show_invoices,
    };
    use crate::routes::leads::{delete_lead, save_lead, set_lead_status, show_leads};
    use crate::routes::main::{
        landing, logout, not_assigned, show_dashboard, submit_contact,
    };
    use crate::routes::projects::{
        delete_project, save_project, show_project, show_projects,
    };
    use crate::routes::settings::{save_settings, set_theme, show_settings};

    /// Builds and runs the Actix-Web HTTP server using the provided
    /// configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish the Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = DieselRepository::new(pool);

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let uploads_dir = server_config.uploads_dir.clone();
        let bind_address = (server_config.address.clone(), server_config.port);

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
                .wrap(actix_middleware::Compress::default())
                .wrap(actix_middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(Files::new("/uploads", uploads_dir.clone()))
                .service(landing)
                .service(submit_contact)
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(show_dashboard)
                        .service(not_assigned)
                        .service(show_clients)
                        .service(save_client)
                        .service(show_client)
                        .service(delete_client)
                        .service(show_projects)
                        .service(save_project)
                        .service(show_project)
                        .service(delete_project)
                        .service(show_invoices)
                        .service(new_invoice)
                        .service(save_invoice)
                        .service(edit_invoice)
                        .service(delete_invoice)
                        .service(show_leads)
                        .service(save_lead)
                        .service(set_lead_status)
                        .service(delete_lead)
                        .service(show_settings)
                        .service(save_settings)
                        .service(set_theme)
                        .service(logout),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}

#[cfg(feature = "server")]
pub use server::run;
