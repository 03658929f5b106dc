use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::repository::memory::InMemoryRepository;
use crate::repository::seed;
use crate::routes::auth::{logout, signin, signin_page};
use crate::routes::backlog::{add_item, backlog, delete_item, save_item, upload_items};
use crate::routes::dashboard::{index, not_assigned};
use crate::routes::epics::{add_epic, delete_epic, epics, save_epic};
use crate::routes::reports::{delete_entry, log_time, reports};
use crate::routes::sprints::{
    add_sprint, assign_items, delete_sprint, save_sprint, sprint_modal, sprints,
};
use crate::routes::team::{add_member, delete_member, save_member, team};

pub mod auth;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

/// Role granting access to the tracker at all.
pub const SERVICE_ACCESS_ROLE: &str = "tracker";
/// Role allowed to change data.
pub const SERVICE_ADMIN_ROLE: &str = "tracker_admin";
/// Role for regular team members.
pub const SERVICE_MEMBER_ROLE: &str = "tracker_member";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let repo = InMemoryRepository::new();
    if server_config.demo_data {
        seed::populate(&repo)
            .map_err(|e| std::io::Error::other(format!("Failed to seed demo data: {e}")))?;
    }

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

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
            .service(web::scope("/auth").service(signin_page).service(signin))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(index)
                    .service(not_assigned)
                    .service(backlog)
                    .service(add_item)
                    .service(save_item)
                    .service(delete_item)
                    .service(upload_items)
                    .service(epics)
                    .service(add_epic)
                    .service(save_epic)
                    .service(delete_epic)
                    .service(sprints)
                    .service(add_sprint)
                    .service(save_sprint)
                    .service(delete_sprint)
                    .service(sprint_modal)
                    .service(assign_items)
                    .service(team)
                    .service(add_member)
                    .service(save_member)
                    .service(delete_member)
                    .service(reports)
                    .service(log_time)
                    .service(delete_entry)
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
