use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::repository::memory::InMemoryRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, dashboard as dashboard_service};

#[get("/")]
pub async fn index(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let today = Utc::now().date_naive();
    match dashboard_service::load_dashboard(repo.get_ref(), &user, today) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "dashboard");
            context.insert("totals", &data.totals);
            context.insert("overall_progress", &data.overall_progress);
            context.insert("active_sprint", &data.active_sprint);
            context.insert("recent_items", &data.recent_items);

            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &user, "dashboard");

    render_template(&tera, "main/not_assigned.html", &context)
}
