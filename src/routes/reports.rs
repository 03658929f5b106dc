use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::dto::reports::ReportsQuery;
use crate::forms::reports::{DeleteEntryForm, LogTimeForm};
use crate::repository::memory::InMemoryRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, reports as reports_service};

#[get("/reports")]
pub async fn reports(
    params: web::Query<ReportsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match reports_service::load_reports_page(repo.get_ref(), &user, &params) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "reports");
            context.insert("entries", &data.entries);
            context.insert("total_hours", &data.total_hours);
            context.insert("by_member", &data.by_member);
            context.insert("filter_query", &data.filter_query);
            context.insert("params", &data.params);
            context.insert("members", &data.members);

            render_template(&tera, "reports/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the time report: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/reports/log")]
pub async fn log_time(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<LogTimeForm>,
) -> impl Responder {
    match reports_service::log_time(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Time logged.").send();
            redirect("/reports")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/reports")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The member or item for this entry no longer exists.").send();
            redirect("/reports")
        }
        Err(err) => {
            log::error!("Failed to log time: {err}");
            FlashMessage::error("Could not log the time entry.").send();
            redirect("/reports")
        }
    }
}

#[post("/reports/delete")]
pub async fn delete_entry(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<DeleteEntryForm>,
) -> impl Responder {
    match reports_service::delete_entry(repo.get_ref(), &user, form.id) {
        Ok(()) => {
            FlashMessage::success("Time entry deleted.").send();
            redirect("/reports")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The time entry no longer exists.").send();
            redirect("/reports")
        }
        Err(err) => {
            log::error!("Failed to delete the time entry: {err}");
            FlashMessage::error("Could not delete the time entry.").send();
            redirect("/reports")
        }
    }
}
