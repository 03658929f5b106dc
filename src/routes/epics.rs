use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::dto::epics::EpicsQuery;
use crate::forms::epics::{AddEpicForm, DeleteEpicForm, SaveEpicForm};
use crate::repository::memory::InMemoryRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, epics as epics_service};

#[get("/epics")]
pub async fn epics(
    params: web::Query<EpicsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match epics_service::load_epics_page(repo.get_ref(), &user, &params) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "epics");
            context.insert("epics", &data.epics);
            context.insert("filter_query", &data.filter_query);
            context.insert("params", &data.params);
            context.insert("statuses", &data.statuses);

            render_template(&tera, "epics/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the epics: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/epics/add")]
pub async fn add_epic(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<AddEpicForm>,
) -> impl Responder {
    match epics_service::add_epic(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Epic added.").send();
            redirect("/epics")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/epics")
        }
        Err(err) => {
            log::error!("Failed to add an epic: {err}");
            FlashMessage::error("Could not add the epic.").send();
            redirect("/epics")
        }
    }
}

#[post("/epics/save")]
pub async fn save_epic(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<SaveEpicForm>,
) -> impl Responder {
    match epics_service::save_epic(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Epic saved.").send();
            redirect("/epics")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/epics")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The epic no longer exists.").send();
            redirect("/epics")
        }
        Err(err) => {
            log::error!("Failed to save the epic: {err}");
            FlashMessage::error("Could not save the epic.").send();
            redirect("/epics")
        }
    }
}

#[post("/epics/delete")]
pub async fn delete_epic(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<DeleteEpicForm>,
) -> impl Responder {
    match epics_service::delete_epic(repo.get_ref(), &user, form.id) {
        Ok(()) => {
            FlashMessage::success("Epic deleted.").send();
            redirect("/epics")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The epic no longer exists.").send();
            redirect("/epics")
        }
        Err(err) => {
            log::error!("Failed to delete the epic: {err}");
            FlashMessage::error("Could not delete the epic.").send();
            redirect("/epics")
        }
    }
}
