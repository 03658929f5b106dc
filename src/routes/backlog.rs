use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::dto::backlog::BacklogQuery;
use crate::forms::backlog::{AddItemForm, DeleteItemForm, SaveItemForm, UploadItemsForm};
use crate::repository::memory::InMemoryRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, backlog as backlog_service};

#[get("/backlog")]
pub async fn backlog(
    params: web::Query<BacklogQuery>,
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let today = Utc::now().date_naive();
    match backlog_service::load_backlog_page(repo.get_ref(), &user, &params, today) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "backlog");
            context.insert("items", &data.items);
            context.insert("filter_query", &data.filter_query);
            context.insert("params", &data.params);
            context.insert("statuses", &data.statuses);
            context.insert("kinds", &data.kinds);
            context.insert("priorities", &data.priorities);
            context.insert("epics", &data.epics);
            context.insert("sprints", &data.sprints);
            context.insert("members", &data.members);

            render_template(&tera, "backlog/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the backlog: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/backlog/add")]
pub async fn add_item(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<AddItemForm>,
) -> impl Responder {
    match backlog_service::add_item(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Backlog item added.").send();
            redirect("/backlog")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/backlog")
        }
        Err(err) => {
            log::error!("Failed to add a backlog item: {err}");
            FlashMessage::error("Could not add the backlog item.").send();
            redirect("/backlog")
        }
    }
}

#[post("/backlog/save")]
pub async fn save_item(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<SaveItemForm>,
) -> impl Responder {
    match backlog_service::save_item(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Backlog item saved.").send();
            redirect("/backlog")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/backlog")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The backlog item no longer exists.").send();
            redirect("/backlog")
        }
        Err(err) => {
            log::error!("Failed to save the backlog item: {err}");
            FlashMessage::error("Could not save the backlog item.").send();
            redirect("/backlog")
        }
    }
}

#[post("/backlog/delete")]
pub async fn delete_item(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<DeleteItemForm>,
) -> impl Responder {
    match backlog_service::delete_item(repo.get_ref(), &user, form.id) {
        Ok(()) => {
            FlashMessage::success("Backlog item deleted.").send();
            redirect("/backlog")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The backlog item no longer exists.").send();
            redirect("/backlog")
        }
        Err(err) => {
            log::error!("Failed to delete the backlog item: {err}");
            FlashMessage::error("Could not delete the backlog item.").send();
            redirect("/backlog")
        }
    }
}

#[post("/backlog/upload")]
pub async fn upload_items(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    MultipartForm(mut form): MultipartForm<UploadItemsForm>,
) -> impl Responder {
    match backlog_service::upload_items(repo.get_ref(), &user, &mut form) {
        Ok(created) => {
            FlashMessage::success(format!("Imported {created} backlog items.")).send();
            redirect("/backlog")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/backlog")
        }
        Err(err) => {
            log::error!("Failed to import backlog items: {err}");
            FlashMessage::error("Could not import the backlog items.").send();
            redirect("/backlog")
        }
    }
}
