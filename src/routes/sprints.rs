use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::dto::sprints::SprintsQuery;
use crate::forms::sprints::{AddSprintForm, DeleteSprintForm, SaveSprintForm};
use crate::repository::memory::InMemoryRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, sprints as sprints_service};

#[get("/sprints")]
pub async fn sprints(
    params: web::Query<SprintsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match sprints_service::load_sprints_page(repo.get_ref(), &user, &params) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "sprints");
            context.insert("sprints", &data.sprints);
            context.insert("filter_query", &data.filter_query);
            context.insert("params", &data.params);
            context.insert("statuses", &data.statuses);
            context.insert("trends", &data.trends);

            render_template(&tera, "sprints/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the sprints: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/sprints/add")]
pub async fn add_sprint(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<AddSprintForm>,
) -> impl Responder {
    match sprints_service::add_sprint(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Sprint added.").send();
            redirect("/sprints")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sprints")
        }
        Err(err) => {
            log::error!("Failed to add a sprint: {err}");
            FlashMessage::error("Could not add the sprint.").send();
            redirect("/sprints")
        }
    }
}

#[post("/sprints/save")]
pub async fn save_sprint(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<SaveSprintForm>,
) -> impl Responder {
    match sprints_service::save_sprint(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Sprint saved.").send();
            redirect("/sprints")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sprints")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The sprint no longer exists.").send();
            redirect("/sprints")
        }
        Err(err) => {
            log::error!("Failed to save the sprint: {err}");
            FlashMessage::error("Could not save the sprint.").send();
            redirect("/sprints")
        }
    }
}

#[post("/sprints/delete")]
pub async fn delete_sprint(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<DeleteSprintForm>,
) -> impl Responder {
    match sprints_service::delete_sprint(repo.get_ref(), &user, form.id) {
        Ok(()) => {
            FlashMessage::success("Sprint deleted, items moved back to the backlog.").send();
            redirect("/sprints")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The sprint no longer exists.").send();
            redirect("/sprints")
        }
        Err(err) => {
            log::error!("Failed to delete the sprint: {err}");
            FlashMessage::error("Could not delete the sprint.").send();
            redirect("/sprints")
        }
    }
}

#[post("/sprints/modal/{sprint_id}")]
pub async fn sprint_modal(
    sprint_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let today = Utc::now().date_naive();
    match sprints_service::load_planning_modal(repo.get_ref(), &user, sprint_id.into_inner(), today)
    {
        Ok(data) => {
            let mut context = Context::new();
            context.insert("sprint", &data.sprint);
            context.insert("unscheduled", &data.unscheduled);

            render_template(&tera, "sprints/modal_body.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            log::error!("Unauthorized to load the planning modal.");
            HttpResponse::Unauthorized().finish()
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load the planning modal: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/sprints/assign")]
pub async fn assign_items(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    form: web::Bytes,
) -> impl Responder {
    match sprints_service::assign_items(repo.get_ref(), &user, form.as_ref()) {
        Ok(assigned) => {
            FlashMessage::success(format!("Moved {assigned} items into the sprint.")).send();
            redirect("/sprints")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sprints")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The sprint no longer exists.").send();
            redirect("/sprints")
        }
        Err(err) => {
            log::error!("Failed to assign items to the sprint: {err}");
            FlashMessage::error("Could not move the items into the sprint.").send();
            redirect("/sprints")
        }
    }
}
