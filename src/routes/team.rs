use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::dto::team::TeamQuery;
use crate::forms::team::{AddMemberForm, DeleteMemberForm, SaveMemberForm};
use crate::repository::memory::InMemoryRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, team as team_service};

#[get("/team")]
pub async fn team(
    params: web::Query<TeamQuery>,
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match team_service::load_team_page(repo.get_ref(), &user, &params) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "team");
            context.insert("members", &data.members);
            context.insert("filter_query", &data.filter_query);
            context.insert("params", &data.params);
            context.insert("roles", &data.roles);
            context.insert("departments", &data.departments);
            context.insert("active_sprint", &data.active_sprint);

            render_template(&tera, "team/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load the team: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/team/add")]
pub async fn add_member(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<AddMemberForm>,
) -> impl Responder {
    match team_service::add_member(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Team member added.").send();
            redirect("/team")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/team")
        }
        Err(err) => {
            log::error!("Failed to add a team member: {err}");
            FlashMessage::error("Could not add the team member.").send();
            redirect("/team")
        }
    }
}

#[post("/team/save")]
pub async fn save_member(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<SaveMemberForm>,
) -> impl Responder {
    match team_service::save_member(repo.get_ref(), &user, &form) {
        Ok(()) => {
            FlashMessage::success("Team member saved.").send();
            redirect("/team")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/team")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The team member no longer exists.").send();
            redirect("/team")
        }
        Err(err) => {
            log::error!("Failed to save the team member: {err}");
            FlashMessage::error("Could not save the team member.").send();
            redirect("/team")
        }
    }
}

#[post("/team/delete")]
pub async fn delete_member(
    user: AuthenticatedUser,
    repo: web::Data<InMemoryRepository>,
    web::Form(form): web::Form<DeleteMemberForm>,
) -> impl Responder {
    match team_service::delete_member(repo.get_ref(), &user, form.id) {
        Ok(()) => {
            FlashMessage::success("Team member removed.").send();
            redirect("/team")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/team")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("The team member no longer exists.").send();
            redirect("/team")
        }
        Err(err) => {
            log::error!("Failed to remove the team member: {err}");
            FlashMessage::error("Could not remove the team member.").send();
            redirect("/team")
        }
    }
}
