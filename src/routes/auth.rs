use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::{Days, Utc};
use tera::{Context, Tera};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::forms::auth::SignInForm;
use crate::middleware::SIGNIN_LOCATION;
use crate::models::config::ServerConfig;
use crate::routes::{alert_level_to_str, redirect, render_template};

/// How long a session token stays valid.
const TOKEN_TTL_DAYS: u64 = 7;

#[get("/signin")]
pub async fn signin_page(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let alerts = flash_messages
        .iter()
        .map(|message| (message.content(), alert_level_to_str(&message.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);

    render_template(&tera, "auth/signin.html", &context)
}

#[post("/signin")]
pub async fn signin(
    request: HttpRequest,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignInForm>,
) -> impl Responder {
    if form.validate().is_err() {
        FlashMessage::error("Enter a name and a valid email address").send();
        return redirect(SIGNIN_LOCATION);
    }

    let roles = match form.roles() {
        Ok(roles) => roles,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(SIGNIN_LOCATION);
        }
    };

    let Some(expires) = Utc::now().checked_add_days(Days::new(TOKEN_TTL_DAYS)) else {
        log::error!("Failed to compute the session expiry");
        return HttpResponse::InternalServerError().finish();
    };

    let email = form.email.trim().to_lowercase();
    let claims = AuthenticatedUser {
        sub: email.clone(),
        email,
        name: form.name.trim().to_string(),
        roles,
        exp: expires.timestamp() as usize,
    };

    let token = match claims.to_jwt(&server_config.secret) {
        Ok(token) => token,
        Err(err) => {
            log::error!("Failed to issue a session token: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(err) = Identity::login(&request.extensions(), token) {
        log::error!("Failed to attach the session identity: {err}");
        return HttpResponse::InternalServerError().finish();
    }

    redirect("/")
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
