use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::settings::{SaveSettingsForm, ThemeForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, field_errors, redirect, render_template};
use crate::services::{ServiceError, settings as settings_service};

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let site = match settings_service::load_settings_page(repo.as_ref(), &user) {
        Ok(site) => site,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            log::error!("Failed to load settings: {e}");
            return actix_web::HttpResponse::InternalServerError().finish();
        }
    };

    let context = base_context(&flash_messages, &user, "settings", &site);
    render_template(&tera, "settings/index.html", &context)
}

#[post("/settings/save")]
pub async fn save_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<SaveSettingsForm>,
) -> impl Responder {
    match settings_service::save_settings(repo.as_ref(), &user, &form) {
        Ok(_) => {
            FlashMessage::success("Settings saved.").send();
            redirect("/settings")
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Validation(errors)) => {
            let site = settings_service::site_settings(repo.as_ref()).unwrap_or_default();
            let mut context = base_context(&flash_messages, &user, "settings", &site);
            context.insert("form", &form);
            context.insert("field_errors", &field_errors(&errors));
            render_template(&tera, "settings/index.html", &context)
        }
        Err(e) => {
            log::error!("Failed to save settings: {e}");
            FlashMessage::error("Could not save the settings.").send();
            redirect("/settings")
        }
    }
}

#[post("/settings/theme")]
pub async fn set_theme(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ThemeForm>,
) -> impl Responder {
    match settings_service::set_theme(repo.as_ref(), &user, &form) {
        Ok(_) => {
            FlashMessage::success("Theme updated.").send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            log::error!("Failed to update theme: {e}");
            FlashMessage::error("Could not update the theme.").send();
        }
    }
    redirect("/settings")
}
