use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::lead::ContactForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, field_errors, public_context, redirect, render_template};
use crate::services::dashboard::load_dashboard;
use crate::services::settings::site_settings;
use crate::services::{ServiceError, leads as lead_service};

#[get("/")]
pub async fn landing(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let site = match site_settings(repo.as_ref()) {
        Ok(site) => site,
        Err(e) => {
            log::error!("Failed to load site settings: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let context = public_context(&flash_messages, &site);
    render_template(&tera, "landing/index.html", &context)
}

#[post("/contact")]
pub async fn submit_contact(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    match lead_service::capture_lead(repo.as_ref(), &form) {
        Ok(_) => {
            FlashMessage::success("Thanks! We will get back to you shortly.").send();
            redirect("/")
        }
        Err(ServiceError::Validation(errors)) => {
            // Re-render the landing page with inline errors and the entered
            // values preserved.
            let site = match site_settings(repo.as_ref()) {
                Ok(site) => site,
                Err(e) => {
                    log::error!("Failed to load site settings: {e}");
                    return HttpResponse::InternalServerError().finish();
                }
            };
            let mut context = public_context(&flash_messages, &site);
            context.insert("contact_form", &form);
            context.insert("field_errors", &field_errors(&errors));
            render_template(&tera, "landing/index.html", &context)
        }
        Err(e) => {
            log::error!("Failed to capture lead: {e}");
            FlashMessage::error("Something went wrong, please try again.").send();
            redirect("/")
        }
    }
}

#[get("/dashboard")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let site = match site_settings(repo.as_ref()) {
        Ok(site) => site,
        Err(e) => {
            log::error!("Failed to load site settings: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let data = match load_dashboard(repo.as_ref(), &user) {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            log::error!("Failed to load dashboard: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &user, "dashboard", &site);
    context.insert("client_count", &data.client_count);
    context.insert("project_count", &data.project_count);
    context.insert("active_project_count", &data.active_project_count);
    context.insert("invoice_count", &data.invoice_count);
    context.insert("outstanding_total", &data.outstanding_total);
    context.insert("new_lead_count", &data.new_lead_count);
    context.insert("monthly_revenue", &data.monthly_revenue);
    context.insert("recent_leads", &data.recent_leads);

    render_template(&tera, "dashboard/index.html", &context)
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let site = site_settings(repo.as_ref()).unwrap_or_default();
    let context = base_context(&flash_messages, &user, "na", &site);
    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
