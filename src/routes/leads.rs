use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::dto::leads::LeadListParams;
use crate::forms::lead::{LeadStatusForm, SaveLeadForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, field_errors, redirect, render_template};
use crate::services::settings::site_settings;
use crate::services::{ServiceError, leads as lead_service};

#[get("/leads")]
pub async fn show_leads(
    params: web::Query<LeadListParams>,
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

    let data = match lead_service::load_leads_page(repo.as_ref(), &user, params.into_inner()) {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            log::error!("Failed to load leads: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &user, "leads", &site);
    context.insert("leads", &data.leads);
    context.insert("pager", &data.pager);
    context.insert("search_query", &data.search_query);
    context.insert("status", &data.status);
    context.insert("sort", data.sort.as_str());
    context.insert("reset_href", &data.reset_href);

    render_template(&tera, "leads/index.html", &context)
}

#[post("/leads/save")]
pub async fn save_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<SaveLeadForm>,
) -> impl Responder {
    match lead_service::save_lead(repo.as_ref(), &user, &form) {
        Ok(_) => {
            FlashMessage::success(if form.id.is_some() {
                "Lead updated."
            } else {
                "Lead created."
            })
            .send();
            redirect("/leads")
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Validation(errors)) => {
            let site = site_settings(repo.as_ref()).unwrap_or_default();
            let mut context = base_context(&flash_messages, &user, "leads", &site);
            context.insert("form", &form);
            context.insert("field_errors", &field_errors(&errors));
            render_template(&tera, "leads/form.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Lead no longer exists.").send();
            redirect("/leads")
        }
        Err(e) => {
            log::error!("Failed to save lead: {e}");
            FlashMessage::error("Could not save the lead.").send();
            redirect("/leads")
        }
    }
}

#[post("/leads/status")]
pub async fn set_lead_status(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LeadStatusForm>,
) -> impl Responder {
    match lead_service::set_lead_status(repo.as_ref(), &user, &form) {
        Ok(_) => {
            FlashMessage::success("Lead status updated.").send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Lead no longer exists.").send();
        }
        Err(e) => {
            log::error!("Failed to update lead status: {e}");
            FlashMessage::error("Could not update the lead status.").send();
        }
    }
    redirect("/leads")
}

#[post("/leads/{lead_id}/delete")]
pub async fn delete_lead(
    lead_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match lead_service::delete_lead(repo.as_ref(), &user, lead_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Lead deleted.").send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Lead no longer exists.").send();
        }
        Err(e) => {
            log::error!("Failed to delete lead: {e}");
            FlashMessage::error("Could not delete the lead.").send();
        }
    }
    redirect("/leads")
}
