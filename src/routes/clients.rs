use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::dto::clients::ClientListParams;
use crate::forms::client::SaveClientForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, field_errors, redirect, render_template};
use crate::services::settings::site_settings;
use crate::services::{ServiceError, clients as client_service};

#[get("/clients")]
pub async fn show_clients(
    params: web::Query<ClientListParams>,
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

    let data = match client_service::load_clients_page(repo.as_ref(), &user, params.into_inner())
    {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(e) => {
            log::error!("Failed to load clients: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &user, "clients", &site);
    context.insert("clients", &data.clients);
    context.insert("pager", &data.pager);
    context.insert("search_query", &data.search_query);
    context.insert("sort", data.sort.as_str());
    context.insert("has_projects", &data.has_projects);
    context.insert("reset_href", &data.reset_href);

    render_template(&tera, "clients/index.html", &context)
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<i32>,
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

    let data = match client_service::load_client_page(repo.as_ref(), &user, client_id.into_inner())
    {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client not found.").send();
            return redirect("/clients");
        }
        Err(e) => {
            log::error!("Failed to load client: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &user, "clients", &site);
    context.insert("client", &data.client);
    context.insert("projects", &data.projects);
    context.insert("invoices", &data.invoices);

    render_template(&tera, "clients/show.html", &context)
}

#[post("/clients/save")]
pub async fn save_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<SaveClientForm>,
) -> impl Responder {
    match client_service::save_client(repo.as_ref(), &user, &form) {
        Ok(client) => {
            FlashMessage::success(if form.id.is_some() {
                "Client updated."
            } else {
                "Client created."
            })
            .send();
            redirect(&format!("/clients/{}", client.id))
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Validation(errors)) => {
            // Inline errors; the entered values are kept on the form.
            let site = site_settings(repo.as_ref()).unwrap_or_default();
            let mut context = base_context(&flash_messages, &user, "clients", &site);
            context.insert("form", &form);
            context.insert("field_errors", &field_errors(&errors));
            render_template(&tera, "clients/form.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client no longer exists.").send();
            redirect("/clients")
        }
        Err(e) => {
            log::error!("Failed to save client: {e}");
            FlashMessage::error("Could not save the client.").send();
            redirect("/clients")
        }
    }
}

#[post("/clients/{client_id}/delete")]
pub async fn delete_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match client_service::delete_client(repo.as_ref(), &user, client_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Client deleted.").send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client no longer exists.").send();
        }
        Err(e) => {
            log::error!("Failed to delete client: {e}");
            FlashMessage::error("Could not delete the client.").send();
        }
    }
    redirect("/clients")
}
