use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::dto::invoices::{InvoiceFormData, InvoiceListParams};
use crate::forms::HtmlForm;
use crate::forms::invoice::SaveInvoiceForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, field_errors, redirect, render_template};
use crate::services::settings::site_settings;
use crate::services::{ServiceError, invoices as invoice_service};

fn insert_form_data(context: &mut Context, data: &InvoiceFormData) {
    context.insert("draft", &data.draft);
    context.insert("items", &data.items);
    context.insert("subtotal", &data.subtotal);
    context.insert("tax", &data.tax);
    context.insert("total", &data.total);
    context.insert("clients", &data.clients);
    context.insert("projects", &data.projects);
}

#[get("/invoices")]
pub async fn show_invoices(
    params: web::Query<InvoiceListParams>,
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

    let data =
        match invoice_service::load_invoices_page(repo.as_ref(), &user, params.into_inner()) {
            Ok(data) => data,
            Err(ServiceError::Unauthorized) => return redirect("/na"),
            Err(e) => {
                log::error!("Failed to load invoices: {e}");
                return HttpResponse::InternalServerError().finish();
            }
        };

    let mut context = base_context(&flash_messages, &user, "invoices", &site);
    context.insert("invoices", &data.invoices);
    context.insert("pager", &data.pager);
    context.insert("search_query", &data.search_query);
    context.insert("status", &data.status);
    context.insert("sort", data.sort.as_str());
    context.insert("client_names", &data.client_names);
    context.insert("reset_href", &data.reset_href);

    render_template(&tera, "invoices/index.html", &context)
}

#[get("/invoices/new")]
pub async fn new_invoice(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    invoice_form(None, user, repo, flash_messages, tera).await
}

#[get("/invoices/{invoice_id}/edit")]
pub async fn edit_invoice(
    invoice_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    invoice_form(Some(invoice_id.into_inner()), user, repo, flash_messages, tera).await
}

async fn invoice_form(
    invoice_id: Option<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let site = match site_settings(repo.as_ref()) {
        Ok(site) => site,
        Err(e) => {
            log::error!("Failed to load site settings: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let data = match invoice_service::load_invoice_form(repo.as_ref(), &user, invoice_id) {
        Ok(data) => data,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Invoice not found.").send();
            return redirect("/invoices");
        }
        Err(e) => {
            log::error!("Failed to load invoice form: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &user, "invoices", &site);
    insert_form_data(&mut context, &data);

    render_template(&tera, "invoices/form.html", &context)
}

#[post("/invoices/save")]
pub async fn save_invoice(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    form: HtmlForm<SaveInvoiceForm>,
) -> impl Responder {
    let form = form.into_inner();
    match invoice_service::save_invoice(repo.as_ref(), &user, &form) {
        Ok(invoice) => {
            FlashMessage::success(if form.id.is_some() {
                "Invoice updated."
            } else {
                "Invoice created."
            })
            .send();
            redirect(&format!("/invoices/{}/edit", invoice.id))
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Validation(errors)) => {
            // Inline errors; the submitted draft is kept on the form.
            let site = site_settings(repo.as_ref()).unwrap_or_default();
            let mut context = base_context(&flash_messages, &user, "invoices", &site);
            match invoice_service::load_invoice_form(repo.as_ref(), &user, None) {
                Ok(options) => {
                    context.insert("clients", &options.clients);
                    context.insert("projects", &options.projects);
                }
                Err(e) => log::error!("Failed to load invoice form options: {e}"),
            }
            if let Ok(draft) = form.to_draft() {
                let data = InvoiceFormData::from_draft(draft, vec![], vec![]);
                context.insert("draft", &data.draft);
                context.insert("items", &data.items);
                context.insert("subtotal", &data.subtotal);
                context.insert("tax", &data.tax);
                context.insert("total", &data.total);
            }
            context.insert("form", &form);
            context.insert("field_errors", &field_errors(&errors));
            render_template(&tera, "invoices/form.html", &context)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            match form.id {
                Some(id) => redirect(&format!("/invoices/{id}/edit")),
                None => redirect("/invoices/new"),
            }
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Invoice no longer exists.").send();
            redirect("/invoices")
        }
        Err(e) => {
            log::error!("Failed to save invoice: {e}");
            FlashMessage::error("Could not save the invoice.").send();
            redirect("/invoices")
        }
    }
}

#[post("/invoices/{invoice_id}/delete")]
pub async fn delete_invoice(
    invoice_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match invoice_service::delete_invoice(repo.as_ref(), &user, invoice_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Invoice deleted.").send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Invoice no longer exists.").send();
        }
        Err(e) => {
            log::error!("Failed to delete invoice: {e}");
            FlashMessage::error("Could not delete the invoice.").send();
        }
    }
    redirect("/invoices")
}
