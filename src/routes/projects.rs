use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::dto::projects::ProjectListParams;
use crate::forms::project::SaveProjectForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, field_errors, redirect, render_template};
use crate::services::settings::site_settings;
use crate::services::{ServiceError, projects as project_service, uploads};

#[get("/projects")]
pub async fn show_projects(
    params: web::Query<ProjectListParams>,
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
        match project_service::load_projects_page(repo.as_ref(), &user, params.into_inner()) {
            Ok(data) => data,
            Err(ServiceError::Unauthorized) => return redirect("/na"),
            Err(e) => {
                log::error!("Failed to load projects: {e}");
                return HttpResponse::InternalServerError().finish();
            }
        };

    let mut context = base_context(&flash_messages, &user, "projects", &site);
    context.insert("projects", &data.projects);
    context.insert("pager", &data.pager);
    context.insert("search_query", &data.search_query);
    context.insert("status", &data.status);
    context.insert("sort", data.sort.as_str());
    context.insert("clients", &data.clients);
    context.insert("reset_href", &data.reset_href);

    render_template(&tera, "projects/index.html", &context)
}

#[get("/projects/{project_id}")]
pub async fn show_project(
    project_id: web::Path<i32>,
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
        match project_service::load_project_page(repo.as_ref(), &user, project_id.into_inner()) {
            Ok(data) => data,
            Err(ServiceError::Unauthorized) => return redirect("/na"),
            Err(ServiceError::NotFound) => {
                FlashMessage::error("Project not found.").send();
                return redirect("/projects");
            }
            Err(e) => {
                log::error!("Failed to load project: {e}");
                return HttpResponse::InternalServerError().finish();
            }
        };

    let mut context = base_context(&flash_messages, &user, "projects", &site);
    context.insert("project", &data.project);
    context.insert("client", &data.client);

    render_template(&tera, "projects/show.html", &context)
}

#[post("/projects/save")]
pub async fn save_project(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<SaveProjectForm>,
) -> impl Responder {
    let fields = form.fields();

    // Store uploads first so the tagged submission reaches the service as
    // plain field data plus stored paths.
    let thumbnail = match form
        .thumbnail
        .as_ref()
        .map(|file| uploads::store_image(file, &server_config.uploads_dir))
        .transpose()
    {
        Ok(path) => path.flatten(),
        Err(e) => {
            log::error!("Failed to store thumbnail: {e}");
            FlashMessage::error("Could not store the uploaded thumbnail.").send();
            return redirect("/projects");
        }
    };
    let gallery = match uploads::store_images(&form.gallery, &server_config.uploads_dir) {
        Ok(paths) => paths,
        Err(e) => {
            log::error!("Failed to store gallery: {e}");
            FlashMessage::error("Could not store the uploaded images.").send();
            return redirect("/projects");
        }
    };

    match project_service::save_project(repo.as_ref(), &user, &fields, thumbnail, gallery) {
        Ok(project) => {
            FlashMessage::success(if fields.id.is_some() {
                "Project updated."
            } else {
                "Project created."
            })
            .send();
            redirect(&format!("/projects/{}", project.id))
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Validation(errors)) => {
            let site = site_settings(repo.as_ref()).unwrap_or_default();
            let mut context = base_context(&flash_messages, &user, "projects", &site);
            context.insert("form", &fields);
            context.insert("field_errors", &field_errors(&errors));
            render_template(&tera, "projects/form.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Project no longer exists.").send();
            redirect("/projects")
        }
        Err(e) => {
            log::error!("Failed to save project: {e}");
            FlashMessage::error("Could not save the project.").send();
            redirect("/projects")
        }
    }
}

#[post("/projects/{project_id}/delete")]
pub async fn delete_project(
    project_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match project_service::delete_project(repo.as_ref(), &user, project_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Project deleted.").send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Project no longer exists.").send();
        }
        Err(e) => {
            log::error!("Failed to delete project: {e}");
            FlashMessage::error("Could not delete the project.").send();
        }
    }
    redirect("/projects")
}
