use validator::Validate;

use crate::auth::{AuthenticatedUser, SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};
use crate::domain::project::Project;
use crate::domain::types::{ClientId, ProjectId};
use crate::dto::pager;
use crate::dto::projects::{ProjectListParams, ProjectPageData, ProjectsPageData};
use crate::forms::project::ProjectFields;
use crate::listing::{ListState, SortOrder};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Page};
use crate::repository::{
    ClientListQuery, ClientReader, ProjectListQuery, ProjectReader, ProjectWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};

const PROJECT_STATUSES: [&str; 4] = ["planned", "in_progress", "completed", "archived"];

/// Loads one page of the project list for the given query parameters.
pub fn load_projects_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ProjectListParams,
) -> ServiceResult<ProjectsPageData>
where
    R: ProjectReader + ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let search_query = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let status = params
        .status
        .filter(|s| PROJECT_STATUSES.contains(&s.as_str()));
    let sort = params
        .sort
        .as_deref()
        .map(SortOrder::from)
        .unwrap_or_default();
    let page = params.page.unwrap_or(1);

    let mut query = ProjectListQuery::new()
        .sort(sort)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        query = query.search(term.clone());
    }
    if let Some(status) = &status {
        query = query.status(status.clone());
    }
    if let Some(client) = params.client {
        query = query.client(ClientId::new(client)?);
    }

    let (total, projects) = repo.list_projects(query)?;
    let projects = Page::new(projects, total, page, DEFAULT_ITEMS_PER_PAGE);

    let mut state = ListState::new("/projects")
        .filter("search", "")
        .filter("status", "all")
        .filter("client", "")
        .filter("sort", "newest");
    if let Some(term) = &search_query {
        state.submit_search(term);
    }
    if let Some(status) = &status {
        state.set_filter("status", status);
    }
    if let Some(client) = params.client {
        state.set_filter("client", client.to_string());
    }
    state.set_filter("sort", sort.as_str());
    state.set_last_page(projects.last_page);
    state.go_to_page(projects.current_page);

    let pager = pager(&state, &projects);

    // All clients back the filter select; the agency's client book is small.
    let (_, clients) = repo.list_clients(ClientListQuery::new().sort(SortOrder::Name))?;

    Ok(ProjectsPageData {
        projects,
        pager,
        search_query,
        status,
        sort,
        clients,
        reset_href: state.reset_href(),
    })
}

/// Loads the project detail page.
pub fn load_project_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    project_id: i32,
) -> ServiceResult<ProjectPageData>
where
    R: ProjectReader + ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let project_id = ProjectId::new(project_id)?;
    let project = repo
        .get_project_by_id(project_id)?
        .ok_or(ServiceError::NotFound)?;
    let client = repo.get_client_by_id(ClientId::new(project.client_id)?)?;

    Ok(ProjectPageData { project, client })
}

/// Validates the scalar fields and dispatches create or update by id
/// presence. `thumbnail` and `gallery` are the stored paths of any uploads
/// that arrived with this submission; absent files keep the stored images.
pub fn save_project<R>(
    repo: &R,
    user: &AuthenticatedUser,
    fields: &ProjectFields,
    thumbnail: Option<String>,
    gallery: Vec<String>,
) -> ServiceResult<Project>
where
    R: ProjectWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    fields.validate()?;

    let project = match fields.id {
        Some(id) => {
            let project_id = ProjectId::new(id)?;
            let updates = fields.to_update_project(thumbnail)?;
            repo.update_project(project_id, &updates, &gallery)?
        }
        None => {
            let new_project = fields.to_new_project(thumbnail)?;
            repo.create_project(&new_project, &gallery)?
        }
    };

    Ok(project)
}

/// Removes a project after an explicit confirmation in the UI.
pub fn delete_project<R>(repo: &R, user: &AuthenticatedUser, project_id: i32) -> ServiceResult<()>
where
    R: ProjectWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let project_id = ProjectId::new(project_id)?;
    repo.delete_project(project_id).map_err(|err| {
        log::error!("Failed to delete project {project_id}: {err}");
        err
    })?;
    Ok(())
}
