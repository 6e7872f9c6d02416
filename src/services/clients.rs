use validator::Validate;

use crate::auth::{AuthenticatedUser, SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};
use crate::domain::client::Client;
use crate::domain::types::ClientId;
use crate::dto::clients::{ClientListParams, ClientPageData, ClientsPageData};
use crate::dto::pager;
use crate::forms::client::SaveClientForm;
use crate::listing::{ListState, SortOrder};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Page};
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, InvoiceListQuery, InvoiceReader,
    ProjectListQuery, ProjectReader,
};
use crate::services::{ServiceResult, ensure_role};

/// Loads one page of the client list for the given query parameters.
pub fn load_clients_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ClientListParams,
) -> ServiceResult<ClientsPageData>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let search_query = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let sort = params
        .sort
        .as_deref()
        .map(SortOrder::from)
        .unwrap_or_default();
    let has_projects = params.has_projects.as_deref() == Some("1");
    let page = params.page.unwrap_or(1);

    let mut query = ClientListQuery::new()
        .sort(sort)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        query = query.search(term.clone());
    }
    if has_projects {
        query = query.has_projects();
    }

    let (total, clients) = repo.list_clients(query)?;
    let clients = Page::new(clients, total, page, DEFAULT_ITEMS_PER_PAGE);

    let mut state = ListState::new("/clients")
        .filter("search", "")
        .filter("has_projects", "")
        .filter("sort", "newest");
    if let Some(term) = &search_query {
        state.submit_search(term);
    }
    if has_projects {
        state.set_filter("has_projects", "1");
    }
    state.set_filter("sort", sort.as_str());
    state.set_last_page(clients.last_page);
    state.go_to_page(clients.current_page);

    let pager = pager(&state, &clients);

    Ok(ClientsPageData {
        clients,
        pager,
        search_query,
        sort,
        has_projects,
        reset_href: state.reset_href(),
    })
}

/// Loads the client detail page: the record plus its projects and invoices.
pub fn load_client_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<ClientPageData>
where
    R: ClientReader + ProjectReader + InvoiceReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let client_id = ClientId::new(client_id)?;
    let client = repo
        .get_client_by_id(client_id)?
        .ok_or(crate::services::ServiceError::NotFound)?;

    let (_, projects) = repo.list_projects(ProjectListQuery::new().client(client_id))?;
    let (_, invoices) = repo.list_invoices(InvoiceListQuery::new().client(client_id))?;

    Ok(ClientPageData {
        client,
        projects,
        invoices,
    })
}

/// Validates the save form and dispatches create or update by id presence.
pub fn save_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &SaveClientForm,
) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    form.validate()?;

    let client = match form.id {
        Some(id) => {
            let client_id = ClientId::new(id)?;
            repo.update_client(client_id, &form.to_update_client())?
        }
        None => repo.create_client(&form.to_new_client())?,
    };

    Ok(client)
}

/// Removes a client after an explicit confirmation in the UI.
pub fn delete_client<R>(repo: &R, user: &AuthenticatedUser, client_id: i32) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let client_id = ClientId::new(client_id)?;
    repo.delete_client(client_id).map_err(|err| {
        log::error!("Failed to delete client {client_id}: {err}");
        err
    })?;
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "user@example.com".to_string(),
            name: "User".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: usize::MAX,
        }
    }

    #[test]
    fn listing_requires_access_role() {
        let repo = MockRepository::new();
        let result = load_clients_page(&repo, &user(&[]), ClientListParams::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn save_with_id_updates() {
        let mut repo = MockRepository::new();
        repo.expect_update_client()
            .withf(|id, updates| id.get() == 42 && updates.name == "Acme")
            .returning(|_, _| Ok(Client::default()));

        let form = SaveClientForm {
            id: Some(42),
            name: "Acme".to_string(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
        };
        assert!(save_client(&repo, &user(&[SERVICE_ACCESS_ROLE]), &form).is_ok());
    }

    #[test]
    fn save_without_id_creates() {
        let mut repo = MockRepository::new();
        repo.expect_create_client()
            .withf(|new_client| new_client.name == "Acme")
            .returning(|_| Ok(Client::default()));

        let form = SaveClientForm {
            id: None,
            name: "Acme".to_string(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
        };
        assert!(save_client(&repo, &user(&[SERVICE_ACCESS_ROLE]), &form).is_ok());
    }

    #[test]
    fn invalid_form_surfaces_field_errors() {
        let repo = MockRepository::new();
        let form = SaveClientForm {
            id: None,
            name: String::new(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
        };
        let result = save_client(&repo, &user(&[SERVICE_ACCESS_ROLE]), &form);
        match result {
            Err(ServiceError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("name"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn delete_requires_admin_role() {
        let repo = MockRepository::new();
        let result = delete_client(&repo, &user(&[SERVICE_ACCESS_ROLE]), 1);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
