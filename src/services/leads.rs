use validator::Validate;

use crate::auth::{AuthenticatedUser, SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};
use crate::domain::lead::{Lead, LeadStatus, NewLead, UpdateLead};
use crate::domain::types::LeadId;
use crate::dto::leads::{LeadListParams, LeadsPageData};
use crate::dto::pager;
use crate::forms::lead::{ContactForm, LeadStatusForm, SaveLeadForm};
use crate::listing::{ListState, SortOrder};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Page};
use crate::repository::{LeadListQuery, LeadReader, LeadWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

const LEAD_STATUSES: [&str; 4] = ["new", "contacted", "converted", "closed"];

/// Loads one page of the lead list for the given query parameters.
pub fn load_leads_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: LeadListParams,
) -> ServiceResult<LeadsPageData>
where
    R: LeadReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let search_query = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let status = params.status.filter(|s| LEAD_STATUSES.contains(&s.as_str()));
    let sort = params
        .sort
        .as_deref()
        .map(SortOrder::from)
        .unwrap_or_default();
    let page = params.page.unwrap_or(1);

    let mut query = LeadListQuery::new()
        .sort(sort)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        query = query.search(term.clone());
    }
    if let Some(status) = &status {
        query = query.status(status.clone());
    }

    let (total, leads) = repo.list_leads(query)?;
    let leads = Page::new(leads, total, page, DEFAULT_ITEMS_PER_PAGE);

    let mut state = ListState::new("/leads")
        .filter("search", "")
        .filter("status", "all")
        .filter("sort", "newest");
    if let Some(term) = &search_query {
        state.submit_search(term);
    }
    if let Some(status) = &status {
        state.set_filter("status", status);
    }
    state.set_filter("sort", sort.as_str());
    state.set_last_page(leads.last_page);
    state.go_to_page(leads.current_page);

    let pager = pager(&state, &leads);

    Ok(LeadsPageData {
        leads,
        pager,
        search_query,
        status,
        sort,
        reset_href: state.reset_href(),
    })
}

/// Captures a lead from the public contact form. No authentication: this is
/// the landing page's submission path.
pub fn capture_lead<R>(repo: &R, form: &ContactForm) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    form.validate()?;
    let new_lead = NewLead::try_from(form)?;
    repo.create_lead(&new_lead).map_err(|err| {
        log::error!("Failed to capture lead: {err}");
        ServiceError::from(err)
    })
}

/// Validates the back-office form and dispatches create or update by id
/// presence.
pub fn save_lead<R>(repo: &R, user: &AuthenticatedUser, form: &SaveLeadForm) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    form.validate()?;

    let lead = match form.id {
        Some(id) => {
            let lead_id = LeadId::new(id)?;
            let updates = UpdateLead::try_from(form)?;
            repo.update_lead(lead_id, &updates)?
        }
        None => {
            let new_lead = NewLead::try_from(form)?;
            repo.create_lead(&new_lead)?
        }
    };

    Ok(lead)
}

/// Applies a status transition issued from the lead list.
pub fn set_lead_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &LeadStatusForm,
) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let lead_id = LeadId::new(form.id)?;
    let status = LeadStatus::from(form.status.as_str());
    repo.set_lead_status(lead_id, status).map_err(Into::into)
}

/// Removes a lead after an explicit confirmation in the UI.
pub fn delete_lead<R>(repo: &R, user: &AuthenticatedUser, lead_id: i32) -> ServiceResult<()>
where
    R: LeadWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let lead_id = LeadId::new(lead_id)?;
    repo.delete_lead(lead_id).map_err(|err| {
        log::error!("Failed to delete lead {lead_id}: {err}");
        err
    })?;
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "user@example.com".to_string(),
            name: "User".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: usize::MAX,
        }
    }

    #[test]
    fn capture_lead_needs_no_authentication() {
        let mut repo = MockRepository::new();
        repo.expect_create_lead()
            .withf(|lead| lead.source.as_deref() == Some("landing"))
            .returning(|_| Ok(Lead::default()));

        let form = ContactForm {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: String::new(),
            company: String::new(),
            message: "hi there".to_string(),
        };
        assert!(capture_lead(&repo, &form).is_ok());
    }

    #[test]
    fn status_transition_targets_the_given_lead() {
        let mut repo = MockRepository::new();
        repo.expect_set_lead_status()
            .withf(|id, status| id.get() == 5 && *status == LeadStatus::Contacted)
            .returning(|_, _| Ok(Lead::default()));

        let form = LeadStatusForm {
            id: 5,
            status: "contacted".to_string(),
        };
        assert!(set_lead_status(&repo, &user(), &form).is_ok());
    }
}
