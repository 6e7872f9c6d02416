use chrono::Datelike;
use validator::Validate;

use crate::auth::{AuthenticatedUser, SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};
use crate::domain::invoice::{Invoice, InvoiceDraft};
use crate::domain::types::{ClientId, InvoiceId};
use crate::dto::invoices::{InvoiceFormData, InvoiceListParams, InvoicesPageData};
use crate::dto::pager;
use crate::forms::invoice::SaveInvoiceForm;
use crate::listing::{ListState, SortOrder};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Page};
use crate::repository::{
    ClientListQuery, ClientReader, InvoiceListQuery, InvoiceReader, InvoiceWriter,
    ProjectListQuery, ProjectReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};

const INVOICE_STATUSES: [&str; 4] = ["draft", "sent", "paid", "overdue"];

/// Loads one page of the invoice list for the given query parameters.
pub fn load_invoices_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: InvoiceListParams,
) -> ServiceResult<InvoicesPageData>
where
    R: InvoiceReader + ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let search_query = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let status = params
        .status
        .filter(|s| INVOICE_STATUSES.contains(&s.as_str()));
    let sort = params
        .sort
        .as_deref()
        .map(SortOrder::from)
        .unwrap_or_default();
    let page = params.page.unwrap_or(1);

    let mut query = InvoiceListQuery::new()
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

    let (total, invoices) = repo.list_invoices(query)?;
    let invoices = Page::new(invoices, total, page, DEFAULT_ITEMS_PER_PAGE);

    let mut state = ListState::new("/invoices")
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
    state.set_last_page(invoices.last_page);
    state.go_to_page(invoices.current_page);

    let pager = pager(&state, &invoices);

    let (_, clients) = repo.list_clients(ClientListQuery::new().sort(SortOrder::Name))?;
    let client_names = clients.into_iter().map(|c| (c.id, c.name)).collect();

    Ok(InvoicesPageData {
        invoices,
        pager,
        search_query,
        status,
        sort,
        client_names,
        reset_href: state.reset_href(),
    })
}

/// Data for the create/edit form. A `None` id seeds create-mode defaults;
/// re-invoking with a different id fully replaces the draft.
pub fn load_invoice_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    invoice_id: Option<i32>,
) -> ServiceResult<InvoiceFormData>
where
    R: InvoiceReader + ClientReader + ProjectReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let draft = match invoice_id {
        Some(id) => {
            let invoice = repo
                .get_invoice_by_id(InvoiceId::new(id)?)?
                .ok_or(ServiceError::NotFound)?;
            InvoiceDraft::from_invoice(&invoice)
        }
        None => InvoiceDraft::new(),
    };

    let (_, clients) = repo.list_clients(ClientListQuery::new().sort(SortOrder::Name))?;
    let (_, projects) = repo.list_projects(ProjectListQuery::new().sort(SortOrder::Name))?;

    Ok(InvoiceFormData::from_draft(draft, clients, projects))
}

/// Validates the form, recomputes the derived totals and dispatches create or
/// update by id presence. An empty number on create is generated as
/// `INV-<year>-<seq>`.
pub fn save_invoice<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &SaveInvoiceForm,
) -> ServiceResult<Invoice>
where
    R: InvoiceReader + InvoiceWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    form.validate()?;

    let mut draft = form.to_draft()?;
    if draft.number.is_empty() {
        let year = draft
            .issued_on
            .map(|d| d.year())
            .unwrap_or_else(|| chrono::Utc::now().year());
        let seq = repo.count_invoices_in_year(year)? + 1;
        draft.number = format!("INV-{year}-{seq:04}");
    }

    let payload = draft.into_payload();
    let invoice = match payload.id {
        Some(id) => repo.update_invoice(InvoiceId::new(id)?, &payload)?,
        None => repo.create_invoice(&payload)?,
    };

    Ok(invoice)
}

/// Removes an invoice after an explicit confirmation in the UI.
pub fn delete_invoice<R>(repo: &R, user: &AuthenticatedUser, invoice_id: i32) -> ServiceResult<()>
where
    R: InvoiceWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let invoice_id = InvoiceId::new(invoice_id)?;
    repo.delete_invoice(invoice_id).map_err(|err| {
        log::error!("Failed to delete invoice {invoice_id}: {err}");
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

    fn form() -> SaveInvoiceForm {
        SaveInvoiceForm {
            id: None,
            client_id: 7,
            project_id: String::new(),
            number: String::new(),
            status: "draft".to_string(),
            issued_on: "2026-06-01".to_string(),
            due_on: "2026-07-01".to_string(),
            notes: String::new(),
            item_description: vec!["Design".to_string(), "Dev".to_string()],
            item_quantity: vec![2, 1],
            item_unit_price: vec![500_000, 1_000_000],
        }
    }

    #[test]
    fn create_generates_number_and_sends_computed_totals() {
        let mut repo = MockRepository::new();
        repo.expect_count_invoices_in_year()
            .withf(|year| *year == 2026)
            .returning(|_| Ok(11));
        repo.expect_create_invoice()
            .withf(|payload| {
                payload.number == "INV-2026-0012"
                    && payload.subtotal == 2_000_000
                    && payload.tax == 220_000
                    && payload.total == 2_220_000
                    && payload.items.len() == 2
            })
            .returning(|_| Ok(Invoice::default()));

        assert!(save_invoice(&repo, &user(), &form()).is_ok());
    }

    #[test]
    fn save_with_id_dispatches_update_to_that_id() {
        let mut repo = MockRepository::new();
        repo.expect_update_invoice()
            .withf(|id, payload| id.get() == 42 && payload.id == Some(42))
            .returning(|_, _| Ok(Invoice::default()));

        let mut edit = form();
        edit.id = Some(42);
        edit.number = "INV-2026-0001".to_string();
        assert!(save_invoice(&repo, &user(), &edit).is_ok());
    }

    #[test]
    fn missing_client_is_a_field_error() {
        let repo = MockRepository::new();
        let mut broken = form();
        broken.client_id = 0;
        let result = save_invoice(&repo, &user(), &broken);
        assert!(matches!(
            result,
            Err(crate::services::ServiceError::Validation(_))
        ));
    }
}
