use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::invoice::{Invoice, InvoiceDraft};
use crate::domain::project::Project;
use crate::dto::Pager;
use crate::listing::SortOrder;
use crate::pagination::Page;

/// Query parameters accepted by the invoice list page.
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub client: Option<i32>,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the invoice list template.
pub struct InvoicesPageData {
    pub invoices: Page<Invoice>,
    pub pager: Pager,
    pub search_query: Option<String>,
    pub status: Option<String>,
    pub sort: SortOrder,
    /// Client display names keyed by id for the list rows.
    pub client_names: HashMap<i32, String>,
    pub reset_href: String,
}

/// One line of the edit form with its derived amount resolved.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LineItemView {
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub amount: i64,
}

/// Data backing the invoice create/edit form.
pub struct InvoiceFormData {
    pub draft: InvoiceDraft,
    pub items: Vec<LineItemView>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
}

impl InvoiceFormData {
    /// Resolves the draft's derived values for rendering; the same figures go
    /// into the submit payload.
    pub fn from_draft(draft: InvoiceDraft, clients: Vec<Client>, projects: Vec<Project>) -> Self {
        let items = draft
            .items()
            .iter()
            .map(|item| LineItemView {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                amount: item.amount(),
            })
            .collect();
        let subtotal = draft.subtotal();
        let tax = draft.tax();
        let total = draft.total();
        Self {
            draft,
            items,
            subtotal,
            tax,
            total,
            clients,
            projects,
        }
    }
}
