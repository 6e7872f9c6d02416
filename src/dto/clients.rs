use serde::Deserialize;

use crate::domain::client::Client;
use crate::domain::invoice::Invoice;
use crate::domain::project::Project;
use crate::dto::Pager;
use crate::listing::SortOrder;
use crate::pagination::Page;

/// Query parameters accepted by the client list page.
#[derive(Debug, Default, Deserialize)]
pub struct ClientListParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub has_projects: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the client list template.
pub struct ClientsPageData {
    pub clients: Page<Client>,
    pub pager: Pager,
    pub search_query: Option<String>,
    pub sort: SortOrder,
    pub has_projects: bool,
    pub reset_href: String,
}

/// Aggregated data for the client detail page.
pub struct ClientPageData {
    pub client: Client,
    pub projects: Vec<Project>,
    pub invoices: Vec<Invoice>,
}
