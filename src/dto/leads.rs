use serde::Deserialize;

use crate::domain::lead::Lead;
use crate::dto::Pager;
use crate::listing::SortOrder;
use crate::pagination::Page;

/// Query parameters accepted by the lead list page.
#[derive(Debug, Default, Deserialize)]
pub struct LeadListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the lead list template.
pub struct LeadsPageData {
    pub leads: Page<Lead>,
    pub pager: Pager,
    pub search_query: Option<String>,
    pub status: Option<String>,
    pub sort: SortOrder,
    pub reset_href: String,
}
