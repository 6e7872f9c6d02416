use serde::Deserialize;

use crate::domain::client::Client;
use crate::domain::project::Project;
use crate::dto::Pager;
use crate::listing::SortOrder;
use crate::pagination::Page;

/// Query parameters accepted by the project list page.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub client: Option<i32>,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the project list template.
pub struct ProjectsPageData {
    pub projects: Page<Project>,
    pub pager: Pager,
    pub search_query: Option<String>,
    pub status: Option<String>,
    pub sort: SortOrder,
    /// Client choices for the filter select and the edit form.
    pub clients: Vec<Client>,
    pub reset_href: String,
}

/// Aggregated data for the project detail page.
pub struct ProjectPageData {
    pub project: Project,
    pub client: Option<Client>,
}
