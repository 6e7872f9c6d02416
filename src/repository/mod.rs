//! Repository traits and their Diesel implementation.
//!
//! List queries return `(total, items)` so callers can build a
//! [`crate::pagination::Page`] envelope from one round-trip of state.

use chrono::NaiveDate;

use crate::db::DbPool;
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::invoice::{Invoice, InvoicePayload};
use crate::domain::lead::{Lead, LeadStatus, NewLead, UpdateLead};
use crate::domain::project::{NewProject, Project, UpdateProject};
use crate::domain::settings::Setting;
use crate::domain::types::{ClientId, InvoiceId, LeadId, ProjectId};
use crate::listing::SortOrder;
use crate::repository::errors::RepositoryResult;

pub mod client;
pub mod errors;
pub mod invoice;
pub mod lead;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod project;
pub mod settings;

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub sort: SortOrder,
    pub has_projects: bool,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn has_projects(mut self) -> Self {
        self.has_projects = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<ClientId>,
    pub sort: SortOrder,
    pub pagination: Option<Pagination>,
}

impl ProjectListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<ClientId>,
    pub sort: SortOrder,
    pub pagination: Option<Pagination>,
}

impl InvoiceListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeadListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: SortOrder,
    pub pagination: Option<Pagination>,
}

impl LeadListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, client_id: ClientId, updates: &UpdateClient)
    -> RepositoryResult<Client>;
    fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
}

pub trait ProjectReader {
    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<(usize, Vec<Project>)>;
}

pub trait ProjectWriter {
    fn create_project(&self, new_project: &NewProject, gallery: &[String])
    -> RepositoryResult<Project>;
    fn update_project(
        &self,
        project_id: ProjectId,
        updates: &UpdateProject,
        new_gallery: &[String],
    ) -> RepositoryResult<Project>;
    fn delete_project(&self, project_id: ProjectId) -> RepositoryResult<()>;
}

pub trait InvoiceReader {
    fn get_invoice_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>>;
    fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)>;
    /// Count of invoices issued in the given year, for number generation.
    fn count_invoices_in_year(&self, year: i32) -> RepositoryResult<usize>;
    /// `(issued_on, total)` of paid invoices issued on or after `since`.
    fn paid_invoice_totals(&self, since: NaiveDate) -> RepositoryResult<Vec<(NaiveDate, i64)>>;
    /// Sum of totals across sent and overdue invoices.
    fn outstanding_total(&self) -> RepositoryResult<i64>;
}

pub trait InvoiceWriter {
    fn create_invoice(&self, payload: &InvoicePayload) -> RepositoryResult<Invoice>;
    fn update_invoice(
        &self,
        invoice_id: InvoiceId,
        payload: &InvoicePayload,
    ) -> RepositoryResult<Invoice>;
    fn delete_invoice(&self, invoice_id: InvoiceId) -> RepositoryResult<()>;
}

pub trait LeadReader {
    fn get_lead_by_id(&self, id: LeadId) -> RepositoryResult<Option<Lead>>;
    fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
    fn count_leads_with_status(&self, status: LeadStatus) -> RepositoryResult<usize>;
}

pub trait LeadWriter {
    fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead>;
    fn update_lead(&self, lead_id: LeadId, updates: &UpdateLead) -> RepositoryResult<Lead>;
    fn set_lead_status(&self, lead_id: LeadId, status: LeadStatus) -> RepositoryResult<Lead>;
    fn delete_lead(&self, lead_id: LeadId) -> RepositoryResult<()>;
}

pub trait SettingsReader {
    fn load_settings(&self) -> RepositoryResult<Vec<Setting>>;
}

pub trait SettingsWriter {
    fn save_settings(&self, settings: &[Setting]) -> RepositoryResult<()>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<crate::db::DbConnection> {
        Ok(crate::db::get_connection(&self.pool)?)
    }
}
