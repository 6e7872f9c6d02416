//! Mock repository implementation for isolating services in tests.

use chrono::NaiveDate;
use mockall::mock;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::invoice::{Invoice, InvoicePayload};
use crate::domain::lead::{Lead, LeadStatus, NewLead, UpdateLead};
use crate::domain::project::{NewProject, Project, UpdateProject};
use crate::domain::settings::Setting;
use crate::domain::types::{ClientId, InvoiceId, LeadId, ProjectId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, InvoiceListQuery, InvoiceReader, InvoiceWriter,
    LeadListQuery, LeadReader, LeadWriter, ProjectListQuery, ProjectReader, ProjectWriter,
    SettingsReader, SettingsWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(
            &self,
            client_id: ClientId,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
        fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
    }

    impl ProjectReader for Repository {
        fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;
        fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<(usize, Vec<Project>)>;
    }

    impl ProjectWriter for Repository {
        fn create_project(
            &self,
            new_project: &NewProject,
            gallery: &[String],
        ) -> RepositoryResult<Project>;
        fn update_project(
            &self,
            project_id: ProjectId,
            updates: &UpdateProject,
            new_gallery: &[String],
        ) -> RepositoryResult<Project>;
        fn delete_project(&self, project_id: ProjectId) -> RepositoryResult<()>;
    }

    impl InvoiceReader for Repository {
        fn get_invoice_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>>;
        fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)>;
        fn count_invoices_in_year(&self, year: i32) -> RepositoryResult<usize>;
        fn paid_invoice_totals(&self, since: NaiveDate) -> RepositoryResult<Vec<(NaiveDate, i64)>>;
        fn outstanding_total(&self) -> RepositoryResult<i64>;
    }

    impl InvoiceWriter for Repository {
        fn create_invoice(&self, payload: &InvoicePayload) -> RepositoryResult<Invoice>;
        fn update_invoice(
            &self,
            invoice_id: InvoiceId,
            payload: &InvoicePayload,
        ) -> RepositoryResult<Invoice>;
        fn delete_invoice(&self, invoice_id: InvoiceId) -> RepositoryResult<()>;
    }

    impl LeadReader for Repository {
        fn get_lead_by_id(&self, id: LeadId) -> RepositoryResult<Option<Lead>>;
        fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
        fn count_leads_with_status(&self, status: LeadStatus) -> RepositoryResult<usize>;
    }

    impl LeadWriter for Repository {
        fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead>;
        fn update_lead(&self, lead_id: LeadId, updates: &UpdateLead) -> RepositoryResult<Lead>;
        fn set_lead_status(&self, lead_id: LeadId, status: LeadStatus) -> RepositoryResult<Lead>;
        fn delete_lead(&self, lead_id: LeadId) -> RepositoryResult<()>;
    }

    impl SettingsReader for Repository {
        fn load_settings(&self) -> RepositoryResult<Vec<Setting>>;
    }

    impl SettingsWriter for Repository {
        fn save_settings(&self, settings: &[Setting]) -> RepositoryResult<()>;
    }
}
