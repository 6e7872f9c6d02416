use chrono::NaiveDate;

use agency_desk::domain::client::{NewClient, UpdateClient};
use agency_desk::domain::invoice::{InvoiceDraft, InvoiceStatus};
use agency_desk::domain::lead::{LeadStatus, NewLead};
use agency_desk::domain::project::{NewProject, ProjectStatus, UpdateProject};
use agency_desk::domain::settings::{Setting, SiteSettings, Theme};
use agency_desk::domain::types::{ClientId, InvoiceId, LeadId, ProjectId};
use agency_desk::listing::SortOrder;
use agency_desk::repository::errors::RepositoryError;
use agency_desk::repository::{
    ClientListQuery, ClientReader, ClientWriter, DieselRepository, InvoiceListQuery,
    InvoiceReader, InvoiceWriter, LeadListQuery, LeadReader, LeadWriter, ProjectListQuery,
    ProjectReader, ProjectWriter, SettingsReader, SettingsWriter,
};

mod common;

fn new_client(name: &str) -> NewClient {
    NewClient::new(
        name.to_string(),
        None,
        Some(format!("{}@example.com", name.to_lowercase())),
        None,
        None,
        None,
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn client_crud_round_trip() {
    let test_db = common::TestDb::new("client_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let alice = repo.create_client(&new_client("Alice")).unwrap();
    let bob = repo.create_client(&new_client("Bob")).unwrap();

    let (total, items) = repo
        .list_clients(ClientListQuery::new().sort(SortOrder::Name))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].name, "Alice");
    assert_eq!(items[1].name, "Bob");

    let (search_total, search_items) = repo
        .list_clients(ClientListQuery::new().search("bob"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].name, "Bob");

    let updates = UpdateClient::new(
        "Bobby".to_string(),
        Some("Bobby Ltd".to_string()),
        None,
        None,
        None,
        None,
    );
    let updated = repo
        .update_client(ClientId::new(bob.id).unwrap(), &updates)
        .unwrap();
    assert_eq!(updated.name, "Bobby");
    assert_eq!(updated.company.as_deref(), Some("Bobby Ltd"));
    assert_eq!(updated.email, None);

    repo.delete_client(ClientId::new(alice.id).unwrap()).unwrap();
    assert!(
        repo.get_client_by_id(ClientId::new(alice.id).unwrap())
            .unwrap()
            .is_none()
    );

    let (total_after, _) = repo.list_clients(ClientListQuery::new()).unwrap();
    assert_eq!(total_after, 1);
}

#[test]
fn has_projects_filter_and_project_counts() {
    let test_db = common::TestDb::new("client_has_projects.db");
    let repo = DieselRepository::new(test_db.pool());

    let with = repo.create_client(&new_client("With")).unwrap();
    let without = repo.create_client(&new_client("Without")).unwrap();

    let new_project = NewProject::new(
        with.id,
        "Site".to_string(),
        None,
        ProjectStatus::Planned,
        vec![],
        None,
        None,
    );
    repo.create_project(&new_project, &[]).unwrap();

    let (total, items) = repo
        .list_clients(ClientListQuery::new().has_projects())
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, with.id);
    assert_eq!(items[0].project_count, Some(1));

    let (all_total, all_items) = repo
        .list_clients(ClientListQuery::new().sort(SortOrder::Name))
        .unwrap();
    assert_eq!(all_total, 2);
    let lonely = all_items.iter().find(|c| c.id == without.id).unwrap();
    assert_eq!(lonely.project_count, Some(0));
}

#[test]
fn deleting_a_client_with_projects_is_rejected() {
    let test_db = common::TestDb::new("client_delete_fk.db");
    let repo = DieselRepository::new(test_db.pool());

    let client = repo.create_client(&new_client("Busy")).unwrap();
    let new_project = NewProject::new(
        client.id,
        "Site".to_string(),
        None,
        ProjectStatus::Planned,
        vec![],
        None,
        None,
    );
    repo.create_project(&new_project, &[]).unwrap();

    let result = repo.delete_client(ClientId::new(client.id).unwrap());
    assert!(matches!(
        result,
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn project_gallery_and_tags_round_trip() {
    let test_db = common::TestDb::new("project_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());

    let client = repo.create_client(&new_client("Studio")).unwrap();
    let new_project = NewProject::new(
        client.id,
        "Brand refresh".to_string(),
        Some("Full identity".to_string()),
        ProjectStatus::InProgress,
        vec!["branding".to_string(), "web".to_string()],
        Some(date(2026, 2, 1)),
        None,
    )
    .thumbnail("thumb.png");

    let created = repo
        .create_project(
            &new_project,
            &["a.png".to_string(), "b.png".to_string()],
        )
        .unwrap();
    assert_eq!(created.gallery, vec!["a.png", "b.png"]);

    let fetched = repo
        .get_project_by_id(ProjectId::new(created.id).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(fetched.tags, vec!["branding", "web"]);
    assert_eq!(fetched.thumbnail.as_deref(), Some("thumb.png"));
    assert_eq!(fetched.gallery, vec!["a.png", "b.png"]);

    // Update without a replacement thumbnail keeps the stored one and
    // appends the new gallery upload.
    let updates = UpdateProject {
        client_id: client.id,
        title: "Brand refresh v2".to_string(),
        description: None,
        status: ProjectStatus::Completed,
        tags: vec!["branding".to_string()],
        thumbnail: None,
        started_on: Some(date(2026, 2, 1)),
        finished_on: Some(date(2026, 5, 1)),
    };
    let updated = repo
        .update_project(
            ProjectId::new(created.id).unwrap(),
            &updates,
            &["c.png".to_string()],
        )
        .unwrap();
    assert_eq!(updated.title, "Brand refresh v2");
    assert_eq!(updated.status, ProjectStatus::Completed);
    assert_eq!(updated.thumbnail.as_deref(), Some("thumb.png"));
    assert_eq!(updated.gallery, vec!["a.png", "b.png", "c.png"]);

    let (completed_total, _) = repo
        .list_projects(ProjectListQuery::new().status("completed"))
        .unwrap();
    assert_eq!(completed_total, 1);
}

#[test]
fn invoice_save_paths_persist_items_and_totals() {
    let test_db = common::TestDb::new("invoice_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());

    let client = repo.create_client(&new_client("Billing")).unwrap();

    let mut draft = InvoiceDraft::new();
    draft.client_id = client.id;
    draft.number = "INV-2026-0001".to_string();
    draft.status = InvoiceStatus::Sent;
    draft.issued_on = Some(date(2026, 6, 1));
    draft.due_on = Some(date(2026, 7, 1));
    draft.set_item_description(0, "Design");
    draft.set_item_quantity(0, 2);
    draft.set_item_unit_price(0, 500_000);
    draft.add_item();
    draft.set_item_description(1, "Dev");
    draft.set_item_quantity(1, 1);
    draft.set_item_unit_price(1, 1_000_000);

    let created = repo.create_invoice(&draft.clone().into_payload()).unwrap();
    assert_eq!(created.subtotal, 2_000_000);
    assert_eq!(created.tax, 220_000);
    assert_eq!(created.total, 2_220_000);
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.items[0].amount(), 1_000_000);

    // Editing through a reseeded draft replaces the item set.
    let mut edited = InvoiceDraft::from_invoice(&created);
    assert!(edited.remove_item(0));
    edited.set_item_quantity(0, 3);
    edited.status = InvoiceStatus::Paid;
    let payload = edited.into_payload();
    assert_eq!(payload.id, Some(created.id));

    let updated = repo
        .update_invoice(InvoiceId::new(created.id).unwrap(), &payload)
        .unwrap();
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.subtotal, 3_000_000);
    assert_eq!(updated.tax, 330_000);
    assert_eq!(updated.total, 3_330_000);

    assert_eq!(repo.count_invoices_in_year(2026).unwrap(), 1);
    assert_eq!(repo.count_invoices_in_year(2025).unwrap(), 0);

    let paid = repo.paid_invoice_totals(date(2026, 1, 1)).unwrap();
    assert_eq!(paid, vec![(date(2026, 6, 1), 3_330_000)]);
    assert_eq!(repo.outstanding_total().unwrap(), 0);

    let (sent_total, _) = repo
        .list_invoices(InvoiceListQuery::new().status("paid"))
        .unwrap();
    assert_eq!(sent_total, 1);

    repo.delete_invoice(InvoiceId::new(created.id).unwrap())
        .unwrap();
    assert!(
        repo.get_invoice_by_id(InvoiceId::new(created.id).unwrap())
            .unwrap()
            .is_none()
    );
}

#[test]
fn outstanding_total_sums_sent_and_overdue() {
    let test_db = common::TestDb::new("invoice_outstanding.db");
    let repo = DieselRepository::new(test_db.pool());

    let client = repo.create_client(&new_client("Billing")).unwrap();

    for (number, status, unit_price) in [
        ("INV-2026-0001", InvoiceStatus::Sent, 100),
        ("INV-2026-0002", InvoiceStatus::Overdue, 200),
        ("INV-2026-0003", InvoiceStatus::Draft, 400),
    ] {
        let mut draft = InvoiceDraft::new();
        draft.client_id = client.id;
        draft.number = number.to_string();
        draft.status = status;
        draft.issued_on = Some(date(2026, 3, 1));
        draft.due_on = Some(date(2026, 4, 1));
        draft.set_item_description(0, "work");
        draft.set_item_quantity(0, 1);
        draft.set_item_unit_price(0, unit_price);
        repo.create_invoice(&draft.into_payload()).unwrap();
    }

    // 100 + 11 tax + 200 + 22 tax; the draft invoice is excluded.
    assert_eq!(repo.outstanding_total().unwrap(), 333);
}

#[test]
fn lead_pipeline_round_trip() {
    let test_db = common::TestDb::new("lead_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());

    let new_lead = NewLead::new(
        "Jane".to_string(),
        "jane@example.com".to_string(),
        None,
        Some("Jane Co".to_string()),
        "We need a new site".to_string(),
        Some("landing".to_string()),
    );
    let lead = repo.create_lead(&new_lead).unwrap();
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(repo.count_leads_with_status(LeadStatus::New).unwrap(), 1);

    let contacted = repo
        .set_lead_status(LeadId::new(lead.id).unwrap(), LeadStatus::Contacted)
        .unwrap();
    assert_eq!(contacted.status, LeadStatus::Contacted);
    assert_eq!(repo.count_leads_with_status(LeadStatus::New).unwrap(), 0);

    let (total, items) = repo
        .list_leads(LeadListQuery::new().status("contacted"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].company.as_deref(), Some("Jane Co"));

    let (search_total, _) = repo.list_leads(LeadListQuery::new().search("jane")).unwrap();
    assert_eq!(search_total, 1);

    repo.delete_lead(LeadId::new(lead.id).unwrap()).unwrap();
    assert!(matches!(
        repo.delete_lead(LeadId::new(lead.id).unwrap()),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn settings_round_trip_through_the_store() {
    let test_db = common::TestDb::new("settings_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());

    assert!(repo.load_settings().unwrap().is_empty());

    let site = SiteSettings {
        agency_name: "Northlight Studio".to_string(),
        tagline: "Design & build".to_string(),
        theme: Theme::Dark,
        ..SiteSettings::default()
    };
    repo.save_settings(&site.to_rows()).unwrap();

    let rows: Vec<Setting> = repo.load_settings().unwrap();
    let rebuilt = SiteSettings::from_rows(&rows);
    assert_eq!(rebuilt, site);

    // Saving again overwrites instead of duplicating keys.
    repo.save_settings(&site.to_rows()).unwrap();
    assert_eq!(repo.load_settings().unwrap().len(), rows.len());
}

#[test]
fn pagination_returns_stable_pages() {
    let test_db = common::TestDb::new("client_pagination.db");
    let repo = DieselRepository::new(test_db.pool());

    for i in 0..25 {
        repo.create_client(&new_client(&format!("Client{i:02}")))
            .unwrap();
    }

    let (total, first) = repo
        .list_clients(ClientListQuery::new().sort(SortOrder::Name).paginate(1, 10))
        .unwrap();
    assert_eq!(total, 25);
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].name, "Client00");

    let (_, third) = repo
        .list_clients(ClientListQuery::new().sort(SortOrder::Name).paginate(3, 10))
        .unwrap();
    assert_eq!(third.len(), 5);
    assert_eq!(third[0].name, "Client20");
}
