//! Invoice aggregate and its editable draft.
//!
//! `amount`, `subtotal`, `tax` and `total` are derived values: they are always
//! recomputed from line items, in the same call that changes an input, and are
//! never editable on their own. The draft merges the computed totals into the
//! outgoing payload at submit time so the persisted figures can never drift
//! from what was displayed.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Tax rate applied to every invoice subtotal, in percent.
pub const TAX_RATE_PERCENT: i64 = 11;

/// Tax on a subtotal, rounded half-up to the whole currency unit.
///
/// Money is integer-denominated; this is the single place the rate and the
/// rounding rule live, for display and persistence alike.
pub fn tax_for(subtotal: i64) -> i64 {
    (subtotal * TAX_RATE_PERCENT + 50) / 100
}

/// Lifecycle states of an invoice document.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

impl From<&str> for InvoiceStatus {
    fn from(value: &str) -> Self {
        match value {
            "sent" => InvoiceStatus::Sent,
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            _ => InvoiceStatus::Draft,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLineItem {
    pub id: i32,
    pub invoice_id: i32,
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub position: i32,
}

impl InvoiceLineItem {
    /// Line amount, always `quantity * unit_price`.
    pub fn amount(&self) -> i64 {
        self.quantity * self.unit_price
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Invoice {
    pub id: i32,
    pub client_id: i32,
    pub project_id: Option<i32>,
    pub number: String,
    pub status: InvoiceStatus,
    pub issued_on: Option<NaiveDate>,
    pub due_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub items: Vec<InvoiceLineItem>,
}

/// One editable line of a draft.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LineItemInput {
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
}

impl LineItemInput {
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: i64) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.max(0),
            unit_price: unit_price.max(0),
        }
    }

    /// Line amount, always `quantity * unit_price`.
    pub fn amount(&self) -> i64 {
        self.quantity * self.unit_price
    }
}

/// Editable working copy of an invoice.
///
/// Seeded either from an existing invoice (edit mode) or from explicit
/// defaults with one zero-valued line (create mode); whether a submit
/// dispatches as create or update is purely a function of the seeded id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvoiceDraft {
    id: Option<i32>,
    pub client_id: i32,
    pub project_id: Option<i32>,
    pub number: String,
    pub status: InvoiceStatus,
    pub issued_on: Option<NaiveDate>,
    pub due_on: Option<NaiveDate>,
    pub notes: Option<String>,
    items: Vec<LineItemInput>,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceDraft {
    /// Create-mode defaults: no identifier, one zero-valued line item.
    pub fn new() -> Self {
        Self {
            id: None,
            client_id: 0,
            project_id: None,
            number: String::new(),
            status: InvoiceStatus::Draft,
            issued_on: None,
            due_on: None,
            notes: None,
            items: vec![LineItemInput::default()],
        }
    }

    /// Edit-mode seeding: every field mapped one-to-one from the record.
    /// Prior draft state is fully replaced; totals are not copied, they are
    /// recomputed from the seeded items.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let mut items: Vec<LineItemInput> = invoice
            .items
            .iter()
            .map(|item| LineItemInput::new(item.description.clone(), item.quantity, item.unit_price))
            .collect();
        if items.is_empty() {
            items.push(LineItemInput::default());
        }
        Self {
            id: Some(invoice.id),
            client_id: invoice.client_id,
            project_id: invoice.project_id,
            number: invoice.number.clone(),
            status: invoice.status,
            issued_on: invoice.issued_on,
            due_on: invoice.due_on,
            notes: invoice.notes.clone(),
            items,
        }
    }

    /// Marks the draft as editing the record with `id`; submits dispatch as
    /// updates addressed to it.
    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Identifier of the record being edited, if any.
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    /// True when the draft was seeded from an existing record.
    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn items(&self) -> &[LineItemInput] {
        &self.items
    }

    pub fn set_item_description(&mut self, index: usize, description: impl Into<String>) {
        if let Some(item) = self.items.get_mut(index) {
            item.description = description.into();
        }
    }

    /// Quantities are positive integers; out-of-range indexes are ignored.
    pub fn set_item_quantity(&mut self, index: usize, quantity: i64) {
        if let Some(item) = self.items.get_mut(index) {
            item.quantity = quantity.max(0);
        }
    }

    pub fn set_item_unit_price(&mut self, index: usize, unit_price: i64) {
        if let Some(item) = self.items.get_mut(index) {
            item.unit_price = unit_price.max(0);
        }
    }

    /// Appends a zero-valued line item.
    pub fn add_item(&mut self) {
        self.items.push(LineItemInput::default());
    }

    /// Removes the item at `index`. Refuses when exactly one item remains, so
    /// the draft never drops below one line; returns whether anything changed.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if self.items.len() <= 1 || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    /// Sum of all line amounts.
    pub fn subtotal(&self) -> i64 {
        self.items.iter().map(LineItemInput::amount).sum()
    }

    pub fn tax(&self) -> i64 {
        tax_for(self.subtotal())
    }

    pub fn total(&self) -> i64 {
        self.subtotal() + self.tax()
    }

    /// Final payload for submission: raw items plus the three computed totals.
    pub fn into_payload(self) -> InvoicePayload {
        let subtotal = self.subtotal();
        let tax = self.tax();
        let total = subtotal + tax;
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(position, item)| NewInvoiceItem {
                description: item.description.trim().to_string(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                position: position as i32,
            })
            .collect();
        InvoicePayload {
            id: self.id,
            client_id: self.client_id,
            project_id: self.project_id,
            number: self.number.trim().to_string(),
            status: self.status,
            issued_on: self.issued_on,
            due_on: self.due_on,
            notes: self.notes.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            subtotal,
            tax,
            total,
            items,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub position: i32,
}

/// Outgoing create/update payload. `id` being present selects the update
/// path; the totals are the draft's computed values, never caller-supplied.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct InvoicePayload {
    pub id: Option<i32>,
    pub client_id: i32,
    pub project_id: Option<i32>,
    pub number: String,
    pub status: InvoiceStatus,
    pub issued_on: Option<NaiveDate>,
    pub due_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub items: Vec<NewInvoiceItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_invoice() -> Invoice {
        let now = Utc::now().naive_utc();
        Invoice {
            id: 42,
            client_id: 7,
            project_id: Some(3),
            number: "INV-2026-0001".to_string(),
            status: InvoiceStatus::Sent,
            issued_on: NaiveDate::from_ymd_opt(2026, 6, 1),
            due_on: NaiveDate::from_ymd_opt(2026, 7, 1),
            notes: Some("net 30".to_string()),
            subtotal: 2_000_000,
            tax: 220_000,
            total: 2_220_000,
            created_at: now,
            updated_at: now,
            items: vec![
                InvoiceLineItem {
                    id: 1,
                    invoice_id: 42,
                    description: "Design".to_string(),
                    quantity: 2,
                    unit_price: 500_000,
                    position: 0,
                },
                InvoiceLineItem {
                    id: 2,
                    invoice_id: 42,
                    description: "Dev".to_string(),
                    quantity: 1,
                    unit_price: 1_000_000,
                    position: 1,
                },
            ],
        }
    }

    #[test]
    fn amount_tracks_quantity_and_unit_price() {
        let mut draft = InvoiceDraft::new();
        draft.set_item_quantity(0, 3);
        draft.set_item_unit_price(0, 250_000);
        assert_eq!(draft.items()[0].amount(), 750_000);
        assert_eq!(draft.subtotal(), 750_000);

        draft.set_item_quantity(0, 4);
        assert_eq!(draft.items()[0].amount(), 1_000_000);
        assert_eq!(draft.subtotal(), 1_000_000);
    }

    #[test]
    fn seeding_from_the_same_record_is_idempotent() {
        let invoice = sample_invoice();
        let first = InvoiceDraft::from_invoice(&invoice);
        let second = InvoiceDraft::from_invoice(&invoice);
        assert_eq!(first, second);
    }

    #[test]
    fn reseeding_replaces_prior_state() {
        let invoice = sample_invoice();
        let mut other = invoice.clone();
        other.id = 43;
        other.number = "INV-2026-0002".to_string();
        other.items.truncate(1);

        let mut draft = InvoiceDraft::from_invoice(&invoice);
        draft.add_item();
        draft = InvoiceDraft::from_invoice(&other);
        assert_eq!(draft.id(), Some(43));
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.number, "INV-2026-0002");
    }

    #[test]
    fn removal_floor_keeps_one_item() {
        let mut draft = InvoiceDraft::new();
        assert!(!draft.remove_item(0));
        assert_eq!(draft.items().len(), 1);

        draft.add_item();
        assert!(draft.remove_item(0));
        assert_eq!(draft.items().len(), 1);
        assert!(!draft.remove_item(0));
    }

    #[test]
    fn totals_use_eleven_percent_half_up() {
        assert_eq!(tax_for(0), 0);
        assert_eq!(tax_for(100), 11);
        // 11% of 50 is 5.5, rounds up to 6.
        assert_eq!(tax_for(50), 6);
        // 11% of 40 is 4.4, rounds down to 4.
        assert_eq!(tax_for(40), 4);
    }

    #[test]
    fn payload_carries_computed_totals() {
        let mut draft = InvoiceDraft::new();
        draft.client_id = 7;
        draft.set_item_description(0, "Design");
        draft.set_item_quantity(0, 2);
        draft.set_item_unit_price(0, 500_000);
        draft.add_item();
        draft.set_item_description(1, "Dev");
        draft.set_item_quantity(1, 1);
        draft.set_item_unit_price(1, 1_000_000);

        assert_eq!(draft.subtotal(), 2_000_000);
        assert_eq!(draft.tax(), 220_000);
        assert_eq!(draft.total(), 2_220_000);

        let payload = draft.into_payload();
        assert_eq!(payload.id, None);
        assert_eq!(payload.subtotal, 2_000_000);
        assert_eq!(payload.tax, 220_000);
        assert_eq!(payload.total, 2_220_000);
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.items[1].position, 1);
    }

    #[test]
    fn draft_seeded_with_id_submits_as_update() {
        let invoice = sample_invoice();
        let draft = InvoiceDraft::from_invoice(&invoice);
        assert!(draft.is_edit());
        let payload = draft.into_payload();
        assert_eq!(payload.id, Some(42));
    }

    #[test]
    fn stored_totals_are_ignored_when_seeding() {
        let mut invoice = sample_invoice();
        // Stale stored figures must not survive into the draft.
        invoice.subtotal = 1;
        invoice.tax = 2;
        invoice.total = 3;
        let draft = InvoiceDraft::from_invoice(&invoice);
        assert_eq!(draft.subtotal(), 2_000_000);
        assert_eq!(draft.tax(), 220_000);
        assert_eq!(draft.total(), 2_220_000);
    }
}
