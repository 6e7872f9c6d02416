use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::invoice::{InvoiceDraft, InvoiceStatus};
use crate::forms::{FormError, optional, optional_date};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
/// Form data for creating or updating an invoice. Line items arrive as
/// repeated `item_description` / `item_quantity` / `item_unit_price` keys in
/// row order.
pub struct SaveInvoiceForm {
    pub id: Option<i32>,
    #[validate(range(min = 1, message = "client is required"))]
    pub client_id: i32,
    #[serde(default)]
    pub project_id: String,
    /// Left empty on create, a number is generated at save time.
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub status: String,
    #[validate(length(min = 1, message = "issue date is required"))]
    #[serde(default)]
    pub issued_on: String,
    #[validate(length(min = 1, message = "due date is required"))]
    #[serde(default)]
    pub due_on: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub item_description: Vec<String>,
    #[serde(default)]
    pub item_quantity: Vec<i64>,
    #[serde(default)]
    pub item_unit_price: Vec<i64>,
}

impl SaveInvoiceForm {
    /// Builds the editable draft: seeded create- or edit-mode by `id`, then
    /// every submitted field applied. Derived values are recomputed by the
    /// draft itself.
    pub fn to_draft(&self) -> Result<InvoiceDraft, FormError> {
        if self.item_description.len() != self.item_quantity.len()
            || self.item_description.len() != self.item_unit_price.len()
        {
            return Err(FormError::ItemFieldMismatch);
        }

        let mut draft = InvoiceDraft::new();
        if let Some(id) = self.id {
            draft = draft.with_id(id);
        }
        draft.client_id = self.client_id;
        draft.project_id = match optional(&self.project_id) {
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| FormError::InvalidId)?),
            None => None,
        };
        draft.number = self.number.trim().to_string();
        draft.status = InvoiceStatus::from(self.status.as_str());
        draft.issued_on = optional_date(&self.issued_on)?;
        draft.due_on = optional_date(&self.due_on)?;
        draft.notes = optional(&self.notes);

        for (index, description) in self.item_description.iter().enumerate() {
            if index > 0 {
                draft.add_item();
            }
            draft.set_item_description(index, description.clone());
            draft.set_item_quantity(index, self.item_quantity[index]);
            draft.set_item_unit_price(index, self.item_unit_price[index]);
        }

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SaveInvoiceForm {
        SaveInvoiceForm {
            id: None,
            client_id: 7,
            project_id: String::new(),
            number: String::new(),
            status: "sent".to_string(),
            issued_on: "2026-06-01".to_string(),
            due_on: "2026-07-01".to_string(),
            notes: String::new(),
            item_description: vec!["Design".to_string(), "Dev".to_string()],
            item_quantity: vec![2, 1],
            item_unit_price: vec![500_000, 1_000_000],
        }
    }

    #[test]
    fn draft_carries_all_items_and_totals() {
        let draft = form().to_draft().unwrap();
        assert_eq!(draft.items().len(), 2);
        assert_eq!(draft.subtotal(), 2_000_000);
        assert_eq!(draft.tax(), 220_000);
        assert_eq!(draft.total(), 2_220_000);
        assert!(!draft.is_edit());
    }

    #[test]
    fn id_switches_to_edit_mode() {
        let mut with_id = form();
        with_id.id = Some(42);
        let draft = with_id.to_draft().unwrap();
        assert!(draft.is_edit());
        assert_eq!(draft.into_payload().id, Some(42));
    }

    #[test]
    fn misaligned_item_rows_are_rejected() {
        let mut broken = form();
        broken.item_quantity.pop();
        assert!(matches!(
            broken.to_draft(),
            Err(FormError::ItemFieldMismatch)
        ));
    }

    #[test]
    fn bad_date_is_reported() {
        let mut broken = form();
        broken.issued_on = "junk".to_string();
        assert!(matches!(broken.to_draft(), Err(FormError::InvalidDate(_))));
    }
}
