use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::invoice::{
    Invoice as DomainInvoice, InvoiceLineItem as DomainInvoiceLineItem, InvoicePayload,
    InvoiceStatus, NewInvoiceItem,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::invoices)]
/// Diesel model for [`crate::domain::invoice::Invoice`].
pub struct Invoice {
    pub id: i32,
    pub client_id: i32,
    pub project_id: Option<i32>,
    pub number: String,
    pub status: String,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub notes: Option<String>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invoices)]
/// Insertable form of [`Invoice`].
pub struct NewInvoice<'a> {
    pub client_id: i32,
    pub project_id: Option<i32>,
    pub number: &'a str,
    pub status: &'a str,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub notes: Option<&'a str>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::invoices)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating an [`Invoice`] record.
pub struct UpdateInvoice<'a> {
    pub client_id: i32,
    pub project_id: Option<i32>,
    pub number: &'a str,
    pub status: &'a str,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub notes: Option<&'a str>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::invoice_items)]
#[diesel(belongs_to(Invoice, foreign_key = invoice_id))]
pub struct InvoiceItem {
    pub id: i32,
    pub invoice_id: i32,
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub position: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invoice_items)]
pub struct NewInvoiceItemRow<'a> {
    pub invoice_id: i32,
    pub description: &'a str,
    pub quantity: i64,
    pub unit_price: i64,
    pub position: i32,
}

impl Invoice {
    /// Builds the domain aggregate from the invoice row and its item rows.
    pub fn into_domain(self, items: Vec<InvoiceItem>) -> DomainInvoice {
        DomainInvoice {
            id: self.id,
            client_id: self.client_id,
            project_id: self.project_id,
            number: self.number,
            status: InvoiceStatus::from(self.status.as_str()),
            issued_on: Some(self.issued_on),
            due_on: Some(self.due_on),
            notes: self.notes,
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<InvoiceItem> for DomainInvoiceLineItem {
    fn from(item: InvoiceItem) -> Self {
        Self {
            id: item.id,
            invoice_id: item.invoice_id,
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            position: item.position,
        }
    }
}

impl<'a> NewInvoiceItemRow<'a> {
    pub fn from_payload_item(invoice_id: i32, item: &'a NewInvoiceItem) -> Self {
        Self {
            invoice_id,
            description: item.description.as_str(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            position: item.position,
        }
    }
}

impl<'a> TryFrom<&'a InvoicePayload> for NewInvoice<'a> {
    type Error = &'static str;

    fn try_from(payload: &'a InvoicePayload) -> Result<Self, Self::Error> {
        let issued_on = payload.issued_on.ok_or("issued_on is required")?;
        let due_on = payload.due_on.ok_or("due_on is required")?;
        Ok(Self {
            client_id: payload.client_id,
            project_id: payload.project_id,
            number: payload.number.as_str(),
            status: payload.status.as_str(),
            issued_on,
            due_on,
            notes: payload.notes.as_deref(),
            subtotal: payload.subtotal,
            tax: payload.tax,
            total: payload.total,
        })
    }
}

impl<'a> TryFrom<&'a InvoicePayload> for UpdateInvoice<'a> {
    type Error = &'static str;

    fn try_from(payload: &'a InvoicePayload) -> Result<Self, Self::Error> {
        let issued_on = payload.issued_on.ok_or("issued_on is required")?;
        let due_on = payload.due_on.ok_or("due_on is required")?;
        Ok(Self {
            client_id: payload.client_id,
            project_id: payload.project_id,
            number: payload.number.as_str(),
            status: payload.status.as_str(),
            issued_on,
            due_on,
            notes: payload.notes.as_deref(),
            subtotal: payload.subtotal,
            tax: payload.tax,
            total: payload.total,
            updated_at: chrono::Utc::now().naive_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn invoice_into_domain_orders_items_as_given() {
        let now = Utc::now().naive_utc();
        let row = Invoice {
            id: 9,
            client_id: 2,
            project_id: None,
            number: "INV-2026-0009".to_string(),
            status: "sent".to_string(),
            issued_on: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            due_on: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            notes: None,
            subtotal: 100,
            tax: 11,
            total: 111,
            created_at: now,
            updated_at: now,
        };
        let items = vec![InvoiceItem {
            id: 1,
            invoice_id: 9,
            description: "work".to_string(),
            quantity: 2,
            unit_price: 50,
            position: 0,
        }];
        let domain = row.into_domain(items);
        assert_eq!(domain.status, InvoiceStatus::Sent);
        assert_eq!(domain.items.len(), 1);
        assert_eq!(domain.items[0].amount(), 100);
    }
}
