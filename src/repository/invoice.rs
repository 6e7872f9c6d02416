use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::invoice::{Invoice, InvoicePayload, InvoiceStatus};
use crate::domain::types::InvoiceId;
use crate::listing::SortOrder;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, InvoiceListQuery, InvoiceReader, InvoiceWriter};

fn items_for(
    conn: &mut crate::db::DbConnection,
    rows: Vec<crate::models::invoice::Invoice>,
) -> RepositoryResult<Vec<Invoice>> {
    use crate::models::invoice::InvoiceItem as DbInvoiceItem;
    use crate::schema::invoice_items;

    let ids: Vec<i32> = rows.iter().map(|i| i.id).collect();
    let mut items = invoice_items::table
        .filter(invoice_items::invoice_id.eq_any(&ids))
        .order((invoice_items::invoice_id.asc(), invoice_items::position.asc()))
        .load::<DbInvoiceItem>(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let (own, rest): (Vec<_>, Vec<_>) =
                items.drain(..).partition(|item| item.invoice_id == row.id);
            items = rest;
            row.into_domain(own)
        })
        .collect())
}

fn replace_items(
    conn: &mut crate::db::DbConnection,
    invoice_id: i32,
    payload: &InvoicePayload,
) -> RepositoryResult<()> {
    use crate::models::invoice::NewInvoiceItemRow;
    use crate::schema::invoice_items;

    diesel::delete(invoice_items::table.filter(invoice_items::invoice_id.eq(invoice_id)))
        .execute(conn)?;

    let rows: Vec<NewInvoiceItemRow> = payload
        .items
        .iter()
        .map(|item| NewInvoiceItemRow::from_payload_item(invoice_id, item))
        .collect();
    diesel::insert_into(invoice_items::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

impl InvoiceReader for DieselRepository {
    fn get_invoice_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>> {
        use crate::models::invoice::Invoice as DbInvoice;
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let row = invoices::table
            .find(id.get())
            .first::<DbInvoice>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(items_for(&mut conn, vec![row])?.pop())
    }

    fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)> {
        use crate::models::invoice::Invoice as DbInvoice;
        use crate::schema::invoices;

        let mut conn = self.conn()?;

        let build = || {
            let mut items = invoices::table.into_boxed();
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(invoices::number.like(pattern));
            }
            if let Some(status) = &query.status {
                items = items.filter(invoices::status.eq(status.clone()));
            }
            if let Some(client_id) = query.client_id {
                items = items.filter(invoices::client_id.eq(client_id.get()));
            }
            items
        };

        let total: i64 = build().count().get_result(&mut conn)?;

        let mut rows = build();
        rows = match query.sort {
            SortOrder::Newest => rows.order(invoices::issued_on.desc()),
            SortOrder::Oldest => rows.order(invoices::issued_on.asc()),
            SortOrder::Name => rows.order(invoices::number.asc()),
        };
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            rows = rows.limit(per_page).offset((page - 1) * per_page);
        }

        let rows = rows.load::<DbInvoice>(&mut conn)?;
        let invoices = items_for(&mut conn, rows)?;

        Ok((total as usize, invoices))
    }

    fn count_invoices_in_year(&self, year: i32) -> RepositoryResult<usize> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or(crate::repository::errors::RepositoryError::Unexpected(
                "invalid year".to_string(),
            ))?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .ok_or(crate::repository::errors::RepositoryError::Unexpected(
                "invalid year".to_string(),
            ))?;

        let total: i64 = invoices::table
            .filter(invoices::issued_on.ge(start))
            .filter(invoices::issued_on.lt(end))
            .count()
            .get_result(&mut conn)?;
        Ok(total as usize)
    }

    fn paid_invoice_totals(&self, since: NaiveDate) -> RepositoryResult<Vec<(NaiveDate, i64)>> {
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        let rows = invoices::table
            .filter(invoices::status.eq(InvoiceStatus::Paid.as_str()))
            .filter(invoices::issued_on.ge(since))
            .order(invoices::issued_on.asc())
            .select((invoices::issued_on, invoices::total))
            .load::<(NaiveDate, i64)>(&mut conn)?;
        Ok(rows)
    }

    fn outstanding_total(&self) -> RepositoryResult<i64> {
        use diesel::dsl::sql;
        use diesel::sql_types::{BigInt, Nullable};

        use crate::schema::invoices;

        let mut conn = self.conn()?;
        // Diesel types `SUM(BigInt)` as `Numeric`, which SQLite cannot
        // deserialize into `i64`; cast the aggregate back to `BigInt` so the
        // identical sum loads as an integer.
        let total: Option<i64> = invoices::table
            .filter(invoices::status.eq_any([
                InvoiceStatus::Sent.as_str(),
                InvoiceStatus::Overdue.as_str(),
            ]))
            .select(sql::<Nullable<BigInt>>("CAST(SUM(total) AS BIGINT)"))
            .first(&mut conn)?;
        Ok(total.unwrap_or(0))
    }
}

impl InvoiceWriter for DieselRepository {
    fn create_invoice(&self, payload: &InvoicePayload) -> RepositoryResult<Invoice> {
        use crate::models::invoice::{Invoice as DbInvoice, NewInvoice};
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let insertable = NewInvoice::try_from(payload).map_err(|e| {
                crate::repository::errors::RepositoryError::ValidationError(e.to_string())
            })?;
            let created = diesel::insert_into(invoices::table)
                .values(&insertable)
                .get_result::<DbInvoice>(conn)?;

            replace_items(conn, created.id, payload)?;
            items_for(conn, vec![created])?.pop().ok_or_else(|| {
                crate::repository::errors::RepositoryError::Unexpected(
                    "inserted invoice vanished".to_string(),
                )
            })
        })
    }

    fn update_invoice(
        &self,
        invoice_id: InvoiceId,
        payload: &InvoicePayload,
    ) -> RepositoryResult<Invoice> {
        use crate::models::invoice::{Invoice as DbInvoice, UpdateInvoice};
        use crate::schema::invoices;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let db_updates = UpdateInvoice::try_from(payload).map_err(|e| {
                crate::repository::errors::RepositoryError::ValidationError(e.to_string())
            })?;
            let updated = diesel::update(invoices::table.find(invoice_id.get()))
                .set(&db_updates)
                .get_result::<DbInvoice>(conn)?;

            replace_items(conn, updated.id, payload)?;
            items_for(conn, vec![updated])?.pop().ok_or_else(|| {
                crate::repository::errors::RepositoryError::Unexpected(
                    "updated invoice vanished".to_string(),
                )
            })
        })
    }

    fn delete_invoice(&self, invoice_id: InvoiceId) -> RepositoryResult<()> {
        use crate::schema::{invoice_items, invoices};

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            diesel::delete(
                invoice_items::table.filter(invoice_items::invoice_id.eq(invoice_id.get())),
            )
            .execute(conn)?;
            let affected =
                diesel::delete(invoices::table.find(invoice_id.get())).execute(conn)?;
            if affected == 0 {
                return Err(crate::repository::errors::RepositoryError::NotFound);
            }
            Ok(())
        })
    }
}
