use diesel::prelude::*;

use crate::domain::lead::{Lead, LeadStatus, NewLead, UpdateLead};
use crate::domain::types::LeadId;
use crate::listing::SortOrder;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, LeadListQuery, LeadReader, LeadWriter};

impl LeadReader for DieselRepository {
    fn get_lead_by_id(&self, id: LeadId) -> RepositoryResult<Option<Lead>> {
        use crate::models::lead::Lead as DbLead;
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let lead = leads::table
            .find(id.get())
            .first::<DbLead>(&mut conn)
            .optional()?;

        Ok(lead.map(Into::into))
    }

    fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)> {
        use crate::models::lead::Lead as DbLead;
        use crate::schema::leads;

        let mut conn = self.conn()?;

        let build = || {
            let mut items = leads::table.into_boxed();
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    leads::name
                        .like(pattern.clone())
                        .or(leads::email.like(pattern.clone()))
                        .or(leads::company.like(pattern)),
                );
            }
            if let Some(status) = &query.status {
                items = items.filter(leads::status.eq(status.clone()));
            }
            items
        };

        let total: i64 = build().count().get_result(&mut conn)?;

        let mut items = build();
        items = match query.sort {
            SortOrder::Newest => items.order(leads::created_at.desc()),
            SortOrder::Oldest => items.order(leads::created_at.asc()),
            SortOrder::Name => items.order(leads::name.asc()),
        };
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            items = items.limit(per_page).offset((page - 1) * per_page);
        }

        let leads = items
            .load::<DbLead>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total as usize, leads))
    }

    fn count_leads_with_status(&self, status: LeadStatus) -> RepositoryResult<usize> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let total: i64 = leads::table
            .filter(leads::status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)?;
        Ok(total as usize)
    }
}

impl LeadWriter for DieselRepository {
    fn create_lead(&self, new_lead: &NewLead) -> RepositoryResult<Lead> {
        use crate::models::lead::{Lead as DbLead, NewLead as DbNewLead};
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let insertable: DbNewLead = new_lead.into();
        let created = diesel::insert_into(leads::table)
            .values(&insertable)
            .get_result::<DbLead>(&mut conn)?;

        Ok(created.into())
    }

    fn update_lead(&self, lead_id: LeadId, updates: &UpdateLead) -> RepositoryResult<Lead> {
        use crate::models::lead::{Lead as DbLead, UpdateLead as DbUpdateLead};
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateLead = updates.into();

        let updated = diesel::update(leads::table.find(lead_id.get()))
            .set(&db_updates)
            .get_result::<DbLead>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_lead_status(&self, lead_id: LeadId, status: LeadStatus) -> RepositoryResult<Lead> {
        use crate::models::lead::Lead as DbLead;
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let updated = diesel::update(leads::table.find(lead_id.get()))
            .set((
                leads::status.eq(status.as_str()),
                leads::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbLead>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_lead(&self, lead_id: LeadId) -> RepositoryResult<()> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let affected = diesel::delete(leads::table.find(lead_id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
