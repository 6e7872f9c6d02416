use std::collections::HashMap;

use diesel::dsl::exists;
use diesel::prelude::*;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::ClientId;
use crate::listing::SortOrder;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter, DieselRepository};

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        use crate::models::client::Client as DbClient;
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        Ok(client.map(Into::into))
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        use crate::models::client::Client as DbClient;
        use crate::schema::{clients, projects};

        let mut conn = self.conn()?;

        let build = || {
            let mut items = clients::table.into_boxed();
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    clients::name
                        .like(pattern.clone())
                        .or(clients::company.like(pattern.clone()))
                        .or(clients::email.like(pattern.clone()))
                        .or(clients::phone.like(pattern)),
                );
            }
            if query.has_projects {
                items = items.filter(exists(
                    projects::table.filter(projects::client_id.eq(clients::id)),
                ));
            }
            items
        };

        let total: i64 = build().count().get_result(&mut conn)?;

        let mut items = build();
        items = match query.sort {
            SortOrder::Newest => items.order(clients::created_at.desc()),
            SortOrder::Oldest => items.order(clients::created_at.asc()),
            SortOrder::Name => items.order(clients::name.asc()),
        };
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            items = items.limit(per_page).offset((page - 1) * per_page);
        }

        let rows = items.load::<DbClient>(&mut conn)?;

        // One grouped query fills the per-client project counts for the page.
        let ids: Vec<i32> = rows.iter().map(|c| c.id).collect();
        let counts: HashMap<i32, i64> = projects::table
            .filter(projects::client_id.eq_any(&ids))
            .group_by(projects::client_id)
            .select((projects::client_id, diesel::dsl::count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        let clients = rows
            .into_iter()
            .map(|row| {
                let mut client: Client = row.into();
                client.project_count = Some(counts.get(&client.id).copied().unwrap_or(0));
                client
            })
            .collect();

        Ok((total as usize, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::models::client::{Client as DbClient, NewClient as DbNewClient};
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let insertable: DbNewClient = new_client.into();
        let created = diesel::insert_into(clients::table)
            .values(&insertable)
            .get_result::<DbClient>(&mut conn)?;

        Ok(created.into())
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        use crate::models::client::{Client as DbClient, UpdateClient as DbUpdateClient};
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateClient = updates.into();

        let updated = diesel::update(clients::table.find(client_id.get()))
            .set(&db_updates)
            .get_result::<DbClient>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let affected =
            diesel::delete(clients::table.find(client_id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(crate::repository::errors::RepositoryError::NotFound);
        }
        Ok(())
    }
}
