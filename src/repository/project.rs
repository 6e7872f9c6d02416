use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::project::{NewProject, Project, UpdateProject};
use crate::domain::types::ProjectId;
use crate::listing::SortOrder;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProjectListQuery, ProjectReader, ProjectWriter};

fn gallery_for(
    conn: &mut crate::db::DbConnection,
    project_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<String>>> {
    use crate::models::project::ProjectImage as DbProjectImage;
    use crate::schema::project_images;

    let rows = project_images::table
        .filter(project_images::project_id.eq_any(project_ids))
        .order(project_images::position.asc())
        .load::<DbProjectImage>(conn)?;

    let mut by_project: HashMap<i32, Vec<String>> = HashMap::new();
    for row in rows {
        by_project.entry(row.project_id).or_default().push(row.path);
    }
    Ok(by_project)
}

fn append_gallery(
    conn: &mut crate::db::DbConnection,
    project_id: i32,
    paths: &[String],
) -> RepositoryResult<()> {
    use crate::models::project::NewProjectImage as DbNewProjectImage;
    use crate::schema::project_images;

    if paths.is_empty() {
        return Ok(());
    }

    let start: i64 = project_images::table
        .filter(project_images::project_id.eq(project_id))
        .count()
        .get_result(conn)?;

    let rows: Vec<DbNewProjectImage> = paths
        .iter()
        .enumerate()
        .map(|(offset, path)| DbNewProjectImage {
            project_id,
            path: path.as_str(),
            position: start as i32 + offset as i32,
        })
        .collect();

    diesel::insert_into(project_images::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

impl ProjectReader for DieselRepository {
    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        use crate::models::project::Project as DbProject;
        use crate::schema::projects;

        let mut conn = self.conn()?;
        let row = projects::table
            .find(id.get())
            .first::<DbProject>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut project: Project = row.into();
        let mut galleries = gallery_for(&mut conn, &[project.id])?;
        project.gallery = galleries.remove(&project.id).unwrap_or_default();
        Ok(Some(project))
    }

    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<(usize, Vec<Project>)> {
        use crate::models::project::Project as DbProject;
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let build = || {
            let mut items = projects::table.into_boxed();
            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    projects::title
                        .like(pattern.clone())
                        .or(projects::tags.like(pattern)),
                );
            }
            if let Some(status) = &query.status {
                items = items.filter(projects::status.eq(status.clone()));
            }
            if let Some(client_id) = query.client_id {
                items = items.filter(projects::client_id.eq(client_id.get()));
            }
            items
        };

        let total: i64 = build().count().get_result(&mut conn)?;

        let mut items = build();
        items = match query.sort {
            SortOrder::Newest => items.order(projects::created_at.desc()),
            SortOrder::Oldest => items.order(projects::created_at.asc()),
            SortOrder::Name => items.order(projects::title.asc()),
        };
        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            items = items.limit(per_page).offset((page - 1) * per_page);
        }

        let rows = items.load::<DbProject>(&mut conn)?;
        let ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
        let mut galleries = gallery_for(&mut conn, &ids)?;

        let projects = rows
            .into_iter()
            .map(|row| {
                let mut project: Project = row.into();
                project.gallery = galleries.remove(&project.id).unwrap_or_default();
                project
            })
            .collect();

        Ok((total as usize, projects))
    }
}

impl ProjectWriter for DieselRepository {
    fn create_project(
        &self,
        new_project: &NewProject,
        gallery: &[String],
    ) -> RepositoryResult<Project> {
        use crate::models::project::{NewProject as DbNewProject, Project as DbProject};
        use crate::schema::projects;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let insertable: DbNewProject = new_project.into();
            let created = diesel::insert_into(projects::table)
                .values(&insertable)
                .get_result::<DbProject>(conn)?;

            append_gallery(conn, created.id, gallery)?;

            let mut project: Project = created.into();
            project.gallery = gallery.to_vec();
            Ok(project)
        })
    }

    fn update_project(
        &self,
        project_id: ProjectId,
        updates: &UpdateProject,
        new_gallery: &[String],
    ) -> RepositoryResult<Project> {
        use crate::models::project::{Project as DbProject, UpdateProject as DbUpdateProject};
        use crate::schema::projects;

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let db_updates: DbUpdateProject = updates.into();
            let updated = diesel::update(projects::table.find(project_id.get()))
                .set(&db_updates)
                .get_result::<DbProject>(conn)?;

            append_gallery(conn, updated.id, new_gallery)?;

            let mut project: Project = updated.into();
            let mut galleries = gallery_for(conn, &[project.id])?;
            project.gallery = galleries.remove(&project.id).unwrap_or_default();
            Ok(project)
        })
    }

    fn delete_project(&self, project_id: ProjectId) -> RepositoryResult<()> {
        use crate::schema::{invoices, project_images, projects};

        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            // Invoices keep their history; they just lose the project link.
            diesel::update(invoices::table.filter(invoices::project_id.eq(project_id.get())))
                .set(invoices::project_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::delete(
                project_images::table.filter(project_images::project_id.eq(project_id.get())),
            )
            .execute(conn)?;
            let affected =
                diesel::delete(projects::table.find(project_id.get())).execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }
}
