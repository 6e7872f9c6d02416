use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::project::{
    NewProject as DomainNewProject, NewProjectImage as DomainNewProjectImage,
    Project as DomainProject, ProjectImage as DomainProjectImage, ProjectStatus,
    UpdateProject as DomainUpdateProject, parse_tags,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::projects)]
/// Diesel model for [`crate::domain::project::Project`].
pub struct Project {
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    /// Comma-separated tag list as stored.
    pub tags: String,
    pub thumbnail: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::projects)]
/// Insertable form of [`Project`].
pub struct NewProject<'a> {
    pub client_id: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub tags: String,
    pub thumbnail: Option<&'a str>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::projects)]
/// Data used when updating a [`Project`] record. `thumbnail` stays untouched
/// when the update carries no replacement file.
pub struct UpdateProject<'a> {
    pub client_id: i32,
    pub title: &'a str,
    pub description: Option<Option<&'a str>>,
    pub status: &'a str,
    pub tags: String,
    pub thumbnail: Option<&'a str>,
    pub started_on: Option<Option<NaiveDate>>,
    pub finished_on: Option<Option<NaiveDate>>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::project_images)]
#[diesel(belongs_to(Project, foreign_key = project_id))]
pub struct ProjectImage {
    pub id: i32,
    pub project_id: i32,
    pub path: String,
    pub position: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::project_images)]
pub struct NewProjectImage<'a> {
    pub project_id: i32,
    pub path: &'a str,
    pub position: i32,
}

impl From<Project> for DomainProject {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            client_id: project.client_id,
            title: project.title,
            description: project.description,
            status: ProjectStatus::from(project.status.as_str()),
            tags: parse_tags(&project.tags),
            thumbnail: project.thumbnail,
            started_on: project.started_on,
            finished_on: project.finished_on,
            created_at: project.created_at,
            updated_at: project.updated_at,
            gallery: Vec::new(),
        }
    }
}

impl From<ProjectImage> for DomainProjectImage {
    fn from(image: ProjectImage) -> Self {
        Self {
            id: image.id,
            project_id: image.project_id,
            path: image.path,
            position: image.position,
        }
    }
}

impl<'a> From<&'a DomainNewProject> for NewProject<'a> {
    fn from(project: &'a DomainNewProject) -> Self {
        Self {
            client_id: project.client_id,
            title: project.title.as_str(),
            description: project.description.as_deref(),
            status: project.status.as_str(),
            tags: project.tags.join(","),
            thumbnail: project.thumbnail.as_deref(),
            started_on: project.started_on,
            finished_on: project.finished_on,
        }
    }
}

impl<'a> From<&'a DomainUpdateProject> for UpdateProject<'a> {
    fn from(project: &'a DomainUpdateProject) -> Self {
        Self {
            client_id: project.client_id,
            title: project.title.as_str(),
            description: Some(project.description.as_deref()),
            status: project.status.as_str(),
            tags: project.tags.join(","),
            thumbnail: project.thumbnail.as_deref(),
            started_on: Some(project.started_on),
            finished_on: Some(project.finished_on),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl<'a> From<&'a DomainNewProjectImage> for NewProjectImage<'a> {
    fn from(image: &'a DomainNewProjectImage) -> Self {
        Self {
            project_id: image.project_id,
            path: image.path.as_str(),
            position: image.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn project_into_domain_parses_tags_and_status() {
        let now = Utc::now().naive_utc();
        let db_project = Project {
            id: 5,
            client_id: 1,
            title: "Site relaunch".to_string(),
            description: None,
            status: "in_progress".to_string(),
            tags: "web, branding".to_string(),
            thumbnail: Some("uploads/a.png".to_string()),
            started_on: None,
            finished_on: None,
            created_at: now,
            updated_at: now,
        };
        let domain: DomainProject = db_project.into();
        assert_eq!(domain.status, ProjectStatus::InProgress);
        assert_eq!(domain.tags, vec!["web".to_string(), "branding".to_string()]);
        assert!(domain.gallery.is_empty());
    }

    #[test]
    fn update_keeps_thumbnail_when_absent() {
        let domain = DomainUpdateProject {
            client_id: 1,
            title: "t".to_string(),
            description: None,
            status: ProjectStatus::Planned,
            tags: vec![],
            thumbnail: None,
            started_on: None,
            finished_on: None,
        };
        let update: UpdateProject = (&domain).into();
        // `None` means "do not touch the column" for the changeset.
        assert!(update.thumbnail.is_none());
        assert_eq!(update.description, Some(None));
    }
}
