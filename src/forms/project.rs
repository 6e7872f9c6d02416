use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::project::{NewProject, ProjectStatus, UpdateProject, parse_tags};
use crate::forms::{FormError, optional, optional_date};

/// Multipart save form: scalar fields plus optional file parts. Absent files
/// leave the stored images untouched (partial update).
#[derive(MultipartForm)]
pub struct SaveProjectForm {
    pub id: Option<Text<i32>>,
    pub client_id: Text<i32>,
    pub title: Text<String>,
    pub description: Option<Text<String>>,
    pub status: Option<Text<String>>,
    /// Comma-joined editable representation of the tag list.
    pub tags: Option<Text<String>>,
    pub started_on: Option<Text<String>>,
    pub finished_on: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub thumbnail: Option<TempFile>,
    #[multipart(limit = "10MB")]
    pub gallery: Vec<TempFile>,
}

/// The scalar subset of [`SaveProjectForm`], shaped for `validator`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectFields {
    pub id: Option<i32>,
    #[validate(range(min = 1, message = "client is required"))]
    pub client_id: i32,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: String,
    pub status: String,
    pub tags: String,
    pub started_on: String,
    pub finished_on: String,
}

impl SaveProjectForm {
    /// Copies the text parts out of the multipart payload.
    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            id: self.id.as_ref().map(|t| t.0),
            client_id: self.client_id.0,
            title: self.title.0.clone(),
            description: self
                .description
                .as_ref()
                .map(|t| t.0.clone())
                .unwrap_or_default(),
            status: self.status.as_ref().map(|t| t.0.clone()).unwrap_or_default(),
            tags: self.tags.as_ref().map(|t| t.0.clone()).unwrap_or_default(),
            started_on: self
                .started_on
                .as_ref()
                .map(|t| t.0.clone())
                .unwrap_or_default(),
            finished_on: self
                .finished_on
                .as_ref()
                .map(|t| t.0.clone())
                .unwrap_or_default(),
        }
    }
}

impl ProjectFields {
    pub fn to_new_project(&self, thumbnail: Option<String>) -> Result<NewProject, FormError> {
        let mut new_project = NewProject::new(
            self.client_id,
            self.title.clone(),
            optional(&self.description),
            ProjectStatus::from(self.status.as_str()),
            parse_tags(&self.tags),
            optional_date(&self.started_on)?,
            optional_date(&self.finished_on)?,
        );
        if let Some(path) = thumbnail {
            new_project = new_project.thumbnail(path);
        }
        Ok(new_project)
    }

    pub fn to_update_project(&self, thumbnail: Option<String>) -> Result<UpdateProject, FormError> {
        Ok(UpdateProject {
            client_id: self.client_id,
            title: self.title.trim().to_string(),
            description: optional(&self.description),
            status: ProjectStatus::from(self.status.as_str()),
            tags: parse_tags(&self.tags),
            thumbnail,
            started_on: optional_date(&self.started_on)?,
            finished_on: optional_date(&self.finished_on)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ProjectFields {
        ProjectFields {
            id: None,
            client_id: 3,
            title: "Brand refresh".to_string(),
            description: String::new(),
            status: "in_progress".to_string(),
            tags: "branding, print".to_string(),
            started_on: "2026-02-01".to_string(),
            finished_on: String::new(),
        }
    }

    #[test]
    fn tags_parse_from_joined_form() {
        let new_project = fields().to_new_project(None).unwrap();
        assert_eq!(new_project.tags, vec!["branding", "print"]);
        assert_eq!(new_project.status, ProjectStatus::InProgress);
        assert_eq!(new_project.finished_on, None);
    }

    #[test]
    fn update_without_thumbnail_keeps_stored_one() {
        let update = fields().to_update_project(None).unwrap();
        assert!(update.thumbnail.is_none());
    }

    #[test]
    fn blank_client_fails_validation() {
        let mut broken = fields();
        broken.client_id = 0;
        assert!(broken.validate().is_err());
    }
}
