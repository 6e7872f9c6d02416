use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lifecycle states a project moves through.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl From<&str> for ProjectStatus {
    fn from(value: &str) -> Self {
        match value {
            "in_progress" => ProjectStatus::InProgress,
            "completed" => ProjectStatus::Completed,
            "archived" => ProjectStatus::Archived,
            _ => ProjectStatus::Planned,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Project {
    pub id: i32,
    pub client_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Gallery image paths in display order.
    pub gallery: Vec<String>,
}

impl Project {
    /// Editable representation of the tag list: comma-joined.
    pub fn tags_joined(&self) -> String {
        self.tags.join(", ")
    }
}

/// Splits a comma-joined tag string into trimmed, non-empty tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewProject {
    pub client_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}

impl NewProject {
    #[must_use]
    pub fn new(
        client_id: i32,
        title: String,
        description: Option<String>,
        status: ProjectStatus,
        tags: Vec<String>,
        started_on: Option<NaiveDate>,
        finished_on: Option<NaiveDate>,
    ) -> Self {
        Self {
            client_id,
            title: title.trim().to_string(),
            description: description
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status,
            tags,
            thumbnail: None,
            started_on,
            finished_on,
        }
    }

    #[must_use]
    pub fn thumbnail(mut self, path: impl Into<String>) -> Self {
        self.thumbnail = Some(path.into());
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateProject {
    pub client_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub tags: Vec<String>,
    /// `None` keeps the stored thumbnail; partial updates never drop images.
    pub thumbnail: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProjectImage {
    pub id: i32,
    pub project_id: i32,
    pub path: String,
    pub position: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewProjectImage {
    pub project_id: i32,
    pub path: String,
    pub position: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_joined_form() {
        let project = Project {
            tags: vec!["branding".to_string(), "web".to_string()],
            ..Project::default()
        };
        assert_eq!(project.tags_joined(), "branding, web");
        assert_eq!(parse_tags(&project.tags_joined()), project.tags);
    }

    #[test]
    fn parse_tags_skips_blank_entries() {
        assert_eq!(parse_tags("a, , b,,"), vec!["a".to_string(), "b".to_string()]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn status_from_str_defaults_to_planned() {
        assert_eq!(ProjectStatus::from("completed"), ProjectStatus::Completed);
        assert_eq!(ProjectStatus::from("bogus"), ProjectStatus::Planned);
    }
}
