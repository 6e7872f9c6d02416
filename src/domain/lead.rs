use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Pipeline states of a captured lead.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Converted,
    Closed,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Converted => "converted",
            LeadStatus::Closed => "closed",
        }
    }
}

impl From<&str> for LeadStatus {
    fn from(value: &str) -> Self {
        match value {
            "contacted" => LeadStatus::Contacted,
            "converted" => LeadStatus::Converted,
            "closed" => LeadStatus::Closed,
            _ => LeadStatus::New,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Lead {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub source: Option<String>,
}

impl NewLead {
    #[must_use]
    pub fn new(
        name: String,
        email: String,
        phone: Option<String>,
        company: Option<String>,
        message: String,
        source: Option<String>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.to_lowercase().trim().to_string(),
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            company: company
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            message,
            source: source
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub source: Option<String>,
    pub status: LeadStatus,
}
