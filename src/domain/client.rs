use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Number of projects linked to this client, when the query asked for it.
    pub project_count: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl NewClient {
    #[must_use]
    pub fn new(
        name: String,
        company: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            company: company
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            email: email
                .map(|s| s.to_lowercase().trim().to_string())
                .filter(|s| !s.is_empty()),
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            notes: notes.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateClient {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl UpdateClient {
    #[must_use]
    pub fn new(
        name: String,
        company: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            company: company
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            email: email
                .map(|s| s.to_lowercase().trim().to_string())
                .filter(|s| !s.is_empty()),
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            notes: notes.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        }
    }
}
