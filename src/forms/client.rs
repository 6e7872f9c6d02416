use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::client::{NewClient, UpdateClient};
use crate::forms::{optional, optional_email, optional_phone};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
/// Form data for creating or updating a client; `id` selects the path.
pub struct SaveClientForm {
    pub id: Option<i32>,
    /// Display name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[validate(custom(function = crate::forms::validate_optional_email))]
    #[serde(default)]
    pub email: String,
    #[validate(custom(function = crate::forms::validate_optional_phone))]
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
}

impl SaveClientForm {
    pub fn to_new_client(&self) -> NewClient {
        NewClient::new(
            self.name.clone(),
            optional(&self.company),
            optional_email(&self.email),
            optional_phone(&self.phone),
            optional(&self.address),
            optional(&self.notes),
        )
    }

    pub fn to_update_client(&self) -> UpdateClient {
        UpdateClient::new(
            self.name.clone(),
            optional(&self.company),
            optional_email(&self.email),
            optional_phone(&self.phone),
            optional(&self.address),
            optional(&self.notes),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SaveClientForm {
        SaveClientForm {
            id: None,
            name: "Acme".to_string(),
            company: String::new(),
            email: "Hello@Acme.com".to_string(),
            phone: " ".to_string(),
            address: "Somewhere 1".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn empty_optionals_become_none() {
        let new_client = form().to_new_client();
        assert_eq!(new_client.company, None);
        assert_eq!(new_client.phone, None);
        assert_eq!(new_client.email, Some("hello@acme.com".to_string()));
    }

    #[test]
    fn optional_email_validates_only_when_present() {
        let mut valid = form();
        assert!(valid.validate().is_ok());
        valid.email = String::new();
        assert!(valid.validate().is_ok());
        valid.email = "nope".to_string();
        assert!(valid.validate().is_err());
    }
}
