use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::lead::{LeadStatus, NewLead, UpdateLead};
use crate::domain::types::{LeadMessage, TypeConstraintError};
use crate::forms::{optional, optional_phone};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
/// Public landing-page contact form.
pub struct ContactForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(custom(function = crate::forms::validate_optional_phone))]
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

impl TryFrom<&ContactForm> for NewLead {
    type Error = TypeConstraintError;

    fn try_from(form: &ContactForm) -> Result<Self, Self::Error> {
        let message = LeadMessage::new(form.message.clone())?;
        Ok(NewLead::new(
            form.name.clone(),
            form.email.clone(),
            optional_phone(&form.phone),
            optional(&form.company),
            message.into_inner(),
            Some("landing".to_string()),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
/// Back-office lead edit form.
pub struct SaveLeadForm {
    pub id: Option<i32>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(custom(function = crate::forms::validate_optional_phone))]
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub status: String,
}

impl TryFrom<&SaveLeadForm> for NewLead {
    type Error = TypeConstraintError;

    fn try_from(form: &SaveLeadForm) -> Result<Self, Self::Error> {
        let message = LeadMessage::new(form.message.clone())?;
        Ok(NewLead::new(
            form.name.clone(),
            form.email.clone(),
            optional_phone(&form.phone),
            optional(&form.company),
            message.into_inner(),
            optional(&form.source),
        ))
    }
}

impl TryFrom<&SaveLeadForm> for UpdateLead {
    type Error = TypeConstraintError;

    fn try_from(form: &SaveLeadForm) -> Result<Self, Self::Error> {
        let message = LeadMessage::new(form.message.clone())?;
        Ok(UpdateLead {
            name: form.name.trim().to_string(),
            email: form.email.to_lowercase().trim().to_string(),
            phone: optional_phone(&form.phone),
            company: optional(&form.company),
            message: message.into_inner(),
            source: optional(&form.source),
            status: LeadStatus::from(form.status.as_str()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Status-only transition issued from the lead list.
pub struct LeadStatusForm {
    pub id: i32,
    pub status: String,
}
