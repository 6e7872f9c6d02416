//! Form definitions backing the routes.
//!
//! Forms are statically-typed records with an enumerated field set; optional
//! identifiers switch the save path between create and update. Repeated-key
//! fields (invoice line items) require `serde_html_form`, which the
//! [`HtmlForm`] extractor wires into Actix in place of `web::Form`.

use std::future::Future;
use std::pin::Pin;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

pub mod client;
pub mod invoice;
pub mod lead;
pub mod project;
pub mod settings;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("line item fields are misaligned")]
    ItemFieldMismatch,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid id")]
    InvalidId,
}

/// Accepts an empty string or a valid email; forms post absent optional
/// emails as `""`.
pub fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// Accepts an empty string or a phone number that normalizes to E.164.
pub fn validate_optional_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || crate::domain::types::PhoneNumber::new(value).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

/// Trims a form value into an optional string.
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Normalizes an optional email form value through the domain wrapper.
pub(crate) fn optional_email(value: &str) -> Option<String> {
    crate::domain::types::EmailAddress::new(value)
        .ok()
        .map(crate::domain::types::EmailAddress::into_inner)
}

/// Normalizes an optional phone form value to E.164.
pub(crate) fn optional_phone(value: &str) -> Option<String> {
    crate::domain::types::PhoneNumber::new(value)
        .ok()
        .map(crate::domain::types::PhoneNumber::into_inner)
}

/// Parses an optional `YYYY-MM-DD` form date.
pub(crate) fn optional_date(value: &str) -> Result<Option<chrono::NaiveDate>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate(trimmed.to_string()))
}

/// `application/x-www-form-urlencoded` extractor built on `serde_html_form`,
/// which unlike `web::Form` decodes repeated keys into `Vec` fields.
pub struct HtmlForm<T>(pub T);

impl<T> HtmlForm<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> FromRequest for HtmlForm<T> {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let bytes = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let bytes = bytes.await?;
            serde_html_form::from_bytes::<T>(&bytes)
                .map(HtmlForm)
                .map_err(|e| actix_web::error::ErrorBadRequest(e.to_string()))
        })
    }
}
