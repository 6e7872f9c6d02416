use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::lead::{
    Lead as DomainLead, LeadStatus, NewLead as DomainNewLead, UpdateLead as DomainUpdateLead,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::leads)]
/// Diesel model for [`crate::domain::lead::Lead`].
pub struct Lead {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub source: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::leads)]
/// Insertable form of [`Lead`]; status always starts at `new`.
pub struct NewLead<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
    pub message: &'a str,
    pub source: Option<&'a str>,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::leads)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Lead`] record.
pub struct UpdateLead<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
    pub message: &'a str,
    pub source: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<Lead> for DomainLead {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id,
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            company: lead.company,
            message: lead.message,
            source: lead.source,
            status: LeadStatus::from(lead.status.as_str()),
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewLead> for NewLead<'a> {
    fn from(lead: &'a DomainNewLead) -> Self {
        Self {
            name: lead.name.as_str(),
            email: lead.email.as_str(),
            phone: lead.phone.as_deref(),
            company: lead.company.as_deref(),
            message: lead.message.as_str(),
            source: lead.source.as_deref(),
            status: LeadStatus::New.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateLead> for UpdateLead<'a> {
    fn from(lead: &'a DomainUpdateLead) -> Self {
        Self {
            name: lead.name.as_str(),
            email: lead.email.as_str(),
            phone: lead.phone.as_deref(),
            company: lead.company.as_deref(),
            message: lead.message.as_str(),
            source: lead.source.as_deref(),
            status: lead.status.as_str(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lead_starts_in_new_status() {
        let domain = DomainNewLead::new(
            "Jane".to_string(),
            "Jane@Example.com".to_string(),
            None,
            None,
            "hello".to_string(),
            Some("landing".to_string()),
        );
        let row: NewLead = (&domain).into();
        assert_eq!(row.status, "new");
        assert_eq!(row.email, "jane@example.com");
        assert_eq!(row.source, Some("landing"));
    }
}
