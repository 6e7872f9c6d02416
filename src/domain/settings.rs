//! Site-wide settings and content.
//!
//! Settings persist as key-value rows and are aggregated into one read-only
//! [`SiteSettings`] object that handlers inject into every rendered page.
//! Mutation goes through the settings service, never through ad hoc writes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single persisted key-value row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// UI appearance themes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl From<&str> for Theme {
    fn from(value: &str) -> Self {
        match value {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

/// Typed aggregate of the settings store with explicit defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteSettings {
    pub agency_name: String,
    pub tagline: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub about: String,
    pub theme: Theme,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            agency_name: "Agency Desk".to_string(),
            tagline: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            address: String::new(),
            hero_title: String::new(),
            hero_subtitle: String::new(),
            about: String::new(),
            theme: Theme::Light,
        }
    }
}

impl SiteSettings {
    /// Builds the aggregate from persisted rows, falling back to defaults for
    /// absent keys. Unknown keys are ignored.
    pub fn from_rows(rows: &[Setting]) -> Self {
        let map: HashMap<&str, &str> = rows
            .iter()
            .map(|row| (row.key.as_str(), row.value.as_str()))
            .collect();
        let defaults = Self::default();
        Self {
            agency_name: map
                .get("agency_name")
                .map(|v| v.to_string())
                .unwrap_or(defaults.agency_name),
            tagline: map.get("tagline").map(|v| v.to_string()).unwrap_or_default(),
            contact_email: map
                .get("contact_email")
                .map(|v| v.to_string())
                .unwrap_or_default(),
            contact_phone: map
                .get("contact_phone")
                .map(|v| v.to_string())
                .unwrap_or_default(),
            address: map.get("address").map(|v| v.to_string()).unwrap_or_default(),
            hero_title: map
                .get("hero_title")
                .map(|v| v.to_string())
                .unwrap_or_default(),
            hero_subtitle: map
                .get("hero_subtitle")
                .map(|v| v.to_string())
                .unwrap_or_default(),
            about: map.get("about").map(|v| v.to_string()).unwrap_or_default(),
            theme: map.get("theme").map(|v| Theme::from(*v)).unwrap_or_default(),
        }
    }

    /// Flattens the aggregate back into persistable rows.
    pub fn to_rows(&self) -> Vec<Setting> {
        let pair = |key: &str, value: &str| Setting {
            key: key.to_string(),
            value: value.to_string(),
        };
        vec![
            pair("agency_name", &self.agency_name),
            pair("tagline", &self.tagline),
            pair("contact_email", &self.contact_email),
            pair("contact_phone", &self.contact_phone),
            pair("address", &self.address),
            pair("hero_title", &self.hero_title),
            pair("hero_subtitle", &self.hero_subtitle),
            pair("about", &self.about),
            pair("theme", self.theme.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_round_trip() {
        let settings = SiteSettings {
            agency_name: "Northlight Studio".to_string(),
            tagline: "Design & build".to_string(),
            theme: Theme::Dark,
            ..SiteSettings::default()
        };
        let rebuilt = SiteSettings::from_rows(&settings.to_rows());
        assert_eq!(rebuilt, settings);
    }

    #[test]
    fn absent_keys_fall_back_to_defaults() {
        let rows = vec![Setting {
            key: "tagline".to_string(),
            value: "hello".to_string(),
        }];
        let settings = SiteSettings::from_rows(&rows);
        assert_eq!(settings.tagline, "hello");
        assert_eq!(settings.agency_name, "Agency Desk");
        assert_eq!(settings.theme, Theme::Light);
    }
}
