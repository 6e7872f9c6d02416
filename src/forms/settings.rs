use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::settings::{SiteSettings, Theme};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
/// Site content and contact details managed from the settings screen.
pub struct SaveSettingsForm {
    #[validate(length(min = 1, message = "agency name is required"))]
    pub agency_name: String,
    #[serde(default)]
    pub tagline: String,
    #[validate(custom(function = crate::forms::validate_optional_email))]
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub hero_title: String,
    #[serde(default)]
    pub hero_subtitle: String,
    #[serde(default)]
    pub about: String,
}

impl SaveSettingsForm {
    /// Merges the submitted content over the current settings; the theme is
    /// managed by its own form.
    pub fn apply_to(&self, current: &SiteSettings) -> SiteSettings {
        SiteSettings {
            agency_name: self.agency_name.trim().to_string(),
            tagline: self.tagline.trim().to_string(),
            contact_email: self.contact_email.trim().to_lowercase(),
            contact_phone: self.contact_phone.trim().to_string(),
            address: self.address.trim().to_string(),
            hero_title: self.hero_title.trim().to_string(),
            hero_subtitle: self.hero_subtitle.trim().to_string(),
            about: self.about.trim().to_string(),
            theme: current.theme,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Theme toggle; persisted through the settings store.
pub struct ThemeForm {
    pub theme: String,
}

impl ThemeForm {
    pub fn theme(&self) -> Theme {
        Theme::from(self.theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_current_theme() {
        let current = SiteSettings {
            theme: Theme::Dark,
            ..SiteSettings::default()
        };
        let form = SaveSettingsForm {
            agency_name: "Northlight".to_string(),
            tagline: " making things ".to_string(),
            contact_email: "Team@Northlight.io".to_string(),
            contact_phone: String::new(),
            address: String::new(),
            hero_title: String::new(),
            hero_subtitle: String::new(),
            about: String::new(),
        };
        let updated = form.apply_to(&current);
        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.tagline, "making things");
        assert_eq!(updated.contact_email, "team@northlight.io");
    }
}
