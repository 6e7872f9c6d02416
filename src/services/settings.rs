use validator::Validate;

use crate::auth::{AuthenticatedUser, SERVICE_ADMIN_ROLE};
use crate::domain::settings::SiteSettings;
use crate::forms::settings::{SaveSettingsForm, ThemeForm};
use crate::repository::{SettingsReader, SettingsWriter};
use crate::services::{ServiceResult, ensure_role};

/// Loads the site settings aggregate. No role check: the settings context is
/// injected into every rendered page, the public landing included.
pub fn site_settings<R>(repo: &R) -> ServiceResult<SiteSettings>
where
    R: SettingsReader + ?Sized,
{
    let rows = repo.load_settings()?;
    Ok(SiteSettings::from_rows(&rows))
}

/// Loads the settings screen; admin only.
pub fn load_settings_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SiteSettings>
where
    R: SettingsReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    site_settings(repo)
}

/// Persists the submitted site content over the current settings.
pub fn save_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &SaveSettingsForm,
) -> ServiceResult<SiteSettings>
where
    R: SettingsReader + SettingsWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    form.validate()?;

    let current = site_settings(repo)?;
    let updated = form.apply_to(&current);
    repo.save_settings(&updated.to_rows())?;
    Ok(updated)
}

/// Persists a theme change through the settings store. The explicit update
/// path: nothing else writes the theme.
pub fn set_theme<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &ThemeForm,
) -> ServiceResult<SiteSettings>
where
    R: SettingsReader + SettingsWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let mut settings = site_settings(repo)?;
    settings.theme = form.theme();
    repo.save_settings(&settings.to_rows())?;
    Ok(settings)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::settings::Theme;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![SERVICE_ADMIN_ROLE.to_string()],
            exp: usize::MAX,
        }
    }

    #[test]
    fn settings_page_requires_admin() {
        let repo = MockRepository::new();
        let user = AuthenticatedUser {
            roles: vec!["agency".to_string()],
            ..admin()
        };
        assert!(matches!(
            load_settings_page(&repo, &user),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn theme_change_persists_through_the_store() {
        let mut repo = MockRepository::new();
        repo.expect_load_settings().returning(|| Ok(vec![]));
        repo.expect_save_settings()
            .withf(|rows| {
                rows.iter()
                    .any(|row| row.key == "theme" && row.value == "dark")
            })
            .returning(|_| Ok(()));

        let form = ThemeForm {
            theme: "dark".to_string(),
        };
        let updated = set_theme(&repo, &admin(), &form).unwrap();
        assert_eq!(updated.theme, Theme::Dark);
    }
}
