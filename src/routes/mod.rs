//! HTTP handlers and the template helpers they share.

use std::collections::{HashMap, HashSet};

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};
use validator::ValidationErrors;

use crate::auth::AuthenticatedUser;
use crate::domain::settings::SiteSettings;

pub mod clients;
pub mod invoices;
pub mod leads;
pub mod main;
pub mod projects;
pub mod settings;

/// Maps a flash level to the alert class used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Collects incoming flash messages de-duplicated by (content, level), so a
/// message is surfaced exactly once per render.
pub fn collect_alerts(flash_messages: &IncomingFlashMessages) -> Vec<(String, &'static str)> {
    let mut seen = HashSet::new();
    flash_messages
        .iter()
        .filter_map(|message| {
            let alert = (
                message.content().to_string(),
                alert_level_to_str(&message.level()),
            );
            seen.insert(alert.clone()).then_some(alert)
        })
        .collect()
}

/// Context shared by every back-office page: alerts, the authenticated user,
/// the active navigation entry and the read-only site settings.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    site: &SiteSettings,
) -> Context {
    let mut context = Context::new();
    context.insert("alerts", &collect_alerts(flash_messages));
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("site", site);
    context
}

/// Context for public pages, which have no authenticated user.
pub fn public_context(flash_messages: &IncomingFlashMessages, site: &SiteSettings) -> Context {
    let mut context = Context::new();
    context.insert("alerts", &collect_alerts(flash_messages));
    context.insert("site", site);
    context
}

/// Renders a template or logs and returns a 500.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template {name}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// `303 See Other` to the given location.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Flattens validator errors into a field → messages map for inline display.
pub fn field_errors(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, field_errs)| {
            let messages = field_errs
                .iter()
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_levels_map_to_bootstrap_classes() {
        assert_eq!(alert_level_to_str(&Level::Error), "danger");
        assert_eq!(alert_level_to_str(&Level::Warning), "warning");
        assert_eq!(alert_level_to_str(&Level::Success), "success");
        assert_eq!(alert_level_to_str(&Level::Info), "info");
        assert_eq!(alert_level_to_str(&Level::Debug), "info");
    }

    #[test]
    fn redirect_sets_location() {
        let response = redirect("/clients");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/clients"
        );
    }
}
