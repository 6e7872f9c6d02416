//! Authenticated user claims and the request extractor.
//!
//! Sign-in screens live in the external auth service; this application only
//! verifies the JWT carried by the identity cookie and enforces roles.

use actix_identity::Identity;
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

/// Role granting access to the back office.
pub const SERVICE_ACCESS_ROLE: &str = "agency";
/// Role granting destructive and settings operations.
pub const SERVICE_ADMIN_ROLE: &str = "agency_admin";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject: the user identifier issued by the auth service.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp; verified during decode.
    pub exp: usize,
}

/// Whether `roles` contains `role`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

impl AuthenticatedUser {
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoded = decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(decoded.claims)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload).into_inner();
        let config = req.app_data::<web::Data<ServerConfig>>();

        let result = match (identity, config) {
            (Ok(identity), Some(config)) => identity
                .id()
                .map_err(|e| ErrorUnauthorized(e.to_string()))
                .and_then(|token| {
                    AuthenticatedUser::from_token(&token, &config.secret)
                        .map_err(|e| ErrorUnauthorized(e.to_string()))
                }),
            _ => Err(ErrorUnauthorized("authentication required")),
        };

        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(user: &AuthenticatedUser, secret: &str) -> String {
        encode(
            &Header::default(),
            user,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: usize::MAX,
        }
    }

    #[test]
    fn token_round_trip() {
        let user = user();
        let decoded = AuthenticatedUser::from_token(&token(&user, "secret"), "secret").unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = user();
        assert!(AuthenticatedUser::from_token(&token(&user, "secret"), "other").is_err());
    }

    #[test]
    fn check_role_matches_exactly() {
        let roles = vec!["agency".to_string()];
        assert!(check_role(SERVICE_ACCESS_ROLE, &roles));
        assert!(!check_role(SERVICE_ADMIN_ROLE, &roles));
    }
}
