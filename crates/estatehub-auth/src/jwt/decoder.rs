//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use estatehub_core::config::AuthConfig;
use estatehub_core::error::AppError;

use super::claims::Claims;

/// Validates bearer tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Check the signature and expiry and return the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Not authorized, token expired")
                }
                _ => AppError::authentication("Not authorized, token failed"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::{Duration, Utc};
    use estatehub_entity::user::UserRole;
    use uuid::Uuid;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_issue_then_decode() {
        let cfg = config("test-secret");
        let user_id = Uuid::new_v4();
        let issued = JwtEncoder::new(&cfg).issue(user_id, UserRole::Realtor).unwrap();

        let claims = JwtDecoder::new(&cfg).decode(&issued.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Realtor);
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let cfg = config("test-secret");
        let issued = JwtEncoder::new(&cfg)
            .issue_at(Uuid::new_v4(), UserRole::Owner, Utc::now() - Duration::days(31))
            .unwrap();
        let err = JwtDecoder::new(&cfg).decode(&issued.token).unwrap_err();
        assert_eq!(err.message, "Not authorized, token expired");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = JwtEncoder::new(&config("one"))
            .issue(Uuid::new_v4(), UserRole::Owner)
            .unwrap();
        let err = JwtDecoder::new(&config("two")).decode(&issued.token).unwrap_err();
        assert_eq!(err.kind, estatehub_core::ErrorKind::Authentication);
    }
}
