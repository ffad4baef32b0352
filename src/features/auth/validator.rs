use super::model::{AuthenticatedUser, Claims};
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Verifies HS256 access tokens issued by the login service
pub struct JwtValidator {
    decoding_key: DecodingKey,
    issuer: Option<String>,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?
            .claims;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Token subject is not a user id".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            name: claims.name,
            role: claims.role,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::Duration;

    pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-1234567890";

    pub fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            issuer: Some("portfolio-test".to_string()),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    pub fn issue_token(sub: &str, role: &str, exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as u64;
        let claims = Claims {
            sub: sub.to_string(),
            name: Some("Tester".to_string()),
            role: role.to_string(),
            exp,
            iss: Some("portfolio-test".to_string()),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token() {
        let validator = JwtValidator::new(&test_config());
        let user = validator
            .validate_token(&issue_token("42", "admin", 3600))
            .unwrap();

        assert_eq!(user.user_id, 42);
        assert_eq!(user.role, "admin");
        assert_eq!(user.name.as_deref(), Some("Tester"));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let validator = JwtValidator::new(&test_config());
        let result = validator.validate_token(&issue_token("42", "admin", -3600));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let validator = JwtValidator::new(&test_config());
        let result = validator.validate_token(&issue_token("abc", "user", 3600));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let mut config = test_config();
        config.jwt_secret = "another-secret-that-is-long-enough-0987654321".to_string();
        let validator = JwtValidator::new(&config);
        let result = validator.validate_token(&issue_token("1", "user", 3600));
        assert!(result.is_err());
    }
}
