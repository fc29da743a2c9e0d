use crate::config::AuthConfig;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's email address.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: i64,
}

/// Why a token failed validation. Callers that surface the failure to a client
/// must collapse both variants into the same uniform message so that signature
/// problems cannot be told apart from expiry.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Signature check failed, the payload is malformed, or the `sub` claim is
    /// missing or empty.
    InvalidSignature,
    /// The token is past its expiry instant.
    Expired,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> AppError {
        AppError::Unauthorized("Could not validate credentials".into())
    }
}

/// Issues a signed access token for the given subject.
///
/// The token expires `access_token_expire_minutes` after `now`. Taking `now`
/// as an argument keeps issuance deterministic and testable.
pub fn issue_token(
    subject: &str,
    now: DateTime<Utc>,
    config: &AuthConfig,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: subject.to_string(),
        exp: (now + Duration::minutes(config.access_token_expire_minutes)).timestamp(),
    };

    encode(
        &Header::new(config.algorithm),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token's signature and expiry, returning the subject email.
///
/// Expiry is checked here against the caller-supplied `now` rather than by the
/// jsonwebtoken library, so the boundary is exact: a token is invalid from its
/// expiry instant onwards, with no leeway.
pub fn validate_token(
    token: &str,
    now: DateTime<Utc>,
    config: &AuthConfig,
) -> Result<String, TokenError> {
    let mut validation = Validation::new(config.algorithm);
    validation.validate_exp = false;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::InvalidSignature)?;

    if claims.sub.is_empty() {
        return Err(TokenError::InvalidSignature);
    }

    if now.timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }

    Ok(claims.sub)
}

/// Validates `token` and, if it is still valid, issues a fresh one for the
/// same subject.
pub fn refresh_token(
    token: &str,
    now: DateTime<Utc>,
    config: &AuthConfig,
) -> Result<String, AppError> {
    let subject = validate_token(token, now, config)?;
    issue_token(&subject, now, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret_key: "test-secret".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
        }
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let config = test_config();
        let now = Utc::now();

        let token = issue_token("alice@example.com", now, &config).unwrap();
        let subject = validate_token(&token, now, &config).unwrap();

        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn test_token_expired_after_ttl() {
        let config = test_config();
        let now = Utc::now();

        let token = issue_token("alice@example.com", now, &config).unwrap();
        let later = now + Duration::minutes(31);

        assert_eq!(
            validate_token(&token, later, &config),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_expired_exactly_at_expiry_instant() {
        let config = test_config();
        let now = Utc::now();

        let token = issue_token("alice@example.com", now, &config).unwrap();
        let at_expiry = now + Duration::minutes(config.access_token_expire_minutes);

        // The boundary is inclusive: exactly at the expiry instant is expired.
        assert_eq!(
            validate_token(&token, at_expiry, &config),
            Err(TokenError::Expired)
        );

        let just_before = at_expiry - Duration::seconds(1);
        assert!(validate_token(&token, just_before, &config).is_ok());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let config = test_config();
        let now = Utc::now();

        let token = issue_token("alice@example.com", now, &config).unwrap();

        // Flip the last signature character.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(
            validate_token(&tampered, now, &config),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let config = test_config();
        let other = AuthConfig {
            secret_key: "a_completely_different_secret".to_string(),
            ..test_config()
        };
        let now = Utc::now();

        let token = issue_token("alice@example.com", now, &other).unwrap();

        assert_eq!(
            validate_token(&token, now, &config),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = test_config();
        let now = Utc::now();

        assert_eq!(
            validate_token("not-a-jwt-at-all", now, &config),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_token_with_empty_subject_rejected() {
        let config = test_config();
        let now = Utc::now();

        let token = issue_token("", now, &config).unwrap();

        assert_eq!(
            validate_token(&token, now, &config),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_refresh_issues_new_token_for_same_subject() {
        let config = test_config();
        let now = Utc::now();

        let token = issue_token("alice@example.com", now, &config).unwrap();
        let later = now + Duration::minutes(10);

        let refreshed = refresh_token(&token, later, &config).unwrap();
        let subject = validate_token(&refreshed, later, &config).unwrap();
        assert_eq!(subject, "alice@example.com");

        // The refreshed token outlives the original.
        let past_original_expiry = now + Duration::minutes(35);
        assert!(validate_token(&token, past_original_expiry, &config).is_err());
        assert!(validate_token(&refreshed, past_original_expiry, &config).is_ok());
    }

    #[test]
    fn test_refresh_of_expired_token_fails() {
        let config = test_config();
        let now = Utc::now();

        let token = issue_token("alice@example.com", now, &config).unwrap();
        let later = now + Duration::minutes(31);

        assert!(refresh_token(&token, later, &config).is_err());
    }
}
