use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::Identity;
use super::errors::AuthError;

/// Tokens expire seven days after issuance. There is no server-side
/// revocation before expiry.
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: Uuid,
    email: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256-signed identity tokens.
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: identity.user_id,
            email: identity.email.clone(),
            username: identity.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Any failure (malformed token, wrong signature, expiry) collapses into
    /// `InvalidToken`; callers cannot distinguish why a token was rejected.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &key, &validation).map_err(|_| AuthError::InvalidToken)?;
        Ok(Identity {
            user_id: data.claims.user_id,
            email: data.claims.email,
            username: data.claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "user@example.com".into(),
            username: "tester".into(),
        }
    }

    #[test]
    fn round_trip_preserves_identity() {
        let svc = TokenService::new("secret");
        let id = identity();
        let token = svc.issue(&id).unwrap();
        let decoded = svc.verify(&token).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenService::new("secret-a").issue(&identity()).unwrap();
        let err = TokenService::new("secret-b").verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = TokenService::new("secret");
        let mut token = svc.issue(&identity()).unwrap();
        token.push('x');
        assert!(matches!(svc.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = TokenService::new("secret");
        assert!(matches!(svc.verify("not.a.jwt"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "secret";
        let now = Utc::now();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            email: "old@example.com".into(),
            username: "old".into(),
            iat: (now - Duration::days(8)).timestamp(),
            // Past the default decoding leeway
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        let err = TokenService::new(secret).verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
