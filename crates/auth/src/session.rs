//! Signed session tokens carried in the `session` cookie.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crudapps_core::RecordId;

/// Session claims model.
///
/// The token only identifies the user; the user row itself is re-loaded on
/// every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: id of the authenticated user.
    pub sub: RecordId,

    /// Random per-login identifier.
    pub sid: Uuid,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed or tampered session token: {0}")]
    Malformed(String),

    #[error("failed to sign session token: {0}")]
    Signing(String),
}

/// Deterministically validate session claims.
///
/// Note: this validates the *claims* only; signature checks happen in the
/// codec.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), SessionError> {
    if claims.expires_at <= claims.issued_at {
        return Err(SessionError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(SessionError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(SessionError::Expired);
    }
    Ok(())
}

/// Verifies a session token and returns its claims.
pub trait SessionValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError>;
}

/// HS256-signed session tokens keyed by the app's secret key.
pub struct Hs256SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256SessionCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a new session for `user_id`.
    pub fn issue(&self, user_id: RecordId, now: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = SessionClaims {
            sub: user_id,
            sid: Uuid::now_v7(),
            issued_at: now,
            expires_at: now + self.ttl,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }
}

impl SessionValidator for Hs256SessionCodec {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        // Time checks are ours (RFC 3339 timestamps, not numeric `exp`).
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> Hs256SessionCodec {
        Hs256SessionCodec::new(secret.as_bytes(), Duration::minutes(30))
    }

    #[test]
    fn issued_token_validates_within_ttl() {
        let codec = codec("secret");
        let now = Utc::now();
        let token = codec.issue(RecordId::new(7), now).unwrap();

        let claims = codec.validate(&token, now + Duration::minutes(5)).unwrap();
        assert_eq!(claims.sub, RecordId::new(7));
        assert_eq!(claims.expires_at, now + Duration::minutes(30));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec("secret");
        let now = Utc::now();
        let token = codec.issue(RecordId::new(1), now).unwrap();

        assert_eq!(
            codec.validate(&token, now + Duration::minutes(31)).unwrap_err(),
            SessionError::Expired
        );
    }

    #[test]
    fn token_signed_with_another_key_is_rejected() {
        let now = Utc::now();
        let token = codec("other").issue(RecordId::new(1), now).unwrap();

        assert!(matches!(codec("secret").validate(&token, now), Err(SessionError::Malformed(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            codec("secret").validate("not.a.token", Utc::now()),
            Err(SessionError::Malformed(_))
        ));
    }

    #[test]
    fn claims_time_window_is_checked() {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: RecordId::new(1),
            sid: Uuid::now_v7(),
            issued_at: now,
            expires_at: now,
        };
        assert_eq!(validate_claims(&claims, now), Err(SessionError::InvalidTimeWindow));

        let future = SessionClaims {
            issued_at: now + Duration::minutes(1),
            expires_at: now + Duration::minutes(2),
            ..claims
        };
        assert_eq!(validate_claims(&future, now), Err(SessionError::NotYetValid));
    }
}
