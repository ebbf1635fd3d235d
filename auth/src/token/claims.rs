use serde::Deserialize;
use serde::Serialize;

use super::service::ALGORITHM;
use super::service::TOKEN_LIFETIME_SECS;
use super::service::TOKEN_TYPE;

/// Token header. Identical for every token this service issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Header {
    pub alg: String,
    pub typ: String,
}

impl Header {
    pub fn fixed() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.alg == ALGORITHM && self.typ == TOKEN_TYPE
    }
}

/// Token payload.
///
/// Fixed shape: decoding rejects missing, extra or mistyped fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Subject (stable user identifier)
    pub sub: String,

    /// Email address of the subject
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Claims for `subject` issued at `issued_at`, expiring one token lifetime later.
    pub fn new(subject: impl ToString, email: impl ToString, issued_at: i64) -> Self {
        Self {
            sub: subject.to_string(),
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        }
    }

    /// A token is still valid at its exact expiry second.
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.exp
    }
}
