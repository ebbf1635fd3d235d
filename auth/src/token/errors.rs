use thiserror::Error;

/// Error type for token operations.
///
/// `verify` only returns `Malformed`, `InvalidSignature` and `Expired`. They stay
/// distinct for diagnostics; callers facing clients should collapse them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token expired at {expired_at}")]
    Expired { expired_at: i64 },
}

impl TokenError {
    /// Short label for the failure, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::EncodingFailed(_) => "encoding_failed",
            TokenError::Malformed(_) => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired { .. } => "expired",
        }
    }
}
