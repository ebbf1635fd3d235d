use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::Sha256;

use super::claims::Claims;
use super::claims::Header;
use super::errors::TokenError;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::secret::Secret;

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm. Hardcoded: never taken from a presented header.
pub const ALGORITHM: &str = "HS256";

/// Token type tag.
pub const TOKEN_TYPE: &str = "JWT";

/// Token lifetime (24 hours).
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Upper bound on accepted token text.
const MAX_TOKEN_LENGTH: usize = 8 * 1024;

/// Identity carried by a successfully verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub subject_id: String,
    pub email: String,
}

/// Issues and verifies compact HMAC-SHA256 signed tokens.
///
/// Tokens use the `header.payload.signature` layout with base64url segments and
/// the header `{"alg":"HS256","typ":"JWT"}`, so standard JWT libraries can
/// verify them with the same secret.
///
/// Holds only the immutable secret and a clock; safe to share across threads.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: Secret,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service reading the wall clock.
    pub fn new(secret: Secret) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create a token service with an explicit time source.
    pub fn with_clock(secret: Secret, clock: Arc<dyn Clock>) -> Self {
        Self { secret, clock }
    }

    /// Issue a token for `subject_id` expiring 24 hours from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Header or payload could not be serialized or signed
    pub fn issue(&self, subject_id: &str, email: &str) -> Result<String, TokenError> {
        let claims = Claims::new(subject_id, email, self.clock.now());
        self.encode(&claims)
    }

    /// Sign arbitrary claims under the fixed header.
    ///
    /// # Errors
    /// * `EncodingFailed` - Header or payload could not be serialized or signed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let encoded_header = encode_segment(&Header::fixed())?;
        let encoded_payload = encode_segment(claims)?;

        let mut mac = self.keyed_mac().map_err(TokenError::EncodingFailed)?;
        feed_signing_input(&mut mac, &encoded_header, &encoded_payload);
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}.{}", encoded_header, encoded_payload, signature))
    }

    /// Verify a presented token's integrity and freshness.
    ///
    /// Checks run in order: segment layout, header, signature, payload shape, expiry.
    /// The payload is only parsed once the signature over its raw bytes holds.
    ///
    /// # Errors
    /// * `Malformed` - Wrong segment count, empty segment, bad encoding,
    ///   unexpected header or payload shape
    /// * `InvalidSignature` - Signature does not match under the current secret
    /// * `Expired` - Current time is past the token's expiry
    pub fn verify(&self, token: &str) -> Result<TokenSubject, TokenError> {
        let claims = self.verify_claims(token)?;

        Ok(TokenSubject {
            subject_id: claims.sub,
            email: claims.email,
        })
    }

    /// Same checks as [`verify`](Self::verify), returning the full payload.
    pub fn verify_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let (encoded_header, encoded_payload, encoded_signature) = split_segments(token)?;

        let header: Header = decode_segment(encoded_header, "header")?;
        if !header.is_fixed() {
            return Err(TokenError::Malformed(format!(
                "unsupported header alg={} typ={}",
                header.alg, header.typ
            )));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(encoded_signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let mut mac = self.keyed_mac().map_err(TokenError::Malformed)?;
        feed_signing_input(&mut mac, encoded_header, encoded_payload);
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let claims: Claims = decode_segment(encoded_payload, "payload")?;
        if claims.sub.is_empty() || claims.exp < claims.iat {
            return Err(TokenError::Malformed("inconsistent payload".to_string()));
        }

        if claims.is_expired(self.clock.now()) {
            return Err(TokenError::Expired {
                expired_at: claims.exp,
            });
        }

        Ok(claims)
    }

    fn keyed_mac(&self) -> Result<HmacSha256, String> {
        HmacSha256::new_from_slice(self.secret.expose()).map_err(|e| e.to_string())
    }
}

fn feed_signing_input(mac: &mut HmacSha256, encoded_header: &str, encoded_payload: &str) {
    mac.update(encoded_header.as_bytes());
    mac.update(b".");
    mac.update(encoded_payload.as_bytes());
}

fn split_segments(token: &str) -> Result<(&str, &str, &str), TokenError> {
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(TokenError::Malformed("token too long".to_string()));
    }

    let mut segments = token.split('.');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        _ => Err(TokenError::Malformed(
            "expected three non-empty segments".to_string(),
        )),
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|e| TokenError::EncodingFailed(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("{} is not base64url: {}", name, e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("{} has unexpected shape: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const SECRET: &str = "test_secret_key_at_least_32_bytes!";
    const START: i64 = 1_700_000_000;

    fn service_at(now: i64) -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let service = TokenService::with_clock(Secret::new(SECRET).unwrap(), clock.clone());
        (service, clock)
    }

    fn replace_char_at(token: &str, index: usize) -> String {
        let mut bytes = token.as_bytes().to_vec();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let (service, _) = service_at(START);

        let token = service.issue("42", "alice@example.com").unwrap();
        let subject = service.verify(&token).unwrap();

        assert_eq!(
            subject,
            TokenSubject {
                subject_id: "42".to_string(),
                email: "alice@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_token_layout() {
        let (service, _) = service_at(START);
        let token = service.issue("42", "alice@example.com").unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn test_issue_is_deterministic_for_same_instant() {
        let (service, _) = service_at(START);

        let first = service.issue("42", "alice@example.com").unwrap();
        let second = service.issue("42", "alice@example.com").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_claims_carry_lifetime() {
        let (service, _) = service_at(START);
        let token = service.issue("42", "alice@example.com").unwrap();

        let claims = service.verify_claims(&token).unwrap();
        assert_eq!(claims.iat, START);
        assert_eq!(claims.exp, START + TOKEN_LIFETIME_SECS);
    }

    #[test]
    fn test_altered_last_character_is_invalid_signature() {
        let (service, _) = service_at(START);
        let token = service.issue("42", "alice@example.com").unwrap();

        let tampered = replace_char_at(&token, token.len() - 1);
        assert_eq!(service.verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_is_invalid_signature() {
        let (service, _) = service_at(START);
        let token = service.issue("42", "alice@example.com").unwrap();

        let payload_start = token.find('.').unwrap() + 1;
        let tampered = replace_char_at(&token, payload_start + 5);
        assert_eq!(service.verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_forged_payload_is_invalid_signature() {
        let (service, _) = service_at(START);
        let token = service.issue("42", "alice@example.com").unwrap();
        let segments: Vec<&str> = token.split('.').collect();

        let forged_claims = Claims::new("1", "admin@example.com", START);
        let forged_payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}.{}", segments[0], forged_payload, segments[2]);

        assert_eq!(service.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let (issuer, _) = service_at(START);
        let verifier = TokenService::with_clock(
            Secret::new("another_secret_key_at_least_32_bytes").unwrap(),
            Arc::new(ManualClock::new(START)),
        );

        let token = issuer.issue("42", "alice@example.com").unwrap();
        assert_eq!(verifier.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_expired_after_lifetime() {
        let (service, clock) = service_at(START);
        let token = service.issue("42", "alice@example.com").unwrap();

        clock.advance(TOKEN_LIFETIME_SECS);
        assert!(service.verify(&token).is_ok());

        clock.advance(1);
        assert_eq!(
            service.verify(&token),
            Err(TokenError::Expired {
                expired_at: START + TOKEN_LIFETIME_SECS
            })
        );
    }

    #[test]
    fn test_expired_stays_expired() {
        let (service, clock) = service_at(START);
        let token = service.issue("42", "alice@example.com").unwrap();

        clock.set(START + 2 * TOKEN_LIFETIME_SECS);
        assert!(matches!(service.verify(&token), Err(TokenError::Expired { .. })));
        assert!(matches!(service.verify(&token), Err(TokenError::Expired { .. })));
    }

    #[test]
    fn test_segment_count() {
        let (service, _) = service_at(START);
        let token = service.issue("42", "alice@example.com").unwrap();
        let (header, rest) = token.split_once('.').unwrap();

        for candidate in [
            String::new(),
            "abc".to_string(),
            header.to_string(),
            format!("{}.{}", header, rest.split('.').next().unwrap()),
            format!("{}.extra", token),
            format!("{}..{}", header, rest),
            format!("{}.", token.rsplit_once('.').unwrap().0),
        ] {
            assert!(
                matches!(service.verify(&candidate), Err(TokenError::Malformed(_))),
                "{:?} should be malformed",
                candidate
            );
        }
    }

    #[test]
    fn test_garbage_segments_are_malformed() {
        let (service, _) = service_at(START);
        assert!(matches!(
            service.verify("invalid.token.here"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            service.verify("!!!.###.$$$"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_oversized_token_is_malformed() {
        let (service, _) = service_at(START);
        let token = "a".repeat(MAX_TOKEN_LENGTH + 1);
        assert!(matches!(service.verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_none_algorithm_is_malformed() {
        let (service, _) = service_at(START);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(&Claims::new("42", "alice@example.com", START)).unwrap());

        let unsigned = format!("{}.{}.", header, payload);
        assert!(matches!(service.verify(&unsigned), Err(TokenError::Malformed(_))));

        let with_signature = format!("{}.{}.c2ln", header, payload);
        assert!(matches!(
            service.verify(&with_signature),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_type_tag_is_malformed() {
        let (service, _) = service_at(START);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"token"}"#);
        let payload = URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(&Claims::new("42", "alice@example.com", START)).unwrap());

        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        feed_signing_input(&mut mac, &header, &payload);
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let token = format!("{}.{}.{}", header, payload, signature);
        assert!(matches!(service.verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_signed_payload_with_extra_claim_is_malformed() {
        let (service, _) = service_at(START);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            format!(
                r#"{{"sub":"42","email":"alice@example.com","iat":{},"exp":{},"role":"admin"}}"#,
                START,
                START + 60
            )
            .as_bytes(),
        );

        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        feed_signing_input(&mut mac, &header, &payload);
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let token = format!("{}.{}.{}", header, payload, signature);
        assert!(matches!(service.verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_inconsistent_timestamps_are_malformed() {
        let (service, _) = service_at(START);
        let claims = Claims {
            sub: "42".to_string(),
            email: "alice@example.com".to_string(),
            iat: START,
            exp: START - 1,
        };

        let token = service.encode(&claims).unwrap();
        assert!(matches!(service.verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(TokenError::InvalidSignature.kind(), "invalid_signature");
        assert_eq!(TokenError::Expired { expired_at: 0 }.kind(), "expired");
        assert_eq!(TokenError::Malformed(String::new()).kind(), "malformed");
    }
}
