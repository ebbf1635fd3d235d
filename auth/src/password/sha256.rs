use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LENGTH: usize = 64;

/// Deterministic SHA-256 password digest.
///
/// Same plaintext always yields the same lowercase hex digest. Fast and unsalted,
/// kept so existing unsalted digests keep verifying.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password into a hex-encoded SHA-256 digest.
    pub fn hash(&self, password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    /// Recompute the digest of `password` and compare it to `digest` in constant time.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let computed = self.hash(password);
        constant_time_eq(computed.as_bytes(), digest.as_bytes())
    }

    /// Whether `digest` has the shape this hasher produces.
    pub fn recognizes(digest: &str) -> bool {
        digest.len() == DIGEST_HEX_LENGTH
            && digest
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

/// Equal-time comparison of two byte slices.
///
/// Only the length check short-circuits; digest lengths are public.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
