use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

// --- Credential Hashing ---

/// Work factor for bcrypt. High enough that offline brute force against a
/// leaked digest is impractical on commodity hardware.
pub const BCRYPT_COST: u32 = 14;

/// HashError
///
/// Raised when the hashing routine itself fails (resource exhaustion, invalid
/// cost). Callers must surface this as an internal failure rather than
/// storing an empty or unusable credential.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// hash_password
///
/// One-way transform of a plaintext password into a salted bcrypt digest.
/// The salt is generated per call and embedded in the digest, so hashing the
/// same plaintext twice yields two different digests that both verify.
pub fn hash_password(plain: &str) -> Result<String, HashError> {
    Ok(bcrypt::hash(plain, BCRYPT_COST)?)
}

/// verify_password
///
/// Checks a plaintext password against a stored digest. The comparison inside
/// the bcrypt crate is constant-time with respect to the digest contents.
/// A malformed digest yields `false`, never an error.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    bcrypt::verify(plain, digest).unwrap_or(false)
}

static DIGEST_PATTERN: OnceLock<Regex> = OnceLock::new();

/// looks_like_digest
///
/// Recognizes whether a candidate string is already a bcrypt digest
/// (`$2a$`/`$2b$`/`$2y$` prefix, two-digit cost, 53 base64 characters of
/// salt-plus-checksum). Account creation uses this so that an incoming
/// "password" field that is already hashed is stored as-is instead of being
/// re-hashed into a hash-of-a-hash.
pub fn looks_like_digest(candidate: &str) -> bool {
    let pattern = DIGEST_PATTERN.get_or_init(|| {
        Regex::new(r"^\$2[aby]\$\d{2}\$[./0-9A-Za-z]{53}$").expect("digest pattern is valid")
    });
    pattern.is_match(candidate)
}
