use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// How long an issued token stays cryptographically valid. Session state can
/// revoke a token earlier (logout), never later.
pub const TOKEN_TTL_MINUTES: i64 = 45;

/// Claims
///
/// The identity payload embedded in a token's signed envelope. Claims are
/// immutable once signed; they are reconstructed by verification and never
/// stored separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Always true for tokens issued by this service. A forward-compat flag,
    /// not itself a security boundary.
    pub authorized: bool,
    /// Subject: the authenticated account's identifier.
    pub sub: Uuid,
    /// The role whose permission set authorizes this subject's requests.
    pub role_id: Uuid,
    /// Expiration (exp): Unix timestamp after which the token must not be
    /// accepted, independent of session state.
    pub exp: usize,
}

/// TokenError
///
/// Issuance and verification failures, kept separate so callers can map
/// signing problems to internal errors and verification problems to a
/// rejection.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("token rejected: {0}")]
    Verify(#[source] jsonwebtoken::errors::Error),
}

/// TokenCodec
///
/// Creates and verifies signed, time-limited identity assertions. The HMAC
/// keys and validation rules are derived once from the process-wide signing
/// secret; rotating the secret invalidates every outstanding token, which is
/// acceptable because sessions remain the durable source of revocation.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// new
    ///
    /// Builds the codec from the server-held secret. Verification accepts
    /// exactly one signing algorithm (HS256); a token advertising any other
    /// algorithm in its header is rejected before its signature is trusted,
    /// closing the algorithm-confusion forgery route.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry is exact: a token one second past its exp is already dead.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// issue
    ///
    /// Signs a fresh set of claims for the given subject and role, expiring
    /// `TOKEN_TTL_MINUTES` from now, and returns the serialized token string
    /// (three base64url segments: header, claims, signature).
    pub fn issue(&self, subject_id: Uuid, role_id: Uuid) -> Result<String, TokenError> {
        let expires_at = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);

        let claims = Claims {
            authorized: true,
            sub: subject_id,
            role_id,
            exp: expires_at.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// verify
    ///
    /// Parses the token, enforces the HS256 allow-list, recomputes the
    /// signature with the server secret and checks expiry. Returns the
    /// embedded claims only when every check passes.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Verify)
    }
}
