use axum::{
    Json,
    http::{StatusCode, header, HeaderMap},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::{
    permissions,
    repository::{RepositoryState, StoreError},
    security::{self, HashError},
    session::SessionLedger,
    token::{Claims, TokenCodec, TokenError},
};

/// Rejection
///
/// Why an authorization evaluation turned a request away. Every variant is
/// observably identical to the client (a 401); the distinction exists for
/// logs and diagnostics only, so a caller probing the API cannot learn which
/// specific check failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("no authorization header found")]
    MissingCredential,
    #[error("session does not exist")]
    InvalidSession,
    #[error("session is no longer active")]
    SessionEnded,
    #[error("token is invalid or expired")]
    InvalidToken,
    #[error("authentication role does not exist")]
    RoleMissing,
    #[error("unauthorized by role")]
    PermissionDenied,
    #[error("unknown username or wrong password")]
    InvalidCredentials,
}

/// AuthError
///
/// The error type the authorization surface hands to request handlers.
/// `Rejected` is the user-facing "not authorized" family; the remaining
/// variants are infrastructure failures and must never be reported to the
/// client as a credential problem.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Hashing(#[from] HashError),
    #[error("token signing failed: {0}")]
    Signing(#[source] TokenError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    /// Maps every rejection to a uniform 401 body and every infrastructure
    /// failure to a generic 500. Internal reasons go to the log stream only.
    fn into_response(self) -> Response {
        match &self {
            AuthError::Rejected(reason) => {
                tracing::warn!(%reason, "request not authorized");
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "not authorized" })),
                )
                    .into_response()
            }
            failure => {
                tracing::error!(error = %failure, "internal failure on authorization path");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

/// AuthService
///
/// Orchestrates the token codec, session ledger, permission evaluation and
/// role lookup to answer "is this request authorized?", and composes the
/// login/logout flows. Dependencies are injected at construction; the service
/// holds no mutable state and is shared across requests behind an `Arc`.
pub struct AuthService {
    repo: RepositoryState,
    sessions: SessionLedger,
    codec: TokenCodec,
}

/// AuthState
///
/// The concrete type used to share the authorization service across the
/// application state.
pub type AuthState = Arc<AuthService>;

impl AuthService {
    pub fn new(repo: RepositoryState, codec: TokenCodec) -> Self {
        let sessions = SessionLedger::new(repo.clone());
        Self {
            repo,
            sessions,
            codec,
        }
    }

    /// check_authorization
    ///
    /// The sole authorization entry point for request handlers. Checks run
    /// strictly in sequence and short-circuit at the first failure:
    ///
    /// 1. An empty requirement means "no permission needed" — the request is
    ///    allowed without looking at credentials at all.
    /// 2. The bearer token is extracted from the Authorization header.
    /// 3. The session ledger must hold an *active* record for the token.
    /// 4. The token's signature and expiry must verify.
    /// 5. The role named by the verified claims must exist.
    /// 6. The role's permission set must contain every required permission.
    ///
    /// Both the session check and the token's own expiry must hold: a
    /// structurally valid, unexpired token whose session was logged out is
    /// rejected, and an expired token is rejected even if its session row
    /// was never stopped. No check is ever retried; the evaluation performs
    /// no writes, so an abandoned request cannot corrupt session state.
    pub async fn check_authorization(
        &self,
        headers: &HeaderMap,
        required: &[&str],
    ) -> Result<(), AuthError> {
        if required.is_empty() {
            return Ok(());
        }

        let token = bearer_token(headers).ok_or(Rejection::MissingCredential)?;

        let session = self
            .sessions
            .find(token)
            .await?
            .ok_or(Rejection::InvalidSession)?;

        if !session.active {
            return Err(Rejection::SessionEnded.into());
        }

        let claims = self.verify_token(token)?;

        let role = self
            .repo
            .get_role(claims.role_id)
            .await?
            .ok_or(Rejection::RoleMissing)?;

        if !permissions::permits(required, &role.permissions) {
            return Err(Rejection::PermissionDenied.into());
        }

        Ok(())
    }

    /// login
    ///
    /// Verifies the password against the stored digest, issues a signed
    /// token and records it as an active session. Unknown usernames and
    /// wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .repo
            .get_user_by_username(username)
            .await?
            .ok_or(Rejection::InvalidCredentials)?;

        if !security::verify_password(password, &user.password_hash) {
            return Err(Rejection::InvalidCredentials.into());
        }

        let token = self
            .codec
            .issue(user.id, user.role_id)
            .map_err(AuthError::Signing)?;

        self.sessions.start(&token).await?;

        tracing::info!(user = %user.username, "session started");

        Ok(token)
    }

    /// logout
    ///
    /// Ends the session recorded for `token`. Returns whether a session row
    /// was actually stopped; a token with no matching row is reported as
    /// `false`, never as an error.
    pub async fn logout(&self, token: &str) -> Result<bool, AuthError> {
        let stopped = self.sessions.stop(token).await?;

        if !stopped {
            tracing::debug!("logout token had no matching session");
        }

        Ok(stopped)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        match self.codec.verify(token) {
            Ok(claims) => Ok(claims),
            Err(err) => {
                tracing::debug!(error = %err, "token verification failed");
                Err(Rejection::InvalidToken.into())
            }
        }
    }
}

/// bearer_token
///
/// Pulls the token out of a `Bearer <token>` Authorization header. A missing
/// header and a header without the Bearer prefix are treated alike: there is
/// no usable credential.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}
