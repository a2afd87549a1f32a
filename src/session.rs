use crate::models::Session;
use crate::repository::{RepositoryState, StoreError};
use chrono::Utc;

/// SessionLedger
///
/// Tracks one record per issued login over the persistence collaborator.
/// The ledger is the durable authority on whether a token may still be used:
/// a token whose session has been stopped is dead even while its signature
/// and expiry are still valid.
#[derive(Clone)]
pub struct SessionLedger {
    repo: RepositoryState,
}

impl SessionLedger {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// start
    ///
    /// Records a fresh login as an active session. Sessions are never
    /// deduplicated: a second login for the same account starts a second,
    /// independent session (multi-device login).
    pub async fn start(&self, token: &str) -> Result<Session, StoreError> {
        let session = Session {
            token: token.to_string(),
            created_at: Utc::now(),
            active: true,
        };

        self.repo.insert_session(&session).await?;

        Ok(session)
    }

    /// stop
    ///
    /// Marks the session matching `token` inactive. Returns whether a row
    /// matched; a missing row is "nothing to stop", not an error, and the
    /// caller decides what that means.
    pub async fn stop(&self, token: &str) -> Result<bool, StoreError> {
        let matched = self.repo.set_session_active(token, false).await?;
        Ok(matched > 0)
    }

    /// find
    ///
    /// Exact lookup by token value.
    pub async fn find(&self, token: &str) -> Result<Option<Session>, StoreError> {
        self.repo.find_session(token).await
    }
}
