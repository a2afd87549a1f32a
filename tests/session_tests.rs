use blog_portal::{MemoryRepository, repository::RepositoryState, session::SessionLedger};
use std::sync::Arc;

fn ledger() -> SessionLedger {
    let repo: RepositoryState = Arc::new(MemoryRepository::new());
    SessionLedger::new(repo)
}

#[tokio::test]
async fn test_start_records_an_active_session() {
    let ledger = ledger();

    let session = ledger.start("tok-1").await.unwrap();
    assert_eq!(session.token, "tok-1");
    assert!(session.active);

    let found = ledger.find("tok-1").await.unwrap().unwrap();
    assert!(found.active);
    assert_eq!(found.created_at, session.created_at);
}

#[tokio::test]
async fn test_find_of_unknown_token_is_none() {
    let ledger = ledger();

    assert!(ledger.find("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_stop_flips_active_and_reports_the_match() {
    let ledger = ledger();
    ledger.start("tok-1").await.unwrap();

    let stopped = ledger.stop("tok-1").await.unwrap();
    assert!(stopped);

    let found = ledger.find("tok-1").await.unwrap().unwrap();
    assert!(!found.active);

    // The row still exists and still matches; stop never deletes.
    let stopped_again = ledger.stop("tok-1").await.unwrap();
    assert!(stopped_again);
}

#[tokio::test]
async fn test_stop_of_unknown_token_reports_nothing_to_stop() {
    let ledger = ledger();

    let stopped = ledger.stop("missing").await.unwrap();
    assert!(!stopped);
}

#[tokio::test]
async fn test_each_start_is_independent() {
    let ledger = ledger();

    ledger.start("tok-1").await.unwrap();
    ledger.start("tok-2").await.unwrap();

    ledger.stop("tok-1").await.unwrap();

    // Stopping one session leaves the other untouched.
    assert!(!ledger.find("tok-1").await.unwrap().unwrap().active);
    assert!(ledger.find("tok-2").await.unwrap().unwrap().active);
}
