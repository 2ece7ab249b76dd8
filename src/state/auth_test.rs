use super::*;
use crate::events::Notifier;
use crate::store::test_helpers::{MockSource, ann, bob};
use std::time::Duration;

fn auth_with(source: MockSource) -> (AuthModule, Arc<Notifier>) {
    let notifier = Arc::new(Notifier::new(16));
    (AuthModule::new(Arc::new(source), Arc::clone(&notifier)), notifier)
}

// =============================================================
// AuthState defaults
// =============================================================

#[test]
fn auth_state_default_no_user() {
    let state = AuthState::default();
    assert!(state.user.is_none());
}

#[test]
fn auth_module_starts_without_user() {
    let (auth, _) = auth_with(MockSource::new(Vec::new()));
    assert!(auth.user().is_none());
    assert_eq!(auth.state(), AuthState::default());
}

// =============================================================
// set_user
// =============================================================

#[test]
fn set_user_round_trips_exactly() {
    let (auth, _) = auth_with(MockSource::new(Vec::new()));
    auth.set_user(ann());
    assert_eq!(auth.user(), Some(ann()));
}

#[test]
fn set_user_replaces_wholesale() {
    let (auth, _) = auth_with(MockSource::new(Vec::new()));
    auth.set_user(User::new(serde_json::json!({ "id": 1, "name": "Ann", "admin": true })));
    auth.set_user(bob());
    let user = auth.user().unwrap();
    assert_eq!(user, bob());
    assert!(user.get("admin").is_none());
}

#[test]
fn set_user_notifies_subscribers() {
    let (auth, notifier) = auth_with(MockSource::new(Vec::new()));
    let mut sub = notifier.subscribe();
    auth.set_user(ann());
    assert_eq!(sub.rx.try_recv().unwrap(), StoreEvent::UserChanged(Some(ann())));
}

// =============================================================
// update_user
// =============================================================

#[tokio::test]
async fn update_user_commits_fetched_body() {
    let (auth, _) = auth_with(MockSource::new(vec![(Duration::ZERO, Ok(ann()))]));

    let user = auth.update_user().await.unwrap();
    assert_eq!(user, ann());
    assert_eq!(auth.user(), Some(ann()));
}

#[tokio::test]
async fn update_user_failure_keeps_absent_user() {
    let failure = FetchError::Request("connection refused".into());
    let (auth, notifier) = auth_with(MockSource::new(vec![(Duration::ZERO, Err(failure.clone()))]));
    let mut sub = notifier.subscribe();

    let err = auth.update_user().await.unwrap_err();
    assert_eq!(err, failure);
    assert!(auth.user().is_none());
    assert!(sub.rx.try_recv().is_err());
}

#[tokio::test]
async fn update_user_failure_keeps_previous_user() {
    let (auth, _) = auth_with(MockSource::new(vec![
        (Duration::ZERO, Ok(ann())),
        (Duration::ZERO, Err(FetchError::Status { status: 500, body: "boom".into() })),
    ]));

    auth.update_user().await.unwrap();
    assert!(auth.update_user().await.is_err());
    assert_eq!(auth.user(), Some(ann()));
}

#[tokio::test]
async fn update_user_does_not_retry() {
    let source = Arc::new(MockSource::new(vec![
        (Duration::ZERO, Err(FetchError::Request("down".into()))),
        (Duration::ZERO, Ok(ann())),
    ]));
    let notifier = Arc::new(Notifier::new(4));
    let auth = AuthModule::new(Arc::clone(&source) as Arc<dyn UserSource>, notifier);

    assert!(auth.update_user().await.is_err());
    assert_eq!(source.calls(), 1);
    assert!(auth.user().is_none());
}

#[tokio::test(start_paused = true)]
async fn overlapping_updates_last_response_wins() {
    let (auth, _) = auth_with(MockSource::new(vec![
        (Duration::from_millis(10), Ok(ann())),
        (Duration::from_millis(60), Ok(bob())),
    ]));

    let (first, second) = tokio::join!(auth.update_user(), auth.update_user());
    assert_eq!(first.unwrap(), ann());
    assert_eq!(second.unwrap(), bob());
    assert_eq!(auth.user(), Some(bob()));
}

#[tokio::test(start_paused = true)]
async fn overlapping_updates_are_not_sequenced_by_call_order() {
    let (auth, _) = auth_with(MockSource::new(vec![
        (Duration::from_millis(60), Ok(ann())),
        (Duration::from_millis(10), Ok(bob())),
    ]));

    let _ = tokio::join!(auth.update_user(), auth.update_user());
    // The first call's response landed last, so it wins.
    assert_eq!(auth.user(), Some(ann()));
}

// =============================================================
// null bodies
// =============================================================

#[tokio::test]
async fn update_user_null_body_reads_as_absent() {
    let (auth, _) = auth_with(MockSource::new(vec![(Duration::ZERO, Ok(User::new(serde_json::Value::Null)))]));

    auth.update_user().await.unwrap();
    assert!(auth.user().is_none());
    assert_eq!(auth.state(), AuthState::default());
}

#[tokio::test]
async fn update_user_null_body_clears_previous_user() {
    let (auth, notifier) = auth_with(MockSource::new(vec![(Duration::ZERO, Ok(User::new(serde_json::Value::Null)))]));
    auth.set_user(ann());
    let mut sub = notifier.subscribe();

    auth.update_user().await.unwrap();
    assert!(auth.user().is_none());
    assert_eq!(sub.rx.try_recv().unwrap(), StoreEvent::UserChanged(None));
}
