//! Integration tests for `SqliteStore` against an in-memory database.

use mutuals_core::{graph::GraphPolicy, store::RelationshipStore};
use uuid::Uuid;

use crate::{Error, SqliteStore};

const A: &str = "a@x.com";
const B: &str = "b@x.com";
const C: &str = "c@x.com";
const D: &str = "d@x.com";

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn store_with(emails: &[&str]) -> SqliteStore {
  let s = store().await;
  for email in emails {
    s.create_account(email).await.unwrap();
  }
  s
}

fn rejection(err: Error) -> mutuals_core::Error {
  match err {
    Error::Core(e) => e,
    other => panic!("expected a rule rejection, got {other:?}"),
  }
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_account() {
  let s = store().await;

  let account = s.create_account(A).await.unwrap();
  assert_eq!(account.email, A);

  let fetched = s.get_account(account.account_id).await.unwrap();
  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.account_id, account.account_id);
  assert_eq!(fetched.email, A);
}

#[tokio::test]
async fn get_account_missing_returns_none() {
  let s = store().await;
  let result = s.get_account(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn duplicate_email_rejected() {
  let s = store_with(&[A]).await;
  let err = s.create_account(A).await.unwrap_err();
  assert_eq!(
    rejection(err),
    mutuals_core::Error::DuplicateEmail(A.into())
  );
}

#[tokio::test]
async fn emails_are_case_sensitive() {
  let s = store_with(&[A]).await;
  s.create_account("A@x.com").await.unwrap();
  let err = s.friends("A@X.COM").await.unwrap_err();
  assert!(matches!(
    rejection(err),
    mutuals_core::Error::NonExistentAccount(_)
  ));
}

// ─── Befriend ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn befriend_is_visible_from_both_sides() {
  let s = store_with(&[A, B, C]).await;
  s.befriend(A, B).await.unwrap();

  assert_eq!(s.friends(A).await.unwrap(), vec![B]);
  assert_eq!(s.friends(B).await.unwrap(), vec![A]);
  assert!(s.friends(C).await.unwrap().is_empty());
}

#[tokio::test]
async fn befriend_twice_is_a_noop() {
  let s = store_with(&[A, B]).await;
  s.befriend(A, B).await.unwrap();
  s.befriend(A, B).await.unwrap();
  s.befriend(B, A).await.unwrap();

  assert_eq!(s.friends(A).await.unwrap(), vec![B]);
  assert_eq!(s.friends(B).await.unwrap(), vec![A]);
}

#[tokio::test]
async fn befriend_with_unknown_account_writes_nothing() {
  let s = store_with(&[A]).await;

  let err = s.befriend(A, D).await.unwrap_err();
  assert_eq!(
    rejection(err),
    mutuals_core::Error::NonExistentAccount(D.into())
  );
  assert!(s.friends(A).await.unwrap().is_empty());
}

#[tokio::test]
async fn block_vetoes_befriend_either_way() {
  let s = store_with(&[A, B]).await;
  s.block(B, A).await.unwrap();

  let err = s.befriend(A, B).await.unwrap_err();
  assert_eq!(rejection(err), mutuals_core::Error::AccountBlocked);
  let err = s.befriend(B, A).await.unwrap_err();
  assert_eq!(rejection(err), mutuals_core::Error::AccountBlocked);

  assert!(s.friends(A).await.unwrap().is_empty());
  assert!(s.friends(B).await.unwrap().is_empty());
}

#[tokio::test]
async fn block_does_not_sever_friendship() {
  let s = store_with(&[A, B]).await;
  s.befriend(A, B).await.unwrap();
  s.block(A, B).await.unwrap();

  assert_eq!(s.friends(A).await.unwrap(), vec![B]);
  assert_eq!(s.friends(B).await.unwrap(), vec![A]);
}

#[tokio::test]
async fn friends_listed_by_email() {
  let s = store_with(&[A, B, C, D]).await;
  s.befriend(A, D).await.unwrap();
  s.befriend(C, A).await.unwrap();
  s.befriend(A, B).await.unwrap();

  assert_eq!(s.friends(A).await.unwrap(), vec![B, C, D]);
}

#[tokio::test]
async fn concurrent_befriends_are_all_recorded() {
  let s = store_with(&[A]).await;
  let others: Vec<String> = (0..16).map(|i| format!("u{i}@x.com")).collect();
  for email in &others {
    s.create_account(email).await.unwrap();
  }

  let mut handles = Vec::new();
  for email in others.iter().cloned() {
    let s = s.clone();
    handles.push(tokio::spawn(async move { s.befriend(A, &email).await }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  assert_eq!(s.friends(A).await.unwrap().len(), 16);
  for email in &others {
    assert_eq!(s.friends(email).await.unwrap(), vec![A]);
  }
}

// ─── Common friends ──────────────────────────────────────────────────────────

#[tokio::test]
async fn common_friends_is_symmetric() {
  let s = store_with(&[A, B, C, D]).await;
  s.befriend(A, C).await.unwrap();
  s.befriend(B, C).await.unwrap();
  s.befriend(A, D).await.unwrap();
  s.befriend(A, B).await.unwrap();

  assert_eq!(s.common_friends(A, B).await.unwrap(), vec![C]);
  assert_eq!(s.common_friends(B, A).await.unwrap(), vec![C]);
}

#[tokio::test]
async fn common_friends_empty_and_unknown() {
  let s = store_with(&[A, B]).await;
  assert!(s.common_friends(A, B).await.unwrap().is_empty());

  let err = s.common_friends(D, A).await.unwrap_err();
  assert_eq!(
    rejection(err),
    mutuals_core::Error::NonExistentAccount(D.into())
  );
}

// ─── Subscribe / block ───────────────────────────────────────────────────────

#[tokio::test]
async fn subscribe_twice_fails() {
  let s = store_with(&[A, C]).await;
  s.subscribe(C, A).await.unwrap();

  let err = s.subscribe(C, A).await.unwrap_err();
  assert_eq!(rejection(err), mutuals_core::Error::AlreadySubscribed);

  // The reverse subscription is independent.
  s.subscribe(A, C).await.unwrap();
}

#[tokio::test]
async fn block_twice_fails() {
  let s = store_with(&[A, B]).await;
  s.block(A, B).await.unwrap();

  let err = s.block(A, B).await.unwrap_err();
  assert_eq!(rejection(err), mutuals_core::Error::AlreadyBlocked);

  s.block(B, A).await.unwrap();
}

#[tokio::test]
async fn mutations_with_unknown_accounts() {
  let s = store_with(&[A]).await;

  let err = s.subscribe(D, A).await.unwrap_err();
  assert_eq!(
    rejection(err),
    mutuals_core::Error::NonExistentAccount(D.into())
  );
  let err = s.block(A, D).await.unwrap_err();
  assert_eq!(
    rejection(err),
    mutuals_core::Error::NonExistentAccount(D.into())
  );
}

// ─── Broadcast ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn broadcast_to_subscriber_plus_mention() {
  let s = store_with(&[A, B, C]).await;
  s.subscribe(C, A).await.unwrap();

  let r = s.broadcast_recipients(A, "ping d@x.com").await.unwrap();
  assert_eq!(r.eligible, vec![C]);
  assert_eq!(r.mentioned, vec![D]);
  assert_eq!(r.into_vec(), vec![C, D]);
}

#[tokio::test]
async fn broadcast_unions_friends_and_subscribers_once() {
  let s = store_with(&[A, B, C]).await;
  s.befriend(A, B).await.unwrap();
  s.subscribe(B, A).await.unwrap();
  s.subscribe(C, A).await.unwrap();

  assert_eq!(s.eligible_recipients(A).await.unwrap(), vec![B, C]);
}

#[tokio::test]
async fn broadcast_excludes_blockers_of_sender() {
  let s = store_with(&[A, B, C, D]).await;
  s.befriend(A, B).await.unwrap();
  s.subscribe(C, A).await.unwrap();
  s.befriend(A, D).await.unwrap();
  s.subscribe(D, A).await.unwrap();
  s.block(B, A).await.unwrap();
  s.block(D, A).await.unwrap();
  // Blocks issued by the sender do not matter.
  s.block(A, C).await.unwrap();

  let r = s.broadcast_recipients(A, "").await.unwrap();
  assert_eq!(r.eligible, vec![C]);
  assert!(r.mentioned.is_empty());
}

#[tokio::test]
async fn broadcast_mentions_are_appended_verbatim() {
  let s = store_with(&[A, C]).await;
  s.subscribe(C, A).await.unwrap();

  let r = s
    .broadcast_recipients(A, "c@x.com, c@x.com and z@y.org")
    .await
    .unwrap();
  assert_eq!(
    r.into_vec(),
    vec![C, C, C, "z@y.org"]
  );
}

#[tokio::test]
async fn broadcast_from_unknown_sender() {
  let s = store().await;
  let err = s.broadcast_recipients(A, "hi").await.unwrap_err();
  assert_eq!(
    rejection(err),
    mutuals_core::Error::NonExistentAccount(A.into())
  );
}

// ─── Self edges ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn self_edges_permitted_by_default() {
  let s = store_with(&[A]).await;
  s.befriend(A, A).await.unwrap();
  s.subscribe(A, A).await.unwrap();

  assert_eq!(s.friends(A).await.unwrap(), vec![A]);
  assert_eq!(s.eligible_recipients(A).await.unwrap(), vec![A]);

  s.block(A, A).await.unwrap();
  assert!(s.eligible_recipients(A).await.unwrap().is_empty());
}

#[tokio::test]
async fn self_edges_rejected_by_policy() {
  let s = store()
    .await
    .with_policy(GraphPolicy { allow_self_edges: false });
  s.create_account(A).await.unwrap();

  let expected = mutuals_core::Error::SelfReference(A.into());
  assert_eq!(rejection(s.befriend(A, A).await.unwrap_err()), expected);
  assert_eq!(rejection(s.subscribe(A, A).await.unwrap_err()), expected);
  assert_eq!(rejection(s.block(A, A).await.unwrap_err()), expected);
  assert!(s.friends(A).await.unwrap().is_empty());
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn edges_survive_reopen() {
  let path = std::env::temp_dir().join(format!("mutuals-{}.db", Uuid::new_v4()));

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create_account(A).await.unwrap();
    s.create_account(B).await.unwrap();
    s.befriend(A, B).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.friends(B).await.unwrap(), vec![A]);
  let err = s.create_account(A).await.unwrap_err();
  assert_eq!(
    rejection(err),
    mutuals_core::Error::DuplicateEmail(A.into())
  );

  drop(s);
  let _ = std::fs::remove_file(&path);
}
