//! [`SqliteStore`]: the SQLite implementation of [`RelationshipStore`].
//!
//! Every mutation runs inside one `IMMEDIATE` transaction within one
//! [`tokio_rusqlite::Connection::call`]: resolution, rule checks and the insert
//! commit together or not at all. Rule rejections are returned from the
//! closure as an inner `Err`, which drops (and so rolls back) the transaction.

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use mutuals_core::{
  account::Account,
  edge::FriendPair,
  graph::GraphPolicy,
  store::RelationshipStore,
};

use crate::{
  Result,
  encode::{RawAccount, encode_dt, encode_uuid, uuid_column},
  schema::SCHEMA,
};

/// The outcome of a closure run on the connection thread: a rule rejection is
/// a successful database round-trip.
type Outcome<T> = mutuals_core::Result<T>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A relationship store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  policy: GraphPolicy,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, policy: GraphPolicy::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, policy: GraphPolicy::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the edge policy applied to subsequent mutations.
  pub fn with_policy(mut self, policy: GraphPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn policy(&self) -> GraphPolicy { self.policy }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Connection-thread helpers ───────────────────────────────────────────────

/// Look up the id of the account with `email`.
fn lookup(conn: &Connection, email: &str) -> rusqlite::Result<Option<Uuid>> {
  conn
    .query_row(
      "SELECT account_id FROM accounts WHERE email = ?1",
      rusqlite::params![email],
      |row| uuid_column(row, 0),
    )
    .optional()
}

/// Resolve every email in `emails`, in order, before anything else happens.
/// The first missing one becomes a `NonExistentAccount` rejection.
fn resolve_all<const N: usize>(
  conn: &Connection,
  emails: [&str; N],
) -> rusqlite::Result<Outcome<[Uuid; N]>> {
  let mut ids = [Uuid::nil(); N];
  for (slot, email) in ids.iter_mut().zip(emails) {
    match lookup(conn, email)? {
      Some(id) => *slot = id,
      None => {
        return Ok(Err(mutuals_core::Error::NonExistentAccount(email.to_owned())));
      }
    }
  }
  Ok(Ok(ids))
}

fn has_blocked(
  conn: &Connection,
  blocker: Uuid,
  blocked: Uuid,
) -> rusqlite::Result<bool> {
  conn.query_row(
    "SELECT EXISTS(SELECT 1 FROM blocks WHERE blocker_id = ?1 AND blocked_id = ?2)",
    rusqlite::params![encode_uuid(blocker), encode_uuid(blocked)],
    |row| row.get(0),
  )
}

/// Collect a single-column `email` result set.
fn emails(
  conn: &Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt
    .query_map(params, |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(rows)
}

/// Friend ids of `?1`, one per row, in column `id`.
const FRIEND_IDS: &str = "
  SELECT CASE WHEN low_id = ?1 THEN high_id ELSE low_id END AS id
  FROM friendships
  WHERE low_id = ?1 OR high_id = ?1";

// ─── RelationshipStore impl ──────────────────────────────────────────────────

impl RelationshipStore for SqliteStore {
  type Error = crate::Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_account<'a>(&'a self, email: &'a str) -> Result<Account> {
    let account = Account::new(email);

    let id_str  = encode_uuid(account.account_id);
    let email_s = account.email.clone();
    let at_str  = encode_dt(account.created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if lookup(&tx, &email_s)?.is_some() {
          return Ok(Err(mutuals_core::Error::DuplicateEmail(email_s)));
        }
        tx.execute(
          "INSERT INTO accounts (account_id, email, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, email_s, at_str],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await??;

    tracing::info!(email, account_id = %account.account_id, "account created");
    Ok(account)
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT account_id, email, created_at FROM accounts WHERE account_id = ?1",
            rusqlite::params![id_str],
            RawAccount::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn befriend<'a>(&'a self, a: &'a str, b: &'a str) -> Result<()> {
    let (a_s, b_s) = (a.to_owned(), b.to_owned());
    let policy = self.policy;
    let at_str = encode_dt(Utc::now());

    let recorded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let [a_id, b_id] = match resolve_all(&tx, [a_s.as_str(), b_s.as_str()])? {
          Ok(ids) => ids,
          Err(e) => return Ok(Err(e)),
        };
        if let Err(e) = policy.check_pair(&a_s, &b_s) {
          return Ok(Err(e));
        }
        if has_blocked(&tx, a_id, b_id)? || has_blocked(&tx, b_id, a_id)? {
          return Ok(Err(mutuals_core::Error::AccountBlocked));
        }

        let pair = FriendPair::new(a_id, b_id);
        let inserted = tx.execute(
          "INSERT OR IGNORE INTO friendships (low_id, high_id, recorded_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![encode_uuid(pair.low()), encode_uuid(pair.high()), at_str],
        )?;
        tx.commit()?;
        Ok(Ok(inserted > 0))
      })
      .await?
      .inspect_err(|e| tracing::debug!(a, b, error = %e, "befriend rejected"))?;

    if recorded {
      tracing::info!(a, b, "friendship recorded");
    }
    Ok(())
  }

  async fn subscribe<'a>(
    &'a self,
    requestor: &'a str,
    target: &'a str,
  ) -> Result<()> {
    let (req_s, target_s) = (requestor.to_owned(), target.to_owned());
    let policy = self.policy;
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let [subscriber, target_id] = match resolve_all(&tx, [req_s.as_str(), target_s.as_str()])? {
          Ok(ids) => ids,
          Err(e) => return Ok(Err(e)),
        };
        if let Err(e) = policy.check_pair(&req_s, &target_s) {
          return Ok(Err(e));
        }

        let inserted = tx.execute(
          "INSERT OR IGNORE INTO subscriptions (target_id, subscriber_id, recorded_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![encode_uuid(target_id), encode_uuid(subscriber), at_str],
        )?;
        if inserted == 0 {
          return Ok(Err(mutuals_core::Error::AlreadySubscribed));
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?
      .inspect_err(|e| tracing::debug!(requestor, target, error = %e, "subscribe rejected"))?;

    tracing::info!(requestor, target, "subscription recorded");
    Ok(())
  }

  async fn block<'a>(&'a self, requestor: &'a str, target: &'a str) -> Result<()> {
    let (req_s, target_s) = (requestor.to_owned(), target.to_owned());
    let policy = self.policy;
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let [blocker, blocked] = match resolve_all(&tx, [req_s.as_str(), target_s.as_str()])? {
          Ok(ids) => ids,
          Err(e) => return Ok(Err(e)),
        };
        if let Err(e) = policy.check_pair(&req_s, &target_s) {
          return Ok(Err(e));
        }

        let inserted = tx.execute(
          "INSERT OR IGNORE INTO blocks (blocker_id, blocked_id, recorded_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![encode_uuid(blocker), encode_uuid(blocked), at_str],
        )?;
        if inserted == 0 {
          return Ok(Err(mutuals_core::Error::AlreadyBlocked));
        }
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?
      .inspect_err(|e| tracing::debug!(requestor, target, error = %e, "block rejected"))?;

    tracing::info!(requestor, target, "block recorded");
    Ok(())
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  async fn friends<'a>(&'a self, email: &'a str) -> Result<Vec<String>> {
    let email_s = email.to_owned();

    let friends = self
      .conn
      .call(move |conn| {
        let [id] = match resolve_all(conn, [email_s.as_str()])? {
          Ok(ids) => ids,
          Err(e) => return Ok(Err(e)),
        };
        let sql = format!(
          "SELECT a.email FROM accounts a
           WHERE a.account_id IN ({FRIEND_IDS})
           ORDER BY a.email"
        );
        Ok(Ok(emails(conn, &sql, rusqlite::params![encode_uuid(id)])?))
      })
      .await??;

    tracing::debug!(email, count = friends.len(), "friends listed");
    Ok(friends)
  }

  async fn common_friends<'a>(
    &'a self,
    a: &'a str,
    b: &'a str,
  ) -> Result<Vec<String>> {
    let (a_s, b_s) = (a.to_owned(), b.to_owned());

    let common = self
      .conn
      .call(move |conn| {
        let [a_id, b_id] = match resolve_all(conn, [a_s.as_str(), b_s.as_str()])? {
          Ok(ids) => ids,
          Err(e) => return Ok(Err(e)),
        };
        let friends_of_b = FRIEND_IDS.replace("?1", "?2");
        let sql = format!(
          "SELECT a.email FROM accounts a
           WHERE a.account_id IN ({FRIEND_IDS})
             AND a.account_id IN ({friends_of_b})
           ORDER BY a.email"
        );
        Ok(Ok(emails(
          conn,
          &sql,
          rusqlite::params![encode_uuid(a_id), encode_uuid(b_id)],
        )?))
      })
      .await??;

    tracing::debug!(a, b, count = common.len(), "common friends listed");
    Ok(common)
  }

  async fn eligible_recipients<'a>(
    &'a self,
    sender: &'a str,
  ) -> Result<Vec<String>> {
    let sender_s = sender.to_owned();

    let eligible = self
      .conn
      .call(move |conn| {
        let [id] = match resolve_all(conn, [sender_s.as_str()])? {
          Ok(ids) => ids,
          Err(e) => return Ok(Err(e)),
        };
        let sql = format!(
          "SELECT a.email FROM accounts a
           WHERE a.account_id IN (
               {FRIEND_IDS}
               UNION
               SELECT subscriber_id FROM subscriptions WHERE target_id = ?1
             )
             AND a.account_id NOT IN (
               SELECT blocker_id FROM blocks WHERE blocked_id = ?1
             )
           ORDER BY a.email"
        );
        Ok(Ok(emails(conn, &sql, rusqlite::params![encode_uuid(id)])?))
      })
      .await??;

    tracing::debug!(sender, count = eligible.len(), "eligible recipients listed");
    Ok(eligible)
  }
}
