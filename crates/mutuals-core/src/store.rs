//! The `RelationshipStore` trait.
//!
//! The trait is implemented by storage backends ([`MemoryStore`] here,
//! `mutuals-store-sqlite` for persistence). Higher layers (`mutuals-api`,
//! `mutuals-server`) depend on this abstraction, not on any concrete backend.
//!
//! [`MemoryStore`]: crate::memory::MemoryStore

use std::future::Future;

use uuid::Uuid;

use crate::{account::Account, recipients::Recipients};

// ─── Domain errors ───────────────────────────────────────────────────────────

/// Lets a boundary layer tell a rule rejection apart from a storage failure
/// without knowing the backend's concrete error type.
pub trait DomainError {
  /// The rejection carried by this error, if it is one.
  fn domain(&self) -> Option<&crate::Error>;
}

impl DomainError for crate::Error {
  fn domain(&self) -> Option<&crate::Error> { Some(self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a relationship graph backend.
///
/// Every mutation is applied atomically: a friendship is recorded for both
/// accounts or for neither, and concurrent mutations touching the same account
/// never lose an edge. Queries are snapshot reads.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RelationshipStore: Send + Sync {
  type Error: std::error::Error + DomainError + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Create an account. Fails with `DuplicateEmail` if the email is taken.
  fn create_account<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + 'a;

  /// Retrieve an account by id. Returns `None` if not found.
  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Record a mutual friendship between `a` and `b`.
  ///
  /// Fails with `NonExistentAccount` if either is missing, or with
  /// `AccountBlocked` if either has blocked the other.
  fn befriend<'a>(
    &'a self,
    a: &'a str,
    b: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Subscribe `requestor` to `target`'s updates.
  ///
  /// Fails with `AlreadySubscribed` on a repeat.
  fn subscribe<'a>(
    &'a self,
    requestor: &'a str,
    target: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Record that `requestor` blocks `target`.
  ///
  /// Fails with `AlreadyBlocked` on a repeat.
  fn block<'a>(
    &'a self,
    requestor: &'a str,
    target: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Queries ───────────────────────────────────────────────────────────

  /// Friend emails of `email`, ascending.
  fn friends<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Emails that are friends of both `a` and `b`, ascending.
  fn common_friends<'a>(
    &'a self,
    a: &'a str,
    b: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Friends and subscribers of `sender` that have not blocked it, ascending.
  fn eligible_recipients<'a>(
    &'a self,
    sender: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// [`Self::eligible_recipients`] followed by the email-like substrings of
  /// `text`.
  fn broadcast_recipients<'a>(
    &'a self,
    sender: &'a str,
    text: &'a str,
  ) -> impl Future<Output = Result<Recipients, Self::Error>> + Send + 'a {
    async move {
      let eligible = self.eligible_recipients(sender).await?;
      Ok(Recipients::compose(eligible, text))
    }
  }
}
