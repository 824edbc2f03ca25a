//! The relationship graph engine.
//!
//! [`Graph`] owns the account [`Directory`] and the three edge sets. Every
//! operation resolves all of its emails before it checks any rule, and checks
//! every rule before it writes, so a rejected call leaves the graph unchanged.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
  Error, Result,
  account::Account,
  directory::Directory,
  edge::{Block, FriendPair, Subscription},
  recipients::Recipients,
};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Rules that are a product decision rather than a structural invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphPolicy {
  /// Whether an account may befriend, subscribe to, or block itself.
  pub allow_self_edges: bool,
}

impl Default for GraphPolicy {
  fn default() -> Self { Self { allow_self_edges: true } }
}

impl GraphPolicy {
  /// Reject a self edge between `a` and `b` when the policy forbids it.
  pub fn check_pair(&self, a: &str, b: &str) -> Result<()> {
    if !self.allow_self_edges && a == b {
      return Err(Error::SelfReference(a.to_owned()));
    }
    Ok(())
  }
}

// ─── Graph ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Graph {
  directory:     Directory,
  friendships:   BTreeSet<FriendPair>,
  subscriptions: BTreeSet<Subscription>,
  blocks:        BTreeSet<Block>,
  policy:        GraphPolicy,
}

impl Graph {
  pub fn new(policy: GraphPolicy) -> Self {
    Self { policy, ..Self::default() }
  }

  pub fn policy(&self) -> GraphPolicy { self.policy }

  pub fn directory(&self) -> &Directory { &self.directory }

  // ── Accounts ────────────────────────────────────────────────────────────

  pub fn create_account(&mut self, email: &str) -> Result<Account> {
    let account = self.directory.create(email)?;
    tracing::info!(email, account_id = %account.account_id, "account created");
    Ok(account)
  }

  // ── Mutations ───────────────────────────────────────────────────────────

  /// Record a mutual friendship. Re-befriending an existing pair is a no-op.
  pub fn befriend(&mut self, a: &str, b: &str) -> Result<()> {
    let a_id = self.directory.resolve(a)?.account_id;
    let b_id = self.directory.resolve(b)?.account_id;
    self.policy.check_pair(a, b)?;

    if self.has_blocked(a_id, b_id) || self.has_blocked(b_id, a_id) {
      tracing::debug!(a, b, "befriend vetoed by block");
      return Err(Error::AccountBlocked);
    }

    if self.friendships.insert(FriendPair::new(a_id, b_id)) {
      tracing::info!(a, b, "friendship recorded");
    }
    Ok(())
  }

  /// Subscribe `requestor` to `target`'s updates.
  pub fn subscribe(&mut self, requestor: &str, target: &str) -> Result<()> {
    let subscriber = self.directory.resolve(requestor)?.account_id;
    let target_id = self.directory.resolve(target)?.account_id;
    self.policy.check_pair(requestor, target)?;

    let edge = Subscription { target: target_id, subscriber };
    if !self.subscriptions.insert(edge) {
      return Err(Error::AlreadySubscribed);
    }
    tracing::info!(requestor, target, "subscription recorded");
    Ok(())
  }

  /// Record that `requestor` blocks `target`. Existing friend and subscription
  /// edges between them are kept.
  pub fn block(&mut self, requestor: &str, target: &str) -> Result<()> {
    let blocker = self.directory.resolve(requestor)?.account_id;
    let blocked = self.directory.resolve(target)?.account_id;
    self.policy.check_pair(requestor, target)?;

    if !self.blocks.insert(Block { blocker, blocked }) {
      return Err(Error::AlreadyBlocked);
    }
    tracing::info!(requestor, target, "block recorded");
    Ok(())
  }

  // ── Queries ─────────────────────────────────────────────────────────────

  /// Friend emails of `email`, ascending.
  pub fn friends(&self, email: &str) -> Result<Vec<String>> {
    let id = self.directory.resolve(email)?.account_id;
    Ok(self.emails(self.friend_ids(id)).into_iter().collect())
  }

  /// Emails that are friends of both `a` and `b`, ascending.
  pub fn common_friends(&self, a: &str, b: &str) -> Result<Vec<String>> {
    let a_id = self.directory.resolve(a)?.account_id;
    let b_id = self.directory.resolve(b)?.account_id;

    let a_friends = self.emails(self.friend_ids(a_id));
    let b_friends = self.emails(self.friend_ids(b_id));
    Ok(a_friends.intersection(&b_friends).cloned().collect())
  }

  /// Friends and subscribers of `sender`, minus every account that has blocked
  /// `sender`. Ascending, no duplicates.
  pub fn eligible_recipients(&self, sender: &str) -> Result<Vec<String>> {
    let id = self.directory.resolve(sender)?.account_id;

    let blockers: BTreeSet<Uuid> = self
      .blocks
      .iter()
      .filter(|b| b.blocked == id)
      .map(|b| b.blocker)
      .collect();

    let connected = self.friend_ids(id).chain(
      self
        .subscriptions
        .iter()
        .filter(move |s| s.target == id)
        .map(|s| s.subscriber),
    );

    let eligible = self.emails(connected.filter(|c| !blockers.contains(c)));
    Ok(eligible.into_iter().collect())
  }

  /// [`Self::eligible_recipients`] plus the mentions found in `text`.
  pub fn broadcast_recipients(
    &self,
    sender: &str,
    text: &str,
  ) -> Result<Recipients> {
    Ok(Recipients::compose(self.eligible_recipients(sender)?, text))
  }

  // ── Edge predicates ─────────────────────────────────────────────────────

  pub fn are_friends(&self, a: Uuid, b: Uuid) -> bool {
    self.friendships.contains(&FriendPair::new(a, b))
  }

  pub fn is_subscribed(&self, subscriber: Uuid, target: Uuid) -> bool {
    self
      .subscriptions
      .contains(&Subscription { target, subscriber })
  }

  pub fn has_blocked(&self, blocker: Uuid, blocked: Uuid) -> bool {
    self.blocks.contains(&Block { blocker, blocked })
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  fn friend_ids(&self, id: Uuid) -> impl Iterator<Item = Uuid> + '_ {
    self.friendships.iter().filter_map(move |pair| pair.other(id))
  }

  fn emails(&self, ids: impl Iterator<Item = Uuid>) -> BTreeSet<String> {
    ids
      .filter_map(|id| self.directory.email_of(id))
      .map(str::to_owned)
      .collect()
  }
}
