//! Edge records for the three relationship kinds.
//!
//! Edges hold account ids only; emails are resolved through the
//! [`Directory`](crate::directory::Directory) when a query needs them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Friend ──────────────────────────────────────────────────────────────────

/// An undirected friendship stored once, with its endpoints in canonical
/// order (`low <= high`).
///
/// `FriendPair::new(a, b) == FriendPair::new(b, a)`, so a friendship is either
/// present for both accounts or for neither.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FriendPair {
  low:  Uuid,
  high: Uuid,
}

impl FriendPair {
  pub fn new(a: Uuid, b: Uuid) -> Self {
    if a <= b {
      Self { low: a, high: b }
    } else {
      Self { low: b, high: a }
    }
  }

  pub fn low(&self) -> Uuid { self.low }

  pub fn high(&self) -> Uuid { self.high }

  /// The endpoint opposite `id`, or `None` if `id` is not part of this pair.
  /// A self-pair returns `id` itself.
  pub fn other(&self, id: Uuid) -> Option<Uuid> {
    if id == self.low {
      Some(self.high)
    } else if id == self.high {
      Some(self.low)
    } else {
      None
    }
  }

  pub fn is_self(&self) -> bool { self.low == self.high }
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// `subscriber` receives `target`'s updates. Not reciprocal.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Subscription {
  pub target:     Uuid,
  pub subscriber: Uuid,
}

// ─── Block ───────────────────────────────────────────────────────────────────

/// `blocker` no longer sees `blocked`'s activity and vetoes new friendships
/// with it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Block {
  pub blocker: Uuid,
  pub blocked: Uuid,
}
