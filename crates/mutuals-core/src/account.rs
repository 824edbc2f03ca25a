//! Account: the identity every edge hangs off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user identity addressed by a unique, case-sensitive email.
///
/// Accounts hold no edges themselves; the graph keys its edge sets by
/// `account_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub account_id: Uuid,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

impl Account {
  /// Build a fresh account with a server-assigned id and timestamp.
  pub fn new(email: impl Into<String>) -> Self {
    Self {
      account_id: Uuid::new_v4(),
      email:      email.into(),
      created_at: Utc::now(),
    }
  }
}
