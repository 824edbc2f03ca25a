//! Broadcast recipient sets.

use serde::{Deserialize, Serialize};

use crate::email::mentions;

/// The outcome of broadcast resolution for one sender and message.
///
/// `eligible` is set-like (unique, ascending by email). `mentioned` is every
/// email-like substring of the message in text order, never deduplicated
/// against `eligible` or against itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
  pub eligible:  Vec<String>,
  pub mentioned: Vec<String>,
}

impl Recipients {
  /// Combine an eligible set with the mentions found in `text`.
  pub fn compose(eligible: Vec<String>, text: &str) -> Self {
    Self { eligible, mentioned: mentions(text) }
  }

  /// Eligible recipients first, then mentions.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self
      .eligible
      .iter()
      .chain(self.mentioned.iter())
      .map(String::as_str)
  }

  pub fn len(&self) -> usize { self.eligible.len() + self.mentioned.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn into_vec(self) -> Vec<String> {
    let mut all = self.eligible;
    all.extend(self.mentioned);
    all
  }
}
