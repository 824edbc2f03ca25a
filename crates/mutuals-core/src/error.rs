//! Error types for `mutuals-core`.
//!
//! Every variant is a request rejection: the operation that produced it left
//! the graph untouched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("account does not exist: {0}")]
  NonExistentAccount(String),

  #[error("email already exists: {0}")]
  DuplicateEmail(String),

  #[error("cannot befriend, one account blocked the other")]
  AccountBlocked,

  #[error("requestor already subscribed")]
  AlreadySubscribed,

  #[error("target already blocked")]
  AlreadyBlocked,

  #[error("self-referential edges are not permitted: {0}")]
  SelfReference(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
