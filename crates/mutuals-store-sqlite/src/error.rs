//! Error type for `mutuals-store-sqlite`.

use mutuals_core::store::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A rule rejection from the relationship engine.
  #[error(transparent)]
  Core(#[from] mutuals_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl DomainError for Error {
  fn domain(&self) -> Option<&mutuals_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
