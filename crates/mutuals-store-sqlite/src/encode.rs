//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use mutuals_core::account::Account;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// Read a UUID column inside a row-mapping closure.
pub fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
  let raw: String = row.get(idx)?;
  Uuid::parse_str(&raw).map_err(|e| {
    rusqlite::Error::FromSqlConversionFailure(
      idx,
      rusqlite::types::Type::Text,
      Box::new(e),
    )
  })
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id: String,
  pub email:      String,
  pub created_at: String,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawAccount {
      account_id: row.get(0)?,
      email:      row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id: decode_uuid(&self.account_id)?,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
