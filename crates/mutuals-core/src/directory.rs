//! Account directory: email to account resolution.

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::{Error, Result, account::Account};

/// An arena of accounts keyed by email, with a secondary index by id.
#[derive(Debug, Clone, Default)]
pub struct Directory {
  by_email: BTreeMap<String, Uuid>,
  accounts: HashMap<Uuid, Account>,
}

impl Directory {
  /// Register a new account. Fails with [`Error::DuplicateEmail`] if the email
  /// is already taken.
  pub fn create(&mut self, email: &str) -> Result<Account> {
    if self.by_email.contains_key(email) {
      return Err(Error::DuplicateEmail(email.to_owned()));
    }
    let account = Account::new(email);
    self.by_email.insert(account.email.clone(), account.account_id);
    self.accounts.insert(account.account_id, account.clone());
    Ok(account)
  }

  /// Look up an account by email. Fails with [`Error::NonExistentAccount`] if
  /// absent.
  pub fn resolve(&self, email: &str) -> Result<&Account> {
    self
      .by_email
      .get(email)
      .and_then(|id| self.accounts.get(id))
      .ok_or_else(|| Error::NonExistentAccount(email.to_owned()))
  }

  pub fn get(&self, id: Uuid) -> Option<&Account> { self.accounts.get(&id) }

  pub fn email_of(&self, id: Uuid) -> Option<&str> {
    self.accounts.get(&id).map(|a| a.email.as_str())
  }

  pub fn len(&self) -> usize { self.accounts.len() }

  pub fn is_empty(&self) -> bool { self.accounts.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn create_and_resolve() {
    let mut dir = Directory::default();
    let created = dir.create("a@x.com").unwrap();
    let resolved = dir.resolve("a@x.com").unwrap();
    assert_eq!(resolved, &created);
    assert_eq!(dir.get(created.account_id), Some(&created));
    assert_eq!(dir.email_of(created.account_id), Some("a@x.com"));
  }

  #[test]
  fn duplicate_email_rejected() {
    let mut dir = Directory::default();
    dir.create("a@x.com").unwrap();
    assert_eq!(
      dir.create("a@x.com"),
      Err(Error::DuplicateEmail("a@x.com".into()))
    );
    assert_eq!(dir.len(), 1);
  }

  #[test]
  fn resolve_is_case_sensitive() {
    let mut dir = Directory::default();
    dir.create("a@x.com").unwrap();
    assert_eq!(
      dir.resolve("A@x.com"),
      Err(Error::NonExistentAccount("A@x.com".into()))
    );
  }
}
